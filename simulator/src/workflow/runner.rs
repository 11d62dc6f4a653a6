use crate::generator::profile::PulseTrainGenerator;
use crate::workflow::config::{Scenario, WorkflowConfig};
use anyhow::Context;
use dfscore::channel::{default_5ghz_catalogue, ChannelWidth, SelectionFlags};
use dfscore::clock::{ManualTicks, TickSource};
use dfscore::nol::NolSnapshotEntry;
use dfscore::telemetry::MetricsSnapshot;
use dfscore::{ChipId, DfsConfig, DfsEngine, DfsError, DfsEventSink, RadarDetection};
use serde::Serialize;
use std::sync::{Arc, Mutex};

const OPERATING_CHANNEL_MHZ: u32 = 5260;

/// Reselection result flattened for the run report.
#[derive(Debug, Clone, Serialize)]
pub struct ReselectionSummary {
    pub channel_mhz: u32,
    pub width_mhz: u32,
    pub downgraded: bool,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub domain: String,
    pub scenario: Scenario,
    pub pulses_enqueued: usize,
    pub detections: Vec<RadarDetection>,
    pub nol: Vec<NolSnapshotEntry>,
    /// None when no detection occurred, or when every candidate was ruled
    /// out.
    pub reselection: Option<ReselectionSummary>,
    pub metrics: MetricsSnapshot,
}

/// Event sink that records engine callbacks for the report.
#[derive(Default)]
struct RecordingSink {
    detections: Mutex<Vec<RadarDetection>>,
}

impl RecordingSink {
    fn take(&self) -> Vec<RadarDetection> {
        self.detections
            .lock()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or_default()
    }
}

/// Newtype so the foreign `DfsEventSink` trait can be implemented for a
/// shared `RecordingSink` without tripping the orphan rule.
struct SinkHandle(Arc<RecordingSink>);

impl DfsEventSink for SinkHandle {
    fn on_radar_detected(&self, detection: &RadarDetection) {
        if let Ok(mut detections) = self.0.detections.lock() {
            detections.push(*detection);
        }
    }

    fn on_nol_expired(&self, _channel_mhz: u32, _width: ChannelWidth) {}
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Feeds the configured pulse trains through a fresh engine and reports
    /// what the detector, NOL, and reselection path did with them.
    pub fn execute(&self) -> anyhow::Result<RunSummary> {
        self.execute_with_engine().map(|(summary, _)| summary)
    }

    /// Like [`Runner::execute`], but hands back the engine so the caller can
    /// keep driving NOL expiry after the run.
    pub fn execute_with_engine(&self) -> anyhow::Result<(RunSummary, DfsEngine)> {
        let domain = self.config.domain_code()?;
        let sink = Arc::new(RecordingSink::default());
        let engine = DfsEngine::new(DfsConfig::default(), self.config.seed)
            .with_sink(Box::new(SinkHandle(sink.clone())));
        engine
            .configure(domain, ChipId::Baseline)
            .context("configuring detection engine")?;
        engine.set_current_channel(OPERATING_CHANNEL_MHZ, ChannelWidth::Mhz80);

        let clock = ManualTicks::new(0);
        let mut generator = PulseTrainGenerator::new(self.config.seed);
        let mut pulses_enqueued = 0usize;

        for _ in 0..self.config.bursts {
            let burst = match self.config.scenario {
                Scenario::Fixed => generator.fixed_burst(
                    self.config.pulses_per_burst,
                    self.config.pri_us,
                    self.config.duration_us,
                    self.config.rssi,
                ),
                Scenario::Staggered => generator.staggered_burst(
                    self.config.pulses_per_burst,
                    &self.config.stagger_pris_us,
                    self.config.duration_us,
                    self.config.rssi,
                ),
                Scenario::Chirp => {
                    generator.chirp_burst(self.config.pulses_per_burst, self.config.rssi)
                }
                Scenario::Noise => {
                    generator.noise(self.config.pulses_per_burst, self.config.rssi)
                }
            };
            pulses_enqueued += burst.len();
            for pulse in burst {
                engine.enqueue_pulse(pulse);
            }
            loop {
                clock.advance(1_000);
                let consumed = engine
                    .process_events(clock.now_us())
                    .context("processing pulse events")?;
                if consumed == 0 {
                    break;
                }
            }
            generator.quiet_gap(self.config.burst_gap_us);
        }

        engine.poll_nol(clock.now_us());
        engine.reclaim_nol();

        let detections = sink.take();
        let nol = engine.nol_snapshot(clock.now_us());
        let reselection = if detections.is_empty() {
            None
        } else {
            let flags = SelectionFlags {
                exclude_current_mhz: Some(OPERATING_CHANNEL_MHZ),
                ..Default::default()
            };
            match engine.pick_channel(&default_5ghz_catalogue(), ChannelWidth::Mhz80, &flags) {
                Ok(outcome) => Some(ReselectionSummary {
                    channel_mhz: outcome.channel.freq_mhz,
                    width_mhz: outcome.width.mhz(),
                    downgraded: outcome.downgraded,
                }),
                Err(DfsError::NoChannelAvailable) => None,
                Err(e) => return Err(e).context("reselecting channel"),
            }
        };

        let summary = RunSummary {
            domain: self.config.domain.clone(),
            scenario: self.config.scenario,
            pulses_enqueued,
            detections,
            nol,
            reselection,
            metrics: engine.metrics(),
        };
        Ok((summary, engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_scenario_bans_the_operating_channel() {
        let cfg = WorkflowConfig::from_args("fcc".into(), Scenario::Fixed, 42);
        let summary = Runner::new(cfg).execute().unwrap();

        assert!(!summary.detections.is_empty());
        assert!(summary
            .nol
            .iter()
            .any(|e| e.channel_mhz == OPERATING_CHANNEL_MHZ));
        let reselection = summary.reselection.expect("a replacement channel");
        assert_ne!(reselection.channel_mhz, OPERATING_CHANNEL_MHZ);
    }

    #[test]
    fn noise_scenario_stays_quiet() {
        let cfg = WorkflowConfig::from_args("fcc".into(), Scenario::Noise, 42);
        let summary = Runner::new(cfg).execute().unwrap();

        assert!(summary.detections.is_empty());
        assert!(summary.nol.is_empty());
        assert!(summary.reselection.is_none());
        assert_eq!(
            summary.metrics.pulses_processed as usize,
            summary.pulses_enqueued
        );
    }

    #[test]
    fn staggered_scenario_detects_under_etsi() {
        let mut cfg = WorkflowConfig::from_args("etsi".into(), Scenario::Staggered, 42);
        cfg.stagger_pris_us = vec![1_250, 1_667];
        cfg.pulses_per_burst = 40;
        let summary = Runner::new(cfg).execute().unwrap();

        assert!(!summary.detections.is_empty());
    }
}
