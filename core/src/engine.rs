use crate::channel::{Channel, ChannelWidth, SelectionFlags, SelectionOutcome};
use crate::channel::select::ChannelSelector;
use crate::detect::{PatternEngine, PulseVerdict};
use crate::dispatch::PulseDispatcher;
use crate::nol::{NolManager, NolSnapshotEntry};
use crate::pulse::{PulseQueue, RawPulse, SegmentId};
use crate::tables::{chip_profile, radar_table, ChipId, DomainCode};
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use crate::{DfsConfig, DfsError, DfsResult};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// A confirmed radar detection as reported to the collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RadarDetection {
    pub channel_mhz: u32,
    pub segment: SegmentId,
    pub filter_id: u32,
    /// 0-100; forced detections report 100.
    pub confidence: u8,
}

/// Callbacks exposed to the surrounding device layer. Both are invoked
/// synchronously, outside the engine's internal locks.
pub trait DfsEventSink: Send + Sync {
    fn on_radar_detected(&self, detection: &RadarDetection);
    fn on_nol_expired(&self, channel_mhz: u32, width: ChannelWidth);
}

/// Dispatcher plus matcher state; everything behind the radar-state lock.
struct RadarState {
    dispatcher: PulseDispatcher,
    patterns: PatternEngine,
    domain: DomainCode,
    chip: ChipId,
}

/// The DFS context object: event queue, radar state, and NOL, each behind
/// its own lock. All operations are synchronous and bounded; callers drive
/// the engine cooperatively and pass in the current time explicitly.
pub struct DfsEngine {
    config: DfsConfig,
    queue: Mutex<PulseQueue>,
    radar: Mutex<Option<RadarState>>,
    nol: Mutex<NolManager>,
    selector: Mutex<ChannelSelector>,
    current: Mutex<(u32, ChannelWidth)>,
    metrics: MetricsRecorder,
    logger: LogManager,
    sink: Option<Box<dyn DfsEventSink>>,
}

impl DfsEngine {
    /// Creates an unconfigured engine. `entropy` seeds the reselection RNG
    /// and normally derives from elapsed ticks.
    pub fn new(config: DfsConfig, entropy: u64) -> Self {
        let queue = PulseQueue::with_capacity(config.queue_capacity);
        let nol = NolManager::with_capacity(config.nol_capacity);
        let selector = ChannelSelector::new(entropy, config.leakage_threshold);
        Self {
            config,
            queue: Mutex::new(queue),
            radar: Mutex::new(None),
            nol: Mutex::new(nol),
            selector: Mutex::new(selector),
            current: Mutex::new((0, ChannelWidth::Mhz20)),
            metrics: MetricsRecorder::new(),
            logger: LogManager::new(),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn DfsEventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Loads the radar table for a domain/chip pair and resets all matcher
    /// state. Must run before pulses are processed; re-running performs a
    /// full re-configuration.
    pub fn configure(&self, domain: DomainCode, chip: ChipId) -> DfsResult<()> {
        let table = radar_table(domain);
        let profile = chip_profile(chip);
        let state = RadarState {
            dispatcher: PulseDispatcher::new(profile),
            patterns: PatternEngine::new(table, profile, &self.config),
            domain,
            chip,
        };
        if let Ok(mut radar) = self.radar.lock() {
            *radar = Some(state);
        }
        self.logger.record(&format!(
            "configured domain {:?} chip {}",
            domain, profile.name
        ));
        Ok(())
    }

    pub fn domain(&self) -> Option<DomainCode> {
        self.radar
            .lock()
            .ok()
            .and_then(|radar| radar.as_ref().map(|s| s.domain))
    }

    pub fn chip(&self) -> Option<ChipId> {
        self.radar
            .lock()
            .ok()
            .and_then(|radar| radar.as_ref().map(|s| s.chip))
    }

    /// Sets the operating channel detections will be attributed to.
    pub fn set_current_channel(&self, freq_mhz: u32, width: ChannelWidth) {
        if let Ok(mut current) = self.current.lock() {
            *current = (freq_mhz, width);
        }
    }

    pub fn current_channel(&self) -> (u32, ChannelWidth) {
        self.current
            .lock()
            .map(|current| *current)
            .unwrap_or((0, ChannelWidth::Mhz20))
    }

    /// Boundary entry point: queues one raw descriptor without processing.
    pub fn enqueue_pulse(&self, raw: RawPulse) {
        if let Ok(mut queue) = self.queue.lock() {
            if !queue.push(raw) {
                self.metrics.record_dropped(1);
            }
        }
    }

    /// Drains up to the watchdog bound of queued events through the
    /// dispatcher and matchers. Never blocks; leftover events wait for the
    /// next invocation. Confirmed detections are NOL-inserted and reported
    /// through the sink before returning.
    ///
    /// Returns the number of events consumed.
    pub fn process_events(&self, now_us: u64) -> DfsResult<usize> {
        let mut batch = Vec::with_capacity(self.config.max_events_per_drain);
        if let Ok(mut queue) = self.queue.lock() {
            while batch.len() < self.config.max_events_per_drain {
                match queue.pop() {
                    Some(event) => batch.push(event),
                    None => break,
                }
            }
        }
        if batch.is_empty() {
            return Ok(0);
        }

        let mut detections: Vec<RadarDetection> = Vec::new();
        {
            let mut radar = self
                .radar
                .lock()
                .map_err(|_| DfsError::Internal("radar lock poisoned".into()))?;
            let state = radar.as_mut().ok_or(DfsError::NotConfigured)?;
            let (channel_mhz, _) = self.current_channel();

            for raw in &batch {
                let Some(pulse) = state.dispatcher.normalize(raw) else {
                    self.metrics.record_dropped(1);
                    continue;
                };
                self.metrics.record_processed(1);

                match state.patterns.process_pulse(pulse) {
                    PulseVerdict::Accumulating => {}
                    PulseVerdict::InterferenceReset => {
                        self.metrics.record_interference_reset();
                    }
                    PulseVerdict::Match(outcome) => {
                        detections.push(RadarDetection {
                            channel_mhz,
                            segment: outcome.segment,
                            filter_id: outcome.filter_id,
                            confidence: outcome.confidence,
                        });
                    }
                }
            }
        }

        for detection in &detections {
            self.commit_detection(detection, now_us)?;
        }
        Ok(batch.len())
    }

    /// Test/regulatory hook: reports a detection on the current (or named
    /// secondary) channel immediately, bypassing the event path.
    pub fn force_detect(&self, segment: SegmentId, now_us: u64) -> DfsResult<RadarDetection> {
        {
            let radar = self
                .radar
                .lock()
                .map_err(|_| DfsError::Internal("radar lock poisoned".into()))?;
            if radar.is_none() {
                return Err(DfsError::NotConfigured);
            }
        }
        let (channel_mhz, _) = self.current_channel();
        let detection = RadarDetection {
            channel_mhz,
            segment,
            filter_id: u32::MAX,
            confidence: 100,
        };
        self.commit_detection(&detection, now_us)?;
        Ok(detection)
    }

    /// NOL insert plus synchronous sink notification for one detection.
    fn commit_detection(&self, detection: &RadarDetection, now_us: u64) -> DfsResult<()> {
        self.metrics.record_detection();
        let (_, width) = self.current_channel();
        if let Ok(mut nol) = self.nol.lock() {
            nol.add(
                detection.channel_mhz,
                width,
                self.config.nol_timeout_us,
                now_us,
            )?;
        }
        self.metrics.record_nol_addition();
        self.logger.record(&format!(
            "radar detected on {} MHz (filter {}, confidence {})",
            detection.channel_mhz, detection.filter_id, detection.confidence
        ));
        if let Some(sink) = &self.sink {
            sink.on_radar_detected(detection);
        }
        Ok(())
    }

    /// Expires due NOL entries, notifying the sink for each after its
    /// unlink. Frees nothing; call [`DfsEngine::reclaim_nol`] from a
    /// non-expiry context.
    pub fn poll_nol(&self, now_us: u64) -> usize {
        let mut expired = Vec::new();
        if let Ok(mut nol) = self.nol.lock() {
            nol.poll_expired(now_us, |channel_mhz, width| {
                expired.push((channel_mhz, width));
            });
        }
        self.metrics.record_nol_expiry(expired.len() as u64);
        if let Some(sink) = &self.sink {
            for &(channel_mhz, width) in &expired {
                sink.on_nol_expired(channel_mhz, width);
            }
        }
        expired.len()
    }

    /// Batched release of unlinked NOL entries.
    pub fn reclaim_nol(&self) -> usize {
        self.nol.lock().map(|mut nol| nol.reclaim()).unwrap_or(0)
    }

    pub fn nol_snapshot(&self, now_us: u64) -> Vec<NolSnapshotEntry> {
        self.nol
            .lock()
            .map(|nol| nol.snapshot(now_us))
            .unwrap_or_default()
    }

    pub fn restore_nol(&self, snapshot: &[NolSnapshotEntry], now_us: u64) -> DfsResult<()> {
        let mut nol = self
            .nol
            .lock()
            .map_err(|_| DfsError::Internal("NOL lock poisoned".into()))?;
        nol.restore(snapshot, now_us)
    }

    pub fn clear_nol(&self) {
        if let Ok(mut nol) = self.nol.lock() {
            nol.clear_all();
        }
    }

    /// Rule-filtered, leakage-aware random reselection against the live NOL.
    pub fn pick_channel(
        &self,
        catalogue: &[Channel],
        want: ChannelWidth,
        flags: &SelectionFlags,
    ) -> DfsResult<SelectionOutcome> {
        let nol = self
            .nol
            .lock()
            .map_err(|_| DfsError::Internal("NOL lock poisoned".into()))?;
        let mut selector = self
            .selector
            .lock()
            .map_err(|_| DfsError::Internal("selector lock poisoned".into()))?;
        selector.pick(catalogue, want, flags, &nol)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
