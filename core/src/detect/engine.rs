use crate::detect::bin5::Bin5Detector;
use crate::detect::delay_line::DelayElement;
use crate::detect::filter::FilterType;
use crate::detect::{fixed, staggered, variable};
use crate::pulse::{Pulse, PulseBuffer, SegmentId};
use crate::tables::{
    build_duration_lookup, ChipProfile, PatternKind, RadarTable, MAX_LOOKUP_DURATION_US,
};
use crate::telemetry::LogManager;
use crate::DfsConfig;

/// Pulses at or below this duration skip the RSSI gate; very short pulses
/// report unreliable strength.
const RSSI_EXEMPT_MAX_DUR_US: u32 = 4;

/// Result of feeding one pulse through the engine.
#[derive(Debug, Clone, Copy)]
pub enum PulseVerdict {
    /// Pulse absorbed; no filter reached its threshold yet.
    Accumulating,
    /// Implausibly small inter-pulse gap; all detection state was reset.
    InterferenceReset,
    Match(MatchOutcome),
}

/// A confirmed signature match.
#[derive(Debug, Clone, Copy)]
pub struct MatchOutcome {
    pub filter_id: u32,
    pub pattern: PatternKind,
    pub segment: SegmentId,
    /// Matched pulse count relative to the threshold, clamped to 0..=100.
    pub confidence: u8,
}

/// Per-configuration matching state: the pulse history, every filter's
/// delay line, and the duration dispatch table.
pub struct PatternEngine {
    filter_types: Vec<FilterType>,
    bin5: Vec<Bin5Detector>,
    duration_lookup: Vec<Vec<usize>>,
    pulses: PulseBuffer,
    last_pulse_ts_us: u64,
    pri_margin_us: u64,
    small_diff_us: u64,
    logger: LogManager,
}

impl PatternEngine {
    pub fn new(table: &'static RadarTable, chip: &ChipProfile, config: &DfsConfig) -> Self {
        let filter_types = table
            .filter_types
            .iter()
            .map(|spec| FilterType::from_spec(spec, chip.rssi_adjust, config.delay_line_capacity))
            .collect();
        let bin5 = table
            .bin5
            .iter()
            .map(|spec| Bin5Detector::new(*spec, config.delay_line_capacity))
            .collect();
        Self {
            filter_types,
            bin5,
            duration_lookup: build_duration_lookup(table),
            pulses: PulseBuffer::with_capacity(config.pulse_buffer_capacity),
            last_pulse_ts_us: 0,
            pri_margin_us: config.pri_margin_us,
            small_diff_us: config.small_diff_us,
            logger: LogManager::new(),
        }
    }

    /// Feeds one normalized pulse through the interference guard, the Bin5
    /// detectors, and the duration-selected filters. On a match all state
    /// resets so one burst cannot be counted twice.
    pub fn process_pulse(&mut self, pulse: Pulse) -> PulseVerdict {
        let gap = pulse.timestamp_us.saturating_sub(self.last_pulse_ts_us);
        if self.last_pulse_ts_us != 0 && gap < self.small_diff_us {
            self.logger.record(&format!(
                "interference guard: {} us gap, resetting delay lines",
                gap
            ));
            self.reset_all();
            self.last_pulse_ts_us = pulse.timestamp_us;
            return PulseVerdict::InterferenceReset;
        }
        self.last_pulse_ts_us = pulse.timestamp_us;
        self.pulses.push(pulse);

        if pulse.chirp {
            if let Some(outcome) = self.process_bin5(&pulse) {
                self.reset_all();
                return PulseVerdict::Match(outcome);
            }
            return PulseVerdict::Accumulating;
        }

        let bucket = (pulse.duration_us as usize).min(MAX_LOOKUP_DURATION_US);
        let candidates = std::mem::take(&mut self.duration_lookup[bucket]);
        let mut matched = None;
        for &ft_index in &candidates {
            if let Some(outcome) = self.dispatch_to_type(ft_index, &pulse) {
                matched = Some(outcome);
                break;
            }
        }
        self.duration_lookup[bucket] = candidates;

        match matched {
            Some(outcome) => {
                self.reset_all();
                PulseVerdict::Match(outcome)
            }
            None => PulseVerdict::Accumulating,
        }
    }

    /// Clears the pulse history and every delay line.
    pub fn reset_all(&mut self) {
        self.pulses.clear();
        for ft in &mut self.filter_types {
            ft.reset();
        }
        for detector in &mut self.bin5 {
            detector.reset();
        }
    }

    pub fn pulse_history_len(&self) -> usize {
        self.pulses.len()
    }

    pub fn total_delay_line_entries(&self) -> usize {
        self.filter_types
            .iter()
            .flat_map(|ft| ft.filters.iter())
            .map(|f| f.delay_line.len())
            .sum()
    }

    fn process_bin5(&mut self, pulse: &Pulse) -> Option<MatchOutcome> {
        for detector in &mut self.bin5 {
            if detector.process(pulse) {
                return Some(MatchOutcome {
                    filter_id: u32::MAX,
                    pattern: PatternKind::Fixed,
                    segment: pulse.segment,
                    confidence: 100,
                });
            }
        }
        None
    }

    fn dispatch_to_type(&mut self, ft_index: usize, pulse: &Pulse) -> Option<MatchOutcome> {
        let pri_margin = self.pri_margin_us;
        let ft = &mut self.filter_types[ft_index];

        if pulse.rssi < ft.rssi_threshold && pulse.duration_us > RSSI_EXEMPT_MAX_DUR_US {
            return None;
        }
        let since_last = pulse.timestamp_us.saturating_sub(ft.last_ts_us);
        if ft.last_ts_us != 0 && since_last < ft.min_pri_us {
            return None;
        }
        ft.last_ts_us = pulse.timestamp_us;

        for filter in &mut ft.filters {
            let spec = filter.spec;
            if pulse.duration_us < spec.min_duration_us || pulse.duration_us > spec.max_duration_us
            {
                continue;
            }

            // The critical false-alarm suppressor: pulses arriving faster
            // than the filter's minimum PRI are rejected, but the last-seen
            // timestamp still advances.
            let delta = pulse.timestamp_us.saturating_sub(filter.last_ts_us);
            if filter.last_ts_us != 0 && delta < spec.min_pri_us {
                filter.last_ts_us = pulse.timestamp_us;
                continue;
            }
            let first = filter.last_ts_us == 0;
            filter.last_ts_us = pulse.timestamp_us;
            if first {
                continue;
            }

            filter.insert(DelayElement {
                delta_us: delta,
                duration_us: pulse.duration_us,
                rssi: pulse.rssi,
                timestamp_us: pulse.timestamp_us,
            });

            let count = match spec.pattern {
                PatternKind::Fixed => {
                    fixed::check_fixed_pattern(filter, &self.pulses, pulse, pri_margin)
                }
                PatternKind::Variable => variable::check_variable_pattern(filter, pri_margin),
                PatternKind::Staggered => staggered::check_staggered_pattern(filter, pri_margin),
            };

            let threshold = filter.effective_threshold();
            if count >= threshold {
                let confidence = ((count as u64 * 100) / threshold as u64).min(100) as u8;
                return Some(MatchOutcome {
                    filter_id: spec.filter_id,
                    pattern: spec.pattern,
                    segment: pulse.segment,
                    confidence,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{chip_profile, radar_table, ChipId, DomainCode};

    fn engine() -> PatternEngine {
        let table = radar_table(DomainCode::Fcc);
        let chip = chip_profile(ChipId::Baseline);
        PatternEngine::new(table, chip, &DfsConfig::default())
    }

    fn pulse(ts: u64, dur: u32) -> Pulse {
        Pulse {
            timestamp_us: ts,
            duration_us: dur,
            rssi: 25,
            chirp: false,
            channel_index: 1,
            segment: SegmentId::Primary,
        }
    }

    #[test]
    fn fixed_reference_train_is_detected() {
        let mut eng = engine();
        // FCC type 0: 1428 us PRI, the classic test radar.
        let mut outcome = None;
        for i in 0..16u64 {
            if let PulseVerdict::Match(m) = eng.process_pulse(pulse(100_000 + i * 1428, 1)) {
                outcome = Some(m);
                break;
            }
        }
        // Both the fixed type-0 filter and the wide variable type-1 filter
        // cover a 1428 us train; either is a correct call.
        let m = outcome.expect("reference radar not detected");
        assert!(m.filter_id <= 1);
    }

    #[test]
    fn detection_resets_all_state() {
        let mut eng = engine();
        for i in 0..20u64 {
            let _ = eng.process_pulse(pulse(100_000 + i * 1428, 1));
        }
        // A match occurred somewhere in the train; afterwards no partial
        // state may survive beyond pulses seen since the reset.
        assert!(eng.pulse_history_len() < 20);
    }

    #[test]
    fn interference_guard_clears_everything() {
        let mut eng = engine();
        for i in 0..4u64 {
            let _ = eng.process_pulse(pulse(100_000 + i * 1428, 1));
        }
        assert!(eng.pulse_history_len() > 0);
        let last_ts = 100_000 + 3 * 1428;
        assert!(matches!(
            eng.process_pulse(pulse(last_ts + 50, 1)),
            PulseVerdict::InterferenceReset
        ));
        assert_eq!(eng.pulse_history_len(), 0);
        assert_eq!(eng.total_delay_line_entries(), 0);
    }

    #[test]
    fn weak_pulses_are_gated_by_rssi_unless_short() {
        let mut eng = engine();
        // Duration 8 exceeds the exemption, RSSI 3 is under the FCC
        // threshold of 10: nothing should accumulate.
        for i in 0..10u64 {
            let mut p = pulse(100_000 + i * 300, 8);
            p.rssi = 3;
            let _ = eng.process_pulse(p);
        }
        assert_eq!(eng.total_delay_line_entries(), 0);
    }

    #[test]
    fn delay_lines_stay_bounded_under_load() {
        let mut eng = engine();
        let mut ts = 100_000u64;
        for i in 0..100_000u64 {
            ts += 150 + (i % 7) * 37;
            let _ = eng.process_pulse(pulse(ts, 1 + (i % 5) as u32));
        }
        assert!(eng.pulse_history_len() <= 1024);
        assert!(eng.total_delay_line_entries() <= 64 * 32 * 10);
    }
}
