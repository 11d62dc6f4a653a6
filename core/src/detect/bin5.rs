use crate::detect::delay_line::{DelayElement, DelayLine};
use crate::pulse::Pulse;
use crate::tables::Bin5Spec;

/// Long-pulse (Bin5) detector.
///
/// Chirped radars emit a handful of long pulses spread over seconds, so no
/// PRI correlation applies; matching is a duration/RSSI gate plus a count of
/// qualifying pulses inside the descriptor's burst window.
pub struct Bin5Detector {
    spec: Bin5Spec,
    line: DelayLine,
    last_ts_us: u64,
}

impl Bin5Detector {
    pub fn new(spec: Bin5Spec, capacity: usize) -> Self {
        Self {
            spec,
            line: DelayLine::with_capacity(capacity),
            last_ts_us: 0,
        }
    }

    /// Feeds a chirp-flagged pulse; true when the burst threshold is met.
    pub fn process(&mut self, pulse: &Pulse) -> bool {
        if !pulse.chirp {
            return false;
        }
        if pulse.duration_us < self.spec.min_duration_us
            || pulse.duration_us > self.spec.max_duration_us
        {
            return false;
        }
        if pulse.rssi < self.spec.rssi_threshold {
            return false;
        }

        let delta = pulse.timestamp_us.saturating_sub(self.last_ts_us);
        self.last_ts_us = pulse.timestamp_us;
        self.line.push(
            DelayElement {
                delta_us: delta,
                duration_us: pulse.duration_us,
                rssi: pulse.rssi,
                timestamp_us: pulse.timestamp_us,
            },
            self.spec.burst_window_us,
        );
        self.line.len() as u32 >= self.spec.pulses_required
    }

    pub fn reset(&mut self) {
        self.line.clear();
        self.last_ts_us = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::SegmentId;

    fn spec() -> Bin5Spec {
        Bin5Spec {
            min_duration_us: 50,
            max_duration_us: 110,
            rssi_threshold: 15,
            pulses_required: 3,
            burst_window_us: 12_000_000,
        }
    }

    fn chirp(ts: u64, dur: u32, rssi: u8) -> Pulse {
        Pulse {
            timestamp_us: ts,
            duration_us: dur,
            rssi,
            chirp: true,
            channel_index: 1,
            segment: SegmentId::Primary,
        }
    }

    #[test]
    fn burst_of_long_pulses_matches() {
        let mut detector = Bin5Detector::new(spec(), 16);
        assert!(!detector.process(&chirp(1_000_000, 75, 20)));
        assert!(!detector.process(&chirp(2_000_000, 80, 20)));
        assert!(detector.process(&chirp(3_000_000, 70, 20)));
    }

    #[test]
    fn out_of_window_pulses_age_out() {
        let mut detector = Bin5Detector::new(spec(), 16);
        assert!(!detector.process(&chirp(1_000_000, 75, 20)));
        assert!(!detector.process(&chirp(2_000_000, 80, 20)));
        // 13 s later both earlier pulses have aged out of the 12 s window.
        assert!(!detector.process(&chirp(15_000_000, 70, 20)));
    }

    #[test]
    fn gates_reject_short_weak_or_unchirped_pulses() {
        let mut detector = Bin5Detector::new(spec(), 16);
        assert!(!detector.process(&chirp(1_000_000, 10, 20)));
        assert!(!detector.process(&chirp(2_000_000, 75, 5)));
        let mut plain = chirp(3_000_000, 75, 20);
        plain.chirp = false;
        assert!(!detector.process(&plain));
    }
}
