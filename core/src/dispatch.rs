use crate::pulse::{Pulse, RawPulse};
use crate::tables::ChipProfile;

/// Channel-state indices above this are garbage from the boundary.
const MAX_CHANNEL_INDEX: u8 = 32;

/// Duration value treated as a single hardware tick; such pulses carry no
/// usable completion offset, so their timestamp is left untouched.
const SINGLE_TICK_DUR_US: u32 = 1;

/// Normalizes raw boundary descriptors into [`Pulse`] records.
///
/// Owns the running high-order timestamp prefix that turns the narrow
/// 32-bit hardware counter into a full-width monotonic clock. Wrap is
/// detected both by counter ordering and by clamping against the previous
/// full-width value, so reconstructed timestamps never go backwards.
pub struct PulseDispatcher {
    ts_prefix: u64,
    last_hw_ts: u32,
    last_full_ts: u64,
    dur_multiplier_num: u32,
    dur_multiplier_den: u32,
}

impl PulseDispatcher {
    pub fn new(chip: &ChipProfile) -> Self {
        Self {
            ts_prefix: 0,
            last_hw_ts: 0,
            last_full_ts: 0,
            dur_multiplier_num: chip.dur_multiplier_num,
            dur_multiplier_den: chip.dur_multiplier_den.max(1),
        }
    }

    /// Repairs one raw descriptor, or None when it is malformed and must be
    /// dropped without affecting other events.
    pub fn normalize(&mut self, raw: &RawPulse) -> Option<Pulse> {
        if raw.channel_index == 0 || raw.channel_index > MAX_CHANNEL_INDEX {
            return None;
        }
        if raw.hw_timestamp == 0 && raw.raw_duration == 0 {
            return None;
        }

        let duration_us = self.normalize_duration(raw.raw_duration);
        let full_ts = self.extend_timestamp(raw.hw_timestamp);

        // Pulses are reported at completion; the matchers need start time.
        let timestamp_us = if duration_us == SINGLE_TICK_DUR_US {
            full_ts
        } else {
            full_ts.saturating_sub(duration_us as u64)
        };

        Some(Pulse {
            timestamp_us,
            duration_us,
            rssi: raw.rssi,
            chirp: raw.chirp,
            channel_index: raw.channel_index,
            segment: raw.segment,
        })
    }

    /// Scales a hardware duration to microseconds; sub-microsecond readings
    /// round up to one.
    pub fn normalize_duration(&self, raw_duration: u32) -> u32 {
        let scaled =
            (raw_duration as u64 * self.dur_multiplier_num as u64) / self.dur_multiplier_den as u64;
        (scaled as u32).max(1)
    }

    /// Extends the narrow counter to 64 bits. The prefix increments when
    /// the counter runs backwards by more than half the counter range (a
    /// true wrap); smaller reversals are reporting jitter and only clamp.
    /// Either way the reconstructed sequence never decreases.
    pub fn extend_timestamp(&mut self, hw_timestamp: u32) -> u64 {
        if hw_timestamp < self.last_hw_ts && self.last_hw_ts - hw_timestamp > u32::MAX / 2 {
            self.ts_prefix += 1u64 << 32;
        }
        self.last_hw_ts = hw_timestamp;

        let mut full = self.ts_prefix | hw_timestamp as u64;
        if full < self.last_full_ts {
            full = self.last_full_ts;
        }
        self.last_full_ts = full;
        full
    }

    /// Forgets timestamp history, e.g. across a reconfiguration.
    pub fn reset(&mut self) {
        self.ts_prefix = 0;
        self.last_hw_ts = 0;
        self.last_full_ts = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::SegmentId;
    use crate::tables::{chip_profile, ChipId};

    fn dispatcher() -> PulseDispatcher {
        PulseDispatcher::new(chip_profile(ChipId::Baseline))
    }

    fn raw(ts: u32, dur: u32) -> RawPulse {
        RawPulse {
            hw_timestamp: ts,
            raw_duration: dur,
            rssi: 20,
            channel_index: 1,
            segment: SegmentId::Primary,
            chirp: false,
        }
    }

    #[test]
    fn extension_is_monotonic_across_wraps() {
        let mut d = dispatcher();
        let readings: [u32; 6] = [100, u32::MAX - 10, 5, 700, 3, 9];
        let mut last = 0u64;
        for &hw in &readings {
            let full = d.extend_timestamp(hw);
            assert!(full >= last, "went backwards at hw={}", hw);
            last = full;
        }
    }

    #[test]
    fn wrap_increments_the_prefix() {
        let mut d = dispatcher();
        let before = d.extend_timestamp(u32::MAX - 1);
        let after = d.extend_timestamp(10);
        assert_eq!(after, (1u64 << 32) | 10);
        assert!(after > before);
    }

    #[test]
    fn completion_time_becomes_start_time() {
        let mut d = dispatcher();
        let pulse = d.normalize(&raw(10_000, 20)).unwrap();
        assert_eq!(pulse.timestamp_us, 9_980);
        assert_eq!(pulse.duration_us, 20);
    }

    #[test]
    fn single_tick_sentinel_skips_the_correction() {
        let mut d = dispatcher();
        let pulse = d.normalize(&raw(10_000, 1)).unwrap();
        assert_eq!(pulse.timestamp_us, 10_000);
    }

    #[test]
    fn zero_duration_rounds_up_to_one() {
        let mut d = dispatcher();
        let pulse = d.normalize(&raw(10_000, 0)).unwrap();
        assert_eq!(pulse.duration_us, 1);
        assert_eq!(pulse.timestamp_us, 10_000);
    }

    #[test]
    fn fast_clock_chip_scales_durations() {
        let mut d = PulseDispatcher::new(chip_profile(ChipId::FastClock));
        let pulse = d.normalize(&raw(10_000, 8)).unwrap();
        assert_eq!(pulse.duration_us, 10);
    }

    #[test]
    fn malformed_descriptors_are_dropped() {
        let mut d = dispatcher();
        let mut bad = raw(10_000, 5);
        bad.channel_index = 0;
        assert!(d.normalize(&bad).is_none());
        bad.channel_index = 40;
        assert!(d.normalize(&bad).is_none());
        assert!(d.normalize(&raw(0, 0)).is_none());
    }
}
