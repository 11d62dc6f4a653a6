use dfscore::pulse::{RawPulse, SegmentId};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Synthesizes raw pulse descriptors the way the hardware boundary would
/// report them: narrow 32-bit completion timestamps, jittered arrival, and
/// occasional noise pulses.
pub struct PulseTrainGenerator {
    rng: StdRng,
    hw_ts: u32,
}

impl PulseTrainGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            hw_ts: 100_000,
        }
    }

    fn emit(&mut self, duration_us: u32, rssi: u8, chirp: bool) -> RawPulse {
        RawPulse {
            hw_timestamp: self.hw_ts,
            raw_duration: duration_us,
            rssi,
            channel_index: 1,
            segment: SegmentId::Primary,
            chirp,
        }
    }

    fn advance(&mut self, pri_us: u64, jitter_us: u64) {
        let jitter = if jitter_us == 0 {
            0
        } else {
            self.rng.gen_range(0..=2 * jitter_us) as i64 - jitter_us as i64
        };
        let step = (pri_us as i64 + jitter).max(1) as u32;
        self.hw_ts = self.hw_ts.wrapping_add(step);
    }

    /// A burst at one fixed PRI.
    pub fn fixed_burst(
        &mut self,
        count: usize,
        pri_us: u64,
        duration_us: u32,
        rssi: u8,
    ) -> Vec<RawPulse> {
        let mut pulses = Vec::with_capacity(count);
        for _ in 0..count {
            pulses.push(self.emit(duration_us, rssi, false));
            self.advance(pri_us, 2);
        }
        pulses
    }

    /// A burst cycling through a small set of staggered PRIs.
    pub fn staggered_burst(
        &mut self,
        count: usize,
        pris_us: &[u64],
        duration_us: u32,
        rssi: u8,
    ) -> Vec<RawPulse> {
        let mut pulses = Vec::with_capacity(count);
        for i in 0..count {
            pulses.push(self.emit(duration_us, rssi, false));
            let pri = pris_us[i % pris_us.len().max(1)];
            self.advance(pri, 2);
        }
        pulses
    }

    /// Chirped long pulses spread over seconds.
    pub fn chirp_burst(&mut self, count: usize, rssi: u8) -> Vec<RawPulse> {
        let mut pulses = Vec::with_capacity(count);
        for _ in 0..count {
            let duration = self.rng.gen_range(55..=95);
            pulses.push(self.emit(duration, rssi, true));
            self.advance(1_500_000, 200_000);
        }
        pulses
    }

    /// Uncorrelated background pulses with random spacing and width.
    pub fn noise(&mut self, count: usize, rssi: u8) -> Vec<RawPulse> {
        let mut pulses = Vec::with_capacity(count);
        for _ in 0..count {
            let duration = self.rng.gen_range(1..=30);
            pulses.push(self.emit(duration, rssi, false));
            let gap = self.rng.gen_range(200..20_000);
            self.advance(gap, 0);
        }
        pulses
    }

    /// Idle air time between bursts.
    pub fn quiet_gap(&mut self, gap_us: u64) {
        self.advance(gap_us, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_burst_is_evenly_spaced_within_jitter() {
        let mut generator = PulseTrainGenerator::new(3);
        let pulses = generator.fixed_burst(10, 1_428, 1, 24);
        assert_eq!(pulses.len(), 10);
        for pair in pulses.windows(2) {
            let gap = pair[1].hw_timestamp - pair[0].hw_timestamp;
            assert!((1_426..=1_430).contains(&gap));
        }
    }

    #[test]
    fn staggered_burst_cycles_the_pri_set() {
        let mut generator = PulseTrainGenerator::new(3);
        let pulses = generator.staggered_burst(6, &[1_000, 1_500], 1, 24);
        let gap0 = pulses[1].hw_timestamp - pulses[0].hw_timestamp;
        let gap1 = pulses[2].hw_timestamp - pulses[1].hw_timestamp;
        assert!(gap0.abs_diff(1_000) <= 2);
        assert!(gap1.abs_diff(1_500) <= 2);
    }

    #[test]
    fn same_seed_reproduces_the_train() {
        let a = PulseTrainGenerator::new(9).noise(20, 12);
        let b = PulseTrainGenerator::new(9).noise(20, 12);
        let ts_a: Vec<u32> = a.iter().map(|p| p.hw_timestamp).collect();
        let ts_b: Vec<u32> = b.iter().map(|p| p.hw_timestamp).collect();
        assert_eq!(ts_a, ts_b);
    }
}
