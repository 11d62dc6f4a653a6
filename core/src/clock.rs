use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Monotonic microsecond tick source.
///
/// The engine itself never reads a clock; callers sample a `TickSource` and
/// pass the value into each operation, which keeps the detection path
/// deterministic under simulated time.
pub trait TickSource: Send + Sync {
    fn now_us(&self) -> u64;
}

/// Wall-clock ticks measured from construction.
pub struct SystemTicks {
    origin: Instant,
}

impl SystemTicks {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SystemTicks {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

/// Manually advanced clock for simulated-time tests and the offline driver.
pub struct ManualTicks {
    now: AtomicU64,
}

impl ManualTicks {
    pub fn new(start_us: u64) -> Self {
        Self {
            now: AtomicU64::new(start_us),
        }
    }

    pub fn advance(&self, delta_us: u64) {
        self.now.fetch_add(delta_us, Ordering::SeqCst);
    }

    pub fn set(&self, now_us: u64) {
        self.now.store(now_us, Ordering::SeqCst);
    }
}

impl TickSource for ManualTicks {
    fn now_us(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_ticks_advance_and_set() {
        let clock = ManualTicks::new(100);
        clock.advance(50);
        assert_eq!(clock.now_us(), 150);
        clock.set(10);
        assert_eq!(clock.now_us(), 10);
    }

    #[test]
    fn system_ticks_are_monotonic() {
        let clock = SystemTicks::new();
        let a = clock.now_us();
        let b = clock.now_us();
        assert!(b >= a);
    }
}
