use serde::Serialize;
use std::sync::Mutex;

/// Point-in-time copy of the engine counters.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MetricsSnapshot {
    pub pulses_processed: u64,
    pub pulses_dropped: u64,
    pub interference_resets: u64,
    pub detections: u64,
    pub nol_additions: u64,
    pub nol_expiries: u64,
}

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_processed(&self, count: u64) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.pulses_processed += count;
        }
    }

    pub fn record_dropped(&self, count: u64) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.pulses_dropped += count;
        }
    }

    pub fn record_interference_reset(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.interference_resets += 1;
        }
    }

    pub fn record_detection(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.detections += 1;
        }
    }

    pub fn record_nol_addition(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.nol_additions += 1;
        }
    }

    pub fn record_nol_expiry(&self, count: u64) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.nol_expiries += count;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_independently() {
        let recorder = MetricsRecorder::new();
        recorder.record_processed(3);
        recorder.record_dropped(1);
        recorder.record_detection();
        recorder.record_nol_expiry(2);
        let snap = recorder.snapshot();
        assert_eq!(snap.pulses_processed, 3);
        assert_eq!(snap.pulses_dropped, 1);
        assert_eq!(snap.detections, 1);
        assert_eq!(snap.nol_expiries, 2);
        assert_eq!(snap.interference_resets, 0);
    }
}
