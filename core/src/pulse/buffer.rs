use crate::pulse::Pulse;
use std::collections::VecDeque;

/// Fixed-capacity ring of recently observed pulses, shared across filters.
///
/// The capacity cap is structural: inserting into a full buffer evicts the
/// oldest pulse first, so the buffer can never grow past its limit.
pub struct PulseBuffer {
    pulses: VecDeque<Pulse>,
    capacity: usize,
}

impl PulseBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pulses: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Appends a pulse, overwriting the oldest entry when full.
    pub fn push(&mut self, pulse: Pulse) {
        if self.pulses.len() == self.capacity {
            self.pulses.pop_front();
        }
        self.pulses.push_back(pulse);
    }

    /// Pulses in arrival order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Pulse> {
        self.pulses.iter()
    }

    pub fn latest(&self) -> Option<&Pulse> {
        self.pulses.back()
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.pulses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::SegmentId;

    fn pulse(ts: u64) -> Pulse {
        Pulse {
            timestamp_us: ts,
            duration_us: 1,
            rssi: 20,
            chirp: false,
            channel_index: 1,
            segment: SegmentId::Primary,
        }
    }

    #[test]
    fn push_never_exceeds_capacity() {
        let mut buffer = PulseBuffer::with_capacity(4);
        for ts in 0..100 {
            buffer.push(pulse(ts));
            assert!(buffer.len() <= 4);
        }
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn eviction_is_oldest_first() {
        let mut buffer = PulseBuffer::with_capacity(3);
        for ts in 0..5 {
            buffer.push(pulse(ts));
        }
        let oldest = buffer.iter().next().unwrap().timestamp_us;
        assert_eq!(oldest, 2);
        assert_eq!(buffer.latest().unwrap().timestamp_us, 4);
    }
}
