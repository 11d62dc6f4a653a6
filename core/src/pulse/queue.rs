use crate::pulse::RawPulse;
use std::collections::VecDeque;

/// Bounded FIFO between the hardware boundary and the dispatcher.
///
/// The producer side is rate limited upstream; if it still outruns the
/// drain, the oldest undrained event is overwritten rather than blocking.
pub struct PulseQueue {
    events: VecDeque<RawPulse>,
    capacity: usize,
    overwrites: u64,
}

impl PulseQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            overwrites: 0,
        }
    }

    /// Enqueues an event; returns false when the oldest entry was dropped
    /// to make room.
    pub fn push(&mut self, event: RawPulse) -> bool {
        let mut clean = true;
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.overwrites += 1;
            clean = false;
        }
        self.events.push_back(event);
        clean
    }

    pub fn pop(&mut self) -> Option<RawPulse> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Count of events lost to overwrite since construction.
    pub fn overwrites(&self) -> u64 {
        self.overwrites
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::SegmentId;

    fn raw(ts: u32) -> RawPulse {
        RawPulse {
            hw_timestamp: ts,
            raw_duration: 1,
            rssi: 20,
            channel_index: 1,
            segment: SegmentId::Primary,
            chirp: false,
        }
    }

    #[test]
    fn queue_overwrites_oldest_when_full() {
        let mut queue = PulseQueue::with_capacity(2);
        assert!(queue.push(raw(1)));
        assert!(queue.push(raw(2)));
        assert!(!queue.push(raw(3)));
        assert_eq!(queue.overwrites(), 1);
        assert_eq!(queue.pop().unwrap().hw_timestamp, 2);
        assert_eq!(queue.pop().unwrap().hw_timestamp, 3);
        assert!(queue.pop().is_none());
    }
}
