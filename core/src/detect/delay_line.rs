use std::collections::VecDeque;

/// One observation in a filter's delay line.
#[derive(Debug, Clone, Copy)]
pub struct DelayElement {
    /// Interval to the previous pulse accepted by the owning filter.
    pub delta_us: u64,
    pub duration_us: u32,
    pub rssi: u8,
    /// Absolute start time of the pulse.
    pub timestamp_us: u64,
}

/// Per-filter ring of recent inter-pulse intervals.
///
/// Entries older than the filter's matching window are evicted lazily on the
/// next insert; the capacity cap is structural.
pub struct DelayLine {
    elems: VecDeque<DelayElement>,
    capacity: usize,
}

impl DelayLine {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elems: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Inserts an element, first evicting entries that have aged out of
    /// `window_us`, then the oldest entry if still at capacity.
    pub fn push(&mut self, elem: DelayElement, window_us: u64) {
        while let Some(front) = self.elems.front() {
            if elem.timestamp_us.saturating_sub(front.timestamp_us) > window_us {
                self.elems.pop_front();
            } else {
                break;
            }
        }
        if self.elems.len() == self.capacity {
            self.elems.pop_front();
        }
        self.elems.push_back(elem);
    }

    /// Elements in arrival order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DelayElement> {
        self.elems.iter()
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.elems.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elem(ts: u64, delta: u64) -> DelayElement {
        DelayElement {
            delta_us: delta,
            duration_us: 1,
            rssi: 20,
            timestamp_us: ts,
        }
    }

    #[test]
    fn push_never_exceeds_capacity() {
        let mut line = DelayLine::with_capacity(4);
        for i in 0..50u64 {
            line.push(elem(i * 100, 100), u64::MAX);
            assert!(line.len() <= 4);
        }
    }

    #[test]
    fn aged_entries_are_evicted_on_insert() {
        let mut line = DelayLine::with_capacity(8);
        line.push(elem(0, 0), 1_000);
        line.push(elem(500, 500), 1_000);
        // This insert ages out the element at t=0.
        line.push(elem(1_600, 1_100), 1_000);
        assert_eq!(line.len(), 2);
        assert_eq!(line.iter().next().unwrap().timestamp_us, 500);
    }
}
