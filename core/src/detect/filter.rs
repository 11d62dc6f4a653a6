use crate::detect::delay_line::{DelayElement, DelayLine};
use crate::tables::{FilterSpec, FilterTypeSpec};

/// Live matching state for one radar signature: its static spec plus a
/// delay line and the timestamp of the last pulse it accepted.
pub struct Filter {
    pub spec: FilterSpec,
    pub delay_line: DelayLine,
    pub last_ts_us: u64,
}

impl Filter {
    pub fn new(spec: FilterSpec, delay_line_capacity: usize) -> Self {
        Self {
            spec,
            delay_line: DelayLine::with_capacity(delay_line_capacity),
            last_ts_us: 0,
        }
    }

    /// Age beyond which delay-line entries no longer contribute to a match:
    /// one full pulse train at the slowest PRI, plus one.
    pub fn window_us(&self) -> u64 {
        self.spec.max_pri_us * (self.spec.threshold as u64 + 1)
    }

    /// Effective pulse threshold; relaxed-PRI filters trade a lower count
    /// for the wider windows they accept.
    pub fn effective_threshold(&self) -> u32 {
        if self.spec.ignore_pri_window {
            (self.spec.threshold * 2).div_ceil(3)
        } else {
            self.spec.threshold
        }
    }

    pub fn insert(&mut self, elem: DelayElement) {
        let window = self.window_us();
        self.delay_line.push(elem, window);
    }

    pub fn reset(&mut self) {
        self.delay_line.clear();
        self.last_ts_us = 0;
    }
}

/// A duration bucket's filters plus the shared RSSI threshold, with the
/// chip adjustment already applied.
pub struct FilterType {
    pub min_duration_us: u32,
    pub max_duration_us: u32,
    pub rssi_threshold: u8,
    pub min_pri_us: u64,
    pub last_ts_us: u64,
    pub filters: Vec<Filter>,
}

impl FilterType {
    pub fn from_spec(spec: &FilterTypeSpec, rssi_adjust: i16, delay_line_capacity: usize) -> Self {
        let rssi_threshold = (spec.rssi_threshold as i16 + rssi_adjust).clamp(0, u8::MAX as i16);
        Self {
            min_duration_us: spec.min_duration_us,
            max_duration_us: spec.max_duration_us,
            rssi_threshold: rssi_threshold as u8,
            min_pri_us: spec.min_pri_us,
            last_ts_us: 0,
            filters: spec
                .filters
                .iter()
                .map(|f| Filter::new(*f, delay_line_capacity))
                .collect(),
        }
    }

    pub fn reset(&mut self) {
        self.last_ts_us = 0;
        for filter in &mut self.filters {
            filter.reset();
        }
    }
}
