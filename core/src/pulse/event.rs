use serde::{Deserialize, Serialize};

/// Duration value that matches any observed duration during window checks.
pub const DURATION_WILDCARD: u32 = 255;

/// Segment of the operating channel a pulse was observed on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SegmentId {
    Primary,
    Secondary,
}

/// Raw pulse descriptor as popped from the hardware boundary queue.
///
/// Timestamps come from a narrow 32-bit counter that wraps; durations are in
/// hardware units and may need scaling. A zero `channel_index` marks a
/// malformed descriptor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawPulse {
    pub hw_timestamp: u32,
    pub raw_duration: u32,
    pub rssi: u8,
    pub channel_index: u8,
    pub segment: SegmentId,
    pub chirp: bool,
}

/// Normalized pulse record after timestamp repair and duration scaling.
///
/// Immutable once created; lives only inside bounded buffers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pulse {
    /// Full-width monotonic start time in microseconds.
    pub timestamp_us: u64,
    /// Duration normalized to microseconds, never zero.
    pub duration_us: u32,
    pub rssi: u8,
    pub chirp: bool,
    pub channel_index: u8,
    pub segment: SegmentId,
}

impl Pulse {
    /// True when two durations agree within the window tolerance, honoring
    /// the wildcard value.
    pub fn duration_matches(a: u32, b: u32) -> bool {
        a == DURATION_WILDCARD || b == DURATION_WILDCARD || a.abs_diff(b) < 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_match_tolerance_is_two_microseconds() {
        assert!(Pulse::duration_matches(10, 11));
        assert!(!Pulse::duration_matches(10, 12));
    }

    #[test]
    fn wildcard_duration_matches_anything() {
        assert!(Pulse::duration_matches(DURATION_WILDCARD, 90));
        assert!(Pulse::duration_matches(3, DURATION_WILDCARD));
    }
}
