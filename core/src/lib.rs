//! DFS radar pulse-pattern detection core.
//!
//! The modules mirror the regulatory DFS pipeline: pulses enter through the
//! dispatcher, drive per-filter delay lines in the pattern engine, and a
//! confirmed match feeds the Non-Occupancy List and the random channel
//! reselection path. All state lives in an explicit [`engine::DfsEngine`]
//! context owned by the caller.

pub mod channel;
pub mod clock;
pub mod detect;
pub mod dispatch;
pub mod engine;
pub mod nol;
pub mod pulse;
pub mod tables;
pub mod telemetry;

pub use engine::{DfsEngine, DfsEventSink, RadarDetection};
pub use tables::{ChipId, DomainCode};

use serde::{Deserialize, Serialize};

/// Tunable limits and thresholds for one engine instance.
///
/// Defaults reflect the regulatory reference values; tests and the simulator
/// override individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DfsConfig {
    /// Raw event queue depth before oldest-wins overwrite.
    pub queue_capacity: usize,
    /// Shared pulse history ring capacity.
    pub pulse_buffer_capacity: usize,
    /// Per-filter delay line capacity.
    pub delay_line_capacity: usize,
    /// Watchdog bound on events drained per `process_events` call.
    pub max_events_per_drain: usize,
    /// Inter-pulse gap below this is treated as interference and resets
    /// all detection state.
    pub small_diff_us: u64,
    /// Base PRI margin for window and hypothesis matching.
    pub pri_margin_us: u64,
    /// Non-occupancy period applied on detection.
    pub nol_timeout_us: u64,
    /// Maximum live NOL entries.
    pub nol_capacity: usize,
    /// Candidate channels leaking more than this into a banned channel are
    /// excluded from reselection.
    pub leakage_threshold: i32,
}

impl Default for DfsConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 512,
            pulse_buffer_capacity: 1024,
            delay_line_capacity: 64,
            max_events_per_drain: 256,
            small_diff_us: 100,
            pri_margin_us: 10,
            nol_timeout_us: 1_800_000_000,
            nol_capacity: 64,
            leakage_threshold: 35,
        }
    }
}

/// Common error type for engine operations.
#[derive(thiserror::Error, Debug)]
pub enum DfsError {
    #[error("capacity exhausted: {0}")]
    CapacityExhausted(String),
    #[error("no channel available")]
    NoChannelAvailable,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("engine not configured")]
    NotConfigured,
    #[error("internal failure: {0}")]
    Internal(String),
}

pub type DfsResult<T> = Result<T, DfsError>;
