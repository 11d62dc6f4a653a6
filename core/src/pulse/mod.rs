pub mod buffer;
pub mod event;
pub mod queue;

pub use buffer::PulseBuffer;
pub use event::{Pulse, RawPulse, SegmentId};
pub use queue::PulseQueue;
