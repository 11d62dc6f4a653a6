pub mod bin5;
pub mod delay_line;
pub mod engine;
pub mod filter;
pub mod fixed;
pub mod staggered;
pub mod variable;

pub use delay_line::{DelayElement, DelayLine};
pub use engine::{MatchOutcome, PatternEngine, PulseVerdict};
pub use filter::{Filter, FilterType};
