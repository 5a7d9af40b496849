pub mod clock;
pub mod jitter;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use jitter::{jitter, JitterConfig, SimulatedFeed, MAX_JITTER};
pub use timer::{FeedTimer, FeedUpdate, TimerState, DEFAULT_TICK, MAX_TICK};
