mod machine;
mod ticker;

pub use machine::{Phase, TimerMachine};
pub use ticker::Ticker;
