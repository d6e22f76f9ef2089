mod controller;
mod retry;

pub use controller::{PlaybackAction, PlaybackController, PlaybackNotice, PlaybackPhase};
pub use retry::{Backoff, RetryPolicy};
