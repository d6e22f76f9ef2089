mod request_tracker;
mod retry_timer;

pub use request_tracker::{RequestKey, RequestTracker};
pub use retry_timer::RetryTimer;
