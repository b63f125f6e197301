// Listing constants (no magic values)
use std::time::Duration;

/// Delay before the first poll (1s)
pub const DEFAULT_INITIAL_POLL_DELAY: Duration = Duration::from_secs(1);

/// Upper bound for the doubling poll delay (4s)
pub const MAX_POLL_DELAY: Duration = Duration::from_secs(4);

/// Factor applied to the delay after every scheduled poll
pub const POLL_BACKOFF_FACTOR: u32 = 2;
