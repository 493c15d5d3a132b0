use std::time::{Duration, Instant};

pub trait Watchdog {
    fn feed(&mut self);
}

/// Software stand-in for a hardware watchdog. It cannot reset anything, the
/// player asks it after every tick whether it went hungry.
pub struct SoftWatchdog {
    timeout: Duration,
    last_feed: Instant,
    feeds: u64,
}

impl SoftWatchdog {
    pub fn new(timeout: Duration) -> SoftWatchdog {
        SoftWatchdog {
            timeout,
            last_feed: Instant::now(),
            feeds: 0,
        }
    }

    pub fn feeds(&self) -> u64 {
        self.feeds
    }

    pub fn is_starved(&self) -> bool {
        self.last_feed.elapsed() > self.timeout
    }
}

impl Watchdog for SoftWatchdog {
    fn feed(&mut self) {
        self.last_feed = Instant::now();
        self.feeds += 1;
    }
}
