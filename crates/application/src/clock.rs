use chrono::{DateTime, Utc};

/// Time source port, injected so lease expiry logic is testable.
pub trait Clock: Send + Sync {
    /// Returns the current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current Unix-epoch second count.
    fn unix_seconds(&self) -> i64 {
        self.now().timestamp()
    }
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
