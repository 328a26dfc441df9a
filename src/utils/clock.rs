use chrono::{DateTime, Utc};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// ISO-8601, UTC, millisecond precision.
    fn timestamp(&self) -> String {
        self.now().format(TIMESTAMP_FORMAT).to_string()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
