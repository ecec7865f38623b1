// Clock and flush scheduling seams
use chrono::{DateTime, Local, NaiveDate, Utc};
use std::time::Duration;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The local calendar date, used for the default reporting window.
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Arranges for the engine's buffer to be flushed after `delay`. Requests
/// are never deduplicated or cancelled.
pub trait FlushScheduler: Send + Sync {
    fn schedule_flush(&self, delay: Duration);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    pub struct FixedClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl FixedClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self { now: Mutex::new(now) }
        }

        pub fn advance(&self, by: chrono::Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }

        fn today(&self) -> NaiveDate {
            self.now().date_naive()
        }
    }

    /// Records flush requests instead of running timers.
    #[derive(Default)]
    pub struct ManualScheduler {
        requests: Mutex<Vec<Duration>>,
    }

    impl ManualScheduler {
        pub fn requests(&self) -> Vec<Duration> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl FlushScheduler for ManualScheduler {
        fn schedule_flush(&self, delay: Duration) {
            self.requests.lock().unwrap().push(delay);
        }
    }
}
