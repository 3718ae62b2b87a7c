use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
#[cfg(feature = "mock-time")]
use std::sync::{Arc, Mutex};

/// Source of "now" for the backend. With the `mock-time` feature the clock
/// only moves when told to.
#[derive(Clone)]
pub struct TimeSource {
    #[cfg(feature = "mock-time")]
    time: Arc<Mutex<Timestamp>>,
}

impl TimeSource {
    #[allow(clippy::new_without_default)]
    #[cfg(not(feature = "mock-time"))]
    pub fn new() -> Self {
        Self {}
    }

    #[cfg(feature = "mock-time")]
    pub fn new(initial_time: Timestamp) -> Self {
        Self {
            time: Arc::new(Mutex::new(initial_time)),
        }
    }

    #[cfg(not(feature = "mock-time"))]
    pub fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    #[cfg(feature = "mock-time")]
    pub fn now(&self) -> Timestamp {
        *self.time.lock().unwrap()
    }

    /// The calendar date of "now" in the given zone.
    pub fn today(&self, tz: &TimeZone) -> Date {
        self.now().to_zoned(tz.clone()).date()
    }

    #[cfg(feature = "mock-time")]
    pub fn advance(&self, duration: jiff::Span) {
        let mut time = self.time.lock().unwrap();
        *time = time.checked_add(duration).unwrap_or(*time);
    }

    #[cfg(feature = "mock-time")]
    pub fn set(&self, time: Timestamp) {
        *self.time.lock().unwrap() = time;
    }
}
