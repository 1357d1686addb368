// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable batch timestamps

use chrono::{Local, NaiveDateTime};

/// Format of the timestamp embedded in artifact and summary file names,
/// e.g. `2024-01-02_03-04-05`.
pub const STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// A clock that provides the current local wall time
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Current time rendered with [`STAMP_FORMAT`].
    fn stamp(&self) -> String {
        self.now().format(STAMP_FORMAT).to_string()
    }
}

/// Real system clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Fake clock for testing with controllable time
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone)]
pub struct FakeClock {
    current: std::sync::Arc<parking_lot::Mutex<NaiveDateTime>>,
}

#[cfg(any(test, feature = "test-support"))]
impl FakeClock {
    /// Starts at 2024-01-02 03:04:05.
    pub fn new() -> Self {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .unwrap_or_default();
        Self { current: std::sync::Arc::new(parking_lot::Mutex::new(start)) }
    }

    /// Advance the clock by whole seconds
    pub fn advance_secs(&self, secs: i64) {
        *self.current.lock() += chrono::TimeDelta::seconds(secs);
    }

    /// Set the clock to a specific time
    pub fn set(&self, at: NaiveDateTime) {
        *self.current.lock() = at;
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Clock for FakeClock {
    fn now(&self) -> NaiveDateTime {
        *self.current.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
