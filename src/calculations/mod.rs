pub mod backward_pass;
pub mod forward_pass;

pub use backward_pass::{BackwardPass, MAX_BACKWARD_SKIP};
pub use forward_pass::{ForwardPass, MAX_NONWORKING_DAYS};

use crate::calendar::{at_millis, overlap};
use crate::defaults::ProjectDefaults;
use crate::duration::Duration;
use crate::hours::{MILLIS_PER_DAY, millis_of_day};
use crate::time_unit::TimeUnit;
use chrono::{NaiveDate, NaiveDateTime};

/// A position within a date in milliseconds from midnight. `MILLIS_PER_DAY`
/// is the end of the date, distinct from 00:00 of the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub date: NaiveDate,
    pub millis: i64,
}

impl Cursor {
    pub fn new(date: NaiveDate, millis: i64) -> Self {
        Self { date, millis }
    }

    pub fn at(instant: NaiveDateTime) -> Self {
        Self::new(instant.date(), millis_of_day(instant.time()))
    }

    pub fn to_datetime(self) -> NaiveDateTime {
        at_millis(self.date, self.millis)
    }

    pub fn millis_after(&self, intervals: &[(i64, i64)]) -> i64 {
        overlap(intervals, self.millis, MILLIS_PER_DAY)
    }

    pub fn millis_before(&self, intervals: &[(i64, i64)]) -> i64 {
        overlap(intervals, 0, self.millis)
    }
}

/// Working minutes to walk, rounded to two decimals. Percentages are taken
/// as minutes.
pub(crate) fn remaining_minutes(duration: Duration, defaults: &ProjectDefaults) -> f64 {
    let minutes = if duration.unit().is_percent() {
        duration.amount()
    } else {
        duration
            .convert_units(TimeUnit::Minutes, defaults)
            .amount()
    };
    (minutes * 100.0).round() / 100.0
}
