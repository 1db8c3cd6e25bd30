use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

pub const MILLIS_PER_MINUTE: i64 = 60_000;
pub const MILLIS_PER_DAY: i64 = 24 * 60 * MILLIS_PER_MINUTE;

pub fn millis_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight()) * 1000
        + i64::from(time.nanosecond().min(999_999_999) / 1_000_000)
}

/// Inverse of [`millis_of_day`]; values outside one day wrap around.
pub fn time_from_millis(millis: i64) -> NaiveTime {
    let millis = millis.rem_euclid(MILLIS_PER_DAY);
    let secs = (millis / 1000) as u32;
    let nanos = ((millis % 1000) * 1_000_000) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).unwrap_or(NaiveTime::MIN)
}

/// A time-of-day range. An end at or before the start means the range runs
/// past midnight; equal start and end cover a full 24 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn from_hm(start_hour: u32, start_minute: u32, end_hour: u32, end_minute: u32) -> Option<Self> {
        Some(Self {
            start: NaiveTime::from_hms_opt(start_hour, start_minute, 0)?,
            end: NaiveTime::from_hms_opt(end_hour, end_minute, 0)?,
        })
    }

    pub(crate) fn from_span(start: i64, end: i64) -> Self {
        Self {
            start: time_from_millis(start),
            end: time_from_millis(end),
        }
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }

    /// Start and end in milliseconds from the start of the range's own day.
    /// The end may exceed [`MILLIS_PER_DAY`].
    pub fn span(&self) -> (i64, i64) {
        let start = millis_of_day(self.start);
        let mut end = millis_of_day(self.end);
        if end <= start {
            end += MILLIS_PER_DAY;
        }
        (start, end)
    }

    pub fn duration_millis(&self) -> i64 {
        let (start, end) = self.span();
        end - start
    }
}

/// Ordered working ranges for one day. Order is the order work is
/// accumulated in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayHours(Vec<TimeRange>);

impl DayHours {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 08:00-12:00 and 13:00-17:00.
    pub fn standard() -> Self {
        [TimeRange::from_hm(8, 0, 12, 0), TimeRange::from_hm(13, 0, 17, 0)]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Hours a root week schedule assumes for a day nobody configured.
    pub fn default_for(day: Weekday) -> Self {
        match day {
            Weekday::Sat | Weekday::Sun => Self::new(),
            _ => Self::standard(),
        }
    }

    pub fn add_range(&mut self, range: TimeRange) {
        self.0.push(range);
    }

    pub fn set_range(&mut self, index: usize, range: TimeRange) -> bool {
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = range;
                true
            }
            None => false,
        }
    }

    pub fn range(&self, index: usize) -> Option<TimeRange> {
        self.0.get(index).copied()
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeRange> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn total_millis(&self) -> i64 {
        self.0.iter().map(TimeRange::duration_millis).sum()
    }
}

impl FromIterator<TimeRange> for DayHours {
    fn from_iter<I: IntoIterator<Item = TimeRange>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DayHours {
    type Item = &'a TimeRange;
    type IntoIter = std::slice::Iter<'a, TimeRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Identity of a week schedule, used to check that an hours record is
/// attached to the schedule that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekId(u64);

impl WeekId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for WeekId {
    fn default() -> Self {
        Self::next()
    }
}

/// Hours for one day, bound to the week schedule that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarHours {
    owner: WeekId,
    day: Weekday,
    hours: DayHours,
}

impl CalendarHours {
    pub(crate) fn new(owner: WeekId, day: Weekday, hours: DayHours) -> Self {
        Self { owner, day, hours }
    }

    pub fn owner(&self) -> WeekId {
        self.owner
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn hours(&self) -> &DayHours {
        &self.hours
    }

    pub fn add_range(&mut self, range: TimeRange) {
        self.hours.add_range(range);
    }

    pub fn into_hours(self) -> DayHours {
        self.hours
    }
}
