mod config;
mod edit;
mod merge;
mod query;

pub use config::{CalendarConfig, CalendarGraphConfig};
pub use edit::CalendarMut;
pub use query::CalendarRef;
pub(crate) use query::{at_millis, overlap};

use crate::exception::CalendarException;
use crate::week::{WeekSchedule, WorkWeek};
use chrono::{NaiveDate, NaiveDateTime};
use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashMap;

/// A named calendar: a weekly schedule plus dated overrides.
///
/// Calendars live inside a [`CalendarGraph`](crate::CalendarGraph), which
/// owns the derivation links. Query through [`CalendarRef`] and mutate
/// through [`CalendarMut`] so that cached results stay consistent.
#[derive(Debug, Clone)]
pub struct ProjectCalendar {
    pub(crate) name: String,
    pub(crate) week: WeekSchedule,
    /// Sorted by start date.
    pub(crate) exceptions: Vec<CalendarException>,
    /// Sorted by start date.
    pub(crate) work_weeks: Vec<WorkWeek>,
    pub(crate) resource: Option<String>,
    pub(crate) minutes_per_day: Option<u32>,
    pub(crate) minutes_per_week: Option<u32>,
    pub(crate) minutes_per_month: Option<u32>,
    pub(crate) minutes_per_year: Option<u32>,
    pub(crate) caches: CalendarCaches,
}

impl ProjectCalendar {
    pub const DEFAULT_BASE_NAME: &'static str = "Standard";
    pub const UNNAMED_RESOURCE: &'static str = "Unnamed Resource";

    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            week: WeekSchedule::new(),
            exceptions: Vec::new(),
            work_weeks: Vec::new(),
            resource: None,
            minutes_per_day: None,
            minutes_per_week: None,
            minutes_per_month: None,
            minutes_per_year: None,
            caches: CalendarCaches::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn week(&self) -> &WeekSchedule {
        &self.week
    }

    pub fn exceptions(&self) -> &[CalendarException] {
        &self.exceptions
    }

    pub fn work_weeks(&self) -> &[WorkWeek] {
        &self.work_weeks
    }

    /// Own exceptions with recurring entries expanded, sorted by start date.
    pub(crate) fn expanded_exceptions(&self) -> &[CalendarException] {
        self.caches.expanded_exceptions.get_or_init(|| {
            let mut expanded: Vec<CalendarException> = self
                .exceptions
                .iter()
                .flat_map(CalendarException::expand)
                .collect();
            expanded.sort_by_key(CalendarException::from);
            expanded
        })
    }
}

/// Single-entry memo of the last forward date calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GetDateMemo {
    pub start: NaiveDateTime,
    pub minutes: f64,
    pub result: NaiveDateTime,
}

#[derive(Debug, Default)]
pub(crate) struct CalendarCaches {
    /// Working milliseconds keyed by an ordered `(from, to)` pair.
    pub work: RefCell<HashMap<(NaiveDateTime, NaiveDateTime), i64>>,
    /// Millisecond of the day work starts, per date.
    pub start_times: RefCell<HashMap<NaiveDate, i64>>,
    pub last_get_date: Cell<Option<GetDateMemo>>,
    pub expanded_exceptions: OnceCell<Vec<CalendarException>>,
}

impl CalendarCaches {
    pub fn clear(&mut self) {
        self.work.get_mut().clear();
        self.start_times.get_mut().clear();
        self.last_get_date.set(None);
        self.expanded_exceptions.take();
    }
}

// A copied calendar starts cold.
impl Clone for CalendarCaches {
    fn clone(&self) -> Self {
        Self::default()
    }
}
