use super::{CalendarCaches, ProjectCalendar};
use crate::calculations::{BackwardPass, ForwardPass};
use crate::defaults::ProjectDefaults;
use crate::duration::Duration;
use crate::error::CalendarError;
use crate::exception::CalendarException;
use crate::graph::{CalendarGraph, CalendarId};
use crate::hours::{DayHours, MILLIS_PER_DAY, MILLIS_PER_MINUTE, millis_of_day};
use crate::time_unit::TimeUnit;
use crate::week::{DayType, WeekParent, WeekSchedule, WorkWeek};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Weekday};
use std::fmt;

/// Read access to one calendar of a [`CalendarGraph`], with the parent chain
/// available for fallback resolution.
#[derive(Clone, Copy)]
pub struct CalendarRef<'a> {
    graph: &'a CalendarGraph,
    id: CalendarId,
    calendar: &'a ProjectCalendar,
}

impl fmt::Debug for CalendarRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarRef")
            .field("id", &self.id)
            .field("name", &self.calendar.name)
            .finish()
    }
}

impl<'a> CalendarRef<'a> {
    pub(crate) fn new(graph: &'a CalendarGraph, id: CalendarId, calendar: &'a ProjectCalendar) -> Self {
        Self { graph, id, calendar }
    }

    pub fn id(&self) -> CalendarId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.calendar.name
    }

    pub fn calendar(&self) -> &'a ProjectCalendar {
        self.calendar
    }

    pub fn defaults(&self) -> &'a ProjectDefaults {
        self.graph.defaults()
    }

    pub fn parent(&self) -> Option<CalendarRef<'a>> {
        self.graph
            .parent_of(self.id)
            .and_then(|parent| self.graph.get(parent))
    }

    pub fn derived(&self) -> Vec<CalendarRef<'a>> {
        self.graph
            .derived_of(self.id)
            .into_iter()
            .filter_map(|id| self.graph.get(id))
            .collect()
    }

    pub fn is_derived(&self) -> bool {
        self.graph.parent_of(self.id).is_some()
    }

    pub fn week(&self) -> &'a WeekSchedule {
        &self.calendar.week
    }

    pub fn exceptions(&self) -> &'a [CalendarException] {
        &self.calendar.exceptions
    }

    pub fn work_weeks(&self) -> &'a [WorkWeek] {
        &self.calendar.work_weeks
    }

    pub fn resource(&self) -> Option<&'a str> {
        self.calendar.resource.as_deref()
    }

    pub(crate) fn caches(&self) -> &'a CalendarCaches {
        &self.calendar.caches
    }

    pub fn minutes_per_day(&self) -> u32 {
        self.calendar
            .minutes_per_day
            .or_else(|| self.parent().map(|parent| parent.minutes_per_day()))
            .unwrap_or(self.defaults().minutes_per_day)
    }

    pub fn minutes_per_week(&self) -> u32 {
        self.calendar
            .minutes_per_week
            .or_else(|| self.parent().map(|parent| parent.minutes_per_week()))
            .unwrap_or(self.defaults().minutes_per_week)
    }

    pub fn minutes_per_month(&self) -> u32 {
        self.calendar
            .minutes_per_month
            .or_else(|| self.parent().map(|parent| parent.minutes_per_month()))
            .unwrap_or_else(|| {
                self.minutes_per_day()
                    .saturating_mul(self.defaults().days_per_month)
            })
    }

    pub fn minutes_per_year(&self) -> u32 {
        self.calendar
            .minutes_per_year
            .or_else(|| self.parent().map(|parent| parent.minutes_per_year()))
            .unwrap_or_else(|| self.minutes_per_month().saturating_mul(12))
    }

    pub fn get_day_type(&self, day: Weekday) -> Option<DayType> {
        self.calendar.week.day_type(day)
    }

    pub fn is_working_day(&self, day: Weekday) -> bool {
        let parent = self.parent();
        self.calendar
            .week
            .is_working_day(day, parent.as_ref().map(|p| p as &dyn WeekParent))
    }

    /// Weekly hours for `day`, ignoring exceptions and work weeks.
    pub fn get_hours(&self, day: Weekday) -> DayHours {
        let parent = self.parent();
        self.calendar
            .week
            .get_hours(day, parent.as_ref().map(|p| p as &dyn WeekParent))
    }

    /// Exception covering `date`, searched here first and then up the parent
    /// chain.
    pub fn get_exception(&self, date: NaiveDate) -> Option<&'a CalendarException> {
        let expanded = self.calendar.expanded_exceptions();
        match expanded.binary_search_by(|exception| exception.compare_date(date)) {
            Ok(index) => expanded.get(index),
            Err(_) => self.parent()?.get_exception(date),
        }
    }

    pub fn get_work_week(&self, date: NaiveDate) -> Option<&'a WorkWeek> {
        self.work_week_with_owner(date).map(|(_, week)| week)
    }

    fn work_week_with_owner(&self, date: NaiveDate) -> Option<(CalendarRef<'a>, &'a WorkWeek)> {
        let weeks = &self.calendar.work_weeks;
        match weeks.binary_search_by(|week| week.compare_date(date)) {
            Ok(index) => weeks.get(index).map(|week| (*self, week)),
            Err(_) => self.parent()?.work_week_with_owner(date),
        }
    }

    /// Effective hours for `date`: an exception, else a work week, else the
    /// weekly schedule.
    pub fn hours_on(&self, date: NaiveDate) -> DayHours {
        if let Some(exception) = self.get_exception(date) {
            return exception.hours().clone();
        }
        let day = date.weekday();
        match self.work_week_with_owner(date) {
            Some((owner, week)) => week.week().get_hours(day, Some(&owner)),
            None => self.get_hours(day),
        }
    }

    pub fn is_working_date(&self, date: NaiveDate) -> bool {
        !self.hours_on(date).is_empty()
    }

    /// Working intervals of `date` in milliseconds from midnight, sorted by
    /// start: the previous date's ranges that run past midnight, then the
    /// date's own ranges cut at 24:00.
    pub(crate) fn day_intervals(&self, date: NaiveDate) -> Vec<(i64, i64)> {
        let mut intervals = Vec::new();
        if let Some(previous) = date.pred_opt() {
            for range in &self.hours_on(previous) {
                let (_, end) = range.span();
                if end > MILLIS_PER_DAY {
                    intervals.push((0, end - MILLIS_PER_DAY));
                }
            }
        }
        for range in &self.hours_on(date) {
            let (start, end) = range.span();
            intervals.push((start, end.min(MILLIS_PER_DAY)));
        }
        intervals.sort_unstable();
        intervals
    }

    /// Working time between two instants. Reversed instants give a negative
    /// amount.
    pub fn get_work(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        unit: TimeUnit,
    ) -> Result<Duration, CalendarError> {
        if unit.is_percent() {
            return Err(CalendarError::UnsupportedUnit(unit));
        }
        let (from, to, negate) = if start <= end {
            (start, end, false)
        } else {
            (end, start, true)
        };

        let cached = self.caches().work.borrow().get(&(from, to)).copied();
        let millis = match cached {
            Some(millis) => millis,
            None => {
                let millis = self.working_millis(from, to);
                self.caches().work.borrow_mut().insert((from, to), millis);
                millis
            }
        };

        let millis = if negate { -millis } else { millis };
        Ok(self.millis_to_duration(millis, unit))
    }

    /// Working time attributed to a single date.
    pub fn get_work_on(&self, date: NaiveDate, unit: TimeUnit) -> Result<Duration, CalendarError> {
        if unit.is_percent() {
            return Err(CalendarError::UnsupportedUnit(unit));
        }
        let millis = overlap(&self.day_intervals(date), 0, MILLIS_PER_DAY);
        Ok(self.millis_to_duration(millis, unit))
    }

    fn working_millis(&self, from: NaiveDateTime, to: NaiveDateTime) -> i64 {
        let last = to.date();
        let mut date = from.date();
        let mut total = 0;
        while date <= last {
            let low = if date == from.date() {
                millis_of_day(from.time())
            } else {
                0
            };
            let high = if date == last {
                millis_of_day(to.time())
            } else {
                MILLIS_PER_DAY
            };
            if high > low {
                total += overlap(&self.day_intervals(date), low, high);
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        total
    }

    fn millis_to_duration(&self, millis: i64, unit: TimeUnit) -> Duration {
        Duration::convert_with(
            millis as f64 / MILLIS_PER_MINUTE as f64,
            TimeUnit::Minutes,
            unit,
            f64::from(self.minutes_per_day()),
            f64::from(self.minutes_per_week()),
            f64::from(self.defaults().days_per_month),
        )
    }

    /// Number of working dates from `start_date` to `end_date` inclusive.
    pub fn get_duration(&self, start_date: NaiveDate, end_date: NaiveDate) -> Duration {
        let mut count = 0_u32;
        let mut date = start_date;
        for _ in 0..self.get_days_in_range(start_date, end_date) {
            if self.is_working_date(date) {
                count += 1;
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        Duration::new(f64::from(count), TimeUnit::Days)
    }

    /// Inclusive day count; the same date twice counts as one day.
    pub fn get_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        (end - start).num_days() + 1
    }

    /// First working instant of `date`, or the default start time when the
    /// date has no work.
    pub fn day_start(&self, date: NaiveDate) -> NaiveDateTime {
        let cached = self.caches().start_times.borrow().get(&date).copied();
        let millis = match cached {
            Some(millis) => millis,
            None => {
                let millis = self
                    .day_intervals(date)
                    .first()
                    .map_or_else(|| millis_of_day(self.defaults().default_start_time), |&(start, _)| start);
                self.caches().start_times.borrow_mut().insert(date, millis);
                millis
            }
        };
        at_millis(date, millis)
    }

    /// Last working instant of `date`, or the default end time when the date
    /// has no work. Work running to midnight finishes at the next date's
    /// 00:00.
    pub fn day_finish(&self, date: NaiveDate) -> NaiveDateTime {
        let millis = self
            .day_intervals(date)
            .iter()
            .map(|&(_, end)| end)
            .max()
            .unwrap_or_else(|| millis_of_day(self.defaults().default_end_time));
        at_millis(date, millis)
    }

    /// Add working time to `start`. See [`ForwardPass`].
    pub fn get_date(
        &self,
        start: NaiveDateTime,
        duration: Duration,
        return_next_work_start: bool,
    ) -> NaiveDateTime {
        ForwardPass::new(*self).execute(start, duration, return_next_work_start)
    }

    /// Subtract working time from `finish`. `None` when no working time is
    /// found within a week before the current position. See
    /// [`BackwardPass`].
    pub fn get_start_date(&self, finish: NaiveDateTime, duration: Duration) -> Option<NaiveDateTime> {
        BackwardPass::new(*self).execute(finish, duration)
    }

    pub fn get_next_work_start(&self, instant: NaiveDateTime) -> NaiveDateTime {
        ForwardPass::new(*self).next_work_start(instant)
    }

    pub fn get_previous_work_finish(&self, instant: NaiveDateTime) -> NaiveDateTime {
        BackwardPass::new(*self).previous_work_finish(instant)
    }
}

impl WeekParent for CalendarRef<'_> {
    fn parent_hours(&self, day: Weekday) -> DayHours {
        self.get_hours(day)
    }

    fn parent_is_working_day(&self, day: Weekday) -> bool {
        self.is_working_day(day)
    }
}

/// Milliseconds of `[low, high)` covered by `intervals`.
pub(crate) fn overlap(intervals: &[(i64, i64)], low: i64, high: i64) -> i64 {
    intervals
        .iter()
        .map(|&(start, end)| (end.min(high) - start.max(low)).max(0))
        .sum()
}

pub(crate) fn at_millis(date: NaiveDate, millis: i64) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + TimeDelta::milliseconds(millis)
}
