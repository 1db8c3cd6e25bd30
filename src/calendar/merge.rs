use super::ProjectCalendar;
use crate::error::CalendarError;
use crate::graph::{CalendarGraph, CalendarId};
use crate::hours::{DayHours, TimeRange};
use crate::week::WEEKDAYS;

impl CalendarGraph {
    /// Build the calendar an assignment works to: a day is working only when
    /// both calendars work it, during the hours they share. Exceptions and
    /// work weeks of both calendars are copied across unchanged.
    pub fn add_merged_calendar(
        &mut self,
        task: CalendarId,
        resource: CalendarId,
    ) -> Result<CalendarId, CalendarError> {
        let task_calendar = self.calendar(task)?;
        let resource_calendar = self.calendar(resource)?;

        let name = resource_calendar
            .resource()
            .unwrap_or_else(|| resource_calendar.name());
        let mut merged = ProjectCalendar::new(name);
        merged.resource = resource_calendar.resource().map(str::to_string);

        for day in WEEKDAYS {
            let working =
                task_calendar.is_working_day(day) && resource_calendar.is_working_day(day);
            merged.week.set_working_day(day, working);
            let hours = if working {
                intersect_hours(
                    &task_calendar.get_hours(day),
                    &resource_calendar.get_hours(day),
                )
            } else {
                DayHours::new()
            };
            merged.week.set_hours(day, hours);
        }

        merged.exceptions = task_calendar
            .exceptions()
            .iter()
            .chain(resource_calendar.exceptions())
            .cloned()
            .collect();
        merged.exceptions.sort_by_key(|exception| exception.from());

        merged.work_weeks = task_calendar
            .work_weeks()
            .iter()
            .chain(resource_calendar.work_weeks())
            .cloned()
            .collect();
        merged.work_weeks.sort_by_key(|week| week.from());

        Ok(self.insert(merged))
    }
}

/// Time covered by both lists of ranges.
pub(crate) fn intersect_hours(left: &DayHours, right: &DayHours) -> DayHours {
    let mut left: Vec<(i64, i64)> = left.iter().map(TimeRange::span).collect();
    let mut right: Vec<(i64, i64)> = right.iter().map(TimeRange::span).collect();
    left.sort_unstable();
    right.sort_unstable();

    let mut result = DayHours::new();
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        let (left_start, left_end) = left[i];
        let (right_start, right_end) = right[j];
        let start = left_start.max(right_start);
        let end = left_end.min(right_end);
        if end > start {
            result.add_range(TimeRange::from_span(start, end));
        }
        if left_end < right_end {
            i += 1;
        } else {
            j += 1;
        }
    }
    result
}
