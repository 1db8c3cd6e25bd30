use super::{CalendarRef, ProjectCalendar};
use crate::error::CalendarError;
use crate::exception::CalendarException;
use crate::graph::{CalendarGraph, CalendarId};
use crate::hours::{CalendarHours, DayHours};
use crate::week::{DayType, WeekSchedule, WorkWeek};
use chrono::Weekday;

/// Mutable access to one calendar of a [`CalendarGraph`].
///
/// Every change clears the cached results of this calendar and of every
/// calendar derived from it before it is applied.
pub struct CalendarMut<'a> {
    graph: &'a mut CalendarGraph,
    id: CalendarId,
}

impl<'a> CalendarMut<'a> {
    pub(crate) fn new(graph: &'a mut CalendarGraph, id: CalendarId) -> Self {
        Self { graph, id }
    }

    pub fn id(&self) -> CalendarId {
        self.id
    }

    pub fn view(&self) -> CalendarRef<'_> {
        let graph: &CalendarGraph = &*self.graph;
        CalendarRef::new(graph, self.id, graph.node(self.id))
    }

    fn calendar(&mut self) -> &mut ProjectCalendar {
        self.graph.invalidate(self.id);
        self.graph.node_mut(self.id)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.graph.node_mut(self.id).name = name.into();
    }

    /// See [`CalendarGraph::set_parent`].
    pub fn set_parent(&mut self, parent: Option<CalendarId>) -> Result<bool, CalendarError> {
        self.graph.set_parent(self.id, parent)
    }

    pub fn set_working_day(&mut self, day: Weekday, working: bool) {
        self.calendar().week.set_working_day(day, working);
    }

    pub fn set_day_type(&mut self, day: Weekday, day_type: Option<DayType>) {
        self.calendar().week.set_day_type(day, day_type);
    }

    /// Replace the hours of `day` with an empty list and return it for
    /// filling in.
    pub fn add_hours(&mut self, day: Weekday) -> &mut DayHours {
        self.calendar().week.add_hours(day)
    }

    pub fn set_hours(&mut self, day: Weekday, hours: DayHours) {
        self.calendar().week.set_hours(day, hours);
    }

    pub fn new_hours(&self, day: Weekday) -> CalendarHours {
        self.graph.node(self.id).week.new_hours(day)
    }

    /// Fails with [`CalendarError::ForeignHours`] when the record was created
    /// by another calendar, leaving this one untouched.
    pub fn attach(&mut self, hours: CalendarHours) -> Result<(), CalendarError> {
        if hours.owner() != self.graph.node(self.id).week.id() {
            return Err(CalendarError::ForeignHours);
        }
        self.calendar().week.attach(hours)
    }

    pub fn detach(&mut self, day: Weekday) -> Option<CalendarHours> {
        self.calendar().week.detach(day)
    }

    pub fn add_default_hours(&mut self) {
        self.calendar().week.add_default_hours();
    }

    pub fn week_mut(&mut self) -> &mut WeekSchedule {
        &mut self.calendar().week
    }

    pub fn add_exception(&mut self, exception: CalendarException) {
        let exceptions = &mut self.calendar().exceptions;
        let index = exceptions.partition_point(|existing| existing.from() <= exception.from());
        exceptions.insert(index, exception);
    }

    pub fn remove_exception(&mut self, index: usize) -> Option<CalendarException> {
        let exceptions = &mut self.calendar().exceptions;
        (index < exceptions.len()).then(|| exceptions.remove(index))
    }

    pub fn clear_exceptions(&mut self) {
        self.calendar().exceptions.clear();
    }

    /// The work week's schedule is always resolved against this calendar.
    pub fn add_work_week(&mut self, mut work_week: WorkWeek) {
        work_week.week_mut().set_derived(true);
        let weeks = &mut self.calendar().work_weeks;
        let index = weeks.partition_point(|existing| existing.from() <= work_week.from());
        weeks.insert(index, work_week);
    }

    pub fn work_week_mut(&mut self, index: usize) -> Option<&mut WorkWeek> {
        self.calendar().work_weeks.get_mut(index)
    }

    pub fn remove_work_week(&mut self, index: usize) -> Option<WorkWeek> {
        let weeks = &mut self.calendar().work_weeks;
        (index < weeks.len()).then(|| weeks.remove(index))
    }

    pub fn clear_work_weeks(&mut self) {
        self.calendar().work_weeks.clear();
    }

    /// Link a resource. The calendar takes the resource's name, or
    /// "Unnamed Resource" when it is blank. `None` unlinks and keeps the
    /// name.
    pub fn set_resource(&mut self, resource: Option<&str>) {
        let calendar = self.graph.node_mut(self.id);
        match resource {
            Some(name) => {
                let name = name.trim();
                calendar.name = if name.is_empty() {
                    ProjectCalendar::UNNAMED_RESOURCE.to_string()
                } else {
                    name.to_string()
                };
                calendar.resource = Some(calendar.name.clone());
            }
            None => calendar.resource = None,
        }
    }

    pub fn set_minutes_per_day(&mut self, minutes: Option<u32>) {
        self.calendar().minutes_per_day = minutes;
    }

    pub fn set_minutes_per_week(&mut self, minutes: Option<u32>) {
        self.calendar().minutes_per_week = minutes;
    }

    pub fn set_minutes_per_month(&mut self, minutes: Option<u32>) {
        self.calendar().minutes_per_month = minutes;
    }

    pub fn set_minutes_per_year(&mut self, minutes: Option<u32>) {
        self.calendar().minutes_per_year = minutes;
    }
}
