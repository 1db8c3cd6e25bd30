use crate::error::CalendarError;
use crate::hours::{CalendarHours, DayHours, WeekId};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sunday-first, matching the day numbering used by project files.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub(crate) fn day_index(day: Weekday) -> usize {
    day.num_days_from_sunday() as usize
}

pub(crate) fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    NonWorking,
    Working,
    /// Inherit from the parent schedule.
    Default,
}

/// Where a derived week schedule looks for the days it does not define.
pub trait WeekParent {
    fn parent_hours(&self, day: Weekday) -> DayHours;
    fn parent_is_working_day(&self, day: Weekday) -> bool;
}

/// Per-day working flags and hours.
///
/// A derived schedule resolves `DayType::Default` and missing hours through a
/// [`WeekParent`]. A root schedule treats them as "working unless Saturday or
/// Sunday" with the standard 08:00-12:00/13:00-17:00 hours.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WeekSchedule {
    #[serde(skip)]
    id: WeekId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    days: [Option<DayType>; 7],
    #[serde(default)]
    hours: [Option<DayHours>; 7],
    #[serde(default)]
    derived: bool,
}

impl Clone for WeekSchedule {
    fn clone(&self) -> Self {
        Self {
            id: WeekId::next(),
            name: self.name.clone(),
            days: self.days,
            hours: self.hours.clone(),
            derived: self.derived,
        }
    }
}

impl PartialEq for WeekSchedule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.days == other.days
            && self.hours == other.hours
            && self.derived == other.derived
    }
}

impl WeekSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> WeekId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn is_derived(&self) -> bool {
        self.derived
    }

    /// Marking a schedule as derived turns every unset day flag into
    /// `DayType::Default`.
    pub(crate) fn set_derived(&mut self, derived: bool) {
        self.derived = derived;
        if derived {
            for day in self.days.iter_mut() {
                if day.is_none() {
                    *day = Some(DayType::Default);
                }
            }
        }
    }

    /// Raw flag, no inheritance.
    pub fn day_type(&self, day: Weekday) -> Option<DayType> {
        self.days[day_index(day)]
    }

    /// `None` means "unset": `Default` on a derived schedule, `Working` on a
    /// root one.
    pub fn set_day_type(&mut self, day: Weekday, day_type: Option<DayType>) {
        let value = match day_type {
            Some(value) => value,
            None if self.derived => DayType::Default,
            None => DayType::Working,
        };
        self.days[day_index(day)] = Some(value);
    }

    pub fn set_working_day(&mut self, day: Weekday, working: bool) {
        let value = if working {
            DayType::Working
        } else {
            DayType::NonWorking
        };
        self.set_day_type(day, Some(value));
    }

    pub fn is_working_day(&self, day: Weekday, parent: Option<&dyn WeekParent>) -> bool {
        match self.day_type(day) {
            Some(DayType::Working) => true,
            Some(DayType::NonWorking) => false,
            Some(DayType::Default) | None => match parent {
                Some(parent) if self.derived => parent.parent_is_working_day(day),
                _ => !is_weekend(day),
            },
        }
    }

    /// Hours stored on this schedule for `day`, if any.
    pub fn own_hours(&self, day: Weekday) -> Option<&DayHours> {
        self.hours[day_index(day)].as_ref()
    }

    pub fn get_hours(&self, day: Weekday, parent: Option<&dyn WeekParent>) -> DayHours {
        if let Some(hours) = self.own_hours(day) {
            return hours.clone();
        }
        match parent {
            Some(parent) if self.derived => parent.parent_hours(day),
            _ => DayHours::default_for(day),
        }
    }

    /// Replace the hours for `day` with an empty record and return it.
    pub fn add_hours(&mut self, day: Weekday) -> &mut DayHours {
        let slot = &mut self.hours[day_index(day)];
        *slot = Some(DayHours::new());
        slot.get_or_insert_with(DayHours::new)
    }

    pub fn set_hours(&mut self, day: Weekday, hours: DayHours) {
        self.hours[day_index(day)] = Some(hours);
    }

    /// Create a detached hours record owned by this schedule.
    pub fn new_hours(&self, day: Weekday) -> CalendarHours {
        CalendarHours::new(self.id, day, DayHours::new())
    }

    pub fn attach(&mut self, hours: CalendarHours) -> Result<(), CalendarError> {
        if hours.owner() != self.id {
            return Err(CalendarError::ForeignHours);
        }
        let day = hours.day();
        self.hours[day_index(day)] = Some(hours.into_hours());
        Ok(())
    }

    /// Remove the hours for `day`, returning them as a record that can be
    /// attached again.
    pub fn detach(&mut self, day: Weekday) -> Option<CalendarHours> {
        self.hours[day_index(day)]
            .take()
            .map(|hours| CalendarHours::new(self.id, day, hours))
    }

    /// Store the default hours for `day` unless hours are already present.
    /// Returns whether anything was added.
    pub fn ensure_default_hours(&mut self, day: Weekday) -> bool {
        let slot = &mut self.hours[day_index(day)];
        if slot.is_some() {
            return false;
        }
        *slot = Some(DayHours::default_for(day));
        true
    }

    pub fn add_default_hours(&mut self) {
        for day in WEEKDAYS {
            self.ensure_default_hours(day);
        }
    }
}

/// A weekly schedule that overrides the calendar's own week for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkWeek {
    from: NaiveDate,
    to: NaiveDate,
    week: WeekSchedule,
}

impl WorkWeek {
    /// The schedule starts derived from its owning calendar, so every day is
    /// `DayType::Default` until set.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        let mut week = WeekSchedule::new();
        week.set_derived(true);
        Self { from, to, week }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.week.set_name(Some(name.into()));
        self
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn name(&self) -> Option<&str> {
        self.week.name()
    }

    pub fn week(&self) -> &WeekSchedule {
        &self.week
    }

    pub fn week_mut(&mut self) -> &mut WeekSchedule {
        &mut self.week
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.compare_date(date) == Ordering::Equal
    }

    /// Position of the range relative to `date`: `Less` when the range ends
    /// before it, `Greater` when it starts after it.
    pub(crate) fn compare_date(&self, date: NaiveDate) -> Ordering {
        if self.to < date {
            Ordering::Less
        } else if self.from > date {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}
