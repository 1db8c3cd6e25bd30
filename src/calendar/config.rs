use super::ProjectCalendar;
use crate::defaults::ProjectDefaults;
use crate::error::{PersistenceError, PersistenceResult};
use crate::exception::CalendarException;
use crate::graph::{CalendarGraph, CalendarId};
use crate::week::{WeekSchedule, WorkWeek};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Serializable description of one calendar. The parent is referenced by
/// name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default)]
    pub week: WeekSchedule,
    #[serde(default)]
    pub exceptions: Vec<CalendarException>,
    #[serde(default)]
    pub work_weeks: Vec<WorkWeek>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_per_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_per_week: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_per_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_per_year: Option<u32>,
}

impl CalendarConfig {
    fn into_calendar(self) -> ProjectCalendar {
        let mut calendar = ProjectCalendar::new(self.name);
        calendar.resource = self.resource;
        calendar.week = self.week;
        calendar.week.set_derived(false);
        calendar.exceptions = self.exceptions;
        calendar.exceptions.sort_by_key(|exception| exception.from());
        calendar.work_weeks = self
            .work_weeks
            .into_iter()
            .map(|mut week| {
                week.week_mut().set_derived(true);
                week
            })
            .collect();
        calendar.work_weeks.sort_by_key(|week| week.from());
        calendar.minutes_per_day = self.minutes_per_day;
        calendar.minutes_per_week = self.minutes_per_week;
        calendar.minutes_per_month = self.minutes_per_month;
        calendar.minutes_per_year = self.minutes_per_year;
        calendar
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalendarGraphConfig {
    #[serde(default)]
    pub defaults: ProjectDefaults,
    #[serde(default)]
    pub calendars: Vec<CalendarConfig>,
}

impl CalendarGraph {
    pub fn to_config(&self) -> CalendarGraphConfig {
        let calendars = self
            .iter()
            .map(|calendar| CalendarConfig {
                name: calendar.name().to_string(),
                parent: calendar.parent().map(|parent| parent.name().to_string()),
                resource: calendar.resource().map(str::to_string),
                week: calendar.week().clone(),
                exceptions: calendar.exceptions().to_vec(),
                work_weeks: calendar.work_weeks().to_vec(),
                minutes_per_day: calendar.calendar().minutes_per_day,
                minutes_per_week: calendar.calendar().minutes_per_week,
                minutes_per_month: calendar.calendar().minutes_per_month,
                minutes_per_year: calendar.calendar().minutes_per_year,
            })
            .collect();

        CalendarGraphConfig {
            defaults: *self.defaults(),
            calendars,
        }
    }

    /// Rebuild a graph. Calendar names must be unique and every parent name
    /// must refer to a calendar of the same config.
    pub fn from_config(config: CalendarGraphConfig) -> PersistenceResult<Self> {
        let mut graph = CalendarGraph::with_defaults(config.defaults);
        let mut by_name: HashMap<String, CalendarId> = HashMap::new();
        let mut links: Vec<(CalendarId, String, String)> = Vec::new();

        for calendar in config.calendars {
            let name = calendar.name.clone();
            let parent = calendar.parent.clone();
            let id = graph.insert(calendar.into_calendar());
            if by_name.insert(name.clone(), id).is_some() {
                return Err(PersistenceError::InvalidData(format!(
                    "duplicate calendar name '{name}'"
                )));
            }
            if let Some(parent) = parent {
                links.push((id, name, parent));
            }
        }

        for (id, name, parent) in links {
            let Some(&parent_id) = by_name.get(&parent) else {
                return Err(PersistenceError::UnknownParent {
                    calendar: name,
                    parent,
                });
            };
            let linked = graph
                .set_parent(id, Some(parent_id))
                .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
            if !linked {
                return Err(PersistenceError::InvalidData(format!(
                    "calendar '{name}' cannot derive from '{parent}'"
                )));
            }
        }

        Ok(graph)
    }
}
