pub mod calculations;
pub mod calendar;
pub mod defaults;
pub mod duration;
pub mod error;
pub mod exception;
pub mod graph;
pub mod hours;
pub mod persistence;
pub mod recurrence;
pub mod time_unit;
pub mod week;

pub use calculations::{BackwardPass, ForwardPass, MAX_BACKWARD_SKIP, MAX_NONWORKING_DAYS};
pub use calendar::{CalendarConfig, CalendarGraphConfig, CalendarMut, CalendarRef, ProjectCalendar};
pub use defaults::ProjectDefaults;
pub use duration::{DURATION_EPSILON, Duration};
pub use error::{CalendarError, PersistenceError};
pub use exception::CalendarException;
pub use graph::{CalendarGraph, CalendarId};
pub use hours::{CalendarHours, DayHours, TimeRange};
pub use persistence::{
    calendars_from_json_str, calendars_to_json_string, load_calendars_from_json,
    save_calendars_to_json, validate_config,
};
pub use recurrence::{RecurrenceRule, RecurrenceType};
pub use time_unit::{ParseTimeUnitError, TimeUnit};
pub use week::{DayType, WEEKDAYS, WeekParent, WeekSchedule, WorkWeek};
