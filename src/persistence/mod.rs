use crate::calendar::CalendarGraphConfig;
pub use crate::error::{PersistenceError, PersistenceResult};
use std::collections::HashSet;

pub mod file;

pub use file::{
    calendars_from_json_str, calendars_to_json_string, load_calendars_from_json,
    save_calendars_to_json,
};

/// Structural checks on a snapshot before it is turned into a graph.
pub fn validate_config(config: &CalendarGraphConfig) -> PersistenceResult<()> {
    let defaults = &config.defaults;
    if defaults.minutes_per_day == 0 || defaults.minutes_per_week == 0 {
        return Err(PersistenceError::InvalidData(format!(
            "minutes per day ({}) and per week ({}) must be positive",
            defaults.minutes_per_day, defaults.minutes_per_week
        )));
    }

    let mut seen = HashSet::with_capacity(config.calendars.len());
    for calendar in &config.calendars {
        if !seen.insert(calendar.name.as_str()) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate calendar name '{}'",
                calendar.name
            )));
        }
        if calendar.parent.as_deref() == Some(calendar.name.as_str()) {
            return Err(PersistenceError::InvalidData(format!(
                "calendar '{}' derives from itself",
                calendar.name
            )));
        }
        for exception in &calendar.exceptions {
            if let Some(rule) = exception.recurrence() {
                if rule.frequency == Some(0) {
                    return Err(PersistenceError::InvalidData(format!(
                        "calendar '{}' has a recurring exception with frequency 0",
                        calendar.name
                    )));
                }
            }
        }
    }
    Ok(())
}
