use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Scheduling defaults owned by the project properties.
///
/// Plain (non-elapsed) duration units are converted through these values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefaults {
    pub minutes_per_day: u32,
    pub minutes_per_week: u32,
    pub days_per_month: u32,
    pub default_start_time: NaiveTime,
    pub default_end_time: NaiveTime,
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        Self {
            minutes_per_day: 480,
            minutes_per_week: 2400,
            days_per_month: 20,
            default_start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            default_end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl ProjectDefaults {
    pub fn minutes_per_month(&self) -> u32 {
        self.minutes_per_day.saturating_mul(self.days_per_month)
    }

    pub fn minutes_per_year(&self) -> u32 {
        self.minutes_per_month().saturating_mul(12)
    }
}
