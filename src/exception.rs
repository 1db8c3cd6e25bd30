use crate::hours::{DayHours, TimeRange};
use crate::recurrence::RecurrenceRule;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Working hours that replace the normal schedule for an inclusive range of
/// dates. No hours means the range is non-working.
///
/// A recurring exception is a template: the owning calendar expands it into
/// one single-day exception per date its rule generates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarException {
    from: NaiveDate,
    to: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    hours: DayHours,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recurring: Option<RecurrenceRule>,
}

impl CalendarException {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        Self {
            from,
            to,
            name: None,
            hours: DayHours::new(),
            recurring: None,
        }
    }

    pub fn recurring(rule: RecurrenceRule) -> Self {
        let mut exception = Self::new(rule.start_date, rule.finish_date.unwrap_or(rule.start_date));
        exception.recurring = Some(rule);
        exception
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_range(mut self, range: TimeRange) -> Self {
        self.hours.add_range(range);
        self
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn hours(&self) -> &DayHours {
        &self.hours
    }

    pub fn hours_mut(&mut self) -> &mut DayHours {
        &mut self.hours
    }

    pub fn add_range(&mut self, range: TimeRange) {
        self.hours.add_range(range);
    }

    pub fn is_working(&self) -> bool {
        !self.hours.is_empty()
    }

    pub fn recurrence(&self) -> Option<&RecurrenceRule> {
        self.recurring.as_ref()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.compare_date(date) == Ordering::Equal
    }

    pub(crate) fn compare_date(&self, date: NaiveDate) -> Ordering {
        if self.to < date {
            Ordering::Less
        } else if self.from > date {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Concrete exceptions this entry stands for: itself, or one per
    /// recurrence date sharing the template's name and hours.
    pub fn expand(&self) -> Vec<CalendarException> {
        match &self.recurring {
            None => vec![self.clone()],
            Some(rule) => rule
                .dates()
                .into_iter()
                .map(|date| CalendarException {
                    from: date,
                    to: date,
                    name: self.name.clone(),
                    hours: self.hours.clone(),
                    recurring: None,
                })
                .collect(),
        }
    }
}
