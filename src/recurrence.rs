use crate::week::{WEEKDAYS, day_index, is_weekend};
use chrono::{Datelike, Months, NaiveDate, TimeDelta, Weekday};
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// A recurrence pattern that expands into a finite list of dates.
///
/// Generation stops at `finish_date` when one is set, otherwise after
/// `occurrences` dates (at least one). Selectors left unset are taken from
/// `start_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub recurrence_type: RecurrenceType,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub finish_date: Option<NaiveDate>,
    #[serde(default)]
    pub occurrences: Option<u32>,
    #[serde(default)]
    /// Ignored by yearly rules, which recur every year.
    pub frequency: Option<u32>,
    /// Monthly/yearly rules: "the Nth weekday" instead of "day N".
    #[serde(default)]
    pub relative: bool,
    /// Daily rules only.
    #[serde(default)]
    pub working_days_only: bool,
    /// Day of month for absolute rules, ordinal (1-4, anything above means
    /// last) for relative ones.
    #[serde(default)]
    pub day_number: Option<u32>,
    /// 1-12, yearly rules only.
    #[serde(default)]
    pub month_number: Option<u32>,
    /// Sunday-first weekday flags. Weekly rules use the whole set, relative
    /// rules use the first flagged day.
    #[serde(default)]
    days: [bool; 7],
}

impl RecurrenceRule {
    pub fn new(recurrence_type: RecurrenceType, start_date: NaiveDate) -> Self {
        Self {
            recurrence_type,
            start_date,
            finish_date: None,
            occurrences: None,
            frequency: None,
            relative: false,
            working_days_only: false,
            day_number: None,
            month_number: None,
            days: [false; 7],
        }
    }

    pub fn weekly_day(&self, day: Weekday) -> bool {
        self.days[day_index(day)]
    }

    pub fn set_weekly_day(&mut self, day: Weekday, value: bool) {
        self.days[day_index(day)] = value;
    }

    pub fn weekly_days(&self) -> Vec<Weekday> {
        WEEKDAYS.into_iter().filter(|day| self.weekly_day(*day)).collect()
    }

    /// Weekday used by relative rules.
    pub fn day_of_week(&self) -> Option<Weekday> {
        WEEKDAYS.into_iter().find(|day| self.weekly_day(*day))
    }

    pub fn set_day_of_week(&mut self, day: Weekday) {
        self.days = [false; 7];
        self.set_weekly_day(day, true);
    }

    /// Set the day and month selectors of a yearly absolute rule from `date`.
    pub fn set_yearly_absolute_from_date(&mut self, date: NaiveDate) {
        self.day_number = Some(date.day());
        self.month_number = Some(date.month());
    }

    fn effective_frequency(&self) -> u32 {
        self.frequency.unwrap_or(1).max(1)
    }

    fn more_dates(&self, candidate: NaiveDate, count: usize) -> bool {
        match self.finish_date {
            Some(finish) => candidate <= finish,
            None => count < self.occurrences.unwrap_or(1).max(1) as usize,
        }
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        let frequency = self.effective_frequency();
        match self.recurrence_type {
            RecurrenceType::Daily => self.daily_dates(frequency),
            RecurrenceType::Weekly => self.weekly_dates(frequency),
            RecurrenceType::Monthly if self.relative => self.monthly_relative_dates(frequency),
            RecurrenceType::Monthly => self.monthly_absolute_dates(frequency),
            RecurrenceType::Yearly if self.relative => self.yearly_relative_dates(),
            RecurrenceType::Yearly => self.yearly_absolute_dates(),
        }
    }

    fn daily_dates(&self, frequency: u32) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut current = self.start_date;
        if self.working_days_only {
            while is_weekend(current.weekday()) {
                current += TimeDelta::days(1);
            }
        }

        while self.more_dates(current, dates.len()) {
            dates.push(current);
            let next = if self.working_days_only {
                add_weekdays(current, frequency)
            } else {
                current.checked_add_signed(TimeDelta::days(i64::from(frequency)))
            };
            match next {
                Some(next) => current = next,
                None => break,
            }
        }
        dates
    }

    fn weekly_dates(&self, frequency: u32) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        if !self.days.iter().any(|flag| *flag) {
            warn!(
                "weekly recurrence starting {} has no days selected",
                self.start_date
            );
            return dates;
        }

        let mut current = self.start_date;
        let mut day = current.weekday();

        while self.more_dates(current, dates.len()) {
            let mut offset = 0_i64;
            for _ in 0..7 {
                if self.weekly_day(day) {
                    current += TimeDelta::days(offset);
                    offset = 0;
                    if !self.more_dates(current, dates.len()) {
                        return dates;
                    }
                    dates.push(current);
                }
                offset += 1;
                day = day.succ();
            }

            offset += 7 * (i64::from(frequency) - 1);
            current += TimeDelta::days(offset);
        }
        dates
    }

    fn monthly_absolute_dates(&self, frequency: u32) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let required = self.day_number.unwrap_or_else(|| self.start_date.day());
        let mut month = first_of_month(self.start_date);
        if required < self.start_date.day() {
            month = match month.checked_add_months(Months::new(1)) {
                Some(next) => next,
                None => return dates,
            };
        }

        loop {
            let candidate = day_in_month(month, required);
            if !self.more_dates(candidate, dates.len()) {
                break;
            }
            dates.push(candidate);
            month = match month.checked_add_months(Months::new(frequency)) {
                Some(next) => next,
                None => break,
            };
        }
        dates
    }

    fn monthly_relative_dates(&self, frequency: u32) -> Vec<NaiveDate> {
        let month = first_of_month(self.start_date);
        self.relative_dates(month, Months::new(frequency))
    }

    fn yearly_relative_dates(&self) -> Vec<NaiveDate> {
        match self.first_of_target_month() {
            Some(month) => self.relative_dates(month, Months::new(12)),
            None => Vec::new(),
        }
    }

    fn relative_dates(&self, mut month: NaiveDate, step: Months) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let weekday = self
            .day_of_week()
            .unwrap_or_else(|| self.start_date.weekday());
        let ordinal = self.day_number.unwrap_or(1).max(1);

        loop {
            let candidate = if ordinal > 4 {
                last_weekday(month, weekday)
            } else {
                nth_weekday(month, weekday, ordinal)
            };
            if candidate > self.start_date {
                if !self.more_dates(candidate, dates.len()) {
                    break;
                }
                dates.push(candidate);
            } else if self.finish_date.is_some_and(|finish| month > finish) {
                break;
            }
            month = match month.checked_add_months(step) {
                Some(next) => next,
                None => break,
            };
        }
        dates
    }

    fn yearly_absolute_dates(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let Some(mut month) = self.first_of_target_month() else {
            return dates;
        };
        let required = self.day_number.unwrap_or_else(|| self.start_date.day());
        let step = Months::new(12);

        loop {
            let mut candidate = day_in_month(month, required);
            if candidate < self.start_date {
                month = match month.checked_add_months(Months::new(12)) {
                    Some(next) => next,
                    None => break,
                };
                candidate = day_in_month(month, required);
            }
            if !self.more_dates(candidate, dates.len()) {
                break;
            }
            dates.push(candidate);
            month = match month.checked_add_months(step) {
                Some(next) => next,
                None => break,
            };
        }
        dates
    }

    fn first_of_target_month(&self) -> Option<NaiveDate> {
        let month = self
            .month_number
            .unwrap_or_else(|| self.start_date.month())
            .clamp(1, 12);
        NaiveDate::from_ymd_opt(self.start_date.year(), month, 1)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn days_in_month(month_start: NaiveDate) -> u32 {
    month_start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map_or(31, |last| last.day())
}

/// Day `day` of the month starting at `month_start`, clamped to the month's
/// last day.
fn day_in_month(month_start: NaiveDate, day: u32) -> NaiveDate {
    let day = day.clamp(1, days_in_month(month_start));
    month_start.with_day(day).unwrap_or(month_start)
}

fn nth_weekday(month_start: NaiveDate, weekday: Weekday, n: u32) -> NaiveDate {
    let offset = (7 + weekday.num_days_from_sunday() - month_start.weekday().num_days_from_sunday()) % 7;
    month_start + TimeDelta::days(i64::from(offset + 7 * (n - 1)))
}

fn last_weekday(month_start: NaiveDate, weekday: Weekday) -> NaiveDate {
    let last = day_in_month(month_start, 31);
    let offset = (7 + last.weekday().num_days_from_sunday() - weekday.num_days_from_sunday()) % 7;
    last - TimeDelta::days(i64::from(offset))
}

fn add_weekdays(date: NaiveDate, count: u32) -> Option<NaiveDate> {
    let mut current = date;
    let mut remaining = count;
    while remaining > 0 {
        current = current.succ_opt()?;
        if !is_weekend(current.weekday()) {
            remaining -= 1;
        }
    }
    Some(current)
}
