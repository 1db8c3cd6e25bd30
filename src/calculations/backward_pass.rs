use super::{Cursor, remaining_minutes};
use crate::calendar::CalendarRef;
use crate::duration::{Duration, values_equal};
use crate::hours::{MILLIS_PER_DAY, MILLIS_PER_MINUTE};
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

/// Previous dates the backward walk inspects before giving up.
pub const MAX_BACKWARD_SKIP: u32 = 7;

/// Subtracts working time from an instant.
pub struct BackwardPass<'a> {
    calendar: CalendarRef<'a>,
}

impl<'a> BackwardPass<'a> {
    pub fn new(calendar: CalendarRef<'a>) -> Self {
        Self { calendar }
    }

    /// The instant `duration` of working time before `finish`, or `None`
    /// when [`MAX_BACKWARD_SKIP`] consecutive earlier dates have no work.
    pub fn execute(&self, finish: NaiveDateTime, duration: Duration) -> Option<NaiveDateTime> {
        let mut remaining = remaining_minutes(duration, self.calendar.defaults());
        let mut cursor = Cursor::at(finish);

        while remaining > 0.0 && !values_equal(remaining, 0.0) {
            let intervals = self.calendar.day_intervals(cursor.date);
            let available = cursor.millis_before(&intervals) as f64 / MILLIS_PER_MINUTE as f64;

            if remaining > available && !values_equal(remaining, available) {
                remaining -= available;
                match self.previous_working_date(cursor.date) {
                    Some(date) => cursor = Cursor::new(date, MILLIS_PER_DAY),
                    None => {
                        debug!(
                            "no working time within {MAX_BACKWARD_SKIP} days before {}, calendar '{}'",
                            cursor.date,
                            self.calendar.name()
                        );
                        return None;
                    }
                }
                continue;
            }

            for &(range_start, range_end) in intervals.iter().rev() {
                if range_start >= cursor.millis {
                    continue;
                }
                let range_end = range_end.min(cursor.millis);
                let length = (range_end - range_start) as f64 / MILLIS_PER_MINUTE as f64;
                if values_equal(remaining, length) {
                    cursor.millis = range_start;
                    break;
                }
                if remaining < length {
                    cursor.millis =
                        range_end - (remaining * MILLIS_PER_MINUTE as f64).round() as i64;
                    break;
                }
                remaining -= length;
                cursor.millis = range_start;
            }
            remaining = 0.0;
        }

        Some(cursor.to_datetime())
    }

    /// `instant` itself when it falls inside a working period, else the end
    /// of the previous one.
    pub fn previous_work_finish(&self, instant: NaiveDateTime) -> NaiveDateTime {
        let cursor = Cursor::at(instant);
        let intervals = self.calendar.day_intervals(cursor.date);
        if let Some(&(_, end)) = intervals
            .iter()
            .rev()
            .find(|&&(start, _)| start < cursor.millis)
        {
            return Cursor::new(cursor.date, end.min(cursor.millis)).to_datetime();
        }
        match self.previous_working_date(cursor.date) {
            Some(date) => self.calendar.day_finish(date),
            None => instant,
        }
    }

    fn previous_working_date(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut current = date;
        for _ in 0..MAX_BACKWARD_SKIP {
            current = current.pred_opt()?;
            if !self.calendar.day_intervals(current).is_empty() {
                return Some(current);
            }
        }
        None
    }
}
