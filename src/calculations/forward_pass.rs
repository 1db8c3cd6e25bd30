use super::{Cursor, remaining_minutes};
use crate::calendar::CalendarRef;
use crate::calendar::GetDateMemo;
use crate::duration::{Duration, values_equal};
use crate::hours::MILLIS_PER_MINUTE;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use log::warn;

/// Consecutive days without work the forward walk skips before giving up.
pub const MAX_NONWORKING_DAYS: u32 = 1000;

/// Adds working time to an instant.
pub struct ForwardPass<'a> {
    calendar: CalendarRef<'a>,
}

impl<'a> ForwardPass<'a> {
    pub fn new(calendar: CalendarRef<'a>) -> Self {
        Self { calendar }
    }

    /// The instant `duration` of working time after `start`.
    ///
    /// When the result is the end of a working period and
    /// `return_next_work_start` is set, the start of the next working period
    /// is returned instead. A calendar without work for
    /// [`MAX_NONWORKING_DAYS`] days yields `start` plus one day.
    pub fn execute(
        &self,
        start: NaiveDateTime,
        duration: Duration,
        return_next_work_start: bool,
    ) -> NaiveDateTime {
        let minutes = remaining_minutes(duration, self.calendar.defaults());
        let caches = self.calendar.caches();

        let (mut cursor, mut remaining) = match caches.last_get_date.get() {
            Some(memo) if memo.start == start && minutes >= memo.minutes => {
                (Cursor::at(memo.result), minutes - memo.minutes)
            }
            _ => (Cursor::at(start), minutes),
        };

        let mut at_period_end = true;
        while remaining > 0.0 && !values_equal(remaining, 0.0) {
            let intervals = self.calendar.day_intervals(cursor.date);
            let available = cursor.millis_after(&intervals) as f64 / MILLIS_PER_MINUTE as f64;

            if remaining > available && !values_equal(remaining, available) {
                remaining -= available;
                match self.next_working_date(cursor.date) {
                    Some(date) => cursor = Cursor::new(date, 0),
                    None => {
                        warn!(
                            "no working time within {MAX_NONWORKING_DAYS} days of {start}, calendar '{}'",
                            self.calendar.name()
                        );
                        return start + TimeDelta::days(1);
                    }
                }
                continue;
            }

            for &(range_start, range_end) in &intervals {
                if range_end <= cursor.millis {
                    continue;
                }
                let range_start = range_start.max(cursor.millis);
                let length = (range_end - range_start) as f64 / MILLIS_PER_MINUTE as f64;
                if values_equal(remaining, length) {
                    cursor.millis = range_end;
                    remaining = 0.0;
                    break;
                }
                if remaining < length {
                    cursor.millis =
                        range_start + (remaining * MILLIS_PER_MINUTE as f64).round() as i64;
                    remaining = 0.0;
                    at_period_end = false;
                    break;
                }
                remaining -= length;
                cursor.millis = range_end;
            }
            remaining = 0.0;
        }

        let result = cursor.to_datetime();
        caches.last_get_date.set(Some(GetDateMemo {
            start,
            minutes,
            result,
        }));

        if return_next_work_start && at_period_end {
            self.next_work_start(result)
        } else {
            result
        }
    }

    /// `instant` itself when it falls inside a working period, else the start
    /// of the next one.
    pub fn next_work_start(&self, instant: NaiveDateTime) -> NaiveDateTime {
        let cursor = Cursor::at(instant);
        let intervals = self.calendar.day_intervals(cursor.date);
        if let Some(&(start, _)) = intervals.iter().find(|&&(_, end)| cursor.millis < end) {
            return Cursor::new(cursor.date, start.max(cursor.millis)).to_datetime();
        }
        match self.next_working_date(cursor.date) {
            Some(date) => self.calendar.day_start(date),
            None => instant,
        }
    }

    fn next_working_date(&self, date: NaiveDate) -> Option<NaiveDate> {
        let mut current = date;
        for _ in 0..MAX_NONWORKING_DAYS {
            current = current.succ_opt()?;
            if !self.calendar.day_intervals(current).is_empty() {
                return Some(current);
            }
        }
        None
    }
}
