use crate::defaults::ProjectDefaults;
use crate::time_unit::TimeUnit;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Tolerance used when comparing duration amounts.
pub const DURATION_EPSILON: f64 = 0.00001;

const MINUTES_PER_HOUR: f64 = 60.0;
const ELAPSED_MINUTES_PER_DAY: f64 = 60.0 * 24.0;
const ELAPSED_MINUTES_PER_WEEK: f64 = ELAPSED_MINUTES_PER_DAY * 7.0;
const ELAPSED_MINUTES_PER_MONTH: f64 = ELAPSED_MINUTES_PER_DAY * 30.0;
const ELAPSED_MINUTES_PER_YEAR: f64 = ELAPSED_MINUTES_PER_WEEK * 52.0;

// Fixed defaults behind the approximate cross-unit ordering.
const COMPARE_MINUTES_PER_DAY: f64 = 8.0 * 60.0;
const COMPARE_MINUTES_PER_WEEK: f64 = 5.0 * 8.0 * 60.0;
const COMPARE_DAYS_PER_MONTH: f64 = 20.0;

/// An immutable amount of time expressed in a single [`TimeUnit`].
///
/// Equality requires the same unit and amounts within [`DURATION_EPSILON`].
/// Ordering across units is approximate: see [`Duration::compare`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Duration {
    amount: f64,
    unit: TimeUnit,
}

impl Duration {
    pub fn new(amount: f64, unit: TimeUnit) -> Self {
        Self { amount, unit }
    }

    pub fn zero(unit: TimeUnit) -> Self {
        Self { amount: 0.0, unit }
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn is_zero(&self) -> bool {
        values_equal(self.amount, 0.0)
    }

    /// Re-express this duration in another unit using the project defaults.
    pub fn convert_units(&self, to: TimeUnit, defaults: &ProjectDefaults) -> Duration {
        Self::convert(self.amount, self.unit, to, defaults)
    }

    pub fn convert(
        amount: f64,
        from: TimeUnit,
        to: TimeUnit,
        defaults: &ProjectDefaults,
    ) -> Duration {
        Self::convert_with(
            amount,
            from,
            to,
            f64::from(defaults.minutes_per_day),
            f64::from(defaults.minutes_per_week),
            f64::from(defaults.days_per_month),
        )
    }

    /// Convert via minutes. A zero default needed for the target unit yields
    /// a zero amount rather than a division by zero. Percentages pass through
    /// unchanged.
    pub fn convert_with(
        amount: f64,
        from: TimeUnit,
        to: TimeUnit,
        minutes_per_day: f64,
        minutes_per_week: f64,
        days_per_month: f64,
    ) -> Duration {
        let minutes = match from {
            TimeUnit::Years => amount * minutes_per_week * 52.0,
            TimeUnit::ElapsedYears => amount * ELAPSED_MINUTES_PER_YEAR,
            TimeUnit::Months => amount * minutes_per_day * days_per_month,
            TimeUnit::ElapsedMonths => amount * ELAPSED_MINUTES_PER_MONTH,
            TimeUnit::Weeks => amount * minutes_per_week,
            TimeUnit::ElapsedWeeks => amount * ELAPSED_MINUTES_PER_WEEK,
            TimeUnit::Days => amount * minutes_per_day,
            TimeUnit::ElapsedDays => amount * ELAPSED_MINUTES_PER_DAY,
            TimeUnit::Hours | TimeUnit::ElapsedHours => amount * MINUTES_PER_HOUR,
            TimeUnit::Minutes
            | TimeUnit::ElapsedMinutes
            | TimeUnit::Percent
            | TimeUnit::ElapsedPercent => amount,
        };

        let converted = match to {
            TimeUnit::Minutes
            | TimeUnit::ElapsedMinutes
            | TimeUnit::Percent
            | TimeUnit::ElapsedPercent => minutes,
            TimeUnit::Hours | TimeUnit::ElapsedHours => minutes / MINUTES_PER_HOUR,
            TimeUnit::Days => divide_or_zero(minutes, minutes_per_day),
            TimeUnit::ElapsedDays => minutes / ELAPSED_MINUTES_PER_DAY,
            TimeUnit::Weeks => divide_or_zero(minutes, minutes_per_week),
            TimeUnit::ElapsedWeeks => minutes / ELAPSED_MINUTES_PER_WEEK,
            TimeUnit::Months => divide_or_zero(minutes, minutes_per_day * days_per_month),
            TimeUnit::ElapsedMonths => minutes / ELAPSED_MINUTES_PER_MONTH,
            TimeUnit::Years => divide_or_zero(minutes, minutes_per_week * 52.0),
            TimeUnit::ElapsedYears => minutes / ELAPSED_MINUTES_PER_YEAR,
        };

        Duration::new(converted, to)
    }

    /// Null-safe sum. The result takes the unit of `a`; `b` is converted into
    /// it when the units differ.
    pub fn add(
        a: Option<Duration>,
        b: Option<Duration>,
        defaults: &ProjectDefaults,
    ) -> Option<Duration> {
        match (a, b) {
            (None, None) => None,
            (None, Some(b)) => Some(b),
            (Some(a), None) => Some(a),
            (Some(a), Some(b)) => {
                let b = if b.unit == a.unit {
                    b
                } else {
                    b.convert_units(a.unit, defaults)
                };
                Some(Duration::new(a.amount + b.amount, a.unit))
            }
        }
    }

    /// Compare amounts only, ignoring units.
    pub fn amount_equals(&self, other: &Duration) -> bool {
        values_equal(self.amount, other.amount)
    }

    /// Approximate ordering. When units differ the right hand side is
    /// converted into this duration's unit assuming 8 hours per day, 5 days
    /// per week and 20 days per month, whatever the project says.
    pub fn compare(&self, rhs: &Duration) -> Ordering {
        let rhs = if self.unit == rhs.unit {
            *rhs
        } else {
            Duration::convert_with(
                rhs.amount,
                rhs.unit,
                self.unit,
                COMPARE_MINUTES_PER_DAY,
                COMPARE_MINUTES_PER_WEEK,
                COMPARE_DAYS_PER_MONTH,
            )
        };

        if self.amount_equals(&rhs) {
            Ordering::Equal
        } else if self.amount < rhs.amount {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

/// Epsilon comparison shared by every duration calculation.
pub fn values_equal(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() < DURATION_EPSILON
}

fn divide_or_zero(minutes: f64, divisor: f64) -> f64 {
    if divisor == 0.0 { 0.0 } else { minutes / divisor }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && self.amount_equals(other)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit)
    }
}
