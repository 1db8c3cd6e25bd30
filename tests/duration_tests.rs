use schedule_calendar::{Duration, ProjectDefaults, TimeUnit};
use std::cmp::Ordering;

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[test]
fn days_convert_to_hours_with_project_defaults() {
    let defaults = ProjectDefaults::default();
    let hours = Duration::new(2.0, TimeUnit::Days).convert_units(TimeUnit::Hours, &defaults);
    assert_eq!(hours.unit(), TimeUnit::Hours);
    assert!(close(hours.amount(), 16.0));
}

#[test]
fn months_use_days_per_month() {
    let defaults = ProjectDefaults {
        days_per_month: 22,
        ..ProjectDefaults::default()
    };
    let minutes = Duration::convert(1.0, TimeUnit::Months, TimeUnit::Minutes, &defaults);
    assert!(close(minutes.amount(), 480.0 * 22.0));
}

#[test]
fn elapsed_units_ignore_project_defaults() {
    let defaults = ProjectDefaults {
        minutes_per_day: 300,
        ..ProjectDefaults::default()
    };
    let week = Duration::convert(1.0, TimeUnit::ElapsedWeeks, TimeUnit::ElapsedMinutes, &defaults);
    assert!(close(week.amount(), 10_080.0));

    let month = Duration::convert(1.0, TimeUnit::ElapsedMonths, TimeUnit::ElapsedDays, &defaults);
    assert!(close(month.amount(), 30.0));

    let year = Duration::convert(1.0, TimeUnit::ElapsedYears, TimeUnit::ElapsedWeeks, &defaults);
    assert!(close(year.amount(), 52.0));
}

#[test]
fn zero_default_gives_zero_amount() {
    let defaults = ProjectDefaults {
        minutes_per_day: 0,
        ..ProjectDefaults::default()
    };
    let days = Duration::convert(960.0, TimeUnit::Minutes, TimeUnit::Days, &defaults);
    assert_eq!(days, Duration::new(0.0, TimeUnit::Days));
}

#[test]
fn percent_passes_through_unchanged() {
    let defaults = ProjectDefaults::default();
    let converted = Duration::convert(50.0, TimeUnit::Percent, TimeUnit::Minutes, &defaults);
    assert!(close(converted.amount(), 50.0));
}

#[test]
fn equality_requires_same_unit_and_close_amount() {
    assert_eq!(
        Duration::new(1.000001, TimeUnit::Days),
        Duration::new(1.0, TimeUnit::Days)
    );
    assert_ne!(
        Duration::new(1.001, TimeUnit::Days),
        Duration::new(1.0, TimeUnit::Days)
    );
    assert_ne!(
        Duration::new(8.0, TimeUnit::Hours),
        Duration::new(8.0, TimeUnit::Days)
    );
    assert!(Duration::new(8.0, TimeUnit::Hours).amount_equals(&Duration::new(8.0, TimeUnit::Days)));
}

#[test]
fn compare_converts_with_fixed_defaults() {
    let day = Duration::new(1.0, TimeUnit::Days);
    assert_eq!(day.compare(&Duration::new(8.0, TimeUnit::Hours)), Ordering::Equal);
    assert_eq!(day.compare(&Duration::new(9.0, TimeUnit::Hours)), Ordering::Less);

    let week = Duration::new(1.0, TimeUnit::Weeks);
    assert_eq!(week.compare(&Duration::new(4.0, TimeUnit::Days)), Ordering::Greater);

    let month = Duration::new(1.0, TimeUnit::Months);
    assert_eq!(month.compare(&Duration::new(20.0, TimeUnit::Days)), Ordering::Equal);
}

#[test]
fn add_converts_right_operand_into_left_unit() {
    let defaults = ProjectDefaults {
        minutes_per_day: 480,
        ..ProjectDefaults::default()
    };
    let sum = Duration::add(
        Some(Duration::new(5.0, TimeUnit::Days)),
        Some(Duration::new(480.0, TimeUnit::Minutes)),
        &defaults,
    );
    assert_eq!(sum, Some(Duration::new(6.0, TimeUnit::Days)));
}

#[test]
fn add_is_null_safe() {
    let defaults = ProjectDefaults::default();
    let two_hours = Duration::new(2.0, TimeUnit::Hours);
    assert_eq!(Duration::add(None, None, &defaults), None);
    assert_eq!(Duration::add(None, Some(two_hours), &defaults), Some(two_hours));
    assert_eq!(Duration::add(Some(two_hours), None, &defaults), Some(two_hours));
}

#[test]
fn time_units_parse_and_display_abbreviations() {
    assert_eq!("emo".parse::<TimeUnit>(), Ok(TimeUnit::ElapsedMonths));
    assert_eq!(" D ".parse::<TimeUnit>(), Ok(TimeUnit::Days));
    assert!("fortnight".parse::<TimeUnit>().is_err());
    assert_eq!(Duration::new(3.5, TimeUnit::Hours).to_string(), "3.5h");
    for unit in TimeUnit::ALL {
        assert_eq!(unit.as_str().parse::<TimeUnit>(), Ok(unit));
    }
    assert!(TimeUnit::ElapsedPercent.is_elapsed());
    assert!(TimeUnit::ElapsedPercent.is_percent());
    assert!(!TimeUnit::Weeks.is_elapsed());
}

#[test]
fn defaults_derive_month_and_year_minutes() {
    let defaults = ProjectDefaults::default();
    assert_eq!(defaults.minutes_per_month(), 9_600);
    assert_eq!(defaults.minutes_per_year(), 115_200);
}
