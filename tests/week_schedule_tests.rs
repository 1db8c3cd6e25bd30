use chrono::{NaiveTime, Weekday};
use schedule_calendar::{CalendarError, DayHours, DayType, TimeRange, WeekSchedule};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn root_schedule_defaults_to_weekdays() {
    let week = WeekSchedule::new();
    assert!(!week.is_derived());
    assert!(week.is_working_day(Weekday::Mon, None));
    assert!(week.is_working_day(Weekday::Fri, None));
    assert!(!week.is_working_day(Weekday::Sat, None));
    assert!(!week.is_working_day(Weekday::Sun, None));

    assert_eq!(week.get_hours(Weekday::Wed, None), DayHours::standard());
    assert!(week.get_hours(Weekday::Sun, None).is_empty());
}

#[test]
fn reading_hours_does_not_store_defaults() {
    let week = WeekSchedule::new();
    let _ = week.get_hours(Weekday::Tue, None);
    assert!(week.own_hours(Weekday::Tue).is_none());
}

#[test]
fn ensure_default_hours_is_idempotent_and_per_day() {
    let mut week = WeekSchedule::new();
    assert!(week.ensure_default_hours(Weekday::Mon));
    assert!(!week.ensure_default_hours(Weekday::Mon));
    assert_eq!(week.own_hours(Weekday::Mon), Some(&DayHours::standard()));
    assert!(week.own_hours(Weekday::Tue).is_none());

    week.add_hours(Weekday::Wed)
        .add_range(TimeRange::new(t(9, 0), t(10, 0)));
    week.add_default_hours();
    assert_eq!(week.own_hours(Weekday::Wed).map(DayHours::len), Some(1));
    assert_eq!(week.own_hours(Weekday::Sat), Some(&DayHours::new()));
}

#[test]
fn unset_day_type_depends_on_derivation() {
    let mut week = WeekSchedule::new();
    week.set_day_type(Weekday::Mon, None);
    assert_eq!(week.day_type(Weekday::Mon), Some(DayType::Working));

    week.set_working_day(Weekday::Tue, false);
    assert_eq!(week.day_type(Weekday::Tue), Some(DayType::NonWorking));
    assert!(!week.is_working_day(Weekday::Tue, None));

    assert_eq!(week.day_type(Weekday::Wed), None);
}

#[test]
fn default_day_on_root_schedule_is_working_unless_weekend() {
    let mut week = WeekSchedule::new();
    week.set_day_type(Weekday::Thu, Some(DayType::Default));
    week.set_day_type(Weekday::Sat, Some(DayType::Default));
    assert!(week.is_working_day(Weekday::Thu, None));
    assert!(!week.is_working_day(Weekday::Sat, None));
}

#[test]
fn attaching_hours_from_another_schedule_fails() {
    let mut first = WeekSchedule::new();
    let second = WeekSchedule::new();

    let mut foreign = second.new_hours(Weekday::Mon);
    foreign.add_range(TimeRange::new(t(6, 0), t(7, 0)));
    assert_eq!(first.attach(foreign), Err(CalendarError::ForeignHours));
    assert!(first.own_hours(Weekday::Mon).is_none());

    let mut own = first.new_hours(Weekday::Mon);
    own.add_range(TimeRange::new(t(6, 0), t(7, 0)));
    assert_eq!(first.attach(own), Ok(()));
    assert_eq!(first.own_hours(Weekday::Mon).map(DayHours::len), Some(1));
}

#[test]
fn detached_hours_can_be_attached_again() {
    let mut week = WeekSchedule::new();
    week.add_hours(Weekday::Fri)
        .add_range(TimeRange::new(t(7, 0), t(11, 0)));

    let detached = week.detach(Weekday::Fri).unwrap();
    assert_eq!(detached.day(), Weekday::Fri);
    assert!(week.own_hours(Weekday::Fri).is_none());
    assert!(week.detach(Weekday::Fri).is_none());

    week.attach(detached).unwrap();
    assert_eq!(
        week.own_hours(Weekday::Fri).and_then(|hours| hours.range(0)),
        Some(TimeRange::new(t(7, 0), t(11, 0)))
    );
}

#[test]
fn copied_schedule_rejects_hours_of_its_source() {
    let week = WeekSchedule::new();
    let mut copy = week.clone();
    assert_eq!(copy, week);
    assert_eq!(
        copy.attach(week.new_hours(Weekday::Mon)),
        Err(CalendarError::ForeignHours)
    );
}

#[test]
fn time_ranges_crossing_midnight() {
    let night = TimeRange::new(t(22, 0), t(6, 0));
    assert!(night.crosses_midnight());
    assert_eq!(night.duration_millis(), 8 * 3_600_000);

    let full_day = TimeRange::new(t(0, 0), t(0, 0));
    assert_eq!(full_day.duration_millis(), 24 * 3_600_000);

    let morning = TimeRange::from_hm(8, 0, 12, 0).unwrap();
    assert!(!morning.crosses_midnight());
    assert_eq!(DayHours::standard().total_millis(), 8 * 3_600_000);
    assert!(TimeRange::from_hm(25, 0, 1, 0).is_none());
}
