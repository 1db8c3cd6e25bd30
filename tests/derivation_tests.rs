use chrono::{NaiveDate, NaiveDateTime, Weekday};
use schedule_calendar::{
    CalendarError, CalendarException, CalendarGraph, DayHours, DayType, TimeRange, TimeUnit,
    WorkWeek,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dt(y: i32, m: u32, day: u32, h: u32, min: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(h, min, 0).unwrap()
}

#[test]
fn derived_calendar_inherits_everything() {
    let mut graph = CalendarGraph::new();
    let base = graph.add_default_base_calendar();
    let derived = graph.add_default_derived_calendar(base).unwrap();

    let calendar = graph.get(derived).unwrap();
    assert!(calendar.is_derived());
    assert_eq!(calendar.parent().map(|parent| parent.id()), Some(base));
    assert_eq!(calendar.get_day_type(Weekday::Mon), Some(DayType::Default));
    assert!(calendar.is_working_day(Weekday::Mon));
    assert!(!calendar.is_working_day(Weekday::Sat));
    assert_eq!(calendar.get_hours(Weekday::Wed), DayHours::standard());
    assert_eq!(
        calendar
            .get_work(dt(2024, 1, 1, 0, 0), dt(2024, 1, 8, 0, 0), TimeUnit::Hours)
            .unwrap()
            .amount(),
        40.0
    );
    assert_eq!(graph.derived_of(base), vec![derived]);
}

#[test]
fn derived_override_shadows_parent_day() {
    let mut graph = CalendarGraph::new();
    let base = graph.add_default_base_calendar();
    let derived = graph.add_default_derived_calendar(base).unwrap();
    {
        let mut calendar = graph.get_mut(derived).unwrap();
        calendar.set_working_day(Weekday::Sat, true);
        calendar
            .add_hours(Weekday::Sat)
            .add_range(TimeRange::from_hm(9, 0, 13, 0).unwrap());
    }

    let calendar = graph.get(derived).unwrap();
    assert!(calendar.is_working_day(Weekday::Sat));
    assert!(calendar.is_working_date(d(2024, 1, 6)));
    assert!(!graph.get(base).unwrap().is_working_date(d(2024, 1, 6)));
}

#[test]
fn parent_changes_reach_derived_calendars() {
    let mut graph = CalendarGraph::new();
    let base = graph.add_default_base_calendar();
    let middle = graph.add_default_derived_calendar(base).unwrap();
    let leaf = graph.add_default_derived_calendar(middle).unwrap();

    let span = (dt(2024, 1, 1, 0, 0), dt(2024, 1, 2, 0, 0));
    let before = graph
        .get(leaf)
        .unwrap()
        .get_work(span.0, span.1, TimeUnit::Hours)
        .unwrap();
    assert_eq!(before.amount(), 8.0);

    graph
        .get_mut(base)
        .unwrap()
        .add_hours(Weekday::Mon)
        .add_range(TimeRange::from_hm(8, 0, 10, 0).unwrap());

    let after = graph
        .get(leaf)
        .unwrap()
        .get_work(span.0, span.1, TimeUnit::Hours)
        .unwrap();
    assert_eq!(after.amount(), 2.0);
}

#[test]
fn base_exception_reaches_warm_derived_caches() {
    let mut graph = CalendarGraph::new();
    let base = graph.add_default_base_calendar();
    let middle = graph.add_default_derived_calendar(base).unwrap();
    let leaf = graph.add_default_derived_calendar(middle).unwrap();

    let week = (dt(2024, 1, 1, 0, 0), dt(2024, 1, 5, 0, 0));
    let work = |graph: &CalendarGraph| {
        graph
            .get(leaf)
            .unwrap()
            .get_work(week.0, week.1, TimeUnit::Hours)
            .unwrap()
            .amount()
    };
    assert_eq!(work(&graph), 32.0);

    graph
        .get_mut(base)
        .unwrap()
        .add_exception(CalendarException::new(d(2024, 1, 3), d(2024, 1, 3)));
    assert_eq!(work(&graph), 24.0);
    assert!(!graph.get(middle).unwrap().is_working_date(d(2024, 1, 3)));
}

#[test]
fn parent_exceptions_and_work_weeks_are_visible_below() {
    let mut graph = CalendarGraph::new();
    let base = graph.add_default_base_calendar();
    let derived = graph.add_default_derived_calendar(base).unwrap();
    {
        let mut calendar = graph.get_mut(base).unwrap();
        calendar.add_exception(CalendarException::new(d(2024, 12, 25), d(2024, 12, 26)).with_name("Christmas"));
        let mut summer = WorkWeek::new(d(2024, 7, 1), d(2024, 8, 31));
        summer.week_mut().set_working_day(Weekday::Fri, false);
        summer.week_mut().add_hours(Weekday::Fri);
        calendar.add_work_week(summer);
    }

    let calendar = graph.get(derived).unwrap();
    assert_eq!(
        calendar.get_exception(d(2024, 12, 26)).and_then(CalendarException::name),
        Some("Christmas")
    );
    assert!(!calendar.is_working_date(d(2024, 12, 25)));
    assert!(calendar.get_work_week(d(2024, 7, 12)).is_some());
    assert!(!calendar.is_working_date(d(2024, 7, 12)));
    assert!(calendar.is_working_date(d(2024, 7, 11)));

    graph
        .get_mut(derived)
        .unwrap()
        .add_exception(
            CalendarException::new(d(2024, 12, 25), d(2024, 12, 25))
                .with_range(TimeRange::from_hm(8, 0, 12, 0).unwrap()),
        );
    let calendar = graph.get(derived).unwrap();
    assert!(calendar.is_working_date(d(2024, 12, 25)));
    assert!(!calendar.is_working_date(d(2024, 12, 26)));
}

#[test]
fn cyclic_parent_links_are_refused() {
    let mut graph = CalendarGraph::new();
    let base = graph.add_default_base_calendar();
    let derived = graph.add_default_derived_calendar(base).unwrap();
    let leaf = graph.add_default_derived_calendar(derived).unwrap();

    assert_eq!(graph.set_parent(base, Some(base)), Ok(false));
    assert_eq!(graph.set_parent(base, Some(leaf)), Ok(false));
    assert_eq!(graph.parent_of(base), None);
    assert_eq!(graph.parent_of(leaf), Some(derived));
}

#[test]
fn reparenting_replaces_the_link() {
    let mut graph = CalendarGraph::new();
    let standard = graph.add_default_base_calendar();
    let night = graph.add_calendar("Night");
    {
        let mut calendar = graph.get_mut(night).unwrap();
        calendar.set_hours(Weekday::Mon, DayHours::new());
    }
    let derived = graph.add_default_derived_calendar(standard).unwrap();
    assert!(graph.get(derived).unwrap().is_working_date(d(2024, 1, 1)));

    assert_eq!(graph.set_parent(derived, Some(night)), Ok(true));
    assert_eq!(graph.parent_of(derived), Some(night));
    assert!(graph.derived_of(standard).is_empty());
    assert!(!graph.get(derived).unwrap().is_working_date(d(2024, 1, 1)));

    assert_eq!(graph.set_parent(derived, None), Ok(true));
    let calendar = graph.get(derived).unwrap();
    assert!(!calendar.is_derived());
    assert!(calendar.is_working_day(Weekday::Mon));
    assert!(!calendar.is_working_day(Weekday::Sun));
}

#[test]
fn removing_a_base_calendar_orphans_its_children() {
    let mut graph = CalendarGraph::new();
    let base = graph.add_default_base_calendar();
    let derived = graph.add_default_derived_calendar(base).unwrap();

    let removed = graph.remove_calendar(base).unwrap();
    assert_eq!(removed.name(), "Standard");
    assert!(graph.remove_calendar(base).is_none());
    assert!(graph.get(base).is_none());
    assert_eq!(graph.len(), 1);

    let calendar = graph.get(derived).unwrap();
    assert!(!calendar.is_derived());
    assert!(!calendar.week().is_derived());
    assert!(calendar.is_working_day(Weekday::Tue));
    assert_eq!(calendar.get_hours(Weekday::Tue), DayHours::standard());

    assert_eq!(
        graph.add_default_derived_calendar(base).unwrap_err(),
        CalendarError::UnknownCalendar(base)
    );
    assert!(graph.calendar_mut(base).is_err());
    assert_eq!(graph.set_parent(derived, Some(base)), Err(CalendarError::UnknownCalendar(base)));
}

#[test]
fn minutes_per_day_is_inherited() {
    let mut graph = CalendarGraph::new();
    let base = graph.add_default_base_calendar();
    let derived = graph.add_default_derived_calendar(base).unwrap();
    assert_eq!(graph.get(derived).unwrap().minutes_per_day(), 480);

    graph.get_mut(base).unwrap().set_minutes_per_day(Some(420));
    let calendar = graph.get(derived).unwrap();
    assert_eq!(calendar.minutes_per_day(), 420);
    assert_eq!(calendar.minutes_per_month(), 420 * 20);
    assert_eq!(calendar.minutes_per_year(), 420 * 20 * 12);

    let days = calendar
        .get_work(dt(2024, 1, 1, 8, 0), dt(2024, 1, 1, 15, 0), TimeUnit::Days)
        .unwrap();
    assert!((days.amount() - 6.0 / 7.0).abs() < 1e-9);

    graph.get_mut(derived).unwrap().set_minutes_per_day(Some(600));
    assert_eq!(graph.get(derived).unwrap().minutes_per_day(), 600);
    assert_eq!(graph.get(base).unwrap().minutes_per_day(), 420);
}

#[test]
fn resource_calendars_take_the_resource_name() {
    let mut graph = CalendarGraph::new();
    let base = graph.add_default_base_calendar();
    let derived = graph.add_default_derived_calendar(base).unwrap();

    graph.get_mut(derived).unwrap().set_resource(Some("  Alice "));
    let calendar = graph.get(derived).unwrap();
    assert_eq!(calendar.name(), "Alice");
    assert_eq!(calendar.resource(), Some("Alice"));

    graph.get_mut(derived).unwrap().set_resource(Some("   "));
    assert_eq!(graph.get(derived).unwrap().name(), "Unnamed Resource");

    graph.get_mut(derived).unwrap().set_resource(None);
    let calendar = graph.get(derived).unwrap();
    assert_eq!(calendar.resource(), None);
    assert_eq!(calendar.name(), "Unnamed Resource");
}

#[test]
fn calendars_are_found_by_name_ignoring_case() {
    let mut graph = CalendarGraph::new();
    let base = graph.add_default_base_calendar();
    let night = graph.add_calendar("Night Shift");
    assert_eq!(graph.by_name("standard").map(|calendar| calendar.id()), Some(base));
    assert_eq!(graph.by_name("NIGHT SHIFT").map(|calendar| calendar.id()), Some(night));
    assert!(graph.by_name("24 Hours").is_none());
    assert_eq!(graph.iter().count(), 2);
}
