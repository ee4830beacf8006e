use chrono::NaiveDate;
use listing_harvester::window::{parse_posting_date, DateWindow};

fn july() -> DateWindow {
    DateWindow::month(2025, 7).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn bounds_are_inclusive() {
    let window = july();
    assert!(window.contains_raw(Some("2025-07-01")));
    assert!(window.contains_raw(Some("2025-07-31")));
    assert!(!window.contains_raw(Some("2025-06-30")));
    assert!(!window.contains_raw(Some("2025-08-01")));
}

#[test]
fn missing_or_garbage_dates_are_outside() {
    let window = july();
    assert!(!window.contains_raw(None));
    assert!(!window.contains_raw(Some("")));
    assert!(!window.contains_raw(Some("   ")));
    assert!(!window.contains_raw(Some("not-a-date")));
    assert!(!window.contains_raw(Some("2 weeks ago")));
    assert!(!window.contains_raw(Some("2025-02-30")));
}

#[test]
fn machine_layouts_parse_to_calendar_date() {
    let expected = Some(date(2025, 7, 15));
    for raw in [
        "2025-07-15",
        " 2025-07-15 ",
        "2025/07/15",
        "2025.07.15",
        "20250715",
        "2025-07-15T09:30:00",
        "2025-07-15T09:30:00.123",
        "2025-07-15T09:30:00Z",
        "2025-07-15T09:30:00+02:00",
        "2025-07-15 09:30:00",
        "2025-07-15 09:30",
    ] {
        assert_eq!(parse_posting_date(raw), expected, "layout {raw:?}");
    }
}

#[test]
fn human_layouts_parse() {
    let expected = Some(date(2025, 7, 3));
    for raw in [
        "July 3, 2025",
        "Jul 3, 2025",
        "July 3rd, 2025",
        "3 July 2025",
        "3rd July 2025",
        "07/03/2025",
        "Thursday, July 3, 2025",
        "Thu, 03 Jul 2025 10:00:00 +0000",
    ] {
        assert_eq!(parse_posting_date(raw), expected, "layout {raw:?}");
    }
}

#[test]
fn day_first_numeric_layouts_parse_when_unambiguous() {
    let expected = Some(date(2025, 7, 15));
    for raw in ["15/07/2025", "15-07-2025", "15.07.2025", "15/07/2025 09:30"] {
        assert_eq!(parse_posting_date(raw), expected, "layout {raw:?}");
    }
    assert!(july().contains_raw(Some("31.07.2025")));
}

#[test]
fn ambiguous_numeric_dates_stay_month_first() {
    assert_eq!(parse_posting_date("03/07/2025"), Some(date(2025, 3, 7)));
    assert_eq!(parse_posting_date("03-07-2025"), Some(date(2025, 3, 7)));
}

#[test]
fn twelve_hour_times_parse() {
    let expected = Some(date(2025, 7, 15));
    for raw in [
        "Jul 15 2025 10:00AM",
        "Jul 15 2025 10:00PM",
        "July 15, 2025 10:00 PM",
        "07/15/2025 09:30 am",
        "2025-07-15 11:45 PM",
    ] {
        assert_eq!(parse_posting_date(raw), expected, "layout {raw:?}");
    }
}

#[test]
fn offset_does_not_shift_the_written_day() {
    // Late evening in UTC-5 is already August in UTC; the written day counts
    assert_eq!(
        parse_posting_date("2025-07-31T23:30:00-05:00"),
        Some(date(2025, 7, 31))
    );
    assert!(july().contains_raw(Some("2025-07-31T23:30:00-05:00")));
}

#[test]
fn custom_range_window() {
    let window = DateWindow::new(date(2025, 7, 10), date(2025, 7, 12)).unwrap();
    assert!(!window.contains(date(2025, 7, 9)));
    assert!(window.contains(date(2025, 7, 10)));
    assert!(window.contains(date(2025, 7, 12)));
    assert!(!window.contains(date(2025, 7, 13)));
    assert_eq!(window.to_string(), "2025-07-10..=2025-07-12");
}

#[test]
fn single_day_window() {
    let day = date(2025, 7, 4);
    let window = DateWindow::new(day, day).unwrap();
    assert!(window.contains(day));
    assert!(!window.is_full_month());
}
