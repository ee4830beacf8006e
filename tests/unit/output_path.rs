use chrono::NaiveDate;
use listing_harvester::output::OutputPaths;
use listing_harvester::window::DateWindow;
use std::path::Path;

#[test]
fn full_month_names() {
    let window = DateWindow::month(2025, 7).unwrap();
    let paths = OutputPaths::for_window("out", &window);
    assert_eq!(paths.json(), Path::new("out/li_jobs_2025-07_with_desc.json"));
    assert_eq!(paths.csv(), Path::new("out/li_jobs_2025-07_with_desc.csv"));
}

#[test]
fn custom_range_names() {
    let window = DateWindow::new(
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
    )
    .unwrap();
    let paths = OutputPaths::for_window(".", &window);
    assert_eq!(
        paths.json().file_name().unwrap(),
        "li_jobs_2025-07-01_to_2025-07-15_with_desc.json"
    );
    assert_eq!(
        paths.csv().file_name().unwrap(),
        "li_jobs_2025-07-01_to_2025-07-15_with_desc.csv"
    );
}

#[test]
fn ensure_directory_creates_nested_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("a/b");
    let paths = OutputPaths::for_window(&target, &DateWindow::month(2025, 1).unwrap());

    paths.ensure_directory().unwrap();
    assert!(target.is_dir());
    // Idempotent
    paths.ensure_directory().unwrap();
}
