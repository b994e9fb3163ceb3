use chrono::{Datelike, NaiveDate, Weekday};
use sample_scheduler::pipeline;
use sample_scheduler::{Config, ScheduleError};
use std::fs;
use std::path::Path;

const SAMPLES: &str = "\
sample_id,is_proband,date_received,identifier_class,is_reported,is_analyzed
BASE-0031,yes,2025-02-10,Base,no,no
UDD-0102,yes,2024-11-03,UDD,no,yes
UDD-0099,yes,2025-01-20,UDD,no,no
UDD-0100,no,2025-01-20,UDD,no,no
UIC-0007,yes,2023-01-01,UIC,no,no
UDD-0050,yes,2024-11-03,UDD,yes,yes
LEGACY-1,yes,2018-04-04,Base,no,no
";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write_inputs(dir: &Path, cancellations: &str) {
    fs::write(dir.join("samples.csv"), SAMPLES).unwrap();
    fs::write(dir.join("hot.csv"), "sample_id\nBASE-0031\n").unwrap();
    fs::write(dir.join("cancelled.csv"), cancellations).unwrap();
    fs::write(
        dir.join("run.json"),
        r#"{
            "samples_csv": "samples.csv",
            "hot_list_csv": "hot.csv",
            "cancellations_csv": "cancelled.csv",
            "output_csv": "out/schedule.csv",
            "reference_year": 2025
        }"#,
    )
    .unwrap();
    fs::create_dir_all(dir.join("out")).unwrap();
}

#[test]
fn test_end_to_end_schedule() {
    let dir = tempfile::tempdir().unwrap();
    // Friday 2025-02-14 is cancelled.
    write_inputs(dir.path(), "date\n2025-02-14\n");

    let config = Config::load(&dir.path().join("run.json")).unwrap();
    // Monday 2025-02-10; Washington's Birthday is Monday 2025-02-17.
    let report = pipeline::run(&config, date(2025, 2, 10)).unwrap();
    let schedule = &report.schedule;

    let ids: Vec<&str> = schedule.entries.iter().map(|e| e.sample.sample_id.as_str()).collect();
    assert_eq!(ids, vec!["BASE-0031", "UIC-0007", "UDD-0099", "UDD-0102", "LEGACY-1"]);

    let dates: Vec<NaiveDate> = schedule.entries.iter().map(|e| e.meeting_date).collect();
    assert_eq!(
        dates,
        vec![
            date(2025, 2, 11),
            date(2025, 2, 18),
            date(2025, 2, 21),
            date(2025, 2, 25),
            date(2025, 2, 28),
        ]
    );
    assert!(dates
        .iter()
        .all(|d| matches!(d.weekday(), Weekday::Tue | Weekday::Fri)));
    assert_eq!(report.summary.unmatched(), 1);

    let written = fs::read_to_string(dir.path().join("out/schedule.csv")).unwrap();
    let rows: Vec<&str> = written.lines().collect();
    assert_eq!(rows.len(), 6);
    assert_eq!(
        rows[1],
        "BASE-0031,true,2025-02-10,Base,false,false,1,CRITICAL: Hot List,2025-02-11"
    );
    assert_eq!(
        rows[5],
        "LEGACY-1,true,2018-04-04,Base,false,false,5,Base 2018,2025-02-28"
    );
}

#[test]
fn test_exhausted_calendar_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), "date\n");

    let mut config = Config::load(&dir.path().join("run.json")).unwrap();
    config.candidate_buffer = 0;
    config.cancellations_csv = None;
    // With no buffer, the first candidate being a holiday exhausts the calendar.
    // Friday 2025-07-04 is Independence Day.
    let err = pipeline::run(&config, date(2025, 7, 3)).unwrap_err();
    assert!(matches!(err, ScheduleError::CalendarExhausted { requested: 5, .. }));
    assert!(!dir.path().join("out/schedule.csv").exists());
}

#[test]
fn test_bad_sample_row_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path(), "date\n");
    fs::write(
        dir.path().join("samples.csv"),
        "sample_id,is_proband,date_received,identifier_class,is_reported,is_analyzed\nUDD-1,yes,not-a-date,UDD,no,no\n",
    )
    .unwrap();

    let config = Config::load(&dir.path().join("run.json")).unwrap();
    let err = pipeline::run(&config, date(2025, 2, 10)).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidRecord { line: 2, .. }));
}
