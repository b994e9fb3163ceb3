/// Run configuration, loaded from a JSON file.
///
/// Every field has a default, so `{}` is a valid configuration that reads
/// `samples.csv` from the working directory and writes `schedule.csv`.
use crate::calendar::{MeetingCalendar, DEFAULT_CANDIDATE_BUFFER};
use crate::classifier::{PriorityClassifier, DEFAULT_WINDOW_YEARS};
use crate::error::{Result, ScheduleError};
use crate::holidays::{self, HolidaySource};
use crate::io::CsvSources;
use crate::scheduler::SampleScheduler;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub samples_csv: PathBuf,
    pub hot_list_csv: Option<PathBuf>,
    pub cancellations_csv: Option<PathBuf>,
    pub output_csv: Option<PathBuf>,
    /// Newest year of the tier window; the run year when unset.
    pub reference_year: Option<i32>,
    pub window_years: u32,
    pub meeting_days: [String; 2],
    pub candidate_buffer: usize,
    pub capacity_per_meeting: usize,
    pub holiday_calendar: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            samples_csv: PathBuf::from("samples.csv"),
            hot_list_csv: None,
            cancellations_csv: None,
            output_csv: Some(PathBuf::from("schedule.csv")),
            reference_year: None,
            window_years: DEFAULT_WINDOW_YEARS,
            meeting_days: ["Tue".to_string(), "Fri".to_string()],
            candidate_buffer: DEFAULT_CANDIDATE_BUFFER,
            capacity_per_meeting: 1,
            holiday_calendar: "market".to_string(),
        }
    }
}

fn parse_weekday(value: &str) -> Result<Weekday> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| ScheduleError::Config(format!("Unknown meeting weekday '{}'", value)))
}

impl Config {
    /// Load a configuration file. Relative paths inside it resolve against
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&text)?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        log::debug!("config: loaded {}", path.display());
        Ok(config)
    }

    fn rebase(&mut self, base: &Path) {
        let fix = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        fix(&mut self.samples_csv);
        for path in [
            &mut self.hot_list_csv,
            &mut self.cancellations_csv,
            &mut self.output_csv,
        ]
        .into_iter()
        .flatten()
        {
            fix(path);
        }
    }

    pub fn reference_year_for(&self, today: NaiveDate) -> i32 {
        self.reference_year.unwrap_or_else(|| today.year())
    }

    pub fn holiday_source(&self) -> Result<Box<dyn HolidaySource>> {
        holidays::by_name(&self.holiday_calendar).ok_or_else(|| {
            ScheduleError::Config(format!("Unknown holiday calendar '{}'", self.holiday_calendar))
        })
    }

    pub fn calendar(&self) -> Result<MeetingCalendar> {
        MeetingCalendar::new(
            parse_weekday(&self.meeting_days[0])?,
            parse_weekday(&self.meeting_days[1])?,
            self.candidate_buffer,
        )
    }

    /// Build the scheduler for a run on `today`.
    pub fn scheduler(&self, today: NaiveDate) -> Result<SampleScheduler> {
        let classifier = PriorityClassifier::new(self.reference_year_for(today), self.window_years)?;
        SampleScheduler::new(classifier, self.calendar()?).with_capacity(self.capacity_per_meeting)
    }

    pub fn sources(&self) -> CsvSources {
        CsvSources {
            samples: self.samples_csv.clone(),
            hot_list: self.hot_list_csv.clone(),
            cancellations: self.cancellations_csv.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        let scheduler = config.scheduler(today()).unwrap();
        assert_eq!(scheduler.classifier.reference_year, 2025);
        assert_eq!(scheduler.classifier.window_years, 4);
        assert_eq!(scheduler.calendar, MeetingCalendar::default());
        assert_eq!(scheduler.capacity, 1);
    }

    #[test]
    fn test_overrides() {
        let config: Config = serde_json::from_str(
            r#"{
                "reference_year": 2023,
                "window_years": 3,
                "meeting_days": ["Monday", "thu"],
                "capacity_per_meeting": 2,
                "holiday_calendar": "none"
            }"#,
        )
        .unwrap();
        let scheduler = config.scheduler(today()).unwrap();
        assert_eq!(scheduler.classifier.reference_year, 2023);
        assert_eq!(scheduler.calendar.first_day, Weekday::Mon);
        assert_eq!(scheduler.calendar.second_day, Weekday::Thu);
        assert_eq!(scheduler.capacity, 2);
        assert!(config.holiday_source().unwrap().holidays(2025).is_empty());
    }

    #[test]
    fn test_invalid_values() {
        let bad_day = Config {
            meeting_days: ["Tue".into(), "Someday".into()],
            ..Config::default()
        };
        assert!(matches!(bad_day.calendar(), Err(ScheduleError::Config(_))));

        let bad_capacity = Config {
            capacity_per_meeting: 0,
            ..Config::default()
        };
        assert!(bad_capacity.scheduler(today()).is_err());

        let bad_holidays = Config {
            holiday_calendar: "lunar".into(),
            ..Config::default()
        };
        assert!(bad_holidays.holiday_source().is_err());

        assert!(serde_json::from_str::<Config>(r#"{"unknown": 1}"#).is_err());
    }

    #[test]
    fn test_load_rebases_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"samples_csv": "in/samples.csv", "hot_list_csv": "/abs/hot.csv"}"#)
            .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.samples_csv, dir.path().join("in/samples.csv"));
        assert_eq!(config.hot_list_csv, Some(PathBuf::from("/abs/hot.csv")));
        assert_eq!(config.output_csv, Some(dir.path().join("schedule.csv")));
    }
}
