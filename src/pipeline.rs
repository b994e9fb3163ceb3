/// One batch scheduling run: load inputs, build exclusions, schedule, write.
use crate::config::Config;
use crate::error::Result;
use crate::holidays::HolidaySource;
use crate::io::{self, ExclusionSource, HotListSource, SampleSource};
use crate::models::{ExclusionSet, SampleRecord, Schedule};
use crate::scheduler::{SampleScheduler, ScheduleSummary};
use chrono::{Datelike, NaiveDate};

/// Outcome of a run, with the inputs' headline counts.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub schedule: Schedule,
    pub summary: ScheduleSummary,
    pub excluded_dates: usize,
}

/// Load every input once, then schedule against that snapshot.
pub fn run_with<S>(
    sources: &S,
    holidays: &dyn HolidaySource,
    scheduler: &SampleScheduler,
    today: NaiveDate,
) -> Result<RunReport>
where
    S: SampleSource + HotListSource + ExclusionSource,
{
    let samples: Vec<SampleRecord> = sources.load_samples()?;
    let hot_list = sources.load_hot_list()?;
    let exclusions = ExclusionSet::build(sources.load_cancellations()?, holidays, today.year());

    let schedule = scheduler.schedule(&samples, &hot_list, &exclusions, today)?;
    let summary = SampleScheduler::summarize(&samples, &schedule);
    if summary.unmatched() > 0 {
        log::info!(
            "pipeline: {} samples scheduled in the catch-all tier",
            summary.unmatched()
        );
    }

    Ok(RunReport {
        schedule,
        summary,
        excluded_dates: exclusions.len(),
    })
}

/// Run with the configured CSV inputs and write the output file, if any.
///
/// Nothing is written when scheduling fails.
pub fn run(config: &Config, today: NaiveDate) -> Result<RunReport> {
    let scheduler = config.scheduler(today)?;
    let holidays = config.holiday_source()?;
    log::info!(
        "pipeline: run date {}, reference year {}, {}",
        today,
        scheduler.classifier.reference_year,
        scheduler.calendar
    );

    let report = run_with(&config.sources(), holidays.as_ref(), &scheduler, today)?;
    if let Some(path) = &config.output_csv {
        io::write_schedule_file(path, &report.schedule)?;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::MeetingCalendar;
    use crate::classifier::PriorityClassifier;
    use crate::holidays::{MarketHolidays, NoHolidays};
    use crate::io::MemorySources;
    use crate::models::{HotList, IdentifierClass};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scheduler() -> SampleScheduler {
        SampleScheduler::new(
            PriorityClassifier::new(2024, 4).unwrap(),
            MeetingCalendar::default(),
        )
    }

    fn sources() -> MemorySources {
        MemorySources {
            samples: vec![
                SampleRecord::new("UDD-1", true, date(2024, 6, 1), IdentifierClass::Udd, false, false)
                    .unwrap(),
                SampleRecord::new("UIC-2", true, date(2023, 1, 1), IdentifierClass::Uic, false, false)
                    .unwrap(),
            ],
            hot_list: HotList::new(),
            cancellations: vec![date(2024, 12, 27)],
        }
    }

    #[test]
    fn test_holidays_and_cancellations_are_skipped() {
        // Monday 2024-12-23: Tue 24 is free, Christmas (Wed) is not a
        // meeting day, Fri 27 is cancelled.
        let report = run_with(&sources(), &MarketHolidays, &scheduler(), date(2024, 12, 23)).unwrap();
        let dates: Vec<NaiveDate> = report.schedule.entries.iter().map(|e| e.meeting_date).collect();
        assert_eq!(dates, vec![date(2024, 12, 24), date(2024, 12, 31)]);
        assert_eq!(report.schedule.entries[0].sample.sample_id, "UIC-2");
    }

    #[test]
    fn test_holiday_on_meeting_day() {
        // Independence Day 2025 falls on a Friday.
        let report = run_with(&sources(), &MarketHolidays, &scheduler(), date(2025, 7, 1)).unwrap();
        let dates: Vec<NaiveDate> = report.schedule.entries.iter().map(|e| e.meeting_date).collect();
        assert_eq!(dates, vec![date(2025, 7, 1), date(2025, 7, 8)]);

        let report = run_with(&sources(), &NoHolidays, &scheduler(), date(2025, 7, 1)).unwrap();
        assert_eq!(report.schedule.entries[1].meeting_date, date(2025, 7, 4));
        assert_eq!(report.excluded_dates, 1);
    }
}
