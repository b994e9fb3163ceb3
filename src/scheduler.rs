/// Meeting scheduler for sequencing samples.
///
/// This module provides the SampleScheduler which filters eligible samples,
/// orders them by priority tier and maps that order onto the meeting
/// calendar.
use crate::calendar::MeetingCalendar;
use crate::classifier::PriorityClassifier;
use crate::error::{Result, ScheduleError};
use crate::models::{
    Classification, ExclusionSet, HotList, PriorityTier, SampleRecord, Schedule, ScheduledEntry,
};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// A classified sample waiting for a meeting date.
#[derive(Debug, Clone)]
struct RankedSample<'a> {
    record: &'a SampleRecord,
    classification: Classification,
    suffix: Option<u64>,
    ingestion_index: usize,
}

impl RankedSample<'_> {
    /// Ascending order: tier, received date, numeric suffix, ingestion order.
    ///
    /// Identifiers without a numeric suffix sort after those with one.
    fn order(&self, other: &Self) -> Ordering {
        self.classification
            .tier
            .cmp(&other.classification.tier)
            .then_with(|| self.record.date_received.cmp(&other.record.date_received))
            .then_with(|| match (self.suffix, other.suffix) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| self.ingestion_index.cmp(&other.ingestion_index))
    }
}

/// Per-tier counts of a schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub total_records: usize,
    pub eligible: usize,
    pub by_tier: BTreeMap<PriorityTier, usize>,
}

impl ScheduleSummary {
    /// Number of scheduled samples that fell into the catch-all tier.
    pub fn unmatched(&self) -> usize {
        self.by_tier.get(&PriorityTier::UNMATCHED).copied().unwrap_or(0)
    }
}

/// Priority-based sample scheduler.
///
/// Each meeting date hosts `capacity` consecutive ranks; the default of one
/// sample per meeting keeps meeting dates strictly increasing with rank.
#[derive(Debug, Clone)]
pub struct SampleScheduler {
    pub classifier: PriorityClassifier,
    pub calendar: MeetingCalendar,
    pub capacity: usize,
}

impl SampleScheduler {
    /// Initialize the scheduler with one sample per meeting.
    pub fn new(classifier: PriorityClassifier, calendar: MeetingCalendar) -> Self {
        SampleScheduler {
            classifier,
            calendar,
            capacity: 1,
        }
    }

    /// Set how many samples share one meeting date.
    pub fn with_capacity(mut self, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ScheduleError::Config(
                "Meeting capacity must be at least 1".to_string(),
            ));
        }
        self.capacity = capacity;
        Ok(self)
    }

    fn check_unique(records: &[SampleRecord]) -> Result<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in records {
            if !seen.insert(record.sample_id.as_str()) {
                return Err(ScheduleError::DuplicateSample(record.sample_id.clone()));
            }
        }
        Ok(())
    }

    /// Classify and order the eligible samples.
    fn rank<'a>(&self, records: &'a [SampleRecord], hot_list: &HotList) -> Vec<RankedSample<'a>> {
        let mut ranked: Vec<RankedSample<'a>> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.is_eligible())
            .map(|(ingestion_index, record)| RankedSample {
                record,
                classification: self.classifier.classify(record, hot_list),
                suffix: record.numeric_suffix(),
                ingestion_index,
            })
            .collect();

        ranked.sort_by(|a, b| a.order(b));
        ranked
    }

    /// Build the meeting schedule for a run on `today`.
    ///
    /// The calendar search starts from the day before `today`, so a run on
    /// a meeting weekday can place its first sample on that same day.
    pub fn schedule(
        &self,
        records: &[SampleRecord],
        hot_list: &HotList,
        exclusions: &ExclusionSet,
        today: NaiveDate,
    ) -> Result<Schedule> {
        Self::check_unique(records)?;

        let ranked = self.rank(records, hot_list);
        log::info!(
            "scheduler: {} of {} samples eligible",
            ranked.len(),
            records.len()
        );
        if ranked.is_empty() {
            return Ok(Schedule::new(today, Vec::new()));
        }

        let start = today.pred_opt().ok_or_else(|| ScheduleError::InvalidDate {
            value: today.to_string(),
        })?;
        let slots = ranked.len().div_ceil(self.capacity);
        let dates = self.calendar.generate(start, exclusions, slots)?;

        let entries: Vec<ScheduledEntry> = ranked
            .into_iter()
            .enumerate()
            .map(|(position, item)| ScheduledEntry {
                sample: item.record.clone(),
                priority_rank: position + 1,
                tier: item.classification.tier,
                reason_for_priority: item.classification.reason,
                meeting_date: dates[position / self.capacity],
            })
            .collect();

        let schedule = Schedule::new(today, entries);
        log::info!(
            "scheduler: run {} placed {} samples on {} meetings ({} .. {})",
            schedule.run_id,
            schedule.len(),
            slots,
            dates[0],
            dates[slots - 1]
        );
        Ok(schedule)
    }

    /// Count records and scheduled entries per tier.
    pub fn summarize(records: &[SampleRecord], schedule: &Schedule) -> ScheduleSummary {
        let mut by_tier = BTreeMap::new();
        for entry in &schedule.entries {
            *by_tier.entry(entry.tier).or_insert(0) += 1;
        }
        ScheduleSummary {
            total_records: records.len(),
            eligible: schedule.len(),
            by_tier,
        }
    }
}
