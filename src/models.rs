/// Data models for the sample scheduling system.
///
/// This module defines the core data structures used throughout the system:
/// - IdentifierClass: Sample identifier family (UIC, UDD, Base, other tags)
/// - SampleRecord: One sample as delivered by the ingestion sources
/// - PriorityTier / Classification: Result of classifying a sample
/// - HotList: Identifiers with unconditional top priority
/// - ExclusionSet: Dates on which no meeting may be held
/// - ScheduledEntry / Schedule: Output of a scheduling run
use crate::error::{Result, ScheduleError};
use crate::holidays::HolidaySource;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::OnceLock;
use uuid::Uuid;

/// Identifier family of a sample.
///
/// The three known families drive the tier rules; any other tag is kept
/// verbatim and classified into the catch-all tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentifierClass {
    Uic,
    Udd,
    Base,
    Other(String),
}

impl IdentifierClass {
    /// Convert a string to an IdentifierClass value.
    pub fn from_string(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ScheduleError::InvalidSample(
                "Identifier class cannot be empty".to_string(),
            ));
        }

        Ok(match trimmed.to_lowercase().as_str() {
            "uic" => IdentifierClass::Uic,
            "udd" => IdentifierClass::Udd,
            "base" => IdentifierClass::Base,
            _ => IdentifierClass::Other(trimmed.to_string()),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            IdentifierClass::Uic => "UIC",
            IdentifierClass::Udd => "UDD",
            IdentifierClass::Base => "Base",
            IdentifierClass::Other(tag) => tag,
        }
    }
}

impl fmt::Display for IdentifierClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Represents one sequencing sample as delivered by the ingestion sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRecord {
    pub sample_id: String,
    pub is_proband: bool,
    pub date_received: NaiveDate,
    pub identifier_class: IdentifierClass,
    pub is_reported: bool,
    pub is_analyzed: bool,
}

impl SampleRecord {
    /// Create a new sample record with validation.
    pub fn new(
        sample_id: impl Into<String>,
        is_proband: bool,
        date_received: NaiveDate,
        identifier_class: IdentifierClass,
        is_reported: bool,
        is_analyzed: bool,
    ) -> Result<Self> {
        let sample_id = sample_id.into().trim().to_string();
        if sample_id.is_empty() {
            return Err(ScheduleError::InvalidSample(
                "Sample ID cannot be empty".to_string(),
            ));
        }

        Ok(SampleRecord {
            sample_id,
            is_proband,
            date_received,
            identifier_class,
            is_reported,
            is_analyzed,
        })
    }

    /// A proband that has not been reported yet.
    pub fn is_eligible(&self) -> bool {
        self.is_proband && !self.is_reported
    }

    pub fn received_year(&self) -> i32 {
        self.date_received.year()
    }

    /// The last run of digits embedded in the sample identifier.
    ///
    /// Returns `None` when the identifier has no digits or the run does not
    /// fit in a `u64`.
    pub fn numeric_suffix(&self) -> Option<u64> {
        static DIGITS: OnceLock<Regex> = OnceLock::new();
        let re = DIGITS.get_or_init(|| Regex::new(r"(\d+)\D*$").expect("valid digit pattern"));

        re.captures(&self.sample_id)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
    }
}

/// Integer priority class. Lower values are scheduled sooner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriorityTier(pub u32);

impl PriorityTier {
    pub const HOT_LIST: PriorityTier = PriorityTier(0);
    pub const UIC: PriorityTier = PriorityTier(1);
    pub const UDD_BASE: u32 = 2;
    pub const BASE_BASE: u32 = 102;
    pub const UNMATCHED: PriorityTier = PriorityTier(999);

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tier and human-readable label assigned to one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub tier: PriorityTier,
    pub reason: String,
}

/// Sample identifiers granted unconditional top priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotList {
    ids: HashSet<String>,
}

impl HotList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, sample_id: &str) -> bool {
        self.ids.contains(sample_id.trim())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for HotList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let ids = iter
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        HotList { ids }
    }
}

/// Dates on which no meeting may be held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    dates: BTreeSet<NaiveDate>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of the cancelled dates with the holidays of `year` and `year + 1`.
    pub fn build(
        cancellations: impl IntoIterator<Item = NaiveDate>,
        holidays: &dyn HolidaySource,
        year: i32,
    ) -> Self {
        let mut set: ExclusionSet = cancellations.into_iter().collect();
        let cancelled = set.len();
        for y in [year, year + 1] {
            set.dates.extend(holidays.holidays(y));
        }
        log::debug!(
            "exclusions: {} cancelled dates, {} total after holidays for {}-{}",
            cancelled,
            set.len(),
            year,
            year + 1
        );
        set
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.dates.contains(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl FromIterator<NaiveDate> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        ExclusionSet {
            dates: iter.into_iter().collect(),
        }
    }
}

/// A sample placed on the meeting calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEntry {
    pub sample: SampleRecord,
    pub priority_rank: usize,
    pub tier: PriorityTier,
    pub reason_for_priority: String,
    pub meeting_date: NaiveDate,
}

/// Result of one scheduling run.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub run_id: String,
    pub generated_on: NaiveDate,
    pub entries: Vec<ScheduledEntry>,
}

impl Schedule {
    pub fn new(generated_on: NaiveDate, entries: Vec<ScheduledEntry>) -> Self {
        Schedule {
            run_id: Uuid::new_v4().to_string(),
            generated_on,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First meeting date of the schedule, if any sample was placed.
    pub fn first_meeting(&self) -> Option<NaiveDate> {
        self.entries.first().map(|e| e.meeting_date)
    }

    /// Last meeting date of the schedule, if any sample was placed.
    pub fn last_meeting(&self) -> Option<NaiveDate> {
        self.entries.last().map(|e| e.meeting_date)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Schedule({}, generated={}, entries={})",
            self.run_id.get(..8).unwrap_or(&self.run_id),
            self.generated_on,
            self.entries.len()
        )
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ScheduleError::InvalidDate {
        value: value.to_string(),
    })
}
