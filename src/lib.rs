//! Meeting scheduler for genomic sequencing samples.
//!
//! Samples awaiting analysis are classified into priority tiers, ordered
//! deterministically and placed one per meeting on a fixed two-weekday
//! cadence that skips public holidays and cancelled dates.
//!
//! # Modules
//!
//! - **`models`**: `SampleRecord`, `HotList`, `ExclusionSet`, `ScheduledEntry`, `Schedule`
//! - **`classifier`**: tier assignment for a single sample
//! - **`calendar`**: candidate meeting dates and exclusion filtering
//! - **`holidays`**: holiday calendars feeding the exclusion set
//! - **`scheduler`**: ordering, ranking and date assignment
//! - **`io`**: CSV input providers and the schedule writer
//! - **`config`** / **`pipeline`**: one configured batch run

pub mod calendar;
pub mod classifier;
pub mod config;
pub mod error;
pub mod holidays;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod scheduler;

pub use calendar::MeetingCalendar;
pub use classifier::PriorityClassifier;
pub use config::Config;
pub use error::{Result, ScheduleError};
pub use models::{
    Classification, ExclusionSet, HotList, IdentifierClass, PriorityTier, SampleRecord, Schedule,
    ScheduledEntry,
};
pub use scheduler::SampleScheduler;
