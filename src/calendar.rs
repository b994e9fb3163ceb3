/// Meeting calendar for the sample scheduling system.
///
/// This module provides the MeetingCalendar which produces candidate
/// meeting dates on a fixed two-weekday cadence and filters them against
/// an exclusion set.
use crate::error::{Result, ScheduleError};
use crate::models::ExclusionSet;
use chrono::{Datelike, NaiveDate, Weekday};

/// Default number of extra candidates examined beyond the requested count.
pub const DEFAULT_CANDIDATE_BUFFER: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingCalendar {
    pub first_day: Weekday,
    pub second_day: Weekday,
    pub candidate_buffer: usize,
}

impl Default for MeetingCalendar {
    fn default() -> Self {
        MeetingCalendar {
            first_day: Weekday::Tue,
            second_day: Weekday::Fri,
            candidate_buffer: DEFAULT_CANDIDATE_BUFFER,
        }
    }
}

impl MeetingCalendar {
    /// Initialize a calendar meeting on two distinct weekdays.
    pub fn new(first_day: Weekday, second_day: Weekday, candidate_buffer: usize) -> Result<Self> {
        if first_day == second_day {
            return Err(ScheduleError::Config(format!(
                "Meeting weekdays must differ (both are {})",
                first_day
            )));
        }

        Ok(MeetingCalendar {
            first_day,
            second_day,
            candidate_buffer,
        })
    }

    /// Days from one meeting weekday to the other.
    fn gap(from: Weekday, to: Weekday) -> u64 {
        let diff = (7 + to.num_days_from_monday() - from.num_days_from_monday()) % 7;
        diff as u64
    }

    /// Whether a date falls on one of the meeting weekdays.
    pub fn is_meeting_day(&self, date: NaiveDate) -> bool {
        let wd = date.weekday();
        wd == self.first_day || wd == self.second_day
    }

    /// First meeting-weekday date strictly after `start`.
    pub fn first_after(&self, start: NaiveDate) -> Option<NaiveDate> {
        let to_first = match Self::gap(start.weekday(), self.first_day) {
            0 => 7,
            n => n,
        };
        let to_second = match Self::gap(start.weekday(), self.second_day) {
            0 => 7,
            n => n,
        };
        start.checked_add_days(chrono::Days::new(to_first.min(to_second)))
    }

    /// Unfiltered candidate dates strictly after `start`, in cadence order.
    pub fn candidates(&self, start: NaiveDate) -> MeetingDates {
        MeetingDates {
            next: self.first_after(start),
            forward: Self::gap(self.first_day, self.second_day),
            back: Self::gap(self.second_day, self.first_day),
            first_day: self.first_day,
        }
    }

    /// Generate `count` meeting dates strictly after `start`, skipping exclusions.
    ///
    /// Examines `count + candidate_buffer` candidates and fails with
    /// `CalendarExhausted` rather than returning a short list.
    pub fn generate(
        &self,
        start: NaiveDate,
        exclusions: &ExclusionSet,
        count: usize,
    ) -> Result<Vec<NaiveDate>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let budget = count.saturating_add(self.candidate_buffer);
        let mut dates = Vec::with_capacity(count);
        let mut skipped = 0usize;
        let mut last_candidate = None;

        for candidate in self.candidates(start).take(budget) {
            last_candidate = Some(candidate);
            if exclusions.contains(&candidate) {
                skipped += 1;
                log::debug!("calendar: skipping excluded date {}", candidate);
                continue;
            }
            dates.push(candidate);
            if dates.len() == count {
                break;
            }
        }

        if dates.len() < count {
            log::debug!(
                "calendar: only {} of {} dates available after {} exclusions",
                dates.len(),
                count,
                skipped
            );
            return Err(ScheduleError::CalendarExhausted {
                requested: count,
                available: dates.len(),
                last_candidate,
            });
        }

        log::debug!(
            "calendar: generated {} dates from {} to {} ({} skipped)",
            dates.len(),
            dates[0],
            dates[dates.len() - 1],
            skipped
        );
        Ok(dates)
    }
}

impl std::fmt::Display for MeetingCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MeetingCalendar({}/{}, buffer={})",
            self.first_day, self.second_day, self.candidate_buffer
        )
    }
}

/// Lazy, unbounded sequence of candidate meeting dates.
#[derive(Debug, Clone)]
pub struct MeetingDates {
    next: Option<NaiveDate>,
    forward: u64,
    back: u64,
    first_day: Weekday,
}

impl Iterator for MeetingDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        let step = if current.weekday() == self.first_day {
            self.forward
        } else {
            self.back
        };
        self.next = current.checked_add_days(chrono::Days::new(step));
        Some(current)
    }
}
