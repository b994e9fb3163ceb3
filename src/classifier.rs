/// Priority classification of sequencing samples.
///
/// Tiers, first match wins:
/// - hot-listed sample: 0
/// - UIC sample: 1
/// - UDD sample received within the recent-year window: 2, 3, ... (newest first)
/// - Base sample received within the window: 102, 103, ...
/// - anything else: 999
use crate::error::{Result, ScheduleError};
use crate::models::{Classification, HotList, IdentifierClass, PriorityTier, SampleRecord};

pub const DEFAULT_WINDOW_YEARS: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityClassifier {
    pub reference_year: i32,
    pub window_years: u32,
}

impl PriorityClassifier {
    /// Create a classifier tracking `window_years` years back from `reference_year`.
    pub fn new(reference_year: i32, window_years: u32) -> Result<Self> {
        // Keep the UDD tiers clear of the Base offset.
        let max_window = PriorityTier::BASE_BASE - PriorityTier::UDD_BASE;
        if window_years == 0 || window_years > max_window {
            return Err(ScheduleError::Config(format!(
                "Year window must be between 1 and {}, got {}",
                max_window, window_years
            )));
        }

        Ok(PriorityClassifier {
            reference_year,
            window_years,
        })
    }

    /// Position of `year` in the recent-year window, newest = 0.
    fn window_offset(&self, year: i32) -> Option<u32> {
        let delta = self.reference_year.checked_sub(year)?;
        if delta >= 0 && (delta as u32) < self.window_years {
            Some(delta as u32)
        } else {
            None
        }
    }

    /// Assign a tier and reason label to a sample.
    pub fn classify(&self, record: &SampleRecord, hot_list: &HotList) -> Classification {
        if hot_list.contains(&record.sample_id) {
            return Classification {
                tier: PriorityTier::HOT_LIST,
                reason: "CRITICAL: Hot List".to_string(),
            };
        }

        let year = record.received_year();
        let windowed = match &record.identifier_class {
            IdentifierClass::Uic => {
                return Classification {
                    tier: PriorityTier::UIC,
                    reason: "Highest Priority: UIC".to_string(),
                };
            }
            IdentifierClass::Udd => self
                .window_offset(year)
                .map(|offset| PriorityTier(PriorityTier::UDD_BASE + offset)),
            IdentifierClass::Base => self
                .window_offset(year)
                .map(|offset| PriorityTier(PriorityTier::BASE_BASE + offset)),
            IdentifierClass::Other(_) => None,
        };

        let reason = format!("{} {}", record.identifier_class.name(), year);
        match windowed {
            Some(tier) => Classification { tier, reason },
            None => {
                log::info!(
                    "classifier: {} ({}) matched no tier rule, using catch-all",
                    record.sample_id,
                    reason
                );
                Classification {
                    tier: PriorityTier::UNMATCHED,
                    reason,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(id: &str, class: IdentifierClass, year: i32) -> SampleRecord {
        let received = NaiveDate::from_ymd_opt(year, 6, 1).unwrap();
        SampleRecord::new(id, true, received, class, false, false).unwrap()
    }

    fn classifier() -> PriorityClassifier {
        PriorityClassifier::new(2025, DEFAULT_WINDOW_YEARS).unwrap()
    }

    #[test]
    fn test_hot_list_wins_over_everything() {
        let hot: HotList = ["B-1", "X-1", "U-1"].into_iter().collect();
        let c = classifier();
        for s in [
            sample("B-1", IdentifierClass::Base, 1999),
            sample("X-1", IdentifierClass::Other("Misc".into()), 2025),
            sample("U-1", IdentifierClass::Uic, 2023),
        ] {
            let result = c.classify(&s, &hot);
            assert_eq!(result.tier, PriorityTier::HOT_LIST);
            assert_eq!(result.reason, "CRITICAL: Hot List");
        }
    }

    #[test]
    fn test_uic_any_year() {
        let c = classifier();
        let hot = HotList::new();
        for year in [2023, 1990, 2030] {
            let result = c.classify(&sample("UIC-9", IdentifierClass::Uic, year), &hot);
            assert_eq!(result.tier, PriorityTier::UIC);
            assert_eq!(result.reason, "Highest Priority: UIC");
        }
    }

    #[test]
    fn test_udd_window() {
        let c = classifier();
        let hot = HotList::new();
        let tiers: Vec<u32> = (2021..=2026)
            .map(|y| c.classify(&sample("UDD-1", IdentifierClass::Udd, y), &hot).tier.value())
            .collect();
        assert_eq!(tiers, vec![999, 5, 4, 3, 2, 999]);

        let recent = c.classify(&sample("UDD-1", IdentifierClass::Udd, 2025), &hot);
        assert_eq!(recent.reason, "UDD 2025");
    }

    #[test]
    fn test_base_window_mirrors_udd() {
        let c = classifier();
        let hot = HotList::new();
        let result = c.classify(&sample("BASE-3", IdentifierClass::Base, 2023), &hot);
        assert_eq!(result.tier, PriorityTier(104));
        assert_eq!(result.reason, "Base 2023");
        let old = c.classify(&sample("BASE-3", IdentifierClass::Base, 2019), &hot);
        assert_eq!(old.tier, PriorityTier::UNMATCHED);
    }

    #[test]
    fn test_unknown_class_falls_back() {
        let c = classifier();
        let result = c.classify(&sample("R-5", IdentifierClass::Other("Research".into()), 2025), &HotList::new());
        assert_eq!(result.tier, PriorityTier::UNMATCHED);
        assert_eq!(result.reason, "Research 2025");
    }

    #[test]
    fn test_classification_is_pure() {
        let c = classifier();
        let hot: HotList = ["UDD-7"].into_iter().collect();
        let s = sample("UDD-8", IdentifierClass::Udd, 2024);
        let first = c.classify(&s, &hot);
        c.classify(&sample("UDD-7", IdentifierClass::Udd, 2024), &hot);
        assert_eq!(c.classify(&s, &hot), first);
    }

    #[test]
    fn test_window_is_configurable() {
        let c = PriorityClassifier::new(2025, 2).unwrap();
        let hot = HotList::new();
        assert_eq!(c.classify(&sample("U", IdentifierClass::Udd, 2024), &hot).tier, PriorityTier(3));
        assert_eq!(c.classify(&sample("U", IdentifierClass::Udd, 2023), &hot).tier, PriorityTier::UNMATCHED);
        assert!(PriorityClassifier::new(2025, 0).is_err());
        assert!(PriorityClassifier::new(2025, 101).is_err());
    }
}
