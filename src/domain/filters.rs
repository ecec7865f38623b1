// Reporting window and scope filters
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days`-long window ending on `today`.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub date_range: DateRange,
    #[serde(default)]
    pub clubs: BTreeSet<String>,
    #[serde(default)]
    pub courts: BTreeSet<String>,
}

impl Filters {
    /// Unscoped filters over the trailing window ending on `today`.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        Self {
            date_range: DateRange::trailing(today, days),
            clubs: BTreeSet::new(),
            courts: BTreeSet::new(),
        }
    }

    /// Shallow merge: keys missing from the patch keep their current value.
    pub fn merge(&mut self, patch: FiltersPatch) {
        if let Some(date_range) = patch.date_range {
            self.date_range = date_range;
        }
        if let Some(clubs) = patch.clubs {
            self.clubs = clubs;
        }
        if let Some(courts) = patch.courts {
            self.courts = courts;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersPatch {
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub clubs: Option<BTreeSet<String>>,
    #[serde(default)]
    pub courts: Option<BTreeSet<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_trailing_window() {
        let range = DateRange::trailing(date(2024, 3, 15), 30);
        assert_eq!(range.start, date(2024, 2, 14));
        assert_eq!(range.end, date(2024, 3, 15));
    }

    #[test]
    fn test_iso_wire_format() {
        let filters = Filters::trailing(date(2024, 3, 15), 30);
        let value = serde_json::to_value(&filters).unwrap();
        assert_eq!(
            value,
            json!({
                "dateRange": {"start": "2024-02-14", "end": "2024-03-15"},
                "clubs": [],
                "courts": []
            })
        );
    }

    #[test]
    fn test_patch_replaces_only_present_keys() {
        let mut filters = Filters::trailing(date(2024, 3, 15), 30);
        let patch: FiltersPatch = serde_json::from_value(json!({"clubs": ["A"]})).unwrap();
        filters.merge(patch);

        assert!(filters.clubs.contains("A"));
        assert!(filters.courts.is_empty());
        assert_eq!(filters.date_range.end, date(2024, 3, 15));
    }
}
