// Filter manager - Current reporting window and scope
use crate::domain::filters::{Filters, FiltersPatch};

#[derive(Debug, Clone)]
pub struct FilterManager {
    current: Filters,
    defaults: Filters,
}

impl FilterManager {
    /// `defaults` is what `reset` returns to; it is computed once at startup.
    pub fn new(defaults: Filters) -> Self {
        Self {
            current: defaults.clone(),
            defaults,
        }
    }

    pub fn with_current(defaults: Filters, current: Filters) -> Self {
        Self { current, defaults }
    }

    pub fn current(&self) -> &Filters {
        &self.current
    }

    pub fn set_filters(&mut self, patch: FiltersPatch) -> bool {
        let before = self.current.clone();
        self.current.merge(patch);
        self.current != before
    }

    pub fn reset_filters(&mut self) -> bool {
        let changed = self.current != self.defaults;
        self.current = self.defaults.clone();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::DateRange;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn defaults() -> Filters {
        Filters::trailing(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(), 30)
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_patches_accumulate() {
        let mut manager = FilterManager::new(defaults());
        assert!(manager.set_filters(FiltersPatch {
            clubs: Some(set(&["A"])),
            ..FiltersPatch::default()
        }));
        assert!(manager.set_filters(FiltersPatch {
            courts: Some(set(&["1"])),
            ..FiltersPatch::default()
        }));

        assert_eq!(manager.current().clubs, set(&["A"]));
        assert_eq!(manager.current().courts, set(&["1"]));
        assert_eq!(manager.current().date_range, defaults().date_range);
    }

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut manager = FilterManager::new(defaults());
        assert!(!manager.set_filters(FiltersPatch::default()));
    }

    #[test]
    fn test_reset_restores_startup_defaults() {
        let mut manager = FilterManager::new(defaults());
        let custom_range = DateRange::new(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
        );
        manager.set_filters(FiltersPatch {
            date_range: Some(custom_range),
            clubs: Some(set(&["north"])),
            courts: None,
        });

        assert!(manager.reset_filters());
        assert_eq!(manager.current(), &defaults());
        assert!(!manager.reset_filters());
    }
}
