//! Daily rotating tip.
//!
//! The tip for a date is `tips[day_of_month % tips.len()]`, so the same date
//! and tip list always give the same tip.

use chrono::{Datelike, NaiveDate};

/// Picks today's entry from an injected, ordered tip list.
#[derive(Debug, Clone, Default)]
pub struct DailyTipSelector {
    tips: Vec<String>,
}

impl DailyTipSelector {
    pub fn new(tips: Vec<String>) -> Self {
        Self { tips }
    }

    /// Tip for `date`, or `None` when the list is empty.
    pub fn tip_for(&self, date: NaiveDate) -> Option<&str> {
        tip_index(date, self.tips.len()).map(|i| self.tips[i].as_str())
    }
}

/// Index into a tip list of length `len` for `date`.
pub fn tip_index(date: NaiveDate, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(date.day() as usize % len)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fifteen() -> DailyTipSelector {
        DailyTipSelector::new((0..15).map(|i| format!("tip {i}")).collect())
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    #[test]
    fn day_sixteen_wraps_to_day_one() {
        let selector = fifteen();
        assert_eq!(selector.tip_for(date(16)), selector.tip_for(date(1)));
        assert_eq!(selector.tip_for(date(1)), Some("tip 1"));
    }

    #[test]
    fn day_fifteen_selects_first_tip() {
        assert_eq!(fifteen().tip_for(date(15)), Some("tip 0"));
    }

    #[test]
    fn same_date_same_tip_across_months() {
        let selector = fifteen();
        let other_month = NaiveDate::from_ymd_opt(2027, 2, 18).unwrap();
        assert_eq!(selector.tip_for(date(18)), selector.tip_for(other_month));
    }

    #[test]
    fn empty_list_has_no_tip() {
        assert_eq!(DailyTipSelector::default().tip_for(date(3)), None);
        assert_eq!(tip_index(date(3), 0), None);
    }
}
