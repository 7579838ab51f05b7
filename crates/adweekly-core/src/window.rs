use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::CoreError;

/// Number of calendar days in a reporting window, both ends inclusive.
pub const WINDOW_DAYS: u64 = 7;

/// Closed seven-day interval `[start, end]` a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ReportWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportWindow {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWindow`] unless `end` is exactly six days
    /// after `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        let expected_end = start.checked_add_days(Days::new(WINDOW_DAYS - 1));
        if expected_end != Some(end) {
            return Err(CoreError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Window whose last day is `end`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWindow`] if the start date underflows the
    /// calendar.
    pub fn ending_on(end: NaiveDate) -> Result<Self, CoreError> {
        let start = end
            .checked_sub_days(Days::new(WINDOW_DAYS - 1))
            .ok_or(CoreError::InvalidWindow { start: end, end })?;
        Ok(Self { start, end })
    }

    /// The most recent window that ended before `today`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWindow`] on calendar underflow.
    pub fn last_full_week(today: NaiveDate) -> Result<Self, CoreError> {
        let end = today
            .pred_opt()
            .ok_or(CoreError::InvalidWindow { start: today, end: today })?;
        Self::ending_on(end)
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_accepts_seven_day_span() {
        let window = ReportWindow::new(date(2025, 3, 3), date(2025, 3, 9)).unwrap();
        assert_eq!(window.start(), date(2025, 3, 3));
        assert_eq!(window.end(), date(2025, 3, 9));
    }

    #[test]
    fn new_rejects_eight_day_span() {
        let result = ReportWindow::new(date(2025, 3, 2), date(2025, 3, 9));
        assert!(matches!(result, Err(CoreError::InvalidWindow { .. })));
    }

    #[test]
    fn new_rejects_reversed_dates() {
        let result = ReportWindow::new(date(2025, 3, 9), date(2025, 3, 3));
        assert!(matches!(result, Err(CoreError::InvalidWindow { .. })));
    }

    #[test]
    fn ending_on_crosses_month_boundary() {
        let window = ReportWindow::ending_on(date(2025, 3, 2)).unwrap();
        assert_eq!(window.start(), date(2025, 2, 24));
    }

    #[test]
    fn last_full_week_ends_yesterday() {
        let window = ReportWindow::last_full_week(date(2025, 3, 10)).unwrap();
        assert_eq!(window.start(), date(2025, 3, 3));
        assert_eq!(window.end(), date(2025, 3, 9));
    }

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let window = ReportWindow::new(date(2025, 3, 3), date(2025, 3, 9)).unwrap();
        assert!(window.contains(date(2025, 3, 3)));
        assert!(window.contains(date(2025, 3, 9)));
        assert!(!window.contains(date(2025, 3, 10)));
        assert!(!window.contains(date(2025, 3, 2)));
    }
}
