//! Sunday-anchored week arithmetic.
use chrono::{Datelike, Duration, NaiveDate};

/// Number of days shown by the editor.
pub const DAYS_IN_WEEK: u8 = 7;

/// The 7-day span, anchored at Sunday, currently displayed or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekWindow {
    week_start: NaiveDate,
}

impl WeekWindow {
    /// Window for the week containing `date`: its start is the Sunday at or before it.
    pub fn containing(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_sunday();
        Self {
            week_start: date - Duration::days(offset as i64),
        }
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    /// `week_start` as `YYYY-MM-DD`, the form stored in `effectiveDate`.
    pub fn iso_start(&self) -> String {
        self.week_start.format("%Y-%m-%d").to_string()
    }

    pub fn week_dates(&self) -> [NaiveDate; DAYS_IN_WEEK as usize] {
        std::array::from_fn(|i| self.week_start + Duration::days(i as i64))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::containing(date) == *self
    }

    pub fn next(&self) -> Self {
        Self {
            week_start: self.week_start + Duration::weeks(1),
        }
    }

    pub fn previous(&self) -> Self {
        Self {
            week_start: self.week_start - Duration::weeks(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sunday_is_its_own_week_start() {
        let window = WeekWindow::containing(date(2024, 3, 10));
        assert_eq!(window.week_start(), date(2024, 3, 10));
    }

    #[test]
    fn saturday_rolls_back_six_days() {
        let window = WeekWindow::containing(date(2024, 3, 16));
        assert_eq!(window.week_start(), date(2024, 3, 10));
        assert_eq!(window.iso_start(), "2024-03-10");
    }

    #[test]
    fn week_start_crosses_year_boundary() {
        // 2025-01-01 is a Wednesday
        let window = WeekWindow::containing(date(2025, 1, 1));
        assert_eq!(window.week_start(), date(2024, 12, 29));
        assert_eq!(window.week_dates()[6], date(2025, 1, 4));
        assert!(window.contains(date(2024, 12, 31)));
        assert!(!window.contains(date(2025, 1, 5)));
    }

    #[test]
    fn next_and_previous_are_inverse() {
        let window = WeekWindow::containing(date(2024, 2, 28));
        assert_eq!(window.next().week_start(), date(2024, 3, 3));
        assert_eq!(window.next().previous(), window);
        assert_eq!(window.week_dates()[4], date(2024, 2, 29));
    }
}
