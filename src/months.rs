use chrono::{Datelike, Duration, NaiveDate};

/// One calendar month as an inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

impl MonthWindow {
    /// The calendar month containing `date`.
    pub fn containing(date: NaiveDate) -> MonthWindow {
        let first_day = first_of_month(date.year(), date.month());
        let last_day = next_month(first_day) - Duration::days(1);
        MonthWindow {
            first_day,
            last_day,
        }
    }

    /// The month immediately before this one.
    pub fn prev(&self) -> MonthWindow {
        MonthWindow::containing(self.first_day - Duration::days(1))
    }

    /// "%Y-%m" of the window start, the label used on chart axes.
    pub fn label(&self) -> String {
        self.first_day.format("%Y-%m").to_string()
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // Day 1 exists in every month.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

fn next_month(first_day: NaiveDate) -> NaiveDate {
    let (year, month) = if first_day.month() == 12 {
        (first_day.year() + 1, 1)
    } else {
        (first_day.year(), first_day.month() + 1)
    };
    first_of_month(year, month)
}

/// The `n` calendar months ending with the month containing `today`,
/// oldest first.
pub fn trailing_months(today: NaiveDate, n: usize) -> Vec<MonthWindow> {
    let mut windows = Vec::with_capacity(n);
    let mut window = MonthWindow::containing(today);
    for _ in 0..n {
        windows.push(window);
        window = window.prev();
    }
    windows.reverse();
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_spans_whole_month() {
        let window = MonthWindow::containing(date(2025, 4, 17));
        assert_eq!(window.first_day, date(2025, 4, 1));
        assert_eq!(window.last_day, date(2025, 4, 30));
        assert_eq!(window.label(), "2025-04");
    }

    #[test]
    fn leap_february_window() {
        let window = MonthWindow::containing(date(2024, 2, 2));
        assert_eq!(window.last_day, date(2024, 2, 29));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let window = MonthWindow::containing(date(2025, 12, 31));
        assert_eq!(window.first_day, date(2025, 12, 1));
        assert_eq!(window.last_day, date(2025, 12, 31));
        assert_eq!(window.prev().label(), "2025-11");
    }

    #[test]
    fn six_trailing_windows_oldest_first() {
        let windows = trailing_months(date(2025, 8, 8), 6);
        assert_eq!(windows.len(), 6);
        let labels: Vec<String> = windows.iter().map(|w| w.label()).collect();
        assert_eq!(
            labels,
            vec!["2025-03", "2025-04", "2025-05", "2025-06", "2025-07", "2025-08"]
        );
    }

    #[test]
    fn windows_cross_year_boundary() {
        let labels: Vec<String> = trailing_months(date(2025, 2, 1), 6)
            .iter()
            .map(|w| w.label())
            .collect();
        assert_eq!(
            labels,
            vec!["2024-09", "2024-10", "2024-11", "2024-12", "2025-01", "2025-02"]
        );
    }

    #[test]
    fn windows_are_contiguous_and_ordered() {
        let windows = trailing_months(date(2024, 3, 15), 6);
        for window in &windows {
            assert!(window.first_day <= window.last_day);
        }
        for pair in windows.windows(2) {
            assert_eq!(pair[1].first_day, pair[0].last_day + Duration::days(1));
        }
    }

    #[test]
    fn six_windows_cover_about_180_days() {
        let windows = trailing_months(date(2025, 8, 8), 6);
        let span = (windows[5].last_day - windows[0].first_day).num_days() + 1;
        assert!((170..=190).contains(&span), "span was {} days", span);
    }
}
