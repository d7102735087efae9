use chrono::{Duration, NaiveDate};

/// Inclusive `[start, end]` range of calendar days that bounds the
/// window-scoped record fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
}

impl DateWindow {
    /// The last `days` days ending on `today`. Windows shorter than a day
    /// are widened to one.
    pub fn last_days(days: i64, today: NaiveDate) -> Self {
        let days = days.max(1);
        Self {
            start: today - Duration::days(days),
            end: today,
            days,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn label(&self) -> String {
        format!("Last {} days", self.days)
    }
}
