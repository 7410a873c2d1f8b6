use crate::dates::{DateRange, format_short};
use chrono::NaiveDate;

/// Column headers for a date range and the column that is "today".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewProjection {
    pub labels: Vec<String>,
    pub today_index: Option<usize>,
}

impl ViewProjection {
    /// `today` is passed in rather than read from the clock so callers (and
    /// tests) decide which zone "today" is in.
    pub fn new(range: DateRange, today: NaiveDate) -> Self {
        Self {
            labels: range.days().map(format_short).collect(),
            today_index: range.offset_of(today),
        }
    }

    pub fn is_today(&self, column: usize) -> bool {
        self.today_index == Some(column)
    }
}
