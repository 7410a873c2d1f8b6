//! Calendar-date parsing and the fixed weekly season calendar.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use std::fmt;
use std::sync::LazyLock;

/// Regular-season weeks as `start;end` pairs. Week 1 is the opening series,
/// every later week runs Monday through Sunday.
const SEASON_WEEKS: [&str; 27] = [
    "2023-03-30;2023-04-02",
    "2023-04-03;2023-04-09",
    "2023-04-10;2023-04-16",
    "2023-04-17;2023-04-23",
    "2023-04-24;2023-04-30",
    "2023-05-01;2023-05-07",
    "2023-05-08;2023-05-14",
    "2023-05-15;2023-05-21",
    "2023-05-22;2023-05-28",
    "2023-05-29;2023-06-04",
    "2023-06-05;2023-06-11",
    "2023-06-12;2023-06-18",
    "2023-06-19;2023-06-25",
    "2023-06-26;2023-07-02",
    "2023-07-03;2023-07-09",
    "2023-07-10;2023-07-16",
    "2023-07-17;2023-07-23",
    "2023-07-24;2023-07-30",
    "2023-07-31;2023-08-06",
    "2023-08-07;2023-08-13",
    "2023-08-14;2023-08-20",
    "2023-08-21;2023-08-27",
    "2023-08-28;2023-09-03",
    "2023-09-04;2023-09-10",
    "2023-09-11;2023-09-17",
    "2023-09-18;2023-09-24",
    "2023-09-25;2023-10-01",
];

static WEEKS: LazyLock<Vec<Week>> = LazyLock::new(|| {
    SEASON_WEEKS
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let range = DateRange::parse(entry).expect("season week table holds valid ranges");
            Week { number: i as u16 + 1, range }
        })
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub input: String,
    pub reason: &'static str,
}

impl ParseError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self { input: input.to_owned(), reason }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid date {:?}: {}", self.input, self.reason)
    }
}

impl std::error::Error for ParseError {}

/// Parse a strict `YYYY-MM-DD` string.
pub fn parse_calendar_date(s: &str) -> Result<NaiveDate, ParseError> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 {
        return Err(ParseError::new(s, "expected YYYY-MM-DD"));
    }
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(ParseError::new(s, "expected YYYY-MM-DD"));
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return Err(ParseError::new(s, "non-digit in date component"));
    }

    // All ASCII digits at this point, so these parses cannot fail.
    let year: i32 = s[0..4].parse().map_err(|_| ParseError::new(s, "bad year"))?;
    let month: u32 = s[5..7].parse().map_err(|_| ParseError::new(s, "bad month"))?;
    let day: u32 = s[8..10].parse().map_err(|_| ParseError::new(s, "bad day"))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ParseError::new(s, "component out of range"))
}

/// Anything that sits on a calendar day.
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

/// Zoned timestamps land on the day of their own zone.
impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

pub fn same_calendar_day<A: CalendarDay, B: CalendarDay>(a: &A, b: &B) -> bool {
    a.calendar_day() == b.calendar_day()
}

/// `MM-DD`, used for column headers.
pub fn format_short(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

/// `Mon DD`, used for week labels.
pub fn format_long(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ParseError> {
        if start > end {
            return Err(ParseError {
                input: format!("{start};{end}"),
                reason: "range starts after it ends",
            });
        }
        Ok(Self { start, end })
    }

    /// Parse the `start;end` form.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let (start, end) = s
            .split_once(';')
            .ok_or_else(|| ParseError::new(s, "expected start;end"))?;
        Self::new(parse_calendar_date(start.trim())?, parse_calendar_date(end.trim())?)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        self.start.iter_days().take(self.len())
    }

    /// Number of days in the range, both ends included.
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// A range always holds at least its start day.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Offset of `date` from the start, if it falls inside the range.
    pub fn offset_of(&self, date: NaiveDate) -> Option<usize> {
        self.contains(date)
            .then(|| (date - self.start).num_days() as usize)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    pub number: u16,
    pub range: DateRange,
}

impl Week {
    /// "Week 3 (Apr 10 - Apr 16)"
    pub fn label(&self) -> String {
        format!(
            "Week {} ({} - {})",
            self.number,
            format_long(self.range.start),
            format_long(self.range.end)
        )
    }
}

pub fn enumerate_weeks() -> &'static [Week] {
    WEEKS.as_slice()
}

/// The week to open on: the first one that has not finished yet, falling
/// back to the first week once the season is over.
pub fn current_week_index(today: NaiveDate) -> usize {
    enumerate_weeks()
        .iter()
        .position(|w| today <= w.range.end)
        .unwrap_or(0)
}
