pub mod client;
pub mod dates;
pub mod normalize;
pub mod teams;
pub mod view;
pub mod wire;

use chrono::{DateTime, NaiveDate, Utc};

pub use dates::{DateRange, ParseError, Week};
pub use normalize::{Normalized, ScheduleWarning, TeamSchedule, UnknownTeamError};
pub use teams::Roster;
pub use view::ViewProjection;

// ---------------------------------------------------------------------------
// Domain types, independent of the backend wire format
// ---------------------------------------------------------------------------

/// One calendar day of the schedule as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub games: Vec<GameRecord>,
}

impl DaySchedule {
    pub fn empty(date: NaiveDate) -> Self {
        Self { date, games: Vec::new() }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameRecord {
    /// The date the game counts for, even when it starts after midnight.
    pub date: NaiveDate,
    pub start_time: Option<DateTime<Utc>>,
    pub home: TeamRef,
    pub away: TeamRef,
    pub status: GameStatus,
    pub double_header: DoubleHeader,
    pub venue: Option<String>,
    pub odds: Option<Odds>,
}

impl GameRecord {
    pub fn is_postponed(&self) -> bool {
        self.status == GameStatus::Postponed
    }

    pub fn is_home(&self, team_name: &str) -> bool {
        self.home.name == team_name
    }

    /// The participant entry for `team_name` and the opposing entry, or None
    /// if the team did not play in this game.
    pub fn sides(&self, team_name: &str) -> Option<(&TeamRef, &TeamRef)> {
        if self.home.name == team_name {
            Some((&self.home, &self.away))
        } else if self.away.name == team_name {
            Some((&self.away, &self.home))
        } else {
            None
        }
    }

    /// Price quoted for `team_name`, if odds were requested and returned.
    pub fn price_for(&self, team_name: &str) -> Option<i32> {
        let odds = self.odds.as_ref()?;
        if self.home.name == team_name {
            odds.home
        } else if self.away.name == team_name {
            odds.away
        } else {
            None
        }
    }
}

const NAME_SUFFIXES: [&str; 6] = ["JR", "SR", "II", "III", "IV", "V"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamRef {
    pub id: Option<u32>,
    pub name: String,
    pub probable_pitcher: Option<String>,
}

impl TeamRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Surname of the probable pitcher: the last word that isn't a
    /// generational suffix ("Lance McCullers Jr." -> "McCullers").
    pub fn pitcher_surname(&self) -> Option<&str> {
        let name = self.probable_pitcher.as_deref()?;
        let mut words = name.split_whitespace().rev();
        let last = words.next()?;
        if NAME_SUFFIXES.contains(&last.trim_end_matches('.').to_ascii_uppercase().as_str()) {
            words.next().or(Some(last))
        } else {
            Some(last)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Final,
    Postponed,
    Suspended,
    Cancelled,
}

impl GameStatus {
    /// Map the backend's `detailedState` string onto a status.
    pub fn from_detailed_state(state: &str) -> Self {
        match state.trim() {
            "Postponed" => GameStatus::Postponed,
            "Final" | "Game Over" | "Completed Early" => GameStatus::Final,
            "In Progress" | "Manager challenge" | "Delayed" => GameStatus::InProgress,
            s if s.starts_with("Final:") || s.starts_with("Completed Early:") => GameStatus::Final,
            s if s.starts_with("Delayed:") => GameStatus::InProgress,
            s if s.starts_with("Suspended") => GameStatus::Suspended,
            "Cancelled" => GameStatus::Cancelled,
            _ => GameStatus::Scheduled,
        }
    }

    pub fn is_final(&self) -> bool {
        *self == GameStatus::Final
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DoubleHeader {
    #[default]
    No,
    /// Same ticket, back-to-back ("Y").
    Traditional,
    /// Separate admissions on the same day ("S").
    Split,
}

impl DoubleHeader {
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(str::trim) {
            Some("Y") => DoubleHeader::Traditional,
            Some("S") => DoubleHeader::Split,
            _ => DoubleHeader::No,
        }
    }

    pub fn is_set(self) -> bool {
        self != DoubleHeader::No
    }
}

/// Moneyline prices, one per side. Negative means favored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Odds {
    pub home: Option<i32>,
    pub away: Option<i32>,
}

/// One team's schedule entry for one calendar day.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TeamSlot {
    #[default]
    Empty,
    Single(GameRecord),
    /// Both halves of a doubleheader, earlier game first.
    DoublePair(GameRecord, GameRecord),
}

impl TeamSlot {
    pub fn is_empty(&self) -> bool {
        matches!(self, TeamSlot::Empty)
    }
}
