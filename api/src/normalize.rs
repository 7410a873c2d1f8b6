//! Reshapes a flat list of days/games into one slot per team per day.

use crate::dates::DateRange;
use crate::teams::Roster;
use crate::{DaySchedule, GameRecord, TeamSlot};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTeamError {
    pub team: String,
}

impl fmt::Display for UnknownTeamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown team {:?}", self.team)
    }
}

impl std::error::Error for UnknownTeamError {}

/// Anomalies found while normalizing. None of them abort the run; the
/// affected game is left out for the affected team only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleWarning {
    UnknownTeam { date: NaiveDate, error: UnknownTeamError },
    /// A third doubleheader game between the same pair on one day.
    ExtraDoubleheaderGame { date: NaiveDate, home: String, away: String },
    /// A team already had a different game that day.
    SlotConflict { date: NaiveDate, team: String },
    /// The backend returned a day outside the requested range.
    OutOfRange { date: NaiveDate },
}

impl fmt::Display for ScheduleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleWarning::UnknownTeam { date, error } => write!(f, "{date}: {error}"),
            ScheduleWarning::ExtraDoubleheaderGame { date, home, away } => {
                write!(f, "{date}: extra doubleheader game {away} @ {home} ignored")
            }
            ScheduleWarning::SlotConflict { date, team } => {
                write!(f, "{date}: {team} already has a game, later game ignored")
            }
            ScheduleWarning::OutOfRange { date } => {
                write!(f, "{date}: outside the requested range, ignored")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamRow {
    pub name: String,
    pub slots: Vec<TeamSlot>,
}

/// Per-team slot sequences, iterated in roster order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamSchedule {
    rows: Vec<TeamRow>,
    index: HashMap<String, usize>,
}

impl TeamSchedule {
    pub fn new(roster: &Roster) -> Self {
        let rows: Vec<TeamRow> = roster
            .names()
            .iter()
            .map(|name| TeamRow { name: name.clone(), slots: Vec::new() })
            .collect();
        let index = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.name.clone(), i))
            .collect();
        Self { rows, index }
    }

    pub fn get(&self, team_name: &str) -> Option<&[TeamSlot]> {
        self.index
            .get(team_name)
            .map(|&i| self.rows[i].slots.as_slice())
    }

    pub fn slots_mut(&mut self, team_name: &str) -> Result<&mut Vec<TeamSlot>, UnknownTeamError> {
        match self.index.get(team_name) {
            Some(&i) => Ok(&mut self.rows[i].slots),
            None => Err(UnknownTeamError { team: team_name.to_owned() }),
        }
    }

    pub fn rows(&self) -> &[TeamRow] {
        &self.rows
    }

    pub fn team_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of days covered; every row has exactly this many slots.
    pub fn day_count(&self) -> usize {
        self.rows.first().map(|r| r.slots.len()).unwrap_or(0)
    }

    /// The current (last) slot of a team.
    fn today_mut(&mut self, team_name: &str) -> Result<&mut TeamSlot, UnknownTeamError> {
        let slots = self.slots_mut(team_name)?;
        slots.last_mut().ok_or_else(|| UnknownTeamError { team: team_name.to_owned() })
    }

    fn open_day(&mut self) {
        for row in &mut self.rows {
            row.slots.push(TeamSlot::Empty);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub schedule: TeamSchedule,
    pub warnings: Vec<ScheduleWarning>,
}

/// Unordered team pair, the key for matching doubleheader halves.
type PairKey = (String, String);

fn pair_key(game: &GameRecord) -> PairKey {
    let (a, b) = (game.home.name.clone(), game.away.name.clone());
    if a <= b { (a, b) } else { (b, a) }
}

enum PairProgress {
    Opened(GameRecord),
    Merged,
}

/// Normalize `days` against `roster`; one slot per team per entry in `days`.
pub fn normalize(roster: &Roster, days: &[DaySchedule]) -> Normalized {
    let mut schedule = TeamSchedule::new(roster);
    let mut warnings = Vec::new();

    for day in days {
        schedule.open_day();
        let mut pairs: HashMap<PairKey, PairProgress> = HashMap::new();

        for game in day.games.iter().filter(|g| !g.is_postponed()) {
            if !game.double_header.is_set() {
                place_single(&mut schedule, &mut warnings, day.date, game);
                continue;
            }

            match pairs.remove(&pair_key(game)) {
                None => {
                    place_single(&mut schedule, &mut warnings, day.date, game);
                    pairs.insert(pair_key(game), PairProgress::Opened(game.clone()));
                }
                Some(PairProgress::Opened(first)) => {
                    merge_pair(&mut schedule, &mut warnings, day.date, first, game);
                    pairs.insert(pair_key(game), PairProgress::Merged);
                }
                Some(PairProgress::Merged) => {
                    warnings.push(ScheduleWarning::ExtraDoubleheaderGame {
                        date: day.date,
                        home: game.home.name.clone(),
                        away: game.away.name.clone(),
                    });
                    pairs.insert(pair_key(game), PairProgress::Merged);
                }
            }
        }
    }

    Normalized { schedule, warnings }
}

/// Align `days` to `range` first, so every team ends up with exactly
/// `range.len()` slots even when the backend omits game-less dates.
pub fn normalize_range(roster: &Roster, range: DateRange, days: Vec<DaySchedule>) -> Normalized {
    let (aligned, outside) = align_to_range(range, days);
    let Normalized { schedule, warnings: game_warnings } = normalize(roster, &aligned);
    let mut warnings: Vec<ScheduleWarning> = outside
        .into_iter()
        .map(|date| ScheduleWarning::OutOfRange { date })
        .collect();
    warnings.extend(game_warnings);
    Normalized { schedule, warnings }
}

/// One `DaySchedule` per day of `range`, in order. Missing dates become
/// empty days and repeated dates are concatenated. Returns the dates that
/// fell outside the range alongside.
pub fn align_to_range(range: DateRange, days: Vec<DaySchedule>) -> (Vec<DaySchedule>, Vec<NaiveDate>) {
    let mut aligned: Vec<DaySchedule> = range.days().map(DaySchedule::empty).collect();
    let mut outside = Vec::new();
    for day in days {
        match range.offset_of(day.date) {
            Some(offset) => aligned[offset].games.extend(day.games),
            None => outside.push(day.date),
        }
    }
    (aligned, outside)
}

fn place_single(
    schedule: &mut TeamSchedule,
    warnings: &mut Vec<ScheduleWarning>,
    date: NaiveDate,
    game: &GameRecord,
) {
    for team in [&game.home.name, &game.away.name] {
        match schedule.today_mut(team) {
            Ok(slot) if slot.is_empty() => *slot = TeamSlot::Single(game.clone()),
            Ok(_) => warnings.push(ScheduleWarning::SlotConflict { date, team: team.clone() }),
            Err(error) => warnings.push(ScheduleWarning::UnknownTeam { date, error }),
        }
    }
}

fn merge_pair(
    schedule: &mut TeamSchedule,
    warnings: &mut Vec<ScheduleWarning>,
    date: NaiveDate,
    first: GameRecord,
    second: &GameRecord,
) {
    let (earlier, later) = match (first.start_time, second.start_time) {
        (Some(a), Some(b)) if b < a => (second.clone(), first.clone()),
        _ => (first.clone(), second.clone()),
    };

    for team in [&second.home.name, &second.away.name] {
        match schedule.today_mut(team) {
            Ok(slot) if *slot == TeamSlot::Single(first.clone()) => {
                *slot = TeamSlot::DoublePair(earlier.clone(), later.clone());
            }
            Ok(_) => warnings.push(ScheduleWarning::SlotConflict { date, team: team.clone() }),
            Err(error) => warnings.push(ScheduleWarning::UnknownTeam { date, error }),
        }
    }
}
