use crate::app::MenuItem;
use crate::state::messages::ScheduleRequest;
use chrono::NaiveDate;
use mlb_api::dates::{current_week_index, enumerate_weeks};
use mlb_api::normalize::normalize_range;
use mlb_api::{DateRange, DaySchedule, Roster, ScheduleWarning, TeamSchedule, ViewProjection, Week};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Request sequencing
// ---------------------------------------------------------------------------

/// Hands out monotonically increasing request ids and remembers the newest,
/// so a slow response to an older request can't overwrite a newer view.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, id: u64) -> bool {
        id == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

// ---------------------------------------------------------------------------
// Schedule state
// ---------------------------------------------------------------------------

/// A normalized week ready to draw: the range it was fetched for, the team
/// rows, and the column headers.
#[derive(Debug, Clone)]
pub struct ScheduleGrid {
    pub range: DateRange,
    pub include_odds: bool,
    pub schedule: TeamSchedule,
    pub view: ViewProjection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleResponse {
    pub id: u64,
    pub latest: u64,
}

#[derive(Debug)]
pub struct ScheduleState {
    /// Index into the season week table.
    pub week_index: usize,
    /// Explicit range from the command line; cleared once the user picks a week.
    pub custom_range: Option<DateRange>,
    pub include_odds: bool,
    pub requests: RequestSequence,
    pub grid: Option<ScheduleGrid>,
    pub warnings: Vec<ScheduleWarning>,
    pub scroll_offset: u16,
}

impl ScheduleState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            week_index: current_week_index(today),
            custom_range: None,
            include_odds: false,
            requests: RequestSequence::default(),
            grid: None,
            warnings: Vec::new(),
            scroll_offset: 0,
        }
    }

    pub fn selected_week(&self) -> Option<&'static Week> {
        enumerate_weeks().get(self.week_index)
    }

    /// The range the next fetch should ask for.
    pub fn requested_range(&self) -> DateRange {
        match (self.custom_range, self.selected_week()) {
            (Some(range), _) => range,
            (None, Some(week)) => week.range,
            // The week table is never empty; this only guards the index.
            (None, None) => enumerate_weeks()[0].range,
        }
    }

    pub fn selector_label(&self) -> String {
        match (self.custom_range, self.selected_week()) {
            (Some(range), _) => format!(
                "Custom ({} - {})",
                mlb_api::dates::format_long(range.start),
                mlb_api::dates::format_long(range.end)
            ),
            (None, Some(week)) => week.label(),
            (None, None) => String::new(),
        }
    }

    pub fn begin_request(&mut self) -> ScheduleRequest {
        ScheduleRequest {
            id: self.requests.next(),
            range: self.requested_range(),
            include_odds: self.include_odds,
        }
    }

    /// Returns true when the selection changed and a fetch is due.
    pub fn select_week(&mut self, index: usize) -> bool {
        let last = enumerate_weeks().len().saturating_sub(1);
        let index = index.min(last);
        let changed = index != self.week_index || self.custom_range.is_some();
        self.week_index = index;
        self.custom_range = None;
        changed
    }

    pub fn next_week(&mut self) -> bool {
        self.select_week(self.week_index + 1)
    }

    pub fn prev_week(&mut self) -> bool {
        self.select_week(self.week_index.saturating_sub(1))
    }

    pub fn toggle_odds(&mut self) {
        self.include_odds = !self.include_odds;
    }

    /// Apply a fetched schedule, unless a newer request has been issued since.
    pub fn apply_loaded(
        &mut self,
        request: ScheduleRequest,
        days: Vec<DaySchedule>,
        roster: &Roster,
        today: NaiveDate,
    ) -> Result<&[ScheduleWarning], StaleResponse> {
        self.check_current(request)?;

        let normalized = normalize_range(roster, request.range, days);
        self.grid = Some(ScheduleGrid {
            range: request.range,
            include_odds: request.include_odds,
            schedule: normalized.schedule,
            view: ViewProjection::new(request.range, today),
        });
        self.warnings = normalized.warnings;
        self.scroll_offset = 0;
        Ok(&self.warnings)
    }

    /// A failed fetch clears the grid, unless a newer request is in flight.
    pub fn apply_failed(&mut self, request: ScheduleRequest) -> Result<(), StaleResponse> {
        self.check_current(request)?;
        self.grid = None;
        self.warnings.clear();
        Ok(())
    }

    /// Recompute the today marker, e.g. after midnight passes.
    pub fn refresh_today(&mut self, today: NaiveDate) {
        if let Some(grid) = &mut self.grid {
            grid.view = ViewProjection::new(grid.range, today);
        }
    }

    pub fn scroll_down(&mut self, visible_rows: u16) {
        let rows = self.grid.as_ref().map(|g| g.schedule.team_count()).unwrap_or(0) as u16;
        let max = rows.saturating_sub(visible_rows.max(1));
        self.scroll_offset = (self.scroll_offset + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    fn check_current(&self, request: ScheduleRequest) -> Result<(), StaleResponse> {
        if self.requests.is_current(request.id) {
            Ok(())
        } else {
            Err(StaleResponse { id: request.id, latest: self.requests.latest() })
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications (transient, toast-style)
// ---------------------------------------------------------------------------

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct Notifications {
    items: VecDeque<Notification>,
}

impl Notifications {
    const MAX_VISIBLE: usize = 3;

    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>, now: Instant) {
        self.items.push_back(Notification {
            message: message.into(),
            level,
            expires_at: now + NOTIFICATION_TTL,
        });
        while self.items.len() > Self::MAX_VISIBLE {
            self.items.pop_front();
        }
    }

    /// Drop expired notifications. Returns true if anything was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.expires_at > now);
        self.items.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    /// Team rows that fit in the table on the last draw.
    pub visible_rows: u16,
    pub schedule: ScheduleState,
    pub notifications: Notifications,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            show_logs: false,
            last_error: None,
            visible_rows: 0,
            schedule: ScheduleState::new(today),
            notifications: Notifications::default(),
        }
    }
}
