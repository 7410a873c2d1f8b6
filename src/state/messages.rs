use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use mlb_api::{DateRange, DaySchedule};

/// One schedule fetch. `id` increases with every request the app issues;
/// only the response to the newest id is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub id: u64,
    pub range: DateRange,
    pub include_odds: bool,
}

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadSchedule(ScheduleRequest),
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    ScheduleLoaded { request: ScheduleRequest, days: Vec<DaySchedule> },
    /// `message` is already phrased for the user.
    Error { request: ScheduleRequest, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    Tick,
}
