use crate::state::app_settings::{AppSettings, StartupOptions};
use crate::state::app_state::{AppState, NotificationLevel};
use crate::state::messages::ScheduleRequest;
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use mlb_api::{DaySchedule, Roster};
use std::time::Instant;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Schedule,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    pub roster: Roster,
}

impl App {
    pub fn new(settings: AppSettings, startup: StartupOptions) -> Self {
        let app = Self::with_today(settings, startup, Local::now().date_naive());

        let level = app.settings.log_filter();
        log::set_max_level(level);
        tui_logger::set_default_level(level);

        app
    }

    fn with_today(settings: AppSettings, startup: StartupOptions, today: NaiveDate) -> Self {
        let mut state = AppState::new(today);
        if let Some(week) = startup.week {
            state.schedule.select_week(week.saturating_sub(1));
        }
        state.schedule.custom_range = startup.range;
        state.schedule.include_odds = startup.include_odds;

        Self { settings, state, roster: Roster::mlb() }
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// Issue a fetch for whatever the selector currently shows.
    pub fn request_schedule(&mut self) -> ScheduleRequest {
        let request = self.state.schedule.begin_request();
        info!("requesting schedule #{} for {}", request.id, request.range);
        request
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_schedule_loaded(&mut self, request: ScheduleRequest, days: Vec<DaySchedule>) {
        let today = self.today();
        self.schedule_loaded_on(request, days, today, Instant::now());
    }

    fn schedule_loaded_on(
        &mut self,
        request: ScheduleRequest,
        days: Vec<DaySchedule>,
        today: NaiveDate,
        now: Instant,
    ) {
        let warnings = match self
            .state
            .schedule
            .apply_loaded(request, days, &self.roster, today)
        {
            Ok(warnings) => warnings,
            Err(stale) => {
                debug!("dropping schedule #{}, #{} is newer", stale.id, stale.latest);
                return;
            }
        };

        for warning in warnings {
            warn!("{warning}");
        }
        let summary = match warnings {
            [] => None,
            [only] => Some(format!("Schedule: {only}")),
            [first, rest @ ..] => Some(format!(
                "Schedule: {first} (+{} more, see logs with \")",
                rest.len()
            )),
        };

        self.state.last_error = None;
        if let Some(summary) = summary {
            self.state
                .notifications
                .push(NotificationLevel::Warning, summary, now);
        }
    }

    pub fn on_schedule_failed(&mut self, request: ScheduleRequest, message: String) {
        self.schedule_failed_on(request, message, Instant::now());
    }

    fn schedule_failed_on(&mut self, request: ScheduleRequest, message: String, now: Instant) {
        if let Err(stale) = self.state.schedule.apply_failed(request) {
            debug!("dropping error for schedule #{}, #{} is newer", stale.id, stale.latest);
            return;
        }
        self.state
            .notifications
            .push(NotificationLevel::Error, message.clone(), now);
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Week selector and odds toggle; each returns the fetch to send, if any
    // -----------------------------------------------------------------------

    pub fn next_week(&mut self) -> Option<ScheduleRequest> {
        self.state
            .schedule
            .next_week()
            .then(|| self.request_schedule())
    }

    pub fn prev_week(&mut self) -> Option<ScheduleRequest> {
        self.state
            .schedule
            .prev_week()
            .then(|| self.request_schedule())
    }

    pub fn current_week(&mut self) -> Option<ScheduleRequest> {
        let index = mlb_api::dates::current_week_index(self.today());
        self.state
            .schedule
            .select_week(index)
            .then(|| self.request_schedule())
    }

    pub fn toggle_odds(&mut self) -> ScheduleRequest {
        self.state.schedule.toggle_odds();
        self.request_schedule()
    }

    pub fn scroll_down(&mut self) {
        self.state.schedule.scroll_down(self.state.visible_rows);
    }

    pub fn scroll_up(&mut self) {
        self.state.schedule.scroll_up();
    }

    /// Called on every tick. Returns true if anything visible changed.
    pub fn on_tick(&mut self) -> bool {
        let expired = self.state.notifications.expire(Instant::now());
        let today = self.today();
        let moved = self
            .state
            .schedule
            .grid
            .as_ref()
            .is_some_and(|g| g.view.today_index != g.range.offset_of(today));
        if moved {
            self.state.schedule.refresh_today(today);
        }
        expired || moved
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlb_api::dates::parse_calendar_date;
    use mlb_api::{DateRange, GameRecord, TeamRef};

    fn date(s: &str) -> NaiveDate {
        parse_calendar_date(s).unwrap()
    }

    fn new_app(startup: StartupOptions) -> App {
        App::with_today(AppSettings::default(), startup, date("2023-04-12"))
    }

    fn game(day: &str, home: &str, away: &str) -> GameRecord {
        GameRecord {
            date: date(day),
            home: TeamRef::named(home),
            away: TeamRef::named(away),
            ..Default::default()
        }
    }

    #[test]
    fn startup_options_pick_the_first_view() {
        let app = new_app(StartupOptions { week: Some(5), range: None, include_odds: true });
        assert_eq!(app.state.schedule.week_index, 4);
        assert!(app.state.schedule.include_odds);

        let range = DateRange::parse("2023-05-01;2023-05-02").unwrap();
        let mut app = new_app(StartupOptions { range: Some(range), ..Default::default() });
        assert_eq!(app.request_schedule().range, range);
    }

    #[test]
    fn week_keys_only_fetch_when_the_week_changes() {
        let mut app = new_app(StartupOptions { week: Some(1), ..Default::default() });
        assert!(app.prev_week().is_none());
        let req = app.next_week().unwrap();
        assert_eq!(req.range, DateRange::parse("2023-04-03;2023-04-09").unwrap());
        assert!(app.toggle_odds().include_odds);
    }

    #[test]
    fn unknown_team_is_logged_and_notified() {
        let mut app = new_app(StartupOptions::default());
        let request = app.request_schedule();
        let days = vec![DaySchedule {
            date: date("2023-04-10"),
            games: vec![game("2023-04-10", "Boston Red Sox", "Springfield Isotopes")],
        }];
        let now = Instant::now();
        app.schedule_loaded_on(request, days, date("2023-04-12"), now);

        assert!(app.state.schedule.grid.is_some());
        let notes: Vec<_> = app.state.notifications.iter().collect();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Warning);
        assert!(notes[0].message.contains("Springfield Isotopes"));
    }

    #[test]
    fn several_warnings_are_summarised_in_one_toast() {
        let mut app = new_app(StartupOptions::default());
        let request = app.request_schedule();
        let days = vec![DaySchedule {
            date: date("2023-04-10"),
            games: vec![
                game("2023-04-10", "Boston Red Sox", "Springfield Isotopes"),
                game("2023-04-10", "Shelbyville Shelbyvillians", "Chicago Cubs"),
            ],
        }];
        app.schedule_loaded_on(request, days, date("2023-04-12"), Instant::now());

        assert_eq!(app.state.schedule.warnings.len(), 2);
        assert!(log::Level::Warn <= app.settings.log_filter());
        let notes: Vec<_> = app.state.notifications.iter().collect();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].message.contains("Springfield Isotopes"), "{}", notes[0].message);
        assert!(notes[0].message.contains("+1 more"), "{}", notes[0].message);
    }

    #[test]
    fn failure_notifies_and_clears_grid() {
        let mut app = new_app(StartupOptions::default());
        let first = app.request_schedule();
        app.schedule_loaded_on(first, Vec::new(), date("2023-04-12"), Instant::now());
        assert!(app.state.schedule.grid.is_some());

        let second = app.next_week().unwrap();
        app.schedule_failed_on(first, "late".into(), Instant::now());
        assert!(app.state.notifications.is_empty(), "stale failure is ignored");

        app.schedule_failed_on(second, "An unexpected error occurred.".into(), Instant::now());
        assert!(app.state.schedule.grid.is_none());
        assert_eq!(app.state.last_error.as_deref(), Some("An unexpected error occurred."));
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = new_app(StartupOptions::default());
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Schedule);
    }
}
