use crate::app::{App, MenuItem};
use crate::state::messages::{NetworkRequest, ScheduleRequest};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut fetch: Option<ScheduleRequest> = None;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Week selector
        (MenuItem::Schedule, Char('l') | KeyCode::Right, _) => fetch = guard.next_week(),
        (MenuItem::Schedule, Char('h') | KeyCode::Left, _) => fetch = guard.prev_week(),
        (MenuItem::Schedule, Char('t'), _) => fetch = guard.current_week(),
        (MenuItem::Schedule, Char('o'), _) => fetch = Some(guard.toggle_odds()),
        (MenuItem::Schedule, Char('r'), _) => fetch = Some(guard.request_schedule()),

        // Table scrolling
        (MenuItem::Schedule, Char('j') | KeyCode::Down, _) => guard.scroll_down(),
        (MenuItem::Schedule, Char('k') | KeyCode::Up, _) => guard.scroll_up(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    if let Some(request) = fetch {
        drop(guard);
        let _ = network_requests
            .send(NetworkRequest::LoadSchedule(request))
            .await;
    }
}
