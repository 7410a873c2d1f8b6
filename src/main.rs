mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::{API_URL_ENV, AppSettings, LOG_LEVEL_ENV, StartupOptions};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use mlb_api::DateRange;
use mlb_api::dates::enumerate_weeks;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

const TICK_INTERVAL: Duration = Duration::from_millis(250);
/// The grid shows at most one week.
const MAX_RANGE_DAYS: usize = 7;

#[derive(Debug, PartialEq)]
enum CliAction {
    Run(StartupOptions),
    Help,
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let startup = match parse_cli_args(std::env::args().skip(1)) {
        Ok(CliAction::Run(startup)) => startup,
        Ok(CliAction::Help) => {
            println!("{}", usage_text());
            return Ok(());
        }
        Ok(CliAction::Version) => {
            println!("mlbgrid {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(msg) => {
            eprintln!("{msg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let settings = AppSettings::load();
    tui_logger::init_logger(settings.log_filter())?;
    tui_logger::set_default_level(settings.log_filter());

    let api_base_url = settings.api_base_url.clone();
    let app = Arc::new(Mutex::new(App::new(settings, startup)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(&api_base_url, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Tick thread: expires notifications and moves the today marker at midnight
    let tick_tx = ui_event_tx.clone();
    let tick_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            if tick_tx.send(UiEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    // Trigger the first schedule load
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    tick_task.abort();

    Ok(())
}

fn parse_cli_args<I>(args: I) -> Result<CliAction, String>
where
    I: IntoIterator<Item = String>,
{
    let mut startup = StartupOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "-V" | "--version" => return Ok(CliAction::Version),
            "--odds" => startup.include_odds = true,
            "-w" | "--week" => {
                let value = args.next().ok_or("--week needs a week number")?;
                let weeks = enumerate_weeks().len();
                match value.parse::<usize>() {
                    Ok(n) if (1..=weeks).contains(&n) => startup.week = Some(n),
                    _ => return Err(format!("--week must be between 1 and {weeks}, got {value:?}")),
                }
            }
            "--range" => {
                let value = args.next().ok_or("--range needs start;end")?;
                let range = DateRange::parse(&value).map_err(|e| format!("--range: {e}"))?;
                if range.len() > MAX_RANGE_DAYS {
                    return Err(format!(
                        "--range spans {} days, at most {MAX_RANGE_DAYS} are shown",
                        range.len()
                    ));
                }
                startup.range = Some(range);
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }

    if startup.week.is_some() && startup.range.is_some() {
        return Err("--week and --range can't be combined".to_string());
    }
    Ok(CliAction::Run(startup))
}

fn usage_text() -> String {
    format!(
        "mlbgrid - weekly MLB schedule grid

Usage:
  mlbgrid [--week <N> | --range <YYYY-MM-DD;YYYY-MM-DD>] [--odds]
  mlbgrid --help
  mlbgrid --version

Options:
  -w, --week <N>     Open on season week N (1-{weeks})
      --range <R>    Open on an explicit date range, start;end ({MAX_RANGE_DAYS} days max)
      --odds         Start with game odds shown

Environment:
  {API_URL_ENV}      Schedule backend base URL (default http://localhost:8080)
  {LOG_LEVEL_ENV}    Log level: error, warn (default), info, debug, trace",
        weeks = enumerate_weeks().len()
    )
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let request = app.lock().await.request_schedule();
            let _ = network_requests
                .send(NetworkRequest::LoadSchedule(request))
                .await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::Tick => app.lock().await.on_tick(),
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::ScheduleLoaded { request, days } => {
            app.lock().await.on_schedule_loaded(request, days);
        }
        NetworkResponse::Error { request, message } => {
            error!("Network error: {message}");
            app.lock().await.on_schedule_failed(request, message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

/// Best effort: this also runs from the panic hook, where there is nobody
/// left to report a failure to.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliAction, String> {
        parse_cli_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_args_runs_with_defaults() {
        assert_eq!(parse(&[]), Ok(CliAction::Run(StartupOptions::default())));
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse(&["--help"]), Ok(CliAction::Help));
        assert_eq!(parse(&["-V"]), Ok(CliAction::Version));
    }

    #[test]
    fn week_and_odds() {
        assert_eq!(
            parse(&["--week", "3", "--odds"]),
            Ok(CliAction::Run(StartupOptions {
                week: Some(3),
                range: None,
                include_odds: true
            }))
        );
    }

    #[test]
    fn range_is_parsed() {
        let Ok(CliAction::Run(startup)) = parse(&["--range", "2023-04-10;2023-04-12"]) else {
            panic!("expected run");
        };
        assert_eq!(startup.range, Some(DateRange::parse("2023-04-10;2023-04-12").unwrap()));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse(&["--week"]).is_err());
        assert!(parse(&["--week", "0"]).is_err());
        assert!(parse(&["--week", "28"]).is_err());
        assert!(parse(&["--range", "2023-04-12;2023-04-10"]).is_err());
        assert!(parse(&["--week", "2", "--range", "2023-04-10;2023-04-12"]).is_err());
        assert!(parse(&["--bogus"]).unwrap_err().contains("--bogus"));
    }

    #[test]
    fn range_longer_than_a_week_is_rejected() {
        assert!(parse(&["--range", "2023-04-03;2023-04-09"]).is_ok());
        let err = parse(&["--range", "2023-04-03;2023-04-10"]).unwrap_err();
        assert!(err.contains("8 days"), "{err}");
        assert!(parse(&["--range", "2023-03-30;2023-10-01"]).is_err());
    }
}
