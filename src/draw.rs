use tui::backend::Backend;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::schedule_table::{ScheduleTable, visible_row_count};
use crate::state::app_state::NotificationLevel;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;

const TITLE: &str = " MLB Schedule ";
const NOTIFICATION_WIDTH: u16 = 48;

static KEY_LEGEND: &[(&str, &str)] = &[
    ("←/h", "prev week"),
    ("→/l", "next week"),
    ("t", "this week"),
    ("o", "odds"),
    ("r", "reload"),
    ("j/k", "scroll"),
    ("\"", "logs"),
    ("?", "help"),
    ("q", "quit"),
];

static HELP_LINES: &[(&str, &str)] = &[
    ("← / h", "Previous week"),
    ("→ / l", "Next week"),
    ("t", "Jump to the current week"),
    ("o", "Toggle game odds"),
    ("r", "Reload the schedule"),
    ("j / k  ↓ / ↑", "Scroll team rows"),
    ("\"", "Show or hide the log pane"),
    ("f", "Toggle full screen"),
    ("?", "This help, Esc to close"),
    ("q / Ctrl-C", "Quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_header(f, layout.header, app);
            draw_footer(f, layout.footer);
        }

        match app.state.active_tab {
            MenuItem::Schedule => draw_schedule(f, layout.main, app, loading),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_notifications(f, layout.main, app);
        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_header(f: &mut Frame, header: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let selector = Paragraph::new(Line::from(vec![
        Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.state.schedule.selector_label(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .title(TITLE)
            .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
            .border_type(border_type),
    )
    .style(style);
    f.render_widget(selector, header[0]);

    let checkbox = if app.state.schedule.include_odds { "[x]" } else { "[ ]" };
    let odds = Paragraph::new(format!("{checkbox} Include game odds "))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(odds, header[1]);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let mut spans = Vec::with_capacity(KEY_LEGEND.len() * 2);
    for (key, action) in KEY_LEGEND {
        spans.push(Span::styled(
            format!(" {key} "),
            Style::default().fg(Color::Black).bg(Color::DarkGray),
        ));
        spans.push(Span::styled(
            format!(" {action}  "),
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_schedule(f: &mut Frame, area: Rect, app: &mut App, loading: LoadingState) {
    let block = default_border(Color::White);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(grid) = app.state.schedule.grid.as_ref() else {
        app.state.visible_rows = 0;
        let msg = if loading.is_loading {
            "Loading schedule...".to_string()
        } else if let Some(err) = &app.state.last_error {
            format!("No schedule to show.\n{err}\nPress r to retry.")
        } else {
            "No schedule loaded.".to_string()
        };
        draw_message(f, inner, &msg);
        return;
    };

    let scroll = app.state.schedule.scroll_offset;
    let visible = visible_row_count(grid, scroll, inner.height);
    f.render_widget(ScheduleTable { grid, scroll }, inner);
    app.state.visible_rows = visible;
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!("{key:>14}  "),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Green))
        .style_trace(Style::default().fg(Color::Magenta));
    f.render_widget(Clear, area);
    f.render_widget(logs, area);
}

/// Stack of toasts in the top-right corner of `area`, newest at the bottom.
fn draw_notifications(f: &mut Frame, area: Rect, app: &App) {
    let width = NOTIFICATION_WIDTH.min(area.width.saturating_sub(2));
    if app.state.notifications.is_empty() || width < 8 {
        return;
    }

    let mut y = area.y + 1;
    for note in app.state.notifications.iter() {
        let color = match note.level {
            NotificationLevel::Error => Color::Red,
            NotificationLevel::Warning => Color::Yellow,
        };
        // Two border rows plus the wrapped message.
        let text_width = width.saturating_sub(2).max(1) as usize;
        let lines = note.message.chars().count().div_ceil(text_width).max(1) as u16;
        let height = lines + 2;
        if y + height > area.y + area.height {
            break;
        }

        let rect = Rect::new(area.x + area.width - width - 1, y, width, height);
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(note.message.as_str())
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(color))
                .block(default_border(color)),
            rect,
        );
        y += height;
    }
}

fn draw_message(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(2), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
