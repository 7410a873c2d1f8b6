use mlb_api::teams::abbreviation;
use mlb_api::{GameRecord, TeamSlot};
use tui::buffer::Buffer;
use tui::layout::{Constraint, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Text};
use tui::widgets::{Cell, Row, Table, Widget};

use crate::state::app_state::ScheduleGrid;

pub const DOUBLEHEADER_DIVIDER: &str = "──";
const TEAM_COLUMN_WIDTH: u16 = 5;

/// One team per row, one day per column.
pub struct ScheduleTable<'a> {
    pub grid: &'a ScheduleGrid,
    /// Index of the first team row shown.
    pub scroll: u16,
}

impl ScheduleTable<'_> {
    fn header(&self) -> Row<'static> {
        let today = Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD);
        let normal = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

        let mut cells = vec![Cell::from("Team").style(normal)];
        cells.extend(self.grid.view.labels.iter().enumerate().map(|(col, label)| {
            let style = if self.grid.view.is_today(col) { today } else { normal };
            Cell::from(label.clone()).style(style)
        }));
        Row::new(cells).bottom_margin(1)
    }

    fn rows(&self) -> Vec<Row<'static>> {
        self.grid
            .schedule
            .rows()
            .iter()
            .skip(self.scroll as usize)
            .map(|row| {
                let mut height = 1;
                let mut cells = vec![
                    Cell::from(abbreviation(&row.name).to_string())
                        .style(Style::default().fg(Color::Cyan)),
                ];
                for (col, slot) in row.slots.iter().enumerate() {
                    let lines = cell_lines(&row.name, slot, self.grid.include_odds);
                    height = height.max(lines.len() as u16);
                    let style = if self.grid.view.is_today(col) {
                        Style::default().fg(Color::Yellow)
                    } else {
                        Style::default()
                    };
                    cells.push(Cell::from(Text::from(
                        lines.into_iter().map(Line::from).collect::<Vec<_>>(),
                    ))
                    .style(style));
                }
                Row::new(cells).height(height).bottom_margin(1)
            })
            .collect()
    }
}

impl Widget for ScheduleTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let days = self.grid.view.labels.len();
        let mut widths = Vec::with_capacity(days + 1);
        widths.push(Constraint::Length(TEAM_COLUMN_WIDTH));
        widths.extend(std::iter::repeat_n(Constraint::Fill(1), days));

        Widget::render(
            Table::new(self.rows(), widths).header(self.header()).column_spacing(1),
            area,
            buf,
        );
    }
}

/// How many team rows starting at `scroll` fit into `height` lines.
pub fn visible_row_count(grid: &ScheduleGrid, scroll: u16, height: u16) -> u16 {
    // Header plus its margin.
    let mut remaining = height.saturating_sub(2);
    let mut count = 0;
    for row in grid.schedule.rows().iter().skip(scroll as usize) {
        let lines = row
            .slots
            .iter()
            .map(|slot| cell_lines(&row.name, slot, grid.include_odds).len() as u16)
            .max()
            .unwrap_or(1)
            .max(1);
        if lines > remaining {
            break;
        }
        remaining = remaining.saturating_sub(lines + 1);
        count += 1;
    }
    count
}

/// Text lines for one team's slot on one day.
pub fn cell_lines(team: &str, slot: &TeamSlot, include_odds: bool) -> Vec<String> {
    match slot {
        TeamSlot::Empty => Vec::new(),
        TeamSlot::Single(game) => game_lines(team, game, include_odds),
        TeamSlot::DoublePair(first, second) => {
            let mut lines = game_lines(team, first, include_odds);
            lines.push(DOUBLEHEADER_DIVIDER.to_string());
            lines.extend(game_lines(team, second, include_odds));
            lines
        }
    }
}

fn game_lines(team: &str, game: &GameRecord, include_odds: bool) -> Vec<String> {
    let Some((own, opponent)) = game.sides(team) else {
        return Vec::new();
    };

    let prefix = if game.is_home(team) { "" } else { "@" };
    let mut lines = vec![format!("{prefix}{}", abbreviation(&opponent.name))];
    if let Some(surname) = own.pitcher_surname() {
        lines.push(surname.to_string());
    }
    if include_odds
        && !game.status.is_final()
        && let Some(price) = game.price_for(team)
    {
        lines.push(format_price(price));
    }
    lines
}

/// American odds: favourites negative, underdogs with an explicit plus sign.
pub fn format_price(price: i32) -> String {
    format!("{price:+}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mlb_api::dates::parse_calendar_date;
    use mlb_api::normalize::normalize_range;
    use mlb_api::{DateRange, DaySchedule, GameStatus, Odds, Roster, TeamRef, ViewProjection};

    fn date(s: &str) -> NaiveDate {
        parse_calendar_date(s).unwrap()
    }

    fn yankees_at_boston() -> GameRecord {
        GameRecord {
            date: date("2023-04-10"),
            home: TeamRef {
                name: "Boston Red Sox".into(),
                probable_pitcher: Some("Chris Sale".into()),
                ..Default::default()
            },
            away: TeamRef {
                name: "New York Yankees".into(),
                probable_pitcher: Some("Gerrit Cole".into()),
                ..Default::default()
            },
            odds: Some(Odds { home: Some(120), away: Some(-135) }),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(120), "+120");
        assert_eq!(format_price(-135), "-135");
    }

    #[test]
    fn test_home_and_away_cells() {
        let slot = TeamSlot::Single(yankees_at_boston());
        assert_eq!(cell_lines("Boston Red Sox", &slot, true), vec!["NYY", "Sale", "+120"]);
        assert_eq!(cell_lines("New York Yankees", &slot, true), vec!["@BOS", "Cole", "-135"]);
        assert_eq!(cell_lines("New York Yankees", &slot, false), vec!["@BOS", "Cole"]);
        assert!(cell_lines("Boston Red Sox", &TeamSlot::Empty, true).is_empty());
    }

    #[test]
    fn test_final_game_hides_odds() {
        let mut game = yankees_at_boston();
        game.status = GameStatus::Final;
        game.home.probable_pitcher = None;
        let slot = TeamSlot::Single(game);
        assert_eq!(cell_lines("Boston Red Sox", &slot, true), vec!["NYY"]);
    }

    #[test]
    fn test_doubleheader_cell_has_divider() {
        let first = yankees_at_boston();
        let mut second = yankees_at_boston();
        second.home.probable_pitcher = Some("Brayan Bello".into());
        let slot = TeamSlot::DoublePair(first, second);
        assert_eq!(
            cell_lines("Boston Red Sox", &slot, false),
            vec!["NYY", "Sale", DOUBLEHEADER_DIVIDER, "NYY", "Bello"]
        );
    }

    fn grid() -> ScheduleGrid {
        let range = DateRange::parse("2023-04-10;2023-04-12").unwrap();
        let days = vec![DaySchedule { date: date("2023-04-10"), games: vec![yankees_at_boston()] }];
        let roster = Roster::new(["Boston Red Sox", "New York Yankees"]);
        ScheduleGrid {
            range,
            include_odds: false,
            schedule: normalize_range(&roster, range, days).schedule,
            view: ViewProjection::new(range, date("2023-04-11")),
        }
    }

    #[test]
    fn test_renders_header_and_team_rows() {
        let grid = grid();
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        ScheduleTable { grid: &grid, scroll: 0 }.render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        for expected in ["Team", "04-10", "04-11", "04-12", "BOS", "NYY", "@BOS", "Sale"] {
            assert!(text.contains(expected), "missing {expected:?} in {text:?}");
        }
    }

    #[test]
    fn test_scroll_skips_rows() {
        let grid = grid();
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        ScheduleTable { grid: &grid, scroll: 1 }.render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(!text.contains("Sale"));
        assert!(text.contains("Cole"));
    }

    #[test]
    fn test_visible_row_count() {
        let grid = grid();
        // header (2) + BOS (2 lines + margin) + NYY (2 lines + margin)
        assert_eq!(visible_row_count(&grid, 0, 8), 2);
        assert_eq!(visible_row_count(&grid, 0, 4), 1);
        assert_eq!(visible_row_count(&grid, 1, 4), 1);
        assert_eq!(visible_row_count(&grid, 0, 1), 0);
    }
}
