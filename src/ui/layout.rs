use tui::layout::{Constraint, Layout, Rect, Size};
pub const HEADER_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 1;
pub const LOG_PANE_PERCENT: u16 = 30;

/// Pre-computed layout areas for the main draw loop.
#[derive(Debug, PartialEq)]
pub struct LayoutAreas {
    pub header: [Rect; 2],
    pub main: Rect,
    pub logs: Option<Rect>,
    pub footer: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        if full_screen {
            let [main] = Layout::vertical([Constraint::Fill(1)]).areas(area);
            return LayoutAreas {
                header: [Rect::ZERO, Rect::ZERO],
                main,
                logs: None,
                footer: Rect::ZERO,
            };
        }

        let [header, body, footer] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .areas(area);

        let (main, logs) = if show_logs {
            let [main, logs] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Percentage(LOG_PANE_PERCENT),
            ])
            .areas(body);
            (main, Some(logs))
        } else {
            (body, None)
        };

        LayoutAreas {
            header: Self::split_header(header),
            main,
            logs,
            footer,
        }
    }

    fn split_header(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_screen_gives_everything_to_main() {
        let mut layout = LayoutAreas::new(Size::new(80, 24));
        layout.update(Rect::new(0, 0, 80, 24), true, true);
        assert_eq!(layout.main, Rect::new(0, 0, 80, 24));
        assert_eq!(layout.logs, None);
    }

    #[test]
    fn log_pane_is_carved_from_the_body() {
        let mut layout = LayoutAreas::new(Size::new(80, 24));
        assert_eq!(layout.header[0].height, HEADER_HEIGHT);
        assert_eq!(layout.footer.y, 23);

        layout.update(Rect::new(0, 0, 80, 24), false, true);
        let logs = layout.logs.unwrap();
        assert_eq!(layout.main.height + logs.height, 24 - HEADER_HEIGHT - FOOTER_HEIGHT);
        assert_eq!(logs.y, layout.main.y + layout.main.height);
    }
}
