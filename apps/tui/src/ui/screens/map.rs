use crate::app::state::{App, InputMode};
use crate::ui::widgets::detail::render_side_panel;
use crate::ui::widgets::map_canvas::{render_map, status_color};
use crate::ui::widgets::tables::key_hints;
use parkmap_core::state::Notice;
use parkmap_core::OccupancyStatus;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

const SIDE_PANEL_WIDTH: u16 = 38;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapLayout {
    pub title: Rect,
    pub canvas: Rect,
    pub side: Rect,
    pub status: Rect,
}

impl MapLayout {
    /// The drawable part of the canvas, inside its border.
    pub fn canvas_inner(&self) -> Rect {
        self.canvas.inner(Margin {
            horizontal: 1,
            vertical: 1,
        })
    }
}

/// Splits the screen; mouse handling uses the same split to find the canvas.
pub fn layout(area: Rect) -> MapLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(SIDE_PANEL_WIDTH)])
        .split(rows[1]);

    MapLayout {
        title: rows[0],
        canvas: body[0],
        side: body[1],
        status: rows[2],
    }
}

pub fn render_map_screen(app: &App, f: &mut Frame<'_>) {
    let areas = layout(f.area());
    let scene = app.scene();

    render_title(app, f, areas.title);
    let pulse = (app.animation_counter.sin() + 1.0) / 2.0;
    render_map(f, areas.canvas, &scene, pulse);
    render_side_panel(f, areas.side, app, &scene);
    render_status(app, f, areas.status);
}

fn render_title(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(16)])
        .split(inner);

    let mut spans = vec![
        Span::styled(
            "Parkmap",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {} lots  ", app.map.registry.len())),
    ];
    for status in OccupancyStatus::ALL {
        let count = app
            .map
            .registry
            .visible()
            .filter(|marker| marker.status == status)
            .count();
        spans.push(Span::styled(
            format!("● {count} "),
            Style::default().fg(status_color(status)),
        ));
    }
    spans.push(Span::styled(
        format!(" [{}]", app.map.phase().as_str()),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(TextLine::from(spans)), chunks[0]);

    if app.map.is_busy() {
        let throbber = Throbber::default()
            .label("loading")
            .style(Style::default().fg(Color::Cyan))
            .throbber_set(throbber_widgets_tui::BRAILLE_SIX);
        let mut state = app.throbber_state.clone();
        f.render_stateful_widget(throbber, chunks[1], &mut state);
    }
}

fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let line = if app.input_mode == InputMode::Search {
        TextLine::from(vec![
            Span::styled(
                "Destination: ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{}_", app.search_input)),
            Span::styled(
                "   Enter: search   Esc: cancel",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else if let Some(notice) = &app.map.notice {
        let color = match notice {
            Notice::Info(_) => Color::Cyan,
            Notice::Warning(_) => Color::LightRed,
        };
        TextLine::from(vec![
            Span::styled(notice.text().to_string(), Style::default().fg(color)),
            Span::styled("   Esc: dismiss", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        key_hints(&[
            ("/", "Search"),
            ("Tab", "Next lot"),
            ("hjkl", "Pan"),
            ("+/-", "Zoom"),
            ("2", "Lot list"),
            ("?", "Help"),
            ("q", "Quit"),
        ])
    };

    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fixtures::app_with_lots;
    use parkmap_core::{Event, LotId};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn canvas_sits_between_title_and_status() {
        let areas = layout(Rect::new(0, 0, 120, 40));
        assert_eq!(areas.title.height, 3);
        assert_eq!(areas.status.y, 37);
        assert_eq!(areas.side.width, SIDE_PANEL_WIDTH);
        assert_eq!(areas.canvas_inner(), Rect::new(1, 4, 80, 32));
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn selected_lot_shows_its_detail() {
        let mut app = app_with_lots();
        app.apply(Event::MarkerClicked(LotId("004".into())));

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render_map_screen(&app, f)).unwrap();

        let screen = buffer_text(&terminal);
        assert!(screen.contains("East Gate Garage"));
        assert!(screen.contains("Navigate here?"));
    }

    #[test]
    fn legend_when_nothing_is_selected() {
        let app = app_with_lots();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render_map_screen(&app, f)).unwrap();

        assert!(buffer_text(&terminal).contains("Legend"));
    }
}
