use crate::app::lots::filter_markers;
use crate::app::state::{App, InputMode};
use crate::ui::widgets::map_canvas::status_color;
use crate::ui::widgets::tables::{key_hints, scroll_offset};
use parkmap_core::distance_km;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_lots_screen(app: &App, f: &mut Frame<'_>) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let markers = filter_markers(app.map.registry.all(), &app.lot_filter);

    if markers.is_empty() {
        let message = if app.map.registry.is_empty() {
            "No parking lots loaded yet."
        } else {
            "No lots match the filter."
        };
        let block = Block::default()
            .title("Parking Lots")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let paragraph = Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, chunks[0]);
    } else {
        let header = Row::new(vec![
            Cell::from("No."),
            Cell::from("Name"),
            Cell::from("Free"),
            Cell::from("Total"),
            Cell::from("Free %"),
            Cell::from("Status"),
            Cell::from("Distance"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let total_rows = markers.len();
        let max_visible_rows = chunks[0].height.saturating_sub(3) as usize;
        let offset = scroll_offset(total_rows, max_visible_rows, app.selected_lot_index);
        let user = app.map.selection.user_location;

        let rows = markers
            .iter()
            .enumerate()
            .skip(offset)
            .take(max_visible_rows)
            .map(|(i, marker)| {
                let style = if i == app.selected_lot_index {
                    Style::default()
                        .bg(Color::Rgb(0, 0, 238))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(status_color(marker.status))
                };
                let lot = &marker.lot;

                Row::new(vec![
                    Cell::from(lot.park_no.clone()),
                    Cell::from(lot.parking_name.clone()),
                    Cell::from(lot.free_quantity.to_string()),
                    Cell::from(lot.total_quantity.to_string()),
                    Cell::from(
                        lot.percentage_free()
                            .map_or_else(|| "-".to_string(), |pct| format!("{pct:.0}%")),
                    ),
                    Cell::from(marker.status.label()),
                    Cell::from(user.map_or_else(String::new, |from| {
                        format!("{:.2} km", distance_km(from, marker.position))
                    })),
                ])
                .style(style)
            });

        let widths = [
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(16),
            Constraint::Length(10),
        ];

        let title = if app.lot_filter.is_empty() {
            format!("Parking Lots ({} of {})", app.selected_lot_index + 1, total_rows)
        } else {
            format!(
                "Parking Lots matching \"{}\" ({} of {})",
                app.lot_filter,
                app.selected_lot_index + 1,
                total_rows
            )
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().title(title).borders(Borders::ALL))
            .column_spacing(1);
        f.render_widget(table, chunks[0]);
    }

    let footer = if app.input_mode == InputMode::Filter {
        TextLine::from(vec![
            Span::styled(
                "Filter: ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{}_", app.lot_filter)),
        ])
    } else {
        key_hints(&[
            ("ESC", "Back to map"),
            ("↑/↓", "Navigate"),
            ("PgUp/PgDn", "Jump 5 rows"),
            ("/", "Filter"),
            ("Enter", "Show on map"),
            ("q", "Quit"),
        ])
    };

    let help_paragraph = Paragraph::new(footer)
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Center);
    f.render_widget(help_paragraph, chunks[1]);
}
