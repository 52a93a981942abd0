use crate::app::WebApp;
use parkmap_core::scene::{LotDetail, Scene};
use parkmap_core::state::Notice;
use parkmap_core::{Coord, OccupancyStatus};
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine},
        Block, Borders, Paragraph, Wrap,
    },
    Frame,
};

const SIDE_PANEL_WIDTH: u16 = 36;
/// DOM cells are about twice as tall as wide, like terminal cells.
const CELL_ASPECT: f64 = 2.0;

const fn status_color(status: OccupancyStatus) -> Color {
    match status {
        OccupancyStatus::High => Color::Green,
        OccupancyStatus::Medium => Color::Yellow,
        OccupancyStatus::Low => Color::LightRed,
        OccupancyStatus::Zero => Color::Red,
    }
}

pub fn render(app: &WebApp, f: &mut Frame<'_>) {
    let area = f.area();
    let block = Block::default()
        .title("Parkmap")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area).inner(Margin::new(1, 0));
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(2),
        ])
        .split(inner);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(SIDE_PANEL_WIDTH)])
        .split(rows[1]);

    let scene = app.scene();
    render_header(app, f, rows[0]);
    render_canvas(&scene, app.pulse(), f, body[0]);
    render_panel(&scene, f, body[1]);
    render_footer(app, f, rows[2]);
}

fn render_header(app: &WebApp, f: &mut Frame<'_>, area: Rect) {
    let mut spans = vec![Span::styled(
        format!("{} lots  ", app.map.registry.len()),
        Style::default().fg(Color::White),
    )];
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
        Style::default().fg(Color::Gray),
    ));
    if app.map.is_busy() {
        spans.push(Span::styled("  loading…", Style::default().fg(Color::Cyan)));
    }
    f.render_widget(Paragraph::new(TextLine::from(spans)), area);
}

fn render_canvas(scene: &Scene, pulse: f64, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(" zoom {} ", scene.viewport.zoom))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    if inner.width == 0 || inner.height == 0 {
        f.render_widget(block, area);
        return;
    }

    let bounds = scene.viewport.bounds(
        f64::from(inner.width),
        f64::from(inner.height) * CELL_ASPECT,
    );
    let cell_width = (bounds.east - bounds.west) / f64::from(inner.width);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([bounds.west, bounds.east])
        .y_bounds([bounds.south, bounds.north])
        .paint(|ctx| {
            if let Some(outline) = &scene.highlight {
                draw_path(ctx, outline, Color::Gray);
            }
            if let Some(path) = &scene.route {
                draw_path(ctx, path, Color::Cyan);
            }
            for marker in scene.markers.iter().filter(|marker| marker.selected) {
                ctx.draw(&Circle {
                    x: marker.position.lng,
                    y: marker.position.lat,
                    radius: cell_width * pulse.mul_add(2.0, 1.0),
                    color: status_color(marker.status),
                });
            }

            ctx.layer();

            for marker in &scene.markers {
                let symbol = if marker.selected { "◆" } else { "●" };
                ctx.print(
                    marker.position.lng,
                    marker.position.lat,
                    Span::styled(symbol, Style::default().fg(status_color(marker.status))),
                );
            }
            if let Some(pin) = scene.search_pin {
                ctx.print(pin.lng, pin.lat, Span::styled("✚", Style::default().fg(Color::Magenta)));
            }
            if let Some(destination) = scene.destination {
                ctx.print(
                    destination.lng,
                    destination.lat,
                    Span::styled("⚑", Style::default().fg(Color::Cyan)),
                );
            }
            if let Some(user) = scene.user {
                ctx.print(user.lng, user.lat, Span::styled("◉", Style::default().fg(Color::LightBlue)));
            }
        });
    f.render_widget(canvas, area);
}

fn draw_path(ctx: &mut Context<'_>, points: &[Coord], color: Color) {
    for pair in points.windows(2) {
        ctx.draw(&CanvasLine {
            x1: pair[0].lng,
            y1: pair[0].lat,
            x2: pair[1].lng,
            y2: pair[1].lat,
            color,
        });
    }
}

fn detail_lines(detail: &LotDetail, confirm_open: bool) -> Vec<TextLine<'static>> {
    let label = Style::default().fg(Color::Gray);
    let mut lines = vec![
        TextLine::from(Span::styled(
            detail.name.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(detail.address.clone()),
        TextLine::from(""),
        TextLine::from(vec![
            Span::styled("Free   ", label),
            Span::styled(
                detail.occupancy.clone(),
                Style::default().fg(status_color(detail.status)),
            ),
            Span::raw(
                detail
                    .percentage
                    .map_or_else(String::new, |pct| format!(" ({pct:.1}%)")),
            ),
        ]),
        TextLine::from(vec![
            Span::styled("Status ", label),
            Span::raw(detail.status.label()),
        ]),
        TextLine::from(vec![
            Span::styled("Hours  ", label),
            Span::raw(detail.business_hours.clone()),
        ]),
        TextLine::from(vec![
            Span::styled("Rates  ", label),
            Span::raw(format!("{} / {}", detail.weekdays, detail.holiday)),
        ]),
    ];
    if let Some(distance) = detail.distance_km {
        lines.push(TextLine::from(vec![
            Span::styled("Away   ", label),
            Span::raw(format!("{distance:.2} km")),
        ]));
    }
    lines.push(TextLine::from(vec![
        Span::styled("As of  ", label),
        Span::raw(detail.update_time.clone()),
    ]));

    if confirm_open {
        lines.push(TextLine::from(""));
        lines.push(TextLine::from(Span::styled(
            "Navigate here? Enter: yes  Esc: no",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
    }
    lines
}

fn render_panel(scene: &Scene, f: &mut Frame<'_>, area: Rect) {
    let (title, text, border) = if let Some(detail) = &scene.detail {
        (
            format!(" Lot {} ", detail.id),
            Text::from(detail_lines(detail, scene.confirm_open)),
            status_color(detail.status),
        )
    } else {
        let legend = OccupancyStatus::ALL
            .iter()
            .map(|status| {
                TextLine::from(vec![
                    Span::styled("● ", Style::default().fg(status_color(*status))),
                    Span::raw(status.label()),
                ])
            })
            .collect::<Vec<_>>();
        (" Legend ".to_string(), Text::from(legend), Color::Gray)
    };

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_footer(app: &WebApp, f: &mut Frame<'_>, area: Rect) {
    let hint = Style::default().fg(Color::Gray);
    let line = if let Some(text) = &app.search {
        TextLine::from(vec![
            Span::styled(
                "Destination: ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{text}_")),
            Span::styled("   Enter: search   Esc: cancel", hint),
        ])
    } else if let Some(notice) = &app.map.notice {
        let color = match notice {
            Notice::Info(_) => Color::Cyan,
            Notice::Warning(_) => Color::LightRed,
        };
        TextLine::from(vec![
            Span::styled(notice.text().to_string(), Style::default().fg(color)),
            Span::styled("   Esc: dismiss", hint),
        ])
    } else {
        TextLine::from(Span::styled(
            "/ search  Tab/p next/prev lot  Arrows pan  +/- zoom  r refresh  Space pause",
            hint,
        ))
    };

    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
