use parkmap_core::scene::{Bounds, Scene, Viewport};
use parkmap_core::{Coord, OccupancyStatus};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

pub const fn status_color(status: OccupancyStatus) -> Color {
    match status {
        OccupancyStatus::High => Color::Green,
        OccupancyStatus::Medium => Color::Yellow,
        OccupancyStatus::Low => Color::LightRed,
        OccupancyStatus::Zero => Color::Red,
    }
}

/// Geographic bounds shown by a canvas whose drawable area is `inner`.
pub fn map_bounds(viewport: &Viewport, inner: Rect) -> Bounds {
    viewport.bounds(f64::from(inner.width), f64::from(inner.height) * CELL_ASPECT)
}

/// Draws the scene. `pulse` runs 0..=1 and sizes the ring around the
/// selected marker.
pub fn render_map(f: &mut Frame<'_>, area: Rect, scene: &Scene, pulse: f64) {
    let block = Block::default()
        .title(format!(
            " Map · {:.4}, {:.4} · zoom {} ",
            scene.viewport.center.lat, scene.viewport.center.lng, scene.viewport.zoom
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    if inner.width == 0 || inner.height == 0 {
        f.render_widget(block, area);
        return;
    }

    let bounds = map_bounds(&scene.viewport, inner);
    let cell_width = (bounds.east - bounds.west) / f64::from(inner.width);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([bounds.west, bounds.east])
        .y_bounds([bounds.south, bounds.north])
        .paint(|ctx| {
            if let Some(outline) = &scene.highlight {
                draw_path(ctx, outline, Color::DarkGray);
            }
            if let Some(path) = &scene.route {
                draw_path(ctx, path, Color::Cyan);
            }

            for marker in scene.markers.iter().filter(|marker| marker.selected) {
                ctx.draw(&Circle {
                    x: marker.position.lng,
                    y: marker.position.lat,
                    radius: cell_width * pulse.mul_add(1.5, 1.0),
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
                print_symbol(ctx, pin, "✚", Color::Magenta);
            }
            if let Some(destination) = scene.destination {
                print_symbol(ctx, destination, "⚑", Color::Cyan);
            }
            if let Some(user) = scene.user {
                print_symbol(ctx, user, "◉", Color::LightBlue);
            }

            for marker in scene.markers.iter().filter(|marker| marker.selected) {
                ctx.print(
                    marker.position.lng + cell_width * 2.0,
                    marker.position.lat,
                    Span::styled(
                        marker.label.clone(),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                );
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

fn print_symbol(ctx: &mut Context<'_>, at: Coord, symbol: &'static str, color: Color) {
    ctx.print(
        at.lng,
        at.lat,
        Span::styled(
            symbol,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_follow_the_cell_aspect() {
        let viewport = Viewport::new(Coord::new(0.0, 0.0), 15);
        let bounds = map_bounds(&viewport, Rect::new(0, 0, 80, 20));

        let lng_span = bounds.east - bounds.west;
        let lat_span = bounds.north - bounds.south;
        // 20 rows of double-height cells against 80 columns
        assert!((lat_span / lng_span - 0.5).abs() < 1e-9);
        assert!(bounds.contains(viewport.center));
    }

    #[test]
    fn colors_rank_by_availability() {
        assert_eq!(status_color(OccupancyStatus::High), Color::Green);
        assert_eq!(status_color(OccupancyStatus::Zero), Color::Red);
    }
}
