mod helpers;
pub mod screens;

use crate::app::state::{App, AppScreen};
use crate::ui::screens::map::layout;
use crate::ui::widgets::map_canvas::map_bounds;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use parkmap_core::Event;

/// Handles one key press and returns the map events it produced.
pub fn handle_input(app: &mut App, key: KeyCode) -> Vec<Event> {
    screens::dispatch_input(app, key)
}

/// A left click on the map canvas selects the marker under it (or clears
/// the selection); the scroll wheel zooms.
pub fn handle_mouse(app: &App, mouse: MouseEvent) -> Vec<Event> {
    if app.screen != AppScreen::Map || app.show_help {
        return Vec::new();
    }

    let canvas = layout(app.frame_area).canvas_inner();
    let inside = mouse.column >= canvas.x
        && mouse.column < canvas.x + canvas.width
        && mouse.row >= canvas.y
        && mouse.row < canvas.y + canvas.height;
    if !inside {
        return Vec::new();
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let bounds = map_bounds(&app.map.viewport, canvas);
            let x = (f64::from(mouse.column - canvas.x) + 0.5) / f64::from(canvas.width);
            let y = (f64::from(mouse.row - canvas.y) + 0.5) / f64::from(canvas.height);
            vec![Event::MapClicked {
                at: bounds.unproject(x, y),
                tolerance_km: bounds.km_per_unit(f64::from(canvas.width)) * CLICK_TOLERANCE_CELLS,
            }]
        }
        MouseEventKind::ScrollUp => vec![Event::Zoom(1)],
        MouseEventKind::ScrollDown => vec![Event::Zoom(-1)],
        _ => Vec::new(),
    }
}

/// How far from a marker a click may land, in cells.
const CLICK_TOLERANCE_CELLS: f64 = 1.5;
