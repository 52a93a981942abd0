use crate::app::input::helpers::step_clamped;
use crate::app::lots::filter_markers;
use crate::app::state::{App, AppScreen, InputMode};
use crossterm::event::KeyCode;
use parkmap_core::Event;

const PAGE_ROWS: isize = 5;

pub fn handle_lots_input(app: &mut App, key: KeyCode) -> Vec<Event> {
    let total_rows = filter_markers(app.map.registry.all(), &app.lot_filter).len();

    match key {
        KeyCode::Esc => {
            if app.lot_filter.is_empty() {
                app.screen = AppScreen::Map;
            } else {
                app.lot_filter.clear();
                app.selected_lot_index = 0;
            }
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Filter;
        }
        KeyCode::Enter => {
            let focused = filter_markers(app.map.registry.all(), &app.lot_filter)
                .get(app.selected_lot_index)
                .map(|marker| marker.id.clone());
            if let Some(id) = focused {
                app.screen = AppScreen::Map;
                return vec![Event::FocusLot(id)];
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.selected_lot_index = step_clamped(app.selected_lot_index, -1, total_rows);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.selected_lot_index = step_clamped(app.selected_lot_index, 1, total_rows);
        }
        KeyCode::PageUp => {
            app.selected_lot_index = step_clamped(app.selected_lot_index, -PAGE_ROWS, total_rows);
        }
        KeyCode::PageDown => {
            app.selected_lot_index = step_clamped(app.selected_lot_index, PAGE_ROWS, total_rows);
        }
        KeyCode::Home => {
            app.selected_lot_index = 0;
        }
        KeyCode::End => {
            app.selected_lot_index = total_rows.saturating_sub(1);
        }
        _ => {}
    }

    Vec::new()
}

pub fn handle_filter_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => {
            app.lot_filter.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.lot_filter.pop();
        }
        KeyCode::Char(ch) => {
            app.lot_filter.push(ch);
        }
        _ => return,
    }
    app.selected_lot_index = 0;
}
