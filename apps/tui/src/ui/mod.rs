// Rendering of the map, lot list and help screens

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    match app.screen {
        AppScreen::Map => screens::map::render_map_screen(app, f),
        AppScreen::Lots => screens::lots::render_lots_screen(app, f),
    }

    if app.show_help {
        screens::help::render_help(f);
    }
}
