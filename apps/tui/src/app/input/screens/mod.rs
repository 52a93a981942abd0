use crate::app::state::{App, AppScreen, InputMode};
use crossterm::event::KeyCode;
use parkmap_core::Event;

mod help;
mod lots;
mod map;

pub fn dispatch_input(app: &mut App, key: KeyCode) -> Vec<Event> {
    match app.input_mode {
        InputMode::Search => return map::handle_search_input(app, key),
        InputMode::Filter => {
            lots::handle_filter_input(app, key);
            return Vec::new();
        }
        InputMode::Normal => {}
    }

    if help::handle_help_toggle(app, key) {
        return Vec::new();
    }

    match key {
        KeyCode::Char('q') => {
            app.running = false;
            return Vec::new();
        }
        KeyCode::Char('1') => {
            app.screen = AppScreen::Map;
            return Vec::new();
        }
        KeyCode::Char('2') => {
            app.screen = AppScreen::Lots;
            return Vec::new();
        }
        KeyCode::Char('r') => return vec![Event::RefreshRequested],
        _ => {}
    }

    match app.screen {
        AppScreen::Map => map::handle_map_input(app, key),
        AppScreen::Lots => lots::handle_lots_input(app, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkmap_core::Settings;

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = App::new(&Settings::default(), false);

        assert!(dispatch_input(&mut app, KeyCode::Char('?')).is_empty());
        assert!(app.show_help);
        assert!(dispatch_input(&mut app, KeyCode::Char('r')).is_empty());
        assert!(app.running);

        dispatch_input(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        assert_eq!(dispatch_input(&mut app, KeyCode::Char('r')), vec![Event::RefreshRequested]);
    }

    #[test]
    fn number_keys_switch_screens() {
        let mut app = App::new(&Settings::default(), false);
        dispatch_input(&mut app, KeyCode::Char('2'));
        assert_eq!(app.screen, AppScreen::Lots);
        dispatch_input(&mut app, KeyCode::Char('1'));
        assert_eq!(app.screen, AppScreen::Map);
    }

    #[test]
    fn typed_text_is_not_a_command() {
        let mut app = App::new(&Settings::default(), false);
        dispatch_input(&mut app, KeyCode::Char('/'));
        for ch in "q?2".chars() {
            dispatch_input(&mut app, KeyCode::Char(ch));
        }
        assert!(app.running);
        assert!(!app.show_help);
        assert_eq!(app.screen, AppScreen::Map);
        assert_eq!(app.search_input, "q?2");
    }
}
