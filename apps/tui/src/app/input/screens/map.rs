use crate::app::state::{App, InputMode};
use crossterm::event::KeyCode;
use parkmap_core::{Event, Phase};

/// Fraction of the visible span moved per pan key.
const PAN_STEP: f64 = 0.1;

pub fn handle_map_input(app: &mut App, key: KeyCode) -> Vec<Event> {
    match key {
        KeyCode::Char('/' | 's') => {
            app.input_mode = InputMode::Search;
            app.search_input.clear();
            Vec::new()
        }
        KeyCode::Enter => vec![Event::ConfirmNavigation],
        KeyCode::Esc => {
            if app.map.phase() == Phase::LotSelected {
                vec![Event::CancelNavigation]
            } else if app.map.notice.is_some() {
                vec![Event::DismissNotice]
            } else {
                vec![Event::BackgroundClicked]
            }
        }
        KeyCode::Char('c') => vec![Event::BackgroundClicked],
        KeyCode::Left | KeyCode::Char('h') => pan(-PAN_STEP, 0.0),
        KeyCode::Right | KeyCode::Char('l') => pan(PAN_STEP, 0.0),
        KeyCode::Up | KeyCode::Char('k') => pan(0.0, PAN_STEP),
        KeyCode::Down | KeyCode::Char('j') => pan(0.0, -PAN_STEP),
        KeyCode::Char('+' | '=') => vec![Event::Zoom(1)],
        KeyCode::Char('-') => vec![Event::Zoom(-1)],
        KeyCode::Tab => cycle_marker(app, true),
        KeyCode::BackTab => cycle_marker(app, false),
        _ => Vec::new(),
    }
}

pub fn handle_search_input(app: &mut App, key: KeyCode) -> Vec<Event> {
    match key {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
        }
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            return vec![Event::SearchSubmitted(std::mem::take(&mut app.search_input))];
        }
        KeyCode::Backspace => {
            app.search_input.pop();
        }
        KeyCode::Char(ch) => {
            app.search_input.push(ch);
        }
        _ => {}
    }
    Vec::new()
}

fn pan(east: f64, north: f64) -> Vec<Event> {
    vec![Event::Pan { east, north }]
}

fn cycle_marker(app: &App, forward: bool) -> Vec<Event> {
    app.map
        .cycle_target(forward)
        .map(Event::FocusLot)
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fixtures::app_with_lots;
    use parkmap_core::LotId;

    #[test]
    fn search_submits_the_typed_text() {
        let mut app = app_with_lots();
        assert!(handle_map_input(&mut app, KeyCode::Char('/')).is_empty());
        assert_eq!(app.input_mode, InputMode::Search);

        for ch in "Hsinchuu".chars() {
            handle_search_input(&mut app, KeyCode::Char(ch));
        }
        handle_search_input(&mut app, KeyCode::Backspace);
        let events = handle_search_input(&mut app, KeyCode::Enter);

        assert_eq!(events, vec![Event::SearchSubmitted("Hsinchu".to_string())]);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.search_input.is_empty());
    }

    #[test]
    fn escape_abandons_a_search() {
        let mut app = app_with_lots();
        handle_map_input(&mut app, KeyCode::Char('s'));
        handle_search_input(&mut app, KeyCode::Char('x'));
        assert!(handle_search_input(&mut app, KeyCode::Esc).is_empty());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.search_input.is_empty());
    }

    #[test]
    fn escape_steps_back_through_the_selection() {
        let mut app = app_with_lots();
        app.apply(Event::MarkerClicked(LotId("004".into())));
        assert_eq!(handle_map_input(&mut app, KeyCode::Esc), vec![Event::CancelNavigation]);

        app.apply(Event::CancelNavigation);
        app.map.notice = None;
        assert_eq!(handle_map_input(&mut app, KeyCode::Esc), vec![Event::BackgroundClicked]);
    }

    #[test]
    fn arrows_and_vim_keys_pan() {
        let mut app = app_with_lots();
        assert_eq!(
            handle_map_input(&mut app, KeyCode::Char('h')),
            vec![Event::Pan { east: -PAN_STEP, north: 0.0 }]
        );
        assert_eq!(
            handle_map_input(&mut app, KeyCode::Up),
            vec![Event::Pan { east: 0.0, north: PAN_STEP }]
        );
        assert_eq!(handle_map_input(&mut app, KeyCode::Char('-')), vec![Event::Zoom(-1)]);
    }

    #[test]
    fn tab_cycles_through_visible_markers() {
        let mut app = app_with_lots();
        let first = handle_map_input(&mut app, KeyCode::Tab);
        assert_eq!(first, vec![Event::FocusLot(LotId("004".into()))]);

        app.apply(first[0].clone());
        assert_eq!(
            handle_map_input(&mut app, KeyCode::Tab),
            vec![Event::FocusLot(LotId("011".into()))]
        );
        // The highlight around 004 hides the distant lot 031
        assert_eq!(
            handle_map_input(&mut app, KeyCode::BackTab),
            vec![Event::FocusLot(LotId("011".into()))]
        );
    }
}
