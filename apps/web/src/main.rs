mod animation;
mod app;
mod config;
mod effects;
mod logger;
mod net;
mod view;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use app::{handle_key, WebApp};
use config::load_page_config;
use effects::{dispatch, run_all};
use logger::ConsoleLog;
use net::WebServices;
use parkmap_core::Event;
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

fn main() -> io::Result<()> {
    let config = load_page_config();
    ConsoleLog::init(config.debug);
    log::info!("parkmap web {} starting", env!("CARGO_PKG_VERSION"));

    let app = Rc::new(RefCell::new(WebApp::new(&config.settings, js_sys::Date::now())));
    let services = Rc::new(WebServices::new(config.settings));

    let effects = app.borrow_mut().map.start();
    run_all(&app, &services, effects);

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let app = Rc::clone(&app);
        let services = Rc::clone(&services);
        move |event| {
            let events = handle_key(&mut app.borrow_mut(), event.code);
            for event in events {
                dispatch(&app, &services, event);
            }
        }
    });

    terminal.draw_web(move |f| {
        let now = js_sys::Date::now();
        let refresh = {
            let mut state = app.borrow_mut();
            state.tick(now);
            state.take_refresh(now)
        };
        if refresh {
            dispatch(&app, &services, Event::RefreshRequested);
        }

        view::render(&app.borrow(), f);
    });

    Ok(())
}
