use color_eyre::Result;
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use parkmap_core::Event;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::{handle_input, handle_mouse, App, AppMessage, Dispatcher};
use crate::ui;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    dispatcher: &mut Dispatcher,
    rx: &mut UnboundedReceiver<AppMessage>,
) -> Result<()> {
    let effects = app.map.start();
    dispatcher.run_all(effects);

    while app.running {
        app.update();

        let mut frame_area = Rect::default();
        terminal
            .draw(|f| {
                frame_area = f.area();
                ui::ui(app, f);
            })
            .map_err(|e| color_eyre::eyre::eyre!("Terminal draw error: {e}"))?;
        app.frame_area = frame_area;

        if event::poll(EVENT_POLL_TIMEOUT)? {
            match event::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    let events = handle_input(app, key.code);
                    apply_events(app, dispatcher, events);
                }
                TermEvent::Mouse(mouse) => {
                    let events = handle_mouse(app, mouse);
                    apply_events(app, dispatcher, events);
                }
                // The next draw picks up the new size
                _ => {}
            }
        }

        while let Ok(message) = rx.try_recv() {
            match message {
                AppMessage::Map(event) => apply_events(app, dispatcher, vec![event]),
                AppMessage::History { id, free_counts } => app.set_history(id, free_counts),
            }
        }

        if app.take_refresh(Instant::now()) {
            apply_events(app, dispatcher, vec![Event::RefreshRequested]);
        }

        if let Some(id) = app.take_history_request() {
            dispatcher.load_history(id);
        }

        // Let the spawned requests make progress between frames
        tokio::task::yield_now().await;
    }

    Ok(())
}

fn apply_events(app: &mut App, dispatcher: &mut Dispatcher, events: Vec<Event>) {
    for event in events {
        let effects = app.apply(event);
        dispatcher.run_all(effects);
    }
}
