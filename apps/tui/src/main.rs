mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::{App, Dispatcher};
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use event::HeadlessOptions;
use parkmap_tui::config::init_app_config;
use parkmap_tui::db::{count_snapshots, create_database_pool};
use parkmap_tui::logger::FileLog;
use parkmap_tui::net::Services;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = init_app_config()?;
    FileLog::init(&config.log_path, config.debug)?;
    log::info!("parkmap {} starting", env!("CARGO_PKG_VERSION"));

    let services = Services::new(config.settings.clone())?;

    // History is optional; the map works without it
    let pool = match create_database_pool(&config.database_url).await {
        Ok(pool) => {
            if let Ok(count) = count_snapshots(&pool).await {
                log::info!("occupancy history holds {count} readings");
            }
            Some(pool)
        }
        Err(e) => {
            log::warn!("occupancy history disabled: {e}");
            None
        }
    };

    if args.wants_headless() || !is_terminal() {
        let options = HeadlessOptions {
            json: args.json,
            near: args.near,
            search: args.search.clone(),
            history: args.history.clone(),
        };
        return event::run_headless(&services, pool.as_ref(), &options).await;
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut app = App::new(&config.settings, pool.is_some());
    let mut dispatcher = Dispatcher::new(Arc::new(services), pool, tx);

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app, &mut dispatcher, &mut rx).await;
    terminal::cleanup(true, true);

    log::logger().flush();
    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
