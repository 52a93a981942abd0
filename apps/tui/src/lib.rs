// Infrastructure shared by the terminal UI, headless mode and tests
pub mod config;
pub mod db;
pub mod logger;
pub mod net;
