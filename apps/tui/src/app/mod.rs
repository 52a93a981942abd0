// Application state, key handling and the background task dispatcher

pub mod actions;
pub mod input;
pub mod lots;
pub mod state;

#[cfg(test)]
pub(crate) mod fixtures;

pub use actions::{AppMessage, Dispatcher};
pub use input::{handle_input, handle_mouse};
pub use state::App;
