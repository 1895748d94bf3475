//! Application state and screen flow

pub mod screen;
pub mod state;

pub use screen::{AppCoordinator, MenuOption, Screen, SlotAction};
pub use state::App;
