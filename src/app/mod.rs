//! Application state and core logic

pub mod screen;
pub mod state;

pub use screen::{AppCoordinator, Screen};
pub use state::{GameSession, Phase};
