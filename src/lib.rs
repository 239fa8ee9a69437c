// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod field;
pub mod game;
pub mod popup;
pub mod runtime;
pub mod session;
pub mod sound;
pub mod ui;
pub mod util;

pub use error::{GameError, Result};
