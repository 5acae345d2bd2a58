//! Anonrelay bot application library
//!
//! Command layer, configuration loading, and the console loopback transport
//! wired around the `anonrelay-core` engine.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;

pub use app::BotApp;
pub use cli::Cli;
pub use config::AppConfig;
pub use console::ConsoleTransport;
pub use error::{BotError, Result};
