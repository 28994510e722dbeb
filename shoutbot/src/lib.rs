//! A Twitch chat bot that shouts out other streamers.

mod bot;
pub mod command;
pub mod config;
pub mod consts;
mod context;
mod error;
pub mod plugin;
pub mod telemetry;
pub mod twitch;

pub use bot::Bot;
pub use config::Config;
pub use error::Error;
pub use plugin::Registry;
