//! Plugin interface shared between the bot and its plugins.

mod error;
mod plugin;
mod sender;
mod types;

pub use error::Error;
pub use plugin::Plugin;
pub use sender::ChatSender;
pub use types::{Author, Name, Version};
