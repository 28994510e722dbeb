use irc::client::Client;

use crate::Error;

/// The host's capability to post a line of text to a chat channel.
///
/// Plugins depend on this instead of the concrete IRC client so their logic
/// can run against a recording sender in tests.
pub trait ChatSender {
    /// Sends `text` to `channel`.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be queued for delivery.
    fn send(&self, channel: &str, text: &str) -> Result<(), Error>;
}

impl ChatSender for Client {
    fn send(&self, channel: &str, text: &str) -> Result<(), Error> {
        self.send_privmsg(channel, text)?;

        Ok(())
    }
}
