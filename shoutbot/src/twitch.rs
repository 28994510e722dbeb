//! Helpers for the Twitch flavour of IRC.
//!
//! Twitch attaches IRCv3 tags to every `PRIVMSG` once the `twitch.tv/tags` capability has been
//! requested. The ones used here are `badges`, `mod` and `display-name`.

use irc::proto::Message;

/// Returns the value of the tag named `key`, if present and non-empty.
#[must_use]
pub fn tag<'a>(message: &'a Message, key: &str) -> Option<&'a str> {
    message
        .tags
        .as_ref()?
        .iter()
        .find(|tag| tag.0 == key)
        .and_then(|tag| tag.1.as_deref())
        .filter(|value| !value.is_empty())
}

/// Returns the user's display name, which differs from the login only in case.
#[must_use]
pub fn display_name(message: &Message) -> Option<&str> {
    let display_name = tag(message, "display-name")?;
    let login = message.source_nickname()?;

    // Localized display names can differ entirely from the login.
    display_name
        .eq_ignore_ascii_case(login)
        .then_some(display_name)
}

/// Returns `true` if the sender of `message` moderates `channel`.
#[must_use]
pub fn is_moderator(message: &Message, channel: &str) -> bool {
    if tag(message, "mod") == Some("1") {
        return true;
    }

    let has_badge = tag(message, "badges").is_some_and(|badges| {
        badges.split(',').any(|badge| {
            let name = badge.split('/').next().unwrap_or_default();

            name == "broadcaster" || name == "moderator"
        })
    });

    has_badge
        || message
            .source_nickname()
            .is_some_and(|nick| nick.eq_ignore_ascii_case(channel.trim_start_matches('#')))
}
