/// The values that can be substituted into a shoutout message.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    /// Replaces `{username}`.
    pub username: &'a str,
    /// Replaces `{displayName}`.
    pub display_name: &'a str,
    /// Replaces `{url}`.
    pub url: &'a str,
    /// Replaces `{gameInfo}`.
    pub game_info: &'a str,
}

/// Renders `template`, replacing every occurrence of each of the four placeholders.
///
/// Unknown placeholders are left as they are.
#[must_use]
pub fn render(template: &str, fields: &Fields<'_>) -> String {
    template
        .replace("{username}", fields.username)
        .replace("{displayName}", fields.display_name)
        .replace("{url}", fields.url)
        .replace("{gameInfo}", fields.game_info)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: Fields<'static> = Fields {
        username: "x",
        display_name: "X",
        url: "https://twitch.tv/x",
        game_info: "currently playing Chess",
    };

    #[test]
    fn it_should_substitute_game_info() {
        assert_eq!(
            render("Check out @{username} - {gameInfo}", &FIELDS),
            "Check out @x - currently playing Chess"
        );
    }

    #[test]
    fn it_should_replace_repeated_placeholders() {
        assert_eq!(
            render("{displayName} {displayName} {url}", &FIELDS),
            "X X https://twitch.tv/x"
        );
    }

    #[test]
    fn it_should_leave_unknown_placeholders() {
        assert_eq!(
            render("{username} plays {game} {gameinfo}", &FIELDS),
            "x plays {game} {gameinfo}"
        );
    }
}
