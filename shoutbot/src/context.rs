use crate::Config;

/// Shared context for plugin invocations.
pub struct Context {
    /// The bot configuration.
    pub config: Config,
}

impl Context {
    /// Creates a new context.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}
