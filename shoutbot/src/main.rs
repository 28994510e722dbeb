use std::path::PathBuf;

use argh::FromArgs;
use miette::WrapErr;
use tracing::info;

use shoutbot::{Bot, Config};

/// Twitch chat bot that shouts out other streamers
#[derive(Debug, FromArgs)]
struct Opts {
    /// path to config file
    #[argh(option, short = 'c', default = "PathBuf::from(\"config.toml\")")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Parse command-line arguments
    let opts: Opts = argh::from_env();

    // Load the config file, with environment variables taking precedence
    let config = Config::load(&opts.config)
        .wrap_err_with(|| format!("loading {}", opts.config.display()))?;

    // Initialize logging
    let telemetry = shoutbot::telemetry::try_init(&config.tracing)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %opts.config.display(),
        "starting {}",
        env!("CARGO_PKG_NAME")
    );

    let bot = Bot::new(config);

    let result = bot.run().await;

    telemetry.shutdown();
    result?;

    Ok(())
}
