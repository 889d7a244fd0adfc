use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::args::Cli;
use crate::config::LoggingSettings;

/// CLI flags win over the configured level.
pub fn level_from_cli(cli: &Cli, settings: &LoggingSettings) -> tracing::Level {
    if cli.debug {
        tracing::Level::DEBUG
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        settings.level.parse().unwrap_or(tracing::Level::WARN)
    }
}

pub fn init(level: tracing::Level) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("cyberscan={}", level).parse()?)
        .add_directive(level.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn settings(level: &str) -> LoggingSettings {
        LoggingSettings {
            level: level.to_string(),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["cyberscan", "--debug", "engines"]);
        assert_eq!(level_from_cli(&cli, &settings("error")), tracing::Level::DEBUG);

        let cli = Cli::parse_from(["cyberscan", "-v", "engines"]);
        assert_eq!(level_from_cli(&cli, &settings("error")), tracing::Level::INFO);
    }

    #[test]
    fn test_config_level_and_fallback() {
        let cli = Cli::parse_from(["cyberscan", "engines"]);
        assert_eq!(level_from_cli(&cli, &settings("error")), tracing::Level::ERROR);
        assert_eq!(level_from_cli(&cli, &settings("loud")), tracing::Level::WARN);
    }
}
