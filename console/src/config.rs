//! Command-line and environment configuration for the console.

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub verbosity: u8,
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            base_url: matches
                .get_one::<String>("base-url")
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --base-url"))?,
            verbosity: matches.get_count("verbose"),
        })
    }

    /// Default filter directive when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

pub fn new() -> Command {
    Command::new("account-console")
        .about("Terminal client for the account demo service")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .help("Backend base URL; requests go to <base-url>/api")
                .env("API_BASE_URL")
                .default_value(DEFAULT_BASE_URL),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity, may be repeated")
                .action(ArgAction::Count),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let matches = new().try_get_matches_from(["account-console"]).unwrap();
        let config = Config::from_matches(&matches).unwrap();
        // API_BASE_URL may be set in the environment running the tests.
        assert!(!config.base_url.is_empty());
        assert_eq!(config.verbosity, 0);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn explicit_base_url_and_verbosity() {
        let matches = new()
            .try_get_matches_from(["account-console", "--base-url", "http://backend:9000", "-vv"])
            .unwrap();
        let config = Config::from_matches(&matches).unwrap();
        assert_eq!(config.base_url, "http://backend:9000");
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.log_level(), "trace");
    }
}
