use std::{ffi::OsString, time::Duration};

use pico_args::Arguments;
use thiserror::Error;

use crate::theater::play::scenario::DEFAULT_SETTLE;

pub const HELP: &str = "\
bandeau

plays scenarios of effects on a couple of simulated banners until you hit CTRL+C.

usage: bandeau [options] [MESSAGE]

Meta:
  -h --help            This menu.

Playback:
  --settle <ms>        How long a banner stays put after each scenario. Default 1000.
  --late-add <ms>      When to append the late element to the first scenario. Default 1000.

Logging:
  RUST_LOG=debug       Shows every lock hand-over, RUST_LOG=trace every frame.
";

pub const DEFAULT_MESSAGE: &str = "Démonstration du bandeau";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Args(#[from] pico_args::Error),
    #[error("Unknown arguments: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarqueeSettings {
    pub message: String,
    pub settle: Duration,
    pub late_add: Duration,
    pub help: bool,
}

impl Default for MarqueeSettings {
    fn default() -> Self {
        Self {
            message: DEFAULT_MESSAGE.to_owned(),
            settle: DEFAULT_SETTLE,
            late_add: Duration::from_millis(1000),
            help: false,
        }
    }
}

fn millis(value: &str) -> Result<Duration, &'static str> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| "expected a number of milliseconds")
}

impl MarqueeSettings {
    /// Read the process arguments; prints usage and exits on `--help` or on
    /// anything it can't make sense of.
    pub fn new() -> Self {
        match Self::from_args(std::env::args_os().skip(1).collect()) {
            Ok(settings) if settings.help => {
                eprintln!("{}", HELP);
                std::process::exit(0);
            }
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{}\n\n{}", e, HELP);
                std::process::exit(1);
            }
        }
    }

    pub fn from_args(args: Vec<OsString>) -> Result<Self, SettingsError> {
        let mut args = Arguments::from_vec(args);
        let defaults = Self::default();

        // Meta
        let help = args.contains(["-h", "--help"]);

        // Playback
        let settle = args
            .opt_value_from_fn("--settle", millis)?
            .unwrap_or(defaults.settle);
        let late_add = args
            .opt_value_from_fn("--late-add", millis)?
            .unwrap_or(defaults.late_add);

        // Free args
        let message: Option<String> = args.opt_free_from_str()?;

        let remaining = args.finish();
        if !remaining.is_empty() {
            let unknown: Vec<String> = remaining
                .iter()
                .map(|flag| format!("'{}'", flag.to_string_lossy()))
                .collect();
            return Err(SettingsError::Unknown(unknown.join(" ")));
        }

        Ok(Self {
            message: message.unwrap_or(defaults.message),
            settle,
            late_add,
            help,
        })
    }
}
