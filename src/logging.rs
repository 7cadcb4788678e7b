//! Logging setup.
//!
//! Line-based, human-readable log on stdout with a timestamp and level on
//! every line. Installed once at process start from an explicit
//! [`LoggingConfig`]; nothing reconfigures it afterwards.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How the process-wide subscriber is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Include captured command output (debug level)
    pub verbose: bool,

    /// Colorize levels
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// Filter directive used when RUST_LOG is not set
    pub fn default_directive(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    tracing_subscriber::registry()
        .with(config.filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(config.ansi)
                .with_target(false),
        )
        .try_init()
        .context("Failed to initialize logging")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(LoggingConfig::default().default_directive(), "info");

        let verbose = LoggingConfig {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(verbose.default_directive(), "debug");
    }

    #[test]
    fn test_init_twice_fails() {
        let config = LoggingConfig {
            ansi: false,
            ..Default::default()
        };
        // Another test may have installed a subscriber first
        let _ = init(&config);
        assert!(init(&config).is_err());
    }
}
