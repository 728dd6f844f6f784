//! Log verbosity and subscriber setup.
//!
//! The pipeline logs through `tracing` macros only. The binary installs a
//! stderr subscriber whose level comes from [`Verbosity`]; `trace!` carries
//! the `verbose` level. `TSJSC_LOG` overrides the filter when set.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Once;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable with an `EnvFilter` directive string.
pub const LOG_ENV: &str = "TSJSC_LOG";

static INIT: Once = Once::new();

/// Log levels in increasing order of detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Verbose,
}

impl Verbosity {
    /// Flag priority: `debug` > `verbose` > configured value > `info`.
    pub fn resolve(debug: bool, verbose: bool, configured: Option<Verbosity>) -> Self {
        if debug {
            Self::Debug
        } else if verbose {
            Self::Verbose
        } else {
            configured.unwrap_or_default()
        }
    }

    pub fn level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
            Self::Verbose => LevelFilter::TRACE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Verbose => "verbose",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "verbose" => Ok(Self::Verbose),
            other => Err(format!("unknown verbosity '{}'", other)),
        }
    }
}

/// Install the global stderr subscriber. Later calls are no-ops.
pub fn init(verbosity: Verbosity) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::default().add_directive(verbosity.level_filter().into()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_priority() {
        assert_eq!(Verbosity::resolve(true, true, None), Verbosity::Debug);
        assert_eq!(Verbosity::resolve(false, true, Some(Verbosity::Error)), Verbosity::Verbose);
        assert_eq!(Verbosity::resolve(false, false, Some(Verbosity::Warn)), Verbosity::Warn);
        assert_eq!(Verbosity::resolve(false, false, None), Verbosity::Info);
    }

    #[test]
    fn test_ordering() {
        assert!(Verbosity::Error < Verbosity::Warn);
        assert!(Verbosity::Info < Verbosity::Debug);
        assert!(Verbosity::Debug < Verbosity::Verbose);
    }

    #[test]
    fn test_level_filters() {
        assert_eq!(Verbosity::Verbose.level_filter(), LevelFilter::TRACE);
        assert_eq!(Verbosity::Info.level_filter(), LevelFilter::INFO);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("verbose".parse::<Verbosity>(), Ok(Verbosity::Verbose));
        assert!("loud".parse::<Verbosity>().is_err());
    }
}
