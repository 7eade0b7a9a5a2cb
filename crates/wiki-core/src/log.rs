//! Logger seam for core components.
//!
//! Core code reports events; it never decides whether they are shown.
//! The CLI picks the threshold and installs the subscriber.

/// Verbosity levels, ordered `Quiet < Info < Verbose < Debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Quiet,
    #[default]
    Info,
    Verbose,
    Debug,
}

impl LogLevel {
    /// Resolve the threshold from CLI flags. `--debug` wins over
    /// `--verbose`, which wins over `--quiet`.
    pub fn from_flags(quiet: bool, verbose: bool, debug: bool) -> Self {
        if debug {
            LogLevel::Debug
        } else if verbose {
            LogLevel::Verbose
        } else if quiet {
            LogLevel::Quiet
        } else {
            LogLevel::Info
        }
    }

    /// Whether a message at `target` passes this threshold.
    pub fn allows(self, target: LogLevel) -> bool {
        self != LogLevel::Quiet && target != LogLevel::Quiet && self >= target
    }
}

/// Sink for leveled log messages.
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

/// Forwards messages to `tracing` events.
///
/// `Info` maps to `INFO`, `Verbose` to `DEBUG`, `Debug` to `TRACE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Quiet => {}
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Verbose => tracing::debug!("{}", message),
            LogLevel::Debug => tracing::trace!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_precedence() {
        assert_eq!(LogLevel::from_flags(false, false, false), LogLevel::Info);
        assert_eq!(LogLevel::from_flags(true, false, false), LogLevel::Quiet);
        assert_eq!(LogLevel::from_flags(true, true, false), LogLevel::Verbose);
        assert_eq!(LogLevel::from_flags(true, true, true), LogLevel::Debug);
    }

    #[test]
    fn test_allows() {
        assert!(LogLevel::Debug.allows(LogLevel::Verbose));
        assert!(LogLevel::Info.allows(LogLevel::Info));
        assert!(!LogLevel::Info.allows(LogLevel::Verbose));
        assert!(!LogLevel::Quiet.allows(LogLevel::Info));
    }
}
