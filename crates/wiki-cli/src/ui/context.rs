//! Terminal detection for UI decisions.

use std::io::IsTerminal;

/// Terminal and environment context for stderr rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    /// Whether color output is enabled
    pub color: bool,
}

impl UiContext {
    /// Color is disabled by `--no-color`, `NO_COLOR`, `TERM=dumb`, or a
    /// non-TTY stderr.
    pub fn from_env(no_color_flag: bool) -> Self {
        let is_tty = std::io::stderr().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        let no_color_env = std::env::var_os("NO_COLOR").is_some();
        Self::resolve(is_tty, no_color_flag, no_color_env, term_is_dumb)
    }

    pub fn resolve(is_tty: bool, no_color_flag: bool, no_color_env: bool, term_is_dumb: bool) -> Self {
        Self {
            color: is_tty && !no_color_flag && !no_color_env && !term_is_dumb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_needs_tty() {
        assert!(!UiContext::resolve(false, false, false, false).color);
        assert!(UiContext::resolve(true, false, false, false).color);
    }

    #[test]
    fn test_context_carries_only_color() {
        assert_eq!(
            UiContext::resolve(true, false, false, false),
            UiContext { color: true }
        );
    }

    #[test]
    fn test_color_opt_outs() {
        assert!(!UiContext::resolve(true, true, false, false).color);
        assert!(!UiContext::resolve(true, false, true, false).color);
        assert!(!UiContext::resolve(true, false, false, true).color);
    }
}
