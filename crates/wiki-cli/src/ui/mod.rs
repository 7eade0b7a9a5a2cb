//! UI primitives for the wiki CLI.
//!
//! - **Context**: TTY and color detection for stderr
//! - **Mode**: JSON or plain output

mod context;
mod mode;

pub use context::UiContext;
pub use mode::OutputMode;

use owo_colors::{OwoColorize, Style};

/// Render an error line: `Error: <message>`.
pub fn error_message(ctx: &UiContext, message: &str) -> String {
    if ctx.color {
        let label = "Error:".style(Style::new().red().bold());
        format!("{} {}", label, message)
    } else {
        format!("Error: {}", message)
    }
}

/// Print an error message to stderr.
pub fn print_error(ctx: &UiContext, message: &str) {
    eprintln!("{}", error_message(ctx, message));
}
