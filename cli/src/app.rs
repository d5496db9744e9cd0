//! Application context — unified state passed to every command handler.

use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Unified application context passed to every command handler.
///
/// Constructed once in `Cli::run()` and passed as `&AppContext` to all
/// command handlers.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// When `true`, skip interactive prompts.
    ///
    /// Set when the `CI` or `CONFLEET_YES` environment variables are present;
    /// per-command `--yes` flags layer on top.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(json: bool, quiet: bool, no_color: bool) -> Self {
        let non_interactive = std::env::var("CI").is_ok() || std::env::var("CONFLEET_YES").is_ok();
        let mode = if json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(no_color, quiet),
            mode,
            non_interactive,
        }
    }
}
