//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream, Style};

/// Check mark used in summaries
pub const CHECK: &str = "✓";

/// Cross used for failures
pub const CROSS: &str = "✗";

/// Semantic styles for CLI output
///
/// Colors are dropped automatically when the stream isn't a terminal.
pub trait Stylize: std::fmt::Display + Sized {
    /// Apply `style` if stdout supports color
    fn styled(&self, style: Style) -> String {
        format!(
            "{}",
            self.if_supports_color(Stream::Stdout, |s| s.style(style))
        )
    }

    /// Bold
    fn emphasis(&self) -> String {
        self.styled(Style::new().bold())
    }

    /// Cyan, for shas and names
    fn accent(&self) -> String {
        self.styled(Style::new().cyan())
    }

    /// Green
    fn success(&self) -> String {
        self.styled(Style::new().green())
    }

    /// Yellow
    fn warn(&self) -> String {
        self.styled(Style::new().yellow())
    }

    /// Red
    fn error(&self) -> String {
        self.styled(Style::new().red().bold())
    }

    /// Dimmed
    fn muted(&self) -> String {
        self.styled(Style::new().dimmed())
    }
}

impl<T: std::fmt::Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Red cross
pub fn cross() -> String {
    CROSS.error()
}

/// Dimmed arrow for list items
pub fn arrow() -> String {
    "→".muted()
}

/// Spinner shown while waiting for CI
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("  {spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

/// Render `text` as a hyperlink to `url` when the terminal supports it
pub fn link(text: &str, url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        terminal_link::Link::new(text, url).to_string()
    } else {
        format!("{text} ({url})")
    }
}
