use console::{style, Color};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::server::AskResponse;

pub struct OutputFormatter {
    use_colors: bool,
}

/// Stderr spinner shown while waiting on the completion service.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "]),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn stop(self) {
        self.bar.finish_and_clear();
    }
}

impl OutputFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn format_response(&self, response: &AskResponse) -> String {
        match response {
            AskResponse::Reply(text) => text.clone(),
            AskResponse::Error(text) => self.format_error(text),
        }
    }

    pub fn format_check(&self, ok: bool, message: &str) -> String {
        if ok {
            format!("{} {}", self.style_text("✓", Color::Green), message)
        } else {
            format!("{} {}", self.style_text("✗", Color::Red), message)
        }
    }

    pub fn format_heading(&self, text: &str) -> String {
        self.style_text(text, Color::Cyan)
    }

    pub fn format_error(&self, message: &str) -> String {
        format!("{} {}", self.style_text("Error:", Color::Red), message)
    }

    pub fn format_success(&self, message: &str) -> String {
        format!("{} {}", self.style_text("✓", Color::Green), message)
    }

    pub fn format_warning(&self, message: &str) -> String {
        format!("{} {}", self.style_text("⚠", Color::Yellow), message)
    }

    pub fn format_info(&self, message: &str) -> String {
        format!("{} {}", self.style_text("ℹ", Color::Blue), message)
    }

    fn style_text(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            style(text).fg(color).force_styling(true).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}
