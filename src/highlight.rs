use inksac::prelude::*;

use crate::core::commands::COMMAND_NAMES;

#[derive(Debug, Clone, Copy)]
pub struct SyntaxHighlighter {
    color_support: ColorSupport,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    /// Styles output if the terminal supports it.
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    /// Never styles. Used when output is not a terminal.
    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    fn enabled(&self) -> bool {
        !matches!(self.color_support, ColorSupport::NoColor)
    }

    /// Colours a recognised command word and any `--flag` tokens.
    /// Spacing is preserved so the line keeps its width.
    pub fn highlight_command(&self, input: &str) -> String {
        if !self.enabled() {
            return input.to_string();
        }

        let mut seen_command = false;
        input
            .split(' ')
            .map(|word| {
                if word.is_empty() {
                    return String::new();
                }
                if !seen_command {
                    seen_command = true;
                    if COMMAND_NAMES.contains(&word) {
                        let command_style =
                            Style::builder().foreground(Color::Cyan).bold().build();
                        return word.style(command_style).to_string();
                    }
                    return word.to_string();
                }
                if word.starts_with("--") {
                    let flag_style = Style::builder().foreground(Color::Yellow).build();
                    return word.style(flag_style).to_string();
                }
                word.to_string()
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn highlight_error(&self, error: &str) -> String {
        if !self.enabled() {
            return error.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();
        error.style(error_style).to_string()
    }

    pub fn highlight_success(&self, message: &str) -> String {
        if !self.enabled() {
            return message.to_string();
        }

        let success_style = Style::builder().foreground(Color::Green).build();
        message.style(success_style).to_string()
    }

    pub fn highlight_hint(&self, hint: &str) -> String {
        if !self.enabled() {
            return hint.to_string();
        }

        let hint_style = Style::builder()
            .foreground(Color::RGB(128, 128, 128))
            .build();
        hint.style(hint_style).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_is_identity() {
        let highlighter = SyntaxHighlighter::plain();
        assert_eq!(highlighter.highlight_command("cp  a   b"), "cp  a   b");
        assert_eq!(highlighter.highlight_error("Operation failed"), "Operation failed");
    }
}
