use std::borrow::Cow;
use std::path::Path;

use super::{command::CommandCompleter, path::PathCompleter};
use crate::highlight::SyntaxHighlighter;

use rustyline::{
    completion::{Completer, Pair},
    highlight::{CmdKind, Highlighter},
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

#[derive(Clone)]
pub struct ShellCompleter {
    command_completer: CommandCompleter,
    path_completer: PathCompleter,
    highlighter: SyntaxHighlighter,
}

impl ShellCompleter {
    pub fn new(root: &Path, cwd: &Path) -> Self {
        ShellCompleter {
            command_completer: CommandCompleter::new(),
            path_completer: PathCompleter::new(root, cwd),
            highlighter: SyntaxHighlighter::new(),
        }
    }

    /// Keeps path completion in step with the shell cursor.
    pub fn set_cwd(&mut self, cwd: &Path) {
        self.path_completer.set_cwd(cwd);
    }

    fn candidates(&self, line_up_to_cursor: &str, pos: usize) -> (usize, Vec<Pair>) {
        let mut words: Vec<&str> = line_up_to_cursor.split_whitespace().collect();
        if line_up_to_cursor.is_empty() || line_up_to_cursor.ends_with(char::is_whitespace) {
            words.push("");
        }

        let last_word = words.last().copied().unwrap_or("");
        let start = pos - last_word.len();

        let matches = match (words.len(), words.first().copied()) {
            (1, _) => self.command_completer.complete_command(last_word),
            (2, Some("os")) => self.command_completer.complete_os_flag(last_word),
            _ => self.path_completer.complete_path(last_word),
        };
        (start, matches)
    }
}

impl Helper for ShellCompleter {}

impl Highlighter for ShellCompleter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Owned(self.highlighter.highlight_command(line))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(self.highlighter.highlight_hint(hint))
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;
}

impl Validator for ShellCompleter {}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(&line[..pos], pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_word_completes_commands() {
        let missing = Path::new("/nonexistent");
        let completer = ShellCompleter::new(missing, missing);
        let (start, pairs) = completer.candidates("mk", 2);
        assert_eq!(start, 0);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].display, "mkdir");
    }

    #[test]
    fn test_os_argument_completes_flags() {
        let missing = Path::new("/nonexistent");
        let completer = ShellCompleter::new(missing, missing);
        let (start, pairs) = completer.candidates("os --h", 6);
        assert_eq!(start, 3);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].display, "--homedir");
    }

    #[test]
    fn test_later_words_complete_paths() -> Result<(), std::io::Error> {
        let temp = tempfile::tempdir()?;
        std::fs::write(temp.path().join("report.txt"), b"")?;
        let completer = ShellCompleter::new(temp.path(), temp.path());

        let line = "cat re";
        let (start, pairs) = completer.candidates(line, line.len());
        assert_eq!(start, 4);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].replacement, "report.txt ");
        Ok(())
    }
}
