use std::io::{self, Write};

use tracing::debug;

use crate::core::commands::{Command, CommandExecutor, CommandLine, Flow};
use crate::core::state::ShellState;
use crate::highlight::SyntaxHighlighter;

/// Turns input lines into commands and renders their outcome.
///
/// This is the only place failures reach the user, always as one of the two
/// undifferentiated notices.
pub struct Dispatcher {
    state: ShellState,
    executor: CommandExecutor,
    highlighter: SyntaxHighlighter,
}

impl Dispatcher {
    pub fn new(state: ShellState) -> Self {
        Self {
            state,
            executor: CommandExecutor::new(),
            highlighter: SyntaxHighlighter::plain(),
        }
    }

    pub fn with_highlighter(mut self, highlighter: SyntaxHighlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn greet(&self, out: &mut dyn Write) -> io::Result<()> {
        let greeting = self.state.session().greeting();
        writeln!(out, "{}", self.highlighter.highlight_success(&greeting))?;
        self.write_cursor(out)
    }

    /// Runs one line. Blank lines are ignored; every other line is followed by
    /// the current directory, except `.exit`.
    pub fn dispatch(&mut self, line: &str, out: &mut dyn Write) -> io::Result<Flow> {
        let Some(parsed) = CommandLine::parse(line) else {
            return Ok(Flow::Continue);
        };
        debug!(command = %parsed.name, args = ?parsed.args, "dispatch");

        let result = Command::from_line(&parsed)
            .and_then(|command| self.executor.execute(&mut self.state, &command, out));

        let flow = match result {
            Ok(flow) => flow,
            Err(err) => {
                debug!(command = %parsed.name, error = %err, "command failed");
                let notice = err.failure().to_string();
                writeln!(out, "{}", self.highlighter.highlight_error(&notice))?;
                Flow::Continue
            }
        };

        if flow == Flow::Continue {
            self.write_cursor(out)?;
        }
        out.flush()?;
        Ok(flow)
    }

    /// The exit procedure shared by `.exit`, end of input and interrupts.
    pub fn exit(&mut self, out: &mut dyn Write) -> io::Result<()> {
        if let Err(err) = self.executor.execute(&mut self.state, &Command::Exit, out) {
            debug!(error = %err, "exit failed");
        }
        out.flush()
    }

    fn write_cursor(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(
            out,
            "You are currently in {}",
            self.state.cursor().display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Session;
    use std::fs;
    use std::path::Path;

    fn run(dispatcher: &mut Dispatcher, line: &str) -> io::Result<(Flow, String)> {
        let mut out = Vec::new();
        let flow = dispatcher.dispatch(line, &mut out)?;
        Ok((flow, String::from_utf8_lossy(&out).into_owned()))
    }

    #[test]
    fn test_blank_line_is_silent() -> io::Result<()> {
        let mut dispatcher = Dispatcher::new(ShellState::new("/home/u", Session::default()));
        let (flow, text) = run(&mut dispatcher, "   ")?;
        assert_eq!(flow, Flow::Continue);
        assert!(text.is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_input_reports_and_echoes_cursor() -> io::Result<()> {
        let mut dispatcher = Dispatcher::new(ShellState::new(
            "/home/u",
            Session::new(Some("eve".to_string())),
        ));

        let (flow, text) = run(&mut dispatcher, "frobnicate now")?;

        assert_eq!(flow, Flow::Continue);
        assert_eq!(text, "Invalid input\nYou are currently in /home/u\n");
        assert_eq!(dispatcher.state().cursor(), Path::new("/home/u"));
        assert_eq!(dispatcher.state().session().username(), Some("eve"));
        Ok(())
    }

    #[test]
    fn test_failure_is_undifferentiated() -> io::Result<()> {
        let temp = tempfile::tempdir()?;
        fs::write(temp.path().join("file"), b"x")?;
        let mut dispatcher = Dispatcher::new(ShellState::new(temp.path(), Session::default()));

        let (_, missing) = run(&mut dispatcher, "cd nowhere")?;
        let (_, not_dir) = run(&mut dispatcher, "cd file")?;
        let (_, no_args) = run(&mut dispatcher, "cd")?;

        assert_eq!(missing, not_dir);
        assert_eq!(missing, no_args);
        assert!(missing.starts_with("Operation failed\n"));
        Ok(())
    }

    #[test]
    fn test_exit_prints_farewell_without_cursor() -> io::Result<()> {
        let mut dispatcher = Dispatcher::new(ShellState::new(
            "/home/u",
            Session::new(Some("eve".to_string())),
        ));

        let (flow, text) = run(&mut dispatcher, ".exit")?;

        assert_eq!(flow, Flow::Exit);
        assert_eq!(text, "Thank you for using File Manager, eve, goodbye!\n");
        assert_eq!(dispatcher.state().session().username(), None);
        Ok(())
    }

    #[test]
    fn test_greeting() -> io::Result<()> {
        let dispatcher = Dispatcher::new(ShellState::new("/home/u", Session::default()));
        let mut out = Vec::new();
        dispatcher.greet(&mut out)?;
        assert_eq!(
            String::from_utf8_lossy(&out),
            "Welcome to the File Manager, Anonymous!\nYou are currently in /home/u\n"
        );
        Ok(())
    }
}
