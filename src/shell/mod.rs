use std::io::{self, IsTerminal};

use rustyline::{config::Configurer, error::ReadlineError, history::DefaultHistory, Editor};
use tracing::{debug, info};

mod dispatch;

pub use dispatch::Dispatcher;

use crate::{
    core::{
        commands::Flow,
        state::{Session, ShellState},
    },
    error::ShellError,
    flags::Flags,
    highlight::SyntaxHighlighter,
    input::ShellCompleter,
};

const PROMPT: &str = "> ";

pub struct Shell {
    editor: Editor<ShellCompleter, DefaultHistory>,
    dispatcher: Dispatcher,
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let root = flags.resolve_root()?;
        let state = ShellState::new(root, Session::new(flags.username()));
        info!(root = %state.root().display(), "starting session");

        let mut editor = Editor::<ShellCompleter, DefaultHistory>::new()?;
        editor.set_helper(Some(ShellCompleter::new(state.root(), state.cursor())));
        editor.set_auto_add_history(true);

        // Ctrl-C at the prompt surfaces as ReadlineError::Interrupted; this
        // handler covers an interrupt while a command is running.
        let farewell = state.session().farewell();
        ctrlc::set_handler(move || {
            println!();
            println!("{farewell}");
            std::process::exit(0);
        })?;

        let highlighter = if io::stdout().is_terminal() {
            SyntaxHighlighter::new()
        } else {
            SyntaxHighlighter::plain()
        };
        let dispatcher = Dispatcher::new(state).with_highlighter(highlighter);

        Ok(Shell { editor, dispatcher })
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        let mut stdout = io::stdout();
        self.dispatcher.greet(&mut stdout)?;

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    if self.dispatcher.dispatch(&line, &mut stdout)? == Flow::Exit {
                        break;
                    }
                    let cursor = self.dispatcher.state().cursor().to_path_buf();
                    if let Some(helper) = self.editor.helper_mut() {
                        helper.set_cwd(&cursor);
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    debug!("interrupted at prompt");
                    println!();
                    self.dispatcher.exit(&mut stdout)?;
                    break;
                }
                Err(ReadlineError::Eof) => {
                    debug!("end of input");
                    self.dispatcher.exit(&mut stdout)?;
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
