pub mod commands;
pub mod sandbox;
pub mod state;

pub use commands::{Command, CommandError, CommandExecutor, CommandLine, Failure, Flow};
pub use sandbox::{is_within_root, Sandbox};
pub use state::{Session, ShellState};
