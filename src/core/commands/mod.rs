use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

mod codec;
mod digest;
mod files;
mod nav;
mod os;
mod transfer;

pub use digest::sha256_hex;
pub use nav::EntryKind;
pub use os::OsFlag;
pub use transfer::stream_copy;

use super::state::ShellState;

/// Every command name the shell accepts, in the order shown by completion.
pub const COMMAND_NAMES: &[&str] = &[
    "up",
    "cd",
    "ls",
    "cat",
    "add",
    "mkdir",
    "rn",
    "cp",
    "mv",
    "rm",
    "hash",
    "compress",
    "decompress",
    "os",
    ".exit",
];

/// Structured reason an operation failed. Users only ever see the [`Failure`] category.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid input: {0}")]
    UnknownCommand(String),
    #[error("path is outside the root: {}", .0.display())]
    OutsideRoot(PathBuf),
    #[error("no such file or directory: {}", .0.display())]
    NotFound(PathBuf),
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
    #[error("unavailable: {0}")]
    Unavailable(&'static str),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CommandError {
    /// Attaches `path` to the common I/O error kinds.
    pub fn at(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => CommandError::NotFound(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => CommandError::AlreadyExists(path.to_path_buf()),
            _ => CommandError::Io(err),
        }
    }

    pub fn failure(&self) -> Failure {
        match self {
            CommandError::UnknownCommand(_) => Failure::InvalidInput,
            _ => Failure::OperationFailed,
        }
    }
}

/// The two notices a user can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    OperationFailed,
    InvalidInput,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::OperationFailed => write!(f, "Operation failed"),
            Failure::InvalidInput => write!(f, "Invalid input"),
        }
    }
}

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One input line split on whitespace. No quoting or escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let name = words.next()?.to_string();
        let args = words.map(str::to_string).collect();
        Some(Self { name, args })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Up,
    Cd { path: String },
    Ls,
    Cat { path: String },
    Add { name: String },
    Mkdir { name: String },
    Rn { path: String, new_name: String },
    Cp { path: String, dest_dir: String },
    Mv { path: String, dest_dir: String },
    Rm { path: String },
    Hash { path: String },
    Compress { src: String, dest: String },
    Decompress { src: String, dest: String },
    Os(OsFlag),
    Exit,
    Unknown(String),
}

impl Command {
    /// Maps a parsed line onto a command. Surplus arguments are ignored.
    pub fn from_line(line: &CommandLine) -> Result<Self, CommandError> {
        let arg = |index: usize, what: &'static str| {
            line.args
                .get(index)
                .cloned()
                .ok_or(CommandError::MissingArgument(what))
        };

        let command = match line.name.as_str() {
            "up" => Command::Up,
            "cd" => Command::Cd {
                path: arg(0, "path")?,
            },
            "ls" => Command::Ls,
            "cat" => Command::Cat {
                path: arg(0, "path")?,
            },
            "add" => Command::Add {
                name: arg(0, "name")?,
            },
            "mkdir" => Command::Mkdir {
                name: arg(0, "name")?,
            },
            "rn" => Command::Rn {
                path: arg(0, "path")?,
                new_name: arg(1, "new name")?,
            },
            "cp" => Command::Cp {
                path: arg(0, "path")?,
                dest_dir: arg(1, "destination directory")?,
            },
            "mv" => Command::Mv {
                path: arg(0, "path")?,
                dest_dir: arg(1, "destination directory")?,
            },
            "rm" => Command::Rm {
                path: arg(0, "path")?,
            },
            "hash" => Command::Hash {
                path: arg(0, "path")?,
            },
            "compress" => Command::Compress {
                src: arg(0, "source")?,
                dest: arg(1, "destination")?,
            },
            "decompress" => Command::Decompress {
                src: arg(0, "source")?,
                dest: arg(1, "destination")?,
            },
            "os" => Command::Os(arg(0, "flag")?.parse()?),
            ".exit" => Command::Exit,
            other => Command::Unknown(other.to_string()),
        };

        Ok(command)
    }
}

/// Stat that reports a missing path as [`CommandError::NotFound`].
pub(crate) fn metadata(path: &Path) -> Result<fs::Metadata, CommandError> {
    fs::metadata(path).map_err(|e| CommandError::at(path, e))
}

/// Resolves `arg` and requires it to be an existing regular file.
pub(crate) fn existing_file(state: &ShellState, arg: &str) -> Result<PathBuf, CommandError> {
    let path = state.sandbox().resolve(state.cursor(), arg)?;
    if !metadata(&path)?.is_file() {
        return Err(CommandError::NotAFile(path));
    }
    Ok(path)
}

/// Resolves `arg` and requires it to be an existing directory.
pub(crate) fn existing_dir(state: &ShellState, arg: &str) -> Result<PathBuf, CommandError> {
    let path = state.sandbox().resolve(state.cursor(), arg)?;
    if !metadata(&path)?.is_dir() {
        return Err(CommandError::NotADirectory(path));
    }
    Ok(path)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Runs one command to completion. Output goes to `out`; failures are returned, never printed.
    pub fn execute(
        &self,
        state: &mut ShellState,
        command: &Command,
        out: &mut dyn Write,
    ) -> Result<Flow, CommandError> {
        match command {
            Command::Up => nav::up(state)?,
            Command::Cd { path } => nav::cd(state, path)?,
            Command::Ls => nav::ls(state, out)?,
            Command::Cat { path } => files::cat(state, path, out)?,
            Command::Add { name } => files::add(state, name)?,
            Command::Mkdir { name } => files::mkdir(state, name)?,
            Command::Rn { path, new_name } => files::rename(state, path, new_name)?,
            Command::Cp { path, dest_dir } => {
                transfer::copy(state, path, dest_dir)?;
            }
            Command::Mv { path, dest_dir } => transfer::move_file(state, path, dest_dir)?,
            Command::Rm { path } => files::remove(state, path)?,
            Command::Hash { path } => digest::hash(state, path, out)?,
            Command::Compress { src, dest } => codec::compress(state, src, dest)?,
            Command::Decompress { src, dest } => codec::decompress(state, src, dest)?,
            Command::Os(flag) => os::report(*flag, out)?,
            Command::Exit => {
                writeln!(out, "{}", state.session().farewell())?;
                state.session_mut().clear();
                return Ok(Flow::Exit);
            }
            Command::Unknown(name) => return Err(CommandError::UnknownCommand(name.clone())),
        }
        Ok(Flow::Continue)
    }
}
