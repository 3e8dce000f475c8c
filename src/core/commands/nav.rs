use std::fmt;
use std::fs::{self, FileType};
use std::io::Write;

use tracing::debug;

use super::{existing_dir, CommandError};
use crate::core::state::ShellState;

pub(super) fn up(state: &mut ShellState) -> Result<(), CommandError> {
    let cursor = state.cursor().to_path_buf();
    let parent = cursor
        .parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| CommandError::OutsideRoot(cursor.clone()))?;

    if !state.set_cursor(parent.clone()) {
        return Err(CommandError::OutsideRoot(parent));
    }
    Ok(())
}

pub(super) fn cd(state: &mut ShellState, path: &str) -> Result<(), CommandError> {
    let target = existing_dir(state, path)?;
    debug!(target = %target.display(), "changing directory");

    if !state.set_cursor(target.clone()) {
        return Err(CommandError::OutsideRoot(target));
    }
    Ok(())
}

/// What a directory entry is, without following symbolic links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    SymbolicLink,
    Fifo,
    Socket,
    CharacterDevice,
    BlockDevice,
    Unknown,
}

impl From<FileType> for EntryKind {
    fn from(file_type: FileType) -> Self {
        if file_type.is_file() {
            return EntryKind::File;
        }
        if file_type.is_dir() {
            return EntryKind::Directory;
        }
        if file_type.is_symlink() {
            return EntryKind::SymbolicLink;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;

            if file_type.is_fifo() {
                return EntryKind::Fifo;
            }
            if file_type.is_socket() {
                return EntryKind::Socket;
            }
            if file_type.is_char_device() {
                return EntryKind::CharacterDevice;
            }
            if file_type.is_block_device() {
                return EntryKind::BlockDevice;
            }
        }

        EntryKind::Unknown
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::File => "File",
            EntryKind::Directory => "Directory",
            EntryKind::SymbolicLink => "Symbolic link",
            EntryKind::Fifo => "FIFO",
            EntryKind::Socket => "Socket",
            EntryKind::CharacterDevice => "Character device",
            EntryKind::BlockDevice => "Block device",
            EntryKind::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

pub(super) fn ls(state: &ShellState, out: &mut dyn Write) -> Result<(), CommandError> {
    let mut rows = Vec::new();
    for entry in fs::read_dir(state.cursor())? {
        let entry = entry?;
        let kind = EntryKind::from(entry.file_type()?);
        rows.push([entry.file_name().to_string_lossy().into_owned(), kind.to_string()]);
    }
    rows.sort();

    write_table(&["Name", "Type"], &rows, out)?;
    Ok(())
}

/// Box-drawn table with a leading `(index)` column.
fn write_table<const N: usize>(
    headers: &[&str; N],
    rows: &[[String; N]],
    out: &mut dyn Write,
) -> std::io::Result<()> {
    const INDEX: &str = "(index)";

    let index_width = rows
        .len()
        .saturating_sub(1)
        .to_string()
        .len()
        .max(INDEX.len());
    let mut widths = headers.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = |left: &str, mid: &str, right: &str| {
        let mut line = format!("{left}{}", "─".repeat(index_width + 2));
        for &width in &widths {
            line.push_str(mid);
            line.push_str(&"─".repeat(width + 2));
        }
        line.push_str(right);
        line
    };
    let cells = |index: &str, row: &[&str]| {
        let mut line = format!("│ {index:<index_width$} ");
        for (cell, &width) in row.iter().zip(&widths) {
            line.push_str(&format!("│ {cell:<width$} "));
        }
        line.push('│');
        line
    };

    writeln!(out, "{}", rule("┌", "┬", "┐"))?;
    writeln!(out, "{}", cells(INDEX, headers))?;
    writeln!(out, "{}", rule("├", "┼", "┤"))?;
    for (index, row) in rows.iter().enumerate() {
        let row: Vec<&str> = row.iter().map(String::as_str).collect();
        writeln!(out, "{}", cells(&index.to_string(), &row))?;
    }
    writeln!(out, "{}", rule("└", "┴", "┘"))
}
