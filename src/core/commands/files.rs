use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path};

use tracing::{debug, warn};

use super::transfer::{create_new, stream_copy};
use super::{existing_file, CommandError};
use crate::core::state::ShellState;

pub(super) fn cat(state: &ShellState, path: &str, out: &mut dyn Write) -> Result<(), CommandError> {
    let source = existing_file(state, path)?;
    let mut reader = File::open(&source).map_err(|e| CommandError::at(&source, e))?;

    stream_copy(&mut reader, out)?;
    writeln!(out)?;
    Ok(())
}

pub(super) fn add(state: &ShellState, name: &str) -> Result<(), CommandError> {
    if name.is_empty() {
        return Err(CommandError::InvalidName(name.to_string()));
    }
    let target = state.sandbox().resolve(state.cursor(), name)?;
    create_new(&target)?;
    debug!(path = %target.display(), "created file");
    Ok(())
}

pub(super) fn mkdir(state: &ShellState, name: &str) -> Result<(), CommandError> {
    let target = state.sandbox().resolve(state.cursor(), name)?;
    fs::create_dir(&target).map_err(|e| CommandError::at(&target, e))?;
    debug!(path = %target.display(), "created directory");
    Ok(())
}

/// Renames in place: the new name lands in the source's own parent directory.
/// A cursor at or below the renamed entry follows it.
pub(super) fn rename(
    state: &mut ShellState,
    path: &str,
    new_name: &str,
) -> Result<(), CommandError> {
    let new_name = plain_name(new_name)?;
    let source = state.sandbox().resolve(state.cursor(), path)?;
    fs::symlink_metadata(&source).map_err(|e| CommandError::at(&source, e))?;

    if source == state.root() {
        return Err(CommandError::OutsideRoot(source));
    }
    let parent = source
        .parent()
        .ok_or_else(|| CommandError::OutsideRoot(source.clone()))?;
    let target = parent.join(new_name);

    if fs::symlink_metadata(&target).is_ok() {
        return Err(CommandError::AlreadyExists(target));
    }
    fs::rename(&source, &target).map_err(|e| CommandError::at(&source, e))?;
    debug!(from = %source.display(), to = %target.display(), "renamed");

    let followed = match state.cursor().strip_prefix(&source) {
        Ok(below) if below.as_os_str().is_empty() => Some(target.clone()),
        Ok(below) => Some(target.join(below)),
        Err(_) => None,
    };
    if let Some(cursor) = followed {
        if !state.set_cursor(cursor) {
            warn!(cursor = %state.cursor().display(), "cursor left behind by rename");
        }
    }
    Ok(())
}

pub(super) fn remove(state: &ShellState, path: &str) -> Result<(), CommandError> {
    let target = existing_file(state, path)?;
    fs::remove_file(&target).map_err(|e| CommandError::at(&target, e))?;
    debug!(path = %target.display(), "removed");
    Ok(())
}

/// Accepts a single normal path component.
fn plain_name(name: &str) -> Result<&str, CommandError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(name),
        _ => Err(CommandError::InvalidName(name.to_string())),
    }
}
