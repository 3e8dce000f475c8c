use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{existing_dir, existing_file, CommandError};
use crate::core::state::ShellState;

const CHUNK_SIZE: usize = 64 * 1024;

/// Copies `reader` into `writer` through one fixed-size buffer, then flushes.
pub fn stream_copy<R, W>(reader: &mut R, writer: &mut W) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..read])?;
        total += read as u64;
    }

    writer.flush()?;
    Ok(total)
}

/// Opens `path` for writing, failing if anything already exists there.
pub(super) fn create_new(path: &Path) -> Result<File, CommandError> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| CommandError::at(path, e))
}

/// Runs `fill` against a freshly created `target`, removing the target if it fails.
pub(super) fn write_new<F>(target: &Path, fill: F) -> Result<u64, CommandError>
where
    F: FnOnce(&mut File) -> io::Result<u64>,
{
    let mut file = create_new(target)?;
    match fill(&mut file) {
        Ok(written) => Ok(written),
        Err(err) => {
            drop(file);
            if let Err(cleanup) = fs::remove_file(target) {
                warn!(
                    target = %target.display(),
                    error = %cleanup,
                    "could not remove partial output"
                );
            }
            Err(CommandError::at(target, err))
        }
    }
}

/// Copies a file into `dest_dir` under its own name. Returns `(source, target)`.
pub(super) fn copy(
    state: &ShellState,
    path: &str,
    dest_dir: &str,
) -> Result<(PathBuf, PathBuf), CommandError> {
    let dest_dir = existing_dir(state, dest_dir)?;
    let source = existing_file(state, path)?;
    let name = source
        .file_name()
        .ok_or_else(|| CommandError::NotAFile(source.clone()))?;
    let target = dest_dir.join(name);

    let mut reader = File::open(&source).map_err(|e| CommandError::at(&source, e))?;
    let copied = write_new(&target, |file| stream_copy(&mut reader, file))?;
    debug!(source = %source.display(), target = %target.display(), bytes = copied, "copied");

    Ok((source, target))
}

/// Copies, then removes the source. The source is untouched unless the copy succeeded.
pub(super) fn move_file(
    state: &ShellState,
    path: &str,
    dest_dir: &str,
) -> Result<(), CommandError> {
    let (source, _target) = copy(state, path, dest_dir)?;
    fs::remove_file(&source).map_err(|e| CommandError::at(&source, e))
}
