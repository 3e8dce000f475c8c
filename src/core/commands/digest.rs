use std::fs::File;
use std::io::{self, Read, Write};

use sha2::{Digest, Sha256};

use super::transfer::stream_copy;
use super::CommandError;
use crate::core::state::ShellState;

/// Lowercase hex SHA-256 of everything `reader` yields.
pub fn sha256_hex<R: Read + ?Sized>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    stream_copy(reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

pub(super) fn hash(
    state: &ShellState,
    path: &str,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let target = state.sandbox().resolve(state.cursor(), path)?;
    let mut file = File::open(&target).map_err(|e| CommandError::at(&target, e))?;

    let digest = sha256_hex(&mut file)?;
    writeln!(out, "{digest}")?;
    Ok(())
}
