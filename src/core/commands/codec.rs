use std::fs::File;
use std::io::BufReader;

use tracing::debug;

use super::transfer::{stream_copy, write_new};
use super::{existing_file, CommandError};
use crate::core::state::ShellState;

const BUFFER_SIZE: usize = 4096;
const QUALITY: u32 = 11;
const WINDOW_BITS: u32 = 22;

pub(super) fn compress(state: &ShellState, src: &str, dest: &str) -> Result<(), CommandError> {
    let (source, target) = endpoints(state, src, dest)?;
    let reader = BufReader::new(File::open(&source).map_err(|e| CommandError::at(&source, e))?);
    let mut encoder = brotli::CompressorReader::new(reader, BUFFER_SIZE, QUALITY, WINDOW_BITS);

    let written = write_new(&target, |file| stream_copy(&mut encoder, file))?;
    debug!(source = %source.display(), target = %target.display(), bytes = written, "compressed");
    Ok(())
}

pub(super) fn decompress(state: &ShellState, src: &str, dest: &str) -> Result<(), CommandError> {
    let (source, target) = endpoints(state, src, dest)?;
    let reader = BufReader::new(File::open(&source).map_err(|e| CommandError::at(&source, e))?);
    let mut decoder = brotli::Decompressor::new(reader, BUFFER_SIZE);

    let written = write_new(&target, |file| stream_copy(&mut decoder, file))?;
    debug!(source = %source.display(), target = %target.display(), bytes = written, "decompressed");
    Ok(())
}

fn endpoints(
    state: &ShellState,
    src: &str,
    dest: &str,
) -> Result<(std::path::PathBuf, std::path::PathBuf), CommandError> {
    let source = existing_file(state, src)?;
    let target = state.sandbox().resolve(state.cursor(), dest)?;
    Ok((source, target))
}
