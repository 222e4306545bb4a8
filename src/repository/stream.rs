//! Bounded-buffer copy from a byte source into a file.

use std::fs::File;
use std::io::{self, Read, Write};

use camino::Utf8Path;

/// Size of the buffer shuttling bytes from source to destination.
pub(super) const CHUNK_SIZE: usize = 8192;

/// Tells the caller which side of the copy failed.
#[derive(Debug)]
pub(super) enum StreamError {
    Read(io::Error),
    Write(io::Error),
}

/// Copies `reader` into a freshly created or truncated `destination`.
///
/// Memory use is fixed at [`CHUNK_SIZE`] regardless of the source length. The
/// file is synced before returning so a later rename publishes complete data.
pub(super) fn stream_to_file<R: Read + ?Sized>(
    reader: &mut R,
    destination: &Utf8Path,
) -> Result<u64, StreamError> {
    let mut file = File::create(destination).map_err(StreamError::Write)?;
    let mut buffer = [0_u8; CHUNK_SIZE];
    let mut written: u64 = 0;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(StreamError::Read(err)),
        };
        let Some(chunk) = buffer.get(..read) else {
            break;
        };
        file.write_all(chunk).map_err(StreamError::Write)?;
        written = written.saturating_add(chunk.len() as u64);
    }

    file.sync_all().map_err(StreamError::Write)?;
    Ok(written)
}
