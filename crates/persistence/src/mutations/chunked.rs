// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Chunked bulk inserts.

use duty_roster::INSERT_CHUNK_SIZE;
use tracing::{debug, error};

use crate::error::PersistenceError;

/// Inserts `rows` in chunks of [`INSERT_CHUNK_SIZE`].
///
/// Callers run this inside a transaction; when a chunk fails the error
/// reports which chunk it was and how many rows from earlier chunks the
/// rollback discards.
///
/// # Errors
///
/// Returns [`PersistenceError::ChunkFailed`] wrapping the first failure.
pub fn insert_in_chunks<T, F>(rows: &[T], mut insert: F) -> Result<usize, PersistenceError>
where
    F: FnMut(&[T]) -> Result<usize, PersistenceError>,
{
    let chunks: usize = rows.len().div_ceil(INSERT_CHUNK_SIZE);
    let mut inserted: usize = 0;

    for (index, chunk) in rows.chunks(INSERT_CHUNK_SIZE).enumerate() {
        match insert(chunk) {
            Ok(count) => {
                inserted += count;
                debug!(chunk = index + 1, chunks, rows = count, "Inserted chunk");
            }
            Err(cause) => {
                error!(chunk = index + 1, chunks, rows_rolled_back = inserted, %cause, "Chunk insert failed");
                return Err(PersistenceError::ChunkFailed {
                    chunk: index + 1,
                    chunks,
                    rows_rolled_back: inserted,
                    cause: Box::new(cause),
                });
            }
        }
    }

    Ok(inserted)
}
