//! # Chunk Reassembly
//!
//! Validates and restitches the chunk records of one upload back into the
//! original byte stream, cross-checking the sequence against the file record
//! that closed it.
//!
//! The checks catch the shapes a damaged store presents: gaps and duplicates
//! in the chunk sequence, chunks cut at the wrong size, and a byte total
//! that disagrees with the recorded file length.

use crate::error::ReassemblyError;
use crate::storage::types::{Chunk, FileRecord};

/// Rebuild the byte stream described by `file` from `chunks`.
///
/// Chunks belonging to other uploads are ignored, and order does not matter;
/// the surviving records are sorted by sequence number before validation.
/// A trailing gap cannot be told apart from a wrong recorded length, so it
/// surfaces as [`ReassemblyError::LengthMismatch`].
pub fn reassemble<Id, D>(
    file: &FileRecord<Id, D>,
    chunks: &[Chunk<Id>],
) -> Result<Vec<u8>, ReassemblyError>
where
    Id: PartialEq,
{
    let mut owned: Vec<&Chunk<Id>> = chunks
        .iter()
        .filter(|chunk| chunk.files_id == file.id)
        .collect();
    owned.sort_by_key(|chunk| chunk.n);

    // Duplicates sort adjacent and gaps skip the counter.
    let mut expected: u32 = 0;
    for chunk in &owned {
        if chunk.n < expected {
            return Err(ReassemblyError::DuplicateChunk { n: chunk.n });
        }
        if chunk.n > expected {
            return Err(ReassemblyError::MissingChunk { n: expected });
        }
        expected += 1;
    }

    // Every chunk except the tail must be cut at exactly the file's chunk
    // size; the tail holds between one byte and a full chunk.
    let last = owned.len().saturating_sub(1);
    for (i, chunk) in owned.iter().enumerate() {
        let len = chunk.data.len();
        let exact = len == file.chunk_size;
        let tail_ok = i == last && len > 0 && len <= file.chunk_size;
        if !(exact || tail_ok) {
            return Err(ReassemblyError::WrongChunkSize {
                n: chunk.n,
                len,
                expected: file.chunk_size,
            });
        }
    }

    let mut data = Vec::with_capacity(usize::try_from(file.length).unwrap_or(0));
    for chunk in &owned {
        data.extend_from_slice(&chunk.data);
    }

    let actual = data.len() as u64;
    if actual != file.length {
        return Err(ReassemblyError::LengthMismatch {
            expected: file.length,
            actual,
        });
    }

    Ok(data)
}
