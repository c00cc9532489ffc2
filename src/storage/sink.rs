//! # Storage Sink Seam
//!
//! The capability boundary between the upload stream and whatever actually
//! persists records. The stream issues one insert per chunk and one per file
//! record, awaiting acknowledgement before moving on; it has no other
//! knowledge of the backend.

use async_trait::async_trait;

use crate::storage::types::{Chunk, FileRecord};

/// Acknowledged record persistence for one bucket.
///
/// Implementations are handles: cheap to clone, safe to share, called with
/// `&self`. An insert resolves once the record is durably accepted; returning
/// an error aborts the enclosing upload.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Upload identifier type shared by chunks and file records.
    type Id: Clone + Send + Sync;
    /// Document type carried in file-record metadata.
    type Document: Send + Sync;
    /// Backend failure surfaced to the upload stream.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist one chunk record.
    async fn insert_chunk(&self, chunk: Chunk<Self::Id>) -> Result<(), Self::Error>;

    /// Persist the file-summary record.
    async fn insert_file(
        &self,
        file: FileRecord<Self::Id, Self::Document>,
    ) -> Result<(), Self::Error>;
}
