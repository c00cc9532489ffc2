//! # Chunked Upload Stream
//!
//! Buffers successive writes into fixed-size chunks, persists each full chunk
//! through the [`RecordSink`], and on close persists the short tail chunk (if
//! any) followed by exactly one [`FileRecord`].
//!
//! One instance serves one upload. Writes are processed fully before the call
//! returns: a single write spanning several chunk sizes emits every covered
//! chunk before resolving. The `&mut self` receivers make the single-writer
//! contract a compile-time property.
//!
//! A sink failure aborts the upload: buffered bytes are discarded, no file
//! record is ever written, and already-persisted chunks are reported through
//! the error for the caller to reconcile.

use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::validate_chunk_size;
use crate::error::{ConfigError, UploadError};
use crate::storage::sink::RecordSink;
use crate::storage::types::{Chunk, FileRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Accumulating,
    Closed,
    Aborted,
}

/// Single-upload write handle; see the module docs.
pub struct ChunkedUploadStream<S: RecordSink> {
    sink: S,
    files_id: S::Id,
    filename: String,
    metadata: Option<S::Document>,
    chunk_size_bytes: usize,
    buffer: Vec<u8>,
    chunks_inserted: u32,
    file_size_bytes: u64,
    state: StreamState,
}

impl<S: RecordSink> ChunkedUploadStream<S> {
    /// Open a stream writing chunks of `chunk_size_bytes` under `files_id`.
    ///
    /// Most callers construct streams through
    /// [`Bucket::open_upload_stream`](crate::storage::bucket::Bucket::open_upload_stream),
    /// which picks the identifier and chunk size from its configuration.
    pub fn new(
        sink: S,
        files_id: S::Id,
        filename: impl Into<String>,
        chunk_size_bytes: usize,
        metadata: Option<S::Document>,
    ) -> Result<Self, ConfigError> {
        validate_chunk_size(chunk_size_bytes)?;
        Ok(Self {
            sink,
            files_id,
            filename: filename.into(),
            metadata,
            chunk_size_bytes,
            buffer: Vec::with_capacity(chunk_size_bytes),
            chunks_inserted: 0,
            file_size_bytes: 0,
            state: StreamState::Accumulating,
        })
    }

    /// Identifier shared by this upload's chunks and file record.
    pub fn files_id(&self) -> &S::Id {
        &self.files_id
    }

    /// Filename captured at construction.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Chunk size this upload is cut with.
    pub fn chunk_size_bytes(&self) -> usize {
        self.chunk_size_bytes
    }

    /// Chunks acknowledged by the sink so far.
    pub fn chunks_inserted(&self) -> u32 {
        self.chunks_inserted
    }

    /// Total bytes accepted so far (buffered bytes included).
    pub fn file_size_bytes(&self) -> u64 {
        self.file_size_bytes
    }

    /// Whether the stream reached a terminal state (closed or aborted).
    pub fn is_closed(&self) -> bool {
        self.state != StreamState::Accumulating
    }

    /// Accept `bytes`, emitting a chunk each time the buffer fills.
    ///
    /// The fill loop is iterative: a write of many chunk sizes emits all its
    /// chunks from this one call, in ascending `n`, each acknowledged before
    /// the next is issued.
    pub async fn write(&mut self, mut bytes: &[u8]) -> Result<(), UploadError> {
        self.ensure_open()?;

        loop {
            // The buffer is never left full between calls, so this is >= 1.
            let space_remaining = self.chunk_size_bytes - self.buffer.len();

            if bytes.len() < space_remaining {
                self.buffer.extend_from_slice(bytes);
                self.file_size_bytes += bytes.len() as u64;
                return Ok(());
            }

            let (fill, rest) = bytes.split_at(space_remaining);
            self.buffer.extend_from_slice(fill);
            self.file_size_bytes += space_remaining as u64;
            self.flush_chunk().await?;

            bytes = rest;
            if bytes.is_empty() {
                return Ok(());
            }
        }
    }

    /// Finalize the upload: flush the tail chunk (if any), then persist the
    /// file record. Callable once; later calls fail [`UploadError::AlreadyClosed`].
    pub async fn close(&mut self) -> Result<(), UploadError> {
        self.ensure_open()?;

        if !self.buffer.is_empty() {
            self.flush_chunk().await?;
        }

        let record = FileRecord {
            id: self.files_id.clone(),
            chunk_size: self.chunk_size_bytes,
            filename: self.filename.clone(),
            upload_date: Utc::now(),
            length: self.file_size_bytes,
            metadata: self.metadata.take(),
        };

        if let Err(e) = self.sink.insert_file(record).await {
            return Err(self.abort_with(e));
        }

        self.state = StreamState::Closed;
        info!(
            filename = %self.filename,
            length = self.file_size_bytes,
            chunks = self.chunks_inserted,
            "upload complete"
        );
        Ok(())
    }

    /// Cancel the upload: discard buffered bytes and enter the terminal
    /// `Aborted` state without writing a file record. Chunks already
    /// persisted are left for the caller to reconcile. No-op if the stream
    /// is already terminal.
    pub fn abort(&mut self) {
        if self.state == StreamState::Accumulating {
            self.state = StreamState::Aborted;
            self.buffer.clear();
            debug!(chunks_persisted = self.chunks_inserted, "upload aborted by caller");
        }
    }

    async fn flush_chunk(&mut self) -> Result<(), UploadError> {
        let data = std::mem::replace(
            &mut self.buffer,
            Vec::with_capacity(self.chunk_size_bytes),
        );
        let n = self.chunks_inserted;
        let len = data.len();
        let chunk = Chunk {
            files_id: self.files_id.clone(),
            n,
            data: Bytes::from(data),
        };

        if let Err(e) = self.sink.insert_chunk(chunk).await {
            return Err(self.abort_with(e));
        }

        self.chunks_inserted = n + 1;
        debug!(n, bytes = len, "chunk persisted");
        Ok(())
    }

    fn abort_with(&mut self, cause: S::Error) -> UploadError {
        self.state = StreamState::Aborted;
        self.buffer.clear();
        warn!(
            chunks_persisted = self.chunks_inserted,
            error = %cause,
            "upload aborted: storage sink rejected insert"
        );
        UploadError::SinkWriteFailed {
            chunks_persisted: self.chunks_inserted,
            source: Box::new(cause),
        }
    }

    fn ensure_open(&self) -> Result<(), UploadError> {
        match self.state {
            StreamState::Accumulating => Ok(()),
            StreamState::Closed | StreamState::Aborted => Err(UploadError::AlreadyClosed),
        }
    }
}
