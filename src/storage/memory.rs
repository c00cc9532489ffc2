//! # In-Memory Record Sink
//!
//! Storage backend holding chunk and file records in process memory behind a
//! shared lock. Clones share one store, so the same instance can be handed to
//! an upload stream and kept by the caller for inspection afterwards.
//!
//! Backs the demos and test suites. Inserts never fail, so the error type is
//! [`Infallible`].

use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::storage::sink::RecordSink;
use crate::storage::types::{Chunk, FileRecord};

#[derive(Debug)]
struct Store<Id, D> {
    chunks: Vec<Chunk<Id>>,
    files: Vec<FileRecord<Id, D>>,
}

/// Shared in-memory store implementing [`RecordSink`].
#[derive(Debug)]
pub struct MemorySink<Id, D> {
    store: Arc<Mutex<Store<Id, D>>>,
}

impl<Id, D> MemorySink<Id, D> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(Store {
                chunks: Vec::new(),
                files: Vec::new(),
            })),
        }
    }

    // A poisoned lock only means some thread panicked mid-push; the records
    // themselves are still sound to read.
    fn lock(&self) -> MutexGuard<'_, Store<Id, D>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of chunk records held.
    pub fn chunk_count(&self) -> usize {
        self.lock().chunks.len()
    }

    /// Number of file records held.
    pub fn file_count(&self) -> usize {
        self.lock().files.len()
    }

    /// Snapshot of every chunk record, in insertion order.
    pub fn chunks(&self) -> Vec<Chunk<Id>>
    where
        Id: Clone,
    {
        self.lock().chunks.clone()
    }

    /// Snapshot of every file record, in insertion order.
    pub fn files(&self) -> Vec<FileRecord<Id, D>>
    where
        Id: Clone,
        D: Clone,
    {
        self.lock().files.clone()
    }

    /// Chunk records belonging to one upload, in insertion order.
    pub fn chunks_for(&self, files_id: &Id) -> Vec<Chunk<Id>>
    where
        Id: Clone + PartialEq,
    {
        self.lock()
            .chunks
            .iter()
            .filter(|chunk| &chunk.files_id == files_id)
            .cloned()
            .collect()
    }
}

// Manual impls: derives would demand Id/D bounds the handle does not need.
impl<Id, D> Clone for MemorySink<Id, D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<Id, D> Default for MemorySink<Id, D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<Id, D> RecordSink for MemorySink<Id, D>
where
    Id: Clone + Send + Sync,
    D: Send + Sync,
{
    type Id = Id;
    type Document = D;
    type Error = Infallible;

    async fn insert_chunk(&self, chunk: Chunk<Id>) -> Result<(), Infallible> {
        self.lock().chunks.push(chunk);
        Ok(())
    }

    async fn insert_file(&self, file: FileRecord<Id, D>) -> Result<(), Infallible> {
        self.lock().files.push(file);
        Ok(())
    }
}
