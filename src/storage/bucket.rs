//! # Upload Bucket
//!
//! Entry point for starting uploads. A [`Bucket`] binds a [`RecordSink`], an
//! [`IdGenerator`], and a validated [`BucketConfig`], and opens one
//! [`ChunkedUploadStream`] per upload with an identifier of its own.

use tracing::debug;

use crate::config::BucketConfig;
use crate::error::ConfigError;
use crate::storage::id::IdGenerator;
use crate::storage::sink::RecordSink;
use crate::storage::upload::ChunkedUploadStream;

/// Per-upload overrides for [`Bucket::open_upload_stream`].
#[derive(Debug)]
pub struct UploadOptions<D> {
    /// Chunk size for this upload only; the bucket default applies when `None`.
    pub chunk_size_bytes: Option<usize>,
    /// Caller metadata carried into the file record.
    pub metadata: Option<D>,
}

// Manual impl: a derive would demand D: Default.
impl<D> Default for UploadOptions<D> {
    fn default() -> Self {
        Self {
            chunk_size_bytes: None,
            metadata: None,
        }
    }
}

impl<D> UploadOptions<D> {
    /// Override the chunk size for this upload.
    #[must_use]
    pub fn with_chunk_size_bytes(mut self, chunk_size_bytes: usize) -> Self {
        self.chunk_size_bytes = Some(chunk_size_bytes);
        self
    }

    /// Attach caller metadata to the eventual file record.
    #[must_use]
    pub fn with_metadata(mut self, metadata: D) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Upload entry point bound to one sink, one identifier source, and one
/// configuration.
///
/// The sink is cloned into each stream, so `S::clone` should hand out a
/// reference to shared storage rather than a deep copy.
#[derive(Debug)]
pub struct Bucket<S, G> {
    sink: S,
    ids: G,
    config: BucketConfig,
}

impl<S, G> Bucket<S, G>
where
    S: RecordSink + Clone,
    G: IdGenerator<Id = S::Id>,
{
    /// Create a bucket over `sink`, rejecting invalid configuration up front.
    pub fn new(sink: S, ids: G, config: BucketConfig) -> Result<Self, ConfigError> {
        config.validate_strict()?;
        Ok(Self { sink, ids, config })
    }

    /// Configuration in effect for this bucket.
    pub fn config(&self) -> &BucketConfig {
        &self.config
    }

    /// Open a stream for one upload under a freshly generated identifier.
    ///
    /// The chunk size comes from `options` when overridden, otherwise from
    /// the bucket configuration, and is validated either way.
    pub fn open_upload_stream(
        &self,
        filename: impl Into<String>,
        options: UploadOptions<S::Document>,
    ) -> Result<ChunkedUploadStream<S>, ConfigError> {
        let filename = filename.into();
        let chunk_size_bytes = options
            .chunk_size_bytes
            .unwrap_or(self.config.chunk_size_bytes);
        debug!(
            bucket = %self.config.bucket_name,
            filename = %filename,
            chunk_size_bytes,
            "opening upload stream"
        );
        ChunkedUploadStream::new(
            self.sink.clone(),
            self.ids.generate(),
            filename,
            chunk_size_bytes,
            options.metadata,
        )
    }
}
