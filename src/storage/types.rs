//! Persistence records written during a chunked upload.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fixed-size slice of an uploaded file's bytes.
///
/// Immutable once persisted. All chunks of one upload share a `files_id` and
/// are reassembled by ascending `n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk<Id> {
    /// Identifier of the upload this chunk belongs to.
    pub files_id: Id,
    /// Zero-based sequence number within the upload.
    pub n: u32,
    /// Chunk payload; every chunk but the last is exactly the configured
    /// chunk size, the last is shorter but never empty.
    pub data: Bytes,
}

/// Summary record written once, after all of an upload's chunks.
///
/// Its existence marks the upload complete; chunks without a matching file
/// record are orphans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord<Id, D> {
    /// Identifier shared with the upload's chunks.
    pub id: Id,
    /// Chunk size the upload was cut with, in bytes.
    pub chunk_size: usize,
    /// Caller-supplied name for the uploaded file.
    pub filename: String,
    /// Completion time of the upload.
    pub upload_date: DateTime<Utc>,
    /// Total uploaded byte count.
    pub length: u64,
    /// Optional caller-supplied document describing the file.
    pub metadata: Option<D>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::storage::id::FileId;
    use serde_json::json;

    #[test]
    fn test_chunk_serializes_with_stable_field_names() {
        let chunk = Chunk {
            files_id: FileId::from_bytes([0x11; 16]),
            n: 3,
            data: Bytes::from_static(&[1, 2, 3]),
        };

        let value = serde_json::to_value(&chunk).expect("Should serialize chunk");
        assert_eq!(value["n"], 3);
        assert!(value.get("files_id").is_some());
        assert!(value.get("data").is_some());
    }

    #[test]
    fn test_file_record_round_trips_through_json() {
        let record = FileRecord {
            id: FileId::from_bytes([0xAB; 16]),
            chunk_size: 4096,
            filename: "report.pdf".to_string(),
            upload_date: Utc::now(),
            length: 12_345,
            metadata: Some(json!({"owner": "ops"})),
        };

        let text = serde_json::to_string(&record).expect("Should serialize record");
        let parsed: FileRecord<FileId, serde_json::Value> =
            serde_json::from_str(&text).expect("Should deserialize record");

        assert_eq!(parsed, record);
    }
}
