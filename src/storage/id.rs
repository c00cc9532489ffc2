//! Upload identifier generation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Produces one globally-unique identifier per new upload.
pub trait IdGenerator {
    /// The identifier type produced.
    type Id;

    /// Generate a fresh identifier.
    fn generate(&self) -> Self::Id;
}

/// 128-bit random upload identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId([u8; 16]);

impl FileId {
    /// Wrap raw identifier bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({self})")
    }
}

/// Default [`IdGenerator`] drawing identifiers from the OS-seeded RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    type Id = FileId;

    fn generate(&self) -> FileId {
        FileId(rand::random())
    }
}
