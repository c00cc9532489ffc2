//! # Framed Messages
//!
//! The section-based message body and its codec.
//!
//! A framed message is a 16-byte [`MessageHeader`], a little-endian `u32` flag
//! word, and one or more sections. Two section kinds exist on the wire:
//!
//! ```text
//! kind 0 (payload): [0x00] [Document]
//! kind 1 (batch):   [0x01] [Length(4, LE)] [Identifier] [0x00] [Document...]
//! ```
//!
//! A batch length counts everything after the tag byte, its own four bytes
//! included. Documents are encoded by a pluggable [`DocumentCodec`]; the
//! message codec only relies on their self-reported lengths.
//!
//! [`MessageCodec`] is pure and stateless: identical inputs yield identical
//! outputs, nothing is cached between calls, and decoding either returns a
//! fully-formed [`Message`] or an error — never a partial result.

use crate::core::document::DocumentCodec;
use crate::core::header::{MessageHeader, OpCode, HEADER_SIZE};
use crate::error::constants::{
    ERR_CODEC_OVERCONSUMED, ERR_CODEC_ZERO_CONSUMED, ERR_IDENTIFIER_NUL, ERR_IDENTIFIER_UTF8,
};
use crate::error::{DocumentError, ProtocolError, Result};

/// Size in bytes of the flag word that follows the header.
pub const FLAG_WORD_SIZE: usize = 4;

/// Size in bytes of a batch section's length field.
const SECTION_LENGTH_SIZE: usize = 4;

/// Section tag for a single-document payload.
const TAG_PAYLOAD: u8 = 0;

/// Section tag for a named document batch.
const TAG_BATCH: u8 = 1;

/// Bit positions of the wire flag word.
pub mod flags {
    /// A trailing CRC-32C checksum is present. Declared for wire
    /// compatibility; this crate never sets or validates it.
    pub const CHECKSUM_PRESENT: u32 = 1 << 0;
    /// More messages follow this one; the peer should not reply yet.
    pub const MORE_TO_COME: u32 = 1 << 1;
    /// The peer may reply with multiple messages.
    pub const EXHAUST_ALLOWED: u32 = 1 << 16;
}

/// One typed payload section of a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<D> {
    /// Tag byte 0: exactly one document, the primary payload.
    Payload(D),
    /// Tag byte 1: a named, ordered batch of documents.
    Batch {
        /// Short UTF-8 tag naming the batch. Must not contain NUL.
        identifier: String,
        /// The batched documents, in order. May be empty.
        documents: Vec<D>,
    },
}

/// A request/response unit: flag word plus ordered sections.
///
/// By convention a message carries at most one [`Section::Payload`] and at
/// least one section overall; the codec enforces neither, accepting any mix
/// and order on decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Message<D> {
    /// Caller-chosen exchange identifier, written into the header.
    pub request_id: i32,
    /// `request_id` of the message this answers, or 0 for requests.
    pub response_to: i32,
    /// Wire flag word; see [`flags`].
    pub flags: u32,
    /// Payload sections in wire order.
    pub sections: Vec<Section<D>>,
    /// Declared but unused: never computed, validated, or serialized.
    /// Decoding always yields `None`.
    pub checksum: Option<u32>,
}

impl<D> Message<D> {
    /// Build a request carrying one payload section.
    pub fn new(request_id: i32, document: D) -> Self {
        Self {
            request_id,
            response_to: 0,
            flags: 0,
            sections: vec![Section::Payload(document)],
            checksum: None,
        }
    }

    /// Set the flag word.
    #[must_use]
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Append a section in wire order.
    pub fn push_section(&mut self, section: Section<D>) {
        self.sections.push(section);
    }
}

/// Serializer/deserializer for framed messages, parameterized by the
/// document codec it delegates section payloads to.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageCodec<C> {
    documents: C,
}

impl<C: DocumentCodec> MessageCodec<C> {
    /// Build a codec around a document codec collaborator.
    pub fn new(documents: C) -> Self {
        Self { documents }
    }

    /// Serialize a message to its full wire frame, header included.
    ///
    /// The header's `message_length` is the returned buffer's length,
    /// `request_id`/`response_to` come from the message, and the op-code is
    /// fixed to [`OpCode::Message`]. The flag word lands at offset 16,
    /// sections follow from offset 20 in input order.
    pub fn serialize(&self, message: &Message<C::Document>) -> Result<Vec<u8>> {
        let mut encoded = Vec::with_capacity(message.sections.len());
        let mut sections_len = 0usize;
        for section in &message.sections {
            let bytes = self.encode_section(section)?;
            sections_len += bytes.len();
            encoded.push(bytes);
        }

        let total = HEADER_SIZE + FLAG_WORD_SIZE + sections_len;
        let message_length =
            u32::try_from(total).map_err(|_| ProtocolError::OversizedMessage(total))?;

        let header = MessageHeader {
            message_length,
            request_id: message.request_id,
            response_to: message.response_to,
            op_code: OpCode::Message,
        };

        let mut buf = Vec::with_capacity(total);
        buf.extend_from_slice(&header.to_bytes());
        buf.extend_from_slice(&message.flags.to_le_bytes());
        for bytes in &encoded {
            buf.extend_from_slice(bytes);
        }
        Ok(buf)
    }

    /// Deserialize a message body received with `header`.
    ///
    /// `bytes` starts at the flag word (the 16 header bytes already
    /// consumed); error offsets are relative to it. `request_id` and
    /// `response_to` are taken from the header, never re-parsed from the
    /// body. Fails on the first unknown tag, overrunning length, or
    /// malformed document; never returns a partially-decoded message.
    pub fn deserialize(
        &self,
        header: &MessageHeader,
        bytes: &[u8],
    ) -> Result<Message<C::Document>> {
        if bytes.len() < FLAG_WORD_SIZE {
            return Err(ProtocolError::Truncated {
                offset: bytes.len(),
            });
        }
        let flags = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);

        let mut sections = Vec::new();
        let mut pos = FLAG_WORD_SIZE;
        while pos < bytes.len() {
            match bytes[pos] {
                TAG_PAYLOAD => {
                    let at = pos + 1;
                    let (document, consumed) = self.decode_document(&bytes[at..], at)?;
                    sections.push(Section::Payload(document));
                    pos = at + consumed;
                }
                TAG_BATCH => {
                    let (section, consumed) = self.decode_batch(bytes, pos + 1)?;
                    sections.push(section);
                    pos = pos + 1 + consumed;
                }
                kind => {
                    return Err(ProtocolError::InvalidSectionKind { kind, offset: pos });
                }
            }
        }

        Ok(Message {
            request_id: header.request_id,
            response_to: header.response_to,
            flags,
            sections,
            checksum: None,
        })
    }

    fn encode_section(&self, section: &Section<C::Document>) -> Result<Vec<u8>> {
        match section {
            Section::Payload(document) => {
                let doc = self.encode_document(document)?;
                let mut bytes = Vec::with_capacity(1 + doc.len());
                bytes.push(TAG_PAYLOAD);
                bytes.extend_from_slice(&doc);
                Ok(bytes)
            }
            Section::Batch {
                identifier,
                documents,
            } => {
                if identifier.as_bytes().contains(&0) {
                    return Err(ProtocolError::InvalidIdentifier(
                        ERR_IDENTIFIER_NUL.to_string(),
                    ));
                }

                let mut docs = Vec::new();
                for document in documents {
                    docs.extend_from_slice(&self.encode_document(document)?);
                }

                // Length counts its own four bytes, the identifier, the NUL
                // terminator, and the documents.
                let declared_len = SECTION_LENGTH_SIZE + identifier.len() + 1 + docs.len();
                let declared = u32::try_from(declared_len)
                    .map_err(|_| ProtocolError::OversizedMessage(declared_len))?;

                let mut bytes = Vec::with_capacity(1 + declared_len);
                bytes.push(TAG_BATCH);
                bytes.extend_from_slice(&declared.to_le_bytes());
                bytes.extend_from_slice(identifier.as_bytes());
                bytes.push(0);
                bytes.extend_from_slice(&docs);
                Ok(bytes)
            }
        }
    }

    /// Decode a batch section whose length field starts at `len_at`.
    /// Returns the section and the bytes consumed after the tag byte.
    fn decode_batch(&self, bytes: &[u8], len_at: usize) -> Result<(Section<C::Document>, usize)> {
        if bytes.len() - len_at < SECTION_LENGTH_SIZE {
            return Err(ProtocolError::Truncated { offset: len_at });
        }
        let declared = u32::from_le_bytes([
            bytes[len_at],
            bytes[len_at + 1],
            bytes[len_at + 2],
            bytes[len_at + 3],
        ]) as usize;

        // The length covers its own field; anything smaller cannot be valid,
        // and anything past the buffer end is a truncation.
        if declared < SECTION_LENGTH_SIZE || declared > bytes.len() - len_at {
            return Err(ProtocolError::Truncated { offset: len_at });
        }

        let body_at = len_at + SECTION_LENGTH_SIZE;
        let body = &bytes[body_at..len_at + declared];

        let nul = body
            .iter()
            .position(|&b| b == 0)
            .ok_or(ProtocolError::Truncated { offset: body_at })?;
        let identifier = std::str::from_utf8(&body[..nul])
            .map_err(|_| ProtocolError::InvalidIdentifier(ERR_IDENTIFIER_UTF8.to_string()))?
            .to_string();

        let mut documents = Vec::new();
        let mut body_pos = nul + 1;
        while body_pos < body.len() {
            let (document, consumed) =
                self.decode_document(&body[body_pos..], body_at + body_pos)?;
            documents.push(document);
            body_pos += consumed;
        }

        Ok((
            Section::Batch {
                identifier,
                documents,
            },
            declared,
        ))
    }

    fn encode_document(&self, document: &C::Document) -> Result<Vec<u8>> {
        self.documents
            .encode(document)
            .map_err(|e| ProtocolError::Document(e.to_string()))
    }

    /// Decode one document from `remaining`, reporting failures at absolute
    /// `offset`. Guards against codecs that misreport consumed lengths.
    fn decode_document(&self, remaining: &[u8], offset: usize) -> Result<(C::Document, usize)> {
        let (document, consumed) = self.documents.decode(remaining).map_err(|e| match e {
            DocumentError::Truncated { .. } => ProtocolError::Truncated { offset },
            DocumentError::Malformed(msg) => ProtocolError::Document(msg),
        })?;

        if consumed == 0 {
            return Err(ProtocolError::Document(ERR_CODEC_ZERO_CONSUMED.to_string()));
        }
        if consumed > remaining.len() {
            return Err(ProtocolError::Document(ERR_CODEC_OVERCONSUMED.to_string()));
        }
        Ok((document, consumed))
    }
}
