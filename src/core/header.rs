//! # Message Header
//!
//! The fixed 16-byte header that fronts every framed message.
//!
//! ## Wire Format
//! ```text
//! [MessageLength(4, LE)] [RequestId(4, LE)] [ResponseTo(4, LE)] [OpCode(4, LE)]
//! ```
//! `message_length` counts the whole frame, header included.

use crate::error::{ProtocolError, Result};

/// Size in bytes of the fixed message header.
pub const HEADER_SIZE: usize = 16;

/// Operation discriminants understood by this protocol.
///
/// `Message` is the section-framed kind this crate implements; `Reply` and
/// `Query` are the legacy exchange kinds a peer may still emit and are
/// recognized so the framing layer can reject them with a precise error
/// instead of a generic one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum OpCode {
    /// Legacy server reply.
    Reply = 1,
    /// Legacy client query.
    Query = 2004,
    /// Section-framed message; the kind this crate serializes.
    Message = 2013,
}

impl OpCode {
    /// Map a raw wire value to a known op-code.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Reply),
            2004 => Some(Self::Query),
            2013 => Some(Self::Message),
            _ => None,
        }
    }

    /// Raw wire value of this op-code.
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Fixed-size header carried by every framed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    /// Total frame length in bytes, this header included.
    pub message_length: u32,
    /// Caller-chosen exchange identifier.
    pub request_id: i32,
    /// `request_id` of the message this one answers, or 0 for requests.
    pub response_to: i32,
    /// Kind of the framed body.
    pub op_code: OpCode,
}

impl MessageHeader {
    /// Serialize the header to its 16-byte wire form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.message_length.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.request_id.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.response_to.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.op_code.as_u32().to_le_bytes());
        bytes
    }

    /// Parse a header from the first 16 bytes of `bytes`.
    ///
    /// Fails with [`ProtocolError::Truncated`] on short input and
    /// [`ProtocolError::UnsupportedOpCode`] on an unknown discriminant.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(ProtocolError::Truncated {
                offset: bytes.len(),
            });
        }

        let message_length = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let request_id = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let response_to = i32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let raw_op = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

        let op_code = OpCode::from_u32(raw_op).ok_or(ProtocolError::UnsupportedOpCode(raw_op))?;

        Ok(Self {
            message_length,
            request_id,
            response_to,
            op_code,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = MessageHeader {
            message_length: 1024,
            request_id: 42,
            response_to: -7,
            op_code: OpCode::Message,
        };

        let bytes = header.to_bytes();
        let parsed = MessageHeader::from_bytes(&bytes).expect("Should parse header");

        assert_eq!(parsed, header);
    }

    #[test]
    fn test_header_little_endian_layout() {
        let header = MessageHeader {
            message_length: 0x0102_0304,
            request_id: 1,
            response_to: 0,
            op_code: OpCode::Message,
        };

        let bytes = header.to_bytes();

        // Length is little-endian: least significant byte first.
        assert_eq!(&bytes[0..4], &[0x04, 0x03, 0x02, 0x01]);
        // 2013 = 0x07DD
        assert_eq!(&bytes[12..16], &[0xDD, 0x07, 0x00, 0x00]);
    }

    #[test]
    fn test_header_short_input() {
        let err = MessageHeader::from_bytes(&[0u8; 15]).unwrap_err();
        assert!(matches!(err, ProtocolError::Truncated { offset: 15 }));
    }

    #[test]
    fn test_header_unknown_op_code() {
        let mut bytes = MessageHeader {
            message_length: 16,
            request_id: 0,
            response_to: 0,
            op_code: OpCode::Reply,
        }
        .to_bytes();
        bytes[12..16].copy_from_slice(&999u32.to_le_bytes());

        let err = MessageHeader::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, ProtocolError::UnsupportedOpCode(999)));
    }

    #[test]
    fn test_op_code_discriminants() {
        assert_eq!(OpCode::Reply.as_u32(), 1);
        assert_eq!(OpCode::Query.as_u32(), 2004);
        assert_eq!(OpCode::Message.as_u32(), 2013);

        assert_eq!(OpCode::from_u32(2013), Some(OpCode::Message));
        assert_eq!(OpCode::from_u32(0), None);
    }
}
