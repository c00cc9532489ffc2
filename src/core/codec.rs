//! # Stream Framing
//!
//! [`MessageFramer`] adapts the message codec to byte streams via
//! `tokio_util::codec`, so a transport can be driven as
//! `Framed<T, MessageFramer<C>>`.
//!
//! Decoding is incremental: bytes accumulate in the read buffer until a whole
//! frame (per the header's `message_length`) is present, at which point the
//! frame is split off zero-copy and handed to [`MessageCodec`]. Partial input
//! never consumes buffer bytes and never errors.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use crate::config::MAX_MESSAGE_SIZE;
use crate::core::document::DocumentCodec;
use crate::core::header::{MessageHeader, OpCode, HEADER_SIZE};
use crate::core::message::{Message, MessageCodec, FLAG_WORD_SIZE};
use crate::error::ProtocolError;

/// Smallest structurally valid frame: header plus flag word.
const MIN_MESSAGE_SIZE: usize = HEADER_SIZE + FLAG_WORD_SIZE;

/// Tokio codec framing whole messages over a byte stream.
#[derive(Debug, Clone)]
pub struct MessageFramer<C> {
    messages: MessageCodec<C>,
    max_message_size: usize,
}

impl<C: DocumentCodec> MessageFramer<C> {
    /// Build a framer around a document codec, with the default
    /// [`MAX_MESSAGE_SIZE`] cap.
    pub fn new(documents: C) -> Self {
        Self {
            messages: MessageCodec::new(documents),
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }

    /// Override the maximum accepted frame size.
    #[must_use]
    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }
}

impl<C: DocumentCodec> Decoder for MessageFramer<C> {
    type Item = Message<C::Document>;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        let declared = u32::from_le_bytes([src[0], src[1], src[2], src[3]]) as usize;
        if declared < MIN_MESSAGE_SIZE {
            return Err(ProtocolError::InvalidHeader);
        }
        if declared > self.max_message_size {
            return Err(ProtocolError::OversizedMessage(declared));
        }

        if src.len() < declared {
            src.reserve(declared - src.len());
            return Ok(None);
        }

        let frame = src.split_to(declared);
        let header = MessageHeader::from_bytes(&frame)?;
        if header.op_code != OpCode::Message {
            return Err(ProtocolError::UnsupportedOpCode(header.op_code.as_u32()));
        }

        let message = self.messages.deserialize(&header, &frame[HEADER_SIZE..])?;
        trace!(
            message_length = declared,
            request_id = header.request_id,
            sections = message.sections.len(),
            "frame decoded"
        );
        Ok(Some(message))
    }
}

impl<C: DocumentCodec> Encoder<Message<C::Document>> for MessageFramer<C> {
    type Error = ProtocolError;

    fn encode(
        &mut self,
        item: Message<C::Document>,
        dst: &mut BytesMut,
    ) -> Result<(), Self::Error> {
        let bytes = self.messages.serialize(&item)?;
        if bytes.len() > self.max_message_size {
            return Err(ProtocolError::OversizedMessage(bytes.len()));
        }
        dst.reserve(bytes.len());
        dst.extend_from_slice(&bytes);
        Ok(())
    }
}
