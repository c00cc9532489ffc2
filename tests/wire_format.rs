#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Wire-format conformance tests for the message codec
//! Exercises section layouts, header coupling, flag endianness, and the
//! rejection paths for malformed frames

use docframe::core::header::HEADER_SIZE;
use docframe::core::message::flags;
use docframe::{
    JsonDocumentCodec, Message, MessageCodec, MessageHeader, OpCode, ProtocolError, RawDocument,
    RawDocumentCodec, Section,
};
use serde_json::json;

fn raw(payload: &[u8]) -> RawDocument {
    RawDocument::from_payload(payload).expect("Should build raw document")
}

fn decode(body: &[u8]) -> Result<Message<RawDocument>, ProtocolError> {
    let header = MessageHeader {
        message_length: (HEADER_SIZE + body.len()) as u32,
        request_id: 1,
        response_to: 0,
        op_code: OpCode::Message,
    };
    MessageCodec::new(RawDocumentCodec).deserialize(&header, body)
}

// ============================================================================
// SERIALIZATION
// ============================================================================

#[test]
fn test_frame_starts_with_valid_header() {
    let codec = MessageCodec::new(RawDocumentCodec);
    let mut message = Message::new(42, raw(b"ping"));
    message.response_to = 17;

    let frame = codec.serialize(&message).expect("Should serialize");

    let header = MessageHeader::from_bytes(&frame).expect("Should parse header");
    assert_eq!(header.message_length as usize, frame.len());
    assert_eq!(header.request_id, 42);
    assert_eq!(header.response_to, 17);
    assert_eq!(header.op_code, OpCode::Message);
}

#[test]
fn test_batch_identifier_is_written_to_the_wire() {
    let codec = MessageCodec::new(RawDocumentCodec);
    let message = Message {
        request_id: 2,
        response_to: 0,
        flags: 0,
        sections: vec![Section::Batch {
            identifier: "stats".to_string(),
            documents: vec![raw(&[0x01])],
        }],
        checksum: None,
    };

    let frame = codec.serialize(&message).expect("Should serialize");

    // [header(16)] [flags(4)] [tag(1)] [length(4)] [identifier] [0x00] ...
    assert_eq!(frame[20], 1);
    assert_eq!(&frame[25..30], b"stats");
    assert_eq!(frame[30], 0);
}

#[test]
fn test_message_with_no_sections_is_header_and_flags_only() {
    let codec = MessageCodec::new(RawDocumentCodec);
    let message = Message::<RawDocument> {
        request_id: 3,
        response_to: 0,
        flags: 0,
        sections: vec![],
        checksum: None,
    };

    let frame = codec.serialize(&message).expect("Should serialize");
    assert_eq!(frame.len(), HEADER_SIZE + 4);

    let header = MessageHeader::from_bytes(&frame).expect("Should parse header");
    let decoded = codec
        .deserialize(&header, &frame[HEADER_SIZE..])
        .expect("Should deserialize");
    assert!(decoded.sections.is_empty());
}

#[test]
fn test_checksum_is_never_serialized_or_decoded() {
    let codec = MessageCodec::new(RawDocumentCodec);
    let mut message = Message::new(4, raw(&[0xEE])).with_flags(flags::CHECKSUM_PRESENT);
    message.checksum = Some(0xDEAD_BEEF);

    let frame = codec.serialize(&message).expect("Should serialize");

    // header(16) + flags(4) + tag(1) + document(5): no trailing CRC word.
    assert_eq!(frame.len(), 26);

    let header = MessageHeader::from_bytes(&frame).expect("Should parse header");
    let decoded = codec
        .deserialize(&header, &frame[HEADER_SIZE..])
        .expect("Should deserialize");
    assert_eq!(decoded.flags, flags::CHECKSUM_PRESENT);
    assert_eq!(decoded.checksum, None);
}

// ============================================================================
// DESERIALIZATION
// ============================================================================

#[test]
fn test_decode_hand_built_frame() {
    // [messageLength(4, LE)] [requestId(4)] [responseTo(4)] [opCode(4)]
    let mut frame = Vec::new();
    frame.extend_from_slice(&38u32.to_le_bytes()); // total frame length
    frame.extend_from_slice(&21i32.to_le_bytes()); // requestId
    frame.extend_from_slice(&9i32.to_le_bytes()); // responseTo
    frame.extend_from_slice(&2013u32.to_le_bytes()); // opCode

    frame.extend_from_slice(&0u32.to_le_bytes()); // flags
    frame.push(0); // payload section tag
    frame.extend_from_slice(&[5, 0, 0, 0, 0xAA]); // document, length includes itself
    frame.push(1); // batch section tag
    frame.extend_from_slice(&11u32.to_le_bytes()); // section length, counting itself
    frame.extend_from_slice(b"db"); // identifier
    frame.push(0); // identifier terminator
    frame.extend_from_slice(&[4, 0, 0, 0]); // empty document
    assert_eq!(frame.len(), 38);

    let header = MessageHeader::from_bytes(&frame).expect("Should parse header");
    let decoded = MessageCodec::new(RawDocumentCodec)
        .deserialize(&header, &frame[HEADER_SIZE..])
        .expect("Should deserialize");

    assert_eq!(decoded.request_id, 21);
    assert_eq!(decoded.response_to, 9);
    assert_eq!(decoded.sections.len(), 2);
    assert_eq!(decoded.sections[0], Section::Payload(raw(&[0xAA])));
    assert_eq!(
        decoded.sections[1],
        Section::Batch {
            identifier: "db".to_string(),
            documents: vec![raw(&[])],
        }
    );
}

#[test]
fn test_flags_decode_little_endian() {
    let mut body = vec![0x02, 0x00, 0x00, 0x00]; // MORE_TO_COME; big-endian would read 0x02000000
    body.push(0); // payload section tag
    body.extend_from_slice(&[4, 0, 0, 0]); // empty document

    let decoded = decode(&body).expect("Should deserialize");
    assert_eq!(decoded.flags, flags::MORE_TO_COME);
}

#[test]
fn test_section_order_and_mix_are_preserved() {
    // Convention says at most one payload section, but decode accepts any
    // mix and returns it in wire order.
    let codec = MessageCodec::new(RawDocumentCodec);
    let message = Message {
        request_id: 8,
        response_to: 0,
        flags: 0,
        sections: vec![
            Section::Batch {
                identifier: "a".to_string(),
                documents: vec![],
            },
            Section::Payload(raw(&[1])),
            Section::Payload(raw(&[2])),
        ],
        checksum: None,
    };

    let frame = codec.serialize(&message).expect("Should serialize");
    let header = MessageHeader::from_bytes(&frame).expect("Should parse header");
    let decoded = codec
        .deserialize(&header, &frame[HEADER_SIZE..])
        .expect("Should deserialize");

    assert_eq!(decoded.sections, message.sections);
}

#[test]
fn test_json_documents_roundtrip() {
    let codec = MessageCodec::new(JsonDocumentCodec);
    let mut message = Message::new(11, json!({"find": "users", "limit": 5}));
    message.push_section(Section::Batch {
        identifier: "documents".to_string(),
        documents: vec![json!({"name": "ada"}), json!({"name": "grace"})],
    });

    let frame = codec.serialize(&message).expect("Should serialize");
    let header = MessageHeader::from_bytes(&frame).expect("Should parse header");
    let decoded = codec
        .deserialize(&header, &frame[HEADER_SIZE..])
        .expect("Should deserialize");

    assert_eq!(decoded.sections, message.sections);
}

// ============================================================================
// REJECTION PATHS
// ============================================================================

#[test]
fn test_unknown_section_kind_rejected() {
    let mut body = vec![0, 0, 0, 0]; // flags
    body.push(2); // tag 2 is not a known section kind

    let result = decode(&body);
    assert!(
        matches!(
            result,
            Err(ProtocolError::InvalidSectionKind { kind: 2, offset: 4 })
        ),
        "Should reject unknown section kind, got {result:?}"
    );
}

#[test]
fn test_unknown_kind_offset_points_at_the_bad_tag() {
    let mut body = vec![0, 0, 0, 0]; // flags
    body.push(0); // valid payload section first
    body.extend_from_slice(&[5, 0, 0, 0, 0x01]); // document
    body.push(0xCC); // then garbage

    let result = decode(&body);
    assert!(
        matches!(
            result,
            Err(ProtocolError::InvalidSectionKind {
                kind: 0xCC,
                offset: 10
            })
        ),
        "Offset should be the tag position, got {result:?}"
    );
}

#[test]
fn test_body_shorter_than_flag_word_rejected() {
    let result = decode(&[0, 0]);
    assert!(
        matches!(result, Err(ProtocolError::Truncated { offset: 2 })),
        "Should reject missing flag word, got {result:?}"
    );
}

#[test]
fn test_document_longer_than_buffer_rejected() {
    let mut body = vec![0, 0, 0, 0]; // flags
    body.push(0); // payload section tag
    body.extend_from_slice(&[10, 0, 0, 0]); // document claims 10 bytes, 4 present

    let result = decode(&body);
    assert!(
        matches!(result, Err(ProtocolError::Truncated { offset: 5 })),
        "Should reject overlong document claim, got {result:?}"
    );
}

#[test]
fn test_payload_tag_with_empty_body_rejected() {
    let body = vec![0, 0, 0, 0, 0]; // flags, then a bare payload tag

    let result = decode(&body);
    assert!(
        matches!(result, Err(ProtocolError::Truncated { offset: 5 })),
        "Should reject tag with no document, got {result:?}"
    );
}

#[test]
fn test_batch_length_overrunning_buffer_rejected() {
    let mut body = vec![0, 0, 0, 0]; // flags
    body.push(1); // batch section tag
    body.extend_from_slice(&200u32.to_le_bytes()); // claims far past the end
    body.extend_from_slice(b"db\0");

    let result = decode(&body);
    assert!(
        matches!(result, Err(ProtocolError::Truncated { offset: 5 })),
        "Should reject overlong section claim, got {result:?}"
    );
}

#[test]
fn test_batch_length_smaller_than_its_own_field_rejected() {
    let mut body = vec![0, 0, 0, 0]; // flags
    body.push(1); // batch section tag
    body.extend_from_slice(&3u32.to_le_bytes()); // cannot even cover the length field
    body.extend_from_slice(b"db\0");

    let result = decode(&body);
    assert!(
        matches!(result, Err(ProtocolError::Truncated { offset: 5 })),
        "Should reject undersized section claim, got {result:?}"
    );
}

#[test]
fn test_batch_without_identifier_terminator_rejected() {
    let mut body = vec![0, 0, 0, 0]; // flags
    body.push(1); // batch section tag
    body.extend_from_slice(&7u32.to_le_bytes()); // covers "abc" with no NUL
    body.extend_from_slice(b"abc");

    let result = decode(&body);
    assert!(
        matches!(result, Err(ProtocolError::Truncated { offset: 9 })),
        "Should reject unterminated identifier, got {result:?}"
    );
}

#[test]
fn test_batch_with_invalid_utf8_identifier_rejected() {
    let mut body = vec![0, 0, 0, 0]; // flags
    body.push(1); // batch section tag
    body.extend_from_slice(&7u32.to_le_bytes());
    body.extend_from_slice(&[0xFF, 0xFE]); // not UTF-8
    body.push(0); // terminator

    let result = decode(&body);
    assert!(
        matches!(result, Err(ProtocolError::InvalidIdentifier(_))),
        "Should reject non-UTF-8 identifier, got {result:?}"
    );
}

#[test]
fn test_document_inside_batch_cannot_cross_section_boundary() {
    // The inner document claims 6 bytes but the section body ends after 4;
    // decoding must fail instead of reading into the next section.
    let mut body = vec![0, 0, 0, 0]; // flags
    body.push(1); // batch section tag
    body.extend_from_slice(&9u32.to_le_bytes()); // 4 + "" + NUL + document(4)
    body.push(0); // empty identifier, terminated immediately
    body.extend_from_slice(&[6, 0, 0, 0]); // document claims past section end
    body.push(0); // next section's tag, must stay untouched
    body.extend_from_slice(&[4, 0, 0, 0]);

    let result = decode(&body);
    assert!(
        matches!(result, Err(ProtocolError::Truncated { offset: 10 })),
        "Should reject document crossing the section boundary, got {result:?}"
    );
}
