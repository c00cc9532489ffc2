//! Example: Wire Message Round Trip
//!
//! Builds a framed message section by section, serializes it, and walks the
//! resulting bytes: header, flag word, and each section's layout.
//!
//! Run with: `cargo run --example wire_roundtrip`

#![allow(clippy::uninlined_format_args)]

use bytes::BytesMut;
use docframe::core::header::HEADER_SIZE;
use docframe::core::message::flags;
use docframe::{JsonDocumentCodec, Message, MessageCodec, MessageFramer, MessageHeader, Section};
use serde_json::json;
use tokio_util::codec::Decoder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Wire Message Round Trip ===\n");

    // 1. Build a command message
    println!("1. BUILD");
    let mut message = Message::new(1, json!({ "insert": "events" }));
    message.push_section(Section::Batch {
        identifier: "documents".to_string(),
        documents: vec![
            json!({ "level": "info", "text": "service started" }),
            json!({ "level": "warn", "text": "disk at 80%" }),
        ],
    });
    let message = message.with_flags(flags::MORE_TO_COME);
    println!("   - Sections: {}", message.sections.len());
    println!("   - Flags: 0x{:08X}\n", message.flags);

    // 2. Serialize to a single frame
    println!("2. SERIALIZE");
    let codec = MessageCodec::new(JsonDocumentCodec);
    let frame = codec.serialize(&message)?;
    println!("   - Frame size: {} bytes", frame.len());
    println!("   - Header bytes: {:02X?}", &frame[..HEADER_SIZE]);
    println!(
        "   - Flag word:    {:02X?} (little-endian)\n",
        &frame[HEADER_SIZE..HEADER_SIZE + 4]
    );

    // 3. Parse the header back
    println!("3. HEADER");
    let header = MessageHeader::from_bytes(&frame)?;
    println!("   - messageLength: {}", header.message_length);
    println!("   - requestId:     {}", header.request_id);
    println!(
        "   - opCode:        {:?} ({})\n",
        header.op_code,
        header.op_code.as_u32()
    );

    // 4. Deserialize the body
    println!("4. DESERIALIZE");
    let decoded = codec.deserialize(&header, &frame[HEADER_SIZE..])?;
    for (i, section) in decoded.sections.iter().enumerate() {
        match section {
            Section::Payload(doc) => {
                println!("   - Section {}: payload {}", i, doc);
            }
            Section::Batch {
                identifier,
                documents,
            } => {
                println!(
                    "   - Section {}: batch \"{}\" with {} documents",
                    i,
                    identifier,
                    documents.len()
                );
            }
        }
    }
    println!(
        "   - Roundtrip: {}\n",
        if decoded.sections == message.sections {
            "✓ Success"
        } else {
            "✗ Failed"
        }
    );

    // 5. Incremental frame assembly over a split buffer
    println!("5. FRAME ASSEMBLY");
    let mut framer = MessageFramer::new(JsonDocumentCodec);
    let mut buffer = BytesMut::new();

    let split = frame.len() / 2;
    buffer.extend_from_slice(&frame[..split]);
    let partial = framer.decode(&mut buffer)?;
    println!(
        "   - Fed {} of {} bytes: {}",
        split,
        frame.len(),
        if partial.is_none() {
            "incomplete, waiting"
        } else {
            "unexpected message"
        }
    );

    buffer.extend_from_slice(&frame[split..]);
    let assembled = framer.decode(&mut buffer)?;
    println!(
        "   - Fed the rest: {}",
        if assembled.is_some() {
            "✓ message decoded"
        } else {
            "✗ nothing decoded"
        }
    );

    Ok(())
}
