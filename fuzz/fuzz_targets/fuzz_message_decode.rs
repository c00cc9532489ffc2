#![no_main]

use docframe::core::header::HEADER_SIZE;
use docframe::{MessageCodec, MessageHeader, OpCode, RawDocumentCodec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz body deserialization - test for panics, crashes, infinite loops
    let codec = MessageCodec::new(RawDocumentCodec);
    let header = MessageHeader {
        message_length: (HEADER_SIZE + data.len()) as u32,
        request_id: 1,
        response_to: 0,
        op_code: OpCode::Message,
    };

    if let Ok(message) = codec.deserialize(&header, data) {
        // If decoding succeeds, the reserialized frame must decode to the
        // same message
        if let Ok(frame) = codec.serialize(&message) {
            let header = MessageHeader::from_bytes(&frame).unwrap();
            let decoded = codec.deserialize(&header, &frame[HEADER_SIZE..]).unwrap();
            assert_eq!(decoded.flags, message.flags);
            assert_eq!(decoded.sections, message.sections);
        }
    }
});
