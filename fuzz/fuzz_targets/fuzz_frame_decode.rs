#![no_main]

use bytes::BytesMut;
use docframe::{MessageFramer, RawDocumentCodec};
use libfuzzer_sys::fuzz_target;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    // Fuzz incremental frame assembly - drain the buffer until it yields
    // nothing or errors
    let mut framer = MessageFramer::new(RawDocumentCodec);
    let mut buffer = BytesMut::from(data);

    while let Ok(Some(_)) = framer.decode(&mut buffer) {}
});
