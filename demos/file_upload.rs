//! Example: Chunked File Upload
//!
//! Streams a payload into an in-memory sink through a chunked upload stream,
//! then validates and reassembles the stored records. Run with logging to
//! watch each chunk insert:
//!
//! Run with: `cargo run --example file_upload`

#![allow(clippy::uninlined_format_args)]

use docframe::{
    reassemble, Bucket, BucketConfig, FileId, MemorySink, RandomIdGenerator, UploadOptions,
};
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Chunked File Upload Demo ===\n");

    // 1. Configure a bucket with a small chunk size so the split is visible
    println!("1. CONFIGURE");
    let config = BucketConfig::default_with_overrides(|c| {
        c.bucket_name = "demo".to_string();
        c.chunk_size_bytes = 16;
    });
    println!("   - Bucket: {}", config.bucket_name);
    println!("   - Chunk size: {} bytes", config.chunk_size_bytes);
    println!("   - Chunk destination: {}", config.chunks_destination());
    println!("   - File destination: {}\n", config.files_destination());

    let sink: MemorySink<FileId, Value> = MemorySink::new();
    let bucket = Bucket::new(sink.clone(), RandomIdGenerator, config)?;

    // 2. Stream the payload in uneven pieces
    println!("2. UPLOAD");
    let payload: Vec<u8> = (b'a'..=b'z').cycle().take(100).collect();
    let mut stream = bucket.open_upload_stream(
        "alphabet.txt",
        UploadOptions::default().with_metadata(json!({ "source": "demo" })),
    )?;
    println!("   - files_id: {}", stream.files_id());

    for piece in payload.chunks(7) {
        stream.write(piece).await?;
    }
    stream.close().await?;
    println!("   - Wrote {} bytes in pieces of 7\n", payload.len());

    // 3. Inspect the records the sink received
    println!("3. RECORDS");
    let files = sink.files();
    let file = &files[0];
    println!("   - Chunks: {}", sink.chunk_count());
    println!(
        "   - File: \"{}\", length {}, chunk size {}",
        file.filename, file.length, file.chunk_size
    );
    println!("   - Metadata: {:?}", file.metadata);
    for chunk in sink.chunks_for(&file.id).iter().take(3) {
        println!("   - Chunk {}: {} bytes", chunk.n, chunk.data.len());
    }
    println!("   - ...\n");

    // 4. Reassemble and compare
    println!("4. REASSEMBLE");
    let rebuilt = reassemble(file, &sink.chunks())?;
    println!(
        "   - Rebuilt {} bytes: {}",
        rebuilt.len(),
        if rebuilt == payload {
            "✓ identical to the upload"
        } else {
            "✗ mismatch"
        }
    );

    Ok(())
}
