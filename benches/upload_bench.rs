use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use docframe::{ChunkedUploadStream, FileId, MemorySink};
use serde_json::Value;

#[allow(clippy::unwrap_used)]
fn stream(chunk_size: usize) -> ChunkedUploadStream<MemorySink<FileId, Value>> {
    let sink: MemorySink<FileId, Value> = MemorySink::new();
    ChunkedUploadStream::new(
        sink,
        FileId::from_bytes([1; 16]),
        "bench.bin",
        chunk_size,
        None,
    )
    .unwrap()
}

#[allow(clippy::unwrap_used)]
fn bench_chunked_upload(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunked_upload");
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let data = vec![0xAB_u8; 1024 * 1024];

    for &chunk_size in &[4 * 1024_usize, 64 * 1024, 255 * 1024] {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_function(format!("write_1mib_chunks_{chunk_size}b"), |b| {
            b.iter_batched(
                || stream(chunk_size),
                |mut stream| {
                    rt.block_on(async {
                        stream.write(&data).await.unwrap();
                        stream.close().await.unwrap();
                    })
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_write_granularity(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_granularity");
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let data = vec![0xCD_u8; 1024 * 1024];

    for &piece in &[512usize, 8192, 65536] {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_function(format!("write_1mib_pieces_{piece}b"), |b| {
            b.iter_batched(
                || stream(255 * 1024),
                |mut stream| {
                    rt.block_on(async {
                        for part in data.chunks(piece) {
                            stream.write(part).await.unwrap();
                        }
                        stream.close().await.unwrap();
                    })
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_chunked_upload, bench_write_granularity);
criterion_main!(benches);
