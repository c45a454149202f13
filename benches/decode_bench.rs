use cfnf_decoder::sink::SinkRegistry;
use cfnf_decoder::{CaptureConverter, CaptureDecoder, DecodeOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pprof::criterion::Output;
use std::io;

/// Helper function to create a capture with the specified number of frames
fn create_capture_with_frames(num_frames: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(num_frames * (244 + 4));

    for i in 0..num_frames {
        data.extend_from_slice(b"AAFF");

        // Paged region, transmitted first
        data.extend_from_slice("00".repeat(64).as_bytes());

        // Critical region: varying measurement words, sequence counter last
        let word = (i as u32).wrapping_mul(2_654_435_761);
        for _ in 0..14 {
            data.extend_from_slice(format!("{:08X}", word & 0x7F7F_7F7F).as_bytes());
        }
        data.extend_from_slice(format!("{:04X}", i as u16 & 0x7FFF).as_bytes());

        // Every hundredth frame is truncated
        if i % 100 == 99 {
            data.truncate(data.len() - 2);
        }
    }

    data
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for &frames in &[100usize, 10_000] {
        let data = create_capture_with_frames(frames);
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_function(BenchmarkId::new("in_memory", frames), |b| {
            b.iter(|| {
                let records = CaptureDecoder::from_bytes(black_box(&data)).unwrap();
                black_box(records);
            });
        });
    }

    group.finish();
}

fn benchmark_sinks(c: &mut Criterion) {
    let data = create_capture_with_frames(10_000);

    let mut group = c.benchmark_group("sinks");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(20);

    group.bench_function("render_10k_frames", |b| {
        b.iter(|| {
            let mut sinks = SinkRegistry::from_factory(|_| Ok(io::sink())).unwrap();
            let stats =
                CaptureConverter::run(black_box(&data), &mut sinks, &DecodeOptions::default())
                    .unwrap();
            black_box(stats);
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(pprof::criterion::PProfProfiler::new(100, Output::Flamegraph(None)));
    targets =
        benchmark_decode,
        benchmark_sinks
}
criterion_main!(benches);
