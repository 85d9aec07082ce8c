//! Benchmarks for the entropy coding stage: range coding, Huffman coding,
//! and the full single-block compression pipeline built on top of them.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxiarc_bwt::entropy::{huffman, range};
use oxiarc_bwt::{BlockConfig, Coder, compress_block, decompress_block};
use oxiarc_core::bitio::{BitSink, BitSource};
use std::hint::black_box;

mod test_data {
    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"The quick brown fox jumps over the lazy dog. \
                     Pack my box with five dozen liquor jugs. ";
        let mut data = Vec::with_capacity(size);
        while data.len() < size {
            let remaining = size - data.len();
            let chunk_size = remaining.min(text.len());
            data.extend_from_slice(&text[..chunk_size]);
        }
        data
    }

    pub fn skewed(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 42;
        while data.len() < size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            let bucket = (seed >> 60) % 16;
            data.push(if bucket < 10 { b'a' } else { (seed >> 32) as u8 });
        }
        data
    }
}

mod data_sizes {
    pub const SMALL: usize = 10 * 1024;
    pub const MEDIUM: usize = 64 * 1024;
}

fn bench_range_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_encode");
    for (size_name, size) in [("10KB", data_sizes::SMALL), ("64KB", data_sizes::MEDIUM)] {
        let data = test_data::text_like(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &data, |b, data| {
            b.iter(|| {
                let mut out = Vec::new();
                let mut sink = BitSink::new(&mut out);
                range::encode_chunk(&mut sink, black_box(data)).unwrap();
                sink.close().unwrap();
                black_box(out);
            });
        });
    }
    group.finish();
}

fn bench_huffman_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman_encode");
    for (size_name, size) in [("10KB", data_sizes::SMALL), ("64KB", data_sizes::MEDIUM)] {
        let data = test_data::text_like(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &data, |b, data| {
            b.iter(|| {
                let mut out = Vec::new();
                let mut sink = BitSink::new(&mut out);
                huffman::encode_chunk(&mut sink, black_box(data)).unwrap();
                sink.close().unwrap();
                black_box(out);
            });
        });
    }
    group.finish();
}

fn bench_range_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_decode");
    for (size_name, size) in [("10KB", data_sizes::SMALL), ("64KB", data_sizes::MEDIUM)] {
        let data = test_data::text_like(size);
        let mut encoded = Vec::new();
        {
            let mut sink = BitSink::new(&mut encoded);
            range::encode_chunk(&mut sink, &data).unwrap();
            sink.close().unwrap();
        }

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &encoded, |b, encoded| {
            b.iter(|| {
                let mut source = BitSource::new(black_box(&encoded[..]));
                black_box(range::decode_chunk(&mut source).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_coder_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("coder_comparison_ratio");
    group.sample_size(10);

    for (pattern_name, data) in
        [("text", test_data::text_like(data_sizes::MEDIUM)), ("skewed", test_data::skewed(data_sizes::MEDIUM))]
    {
        for (coder_name, coder) in [("range", Coder::Range), ("huffman", Coder::Huffman)] {
            let id = format!("{pattern_name}/{coder_name}");
            group.bench_with_input(BenchmarkId::from_parameter(&id), &data, |b, data| {
                b.iter(|| {
                    let mut out = Vec::new();
                    let mut sink = BitSink::new(&mut out);
                    oxiarc_bwt::entropy::encode(&mut sink, coder, black_box(data)).unwrap();
                    sink.close().unwrap();
                    black_box(out);
                });
            });
        }
    }

    group.finish();
}

fn bench_full_pipeline_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline_roundtrip");

    let config = BlockConfig::default();
    for (size_name, size) in [("10KB", data_sizes::SMALL), ("64KB", data_sizes::MEDIUM)] {
        let data = test_data::text_like(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &data, |b, data| {
            b.iter(|| {
                let compressed = compress_block(&config, black_box(data)).unwrap();
                let restored = decompress_block(&compressed).unwrap();
                black_box(restored);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_range_encode,
    bench_huffman_encode,
    bench_range_decode,
    bench_coder_comparison,
    bench_full_pipeline_roundtrip,
);
criterion_main!(benches);
