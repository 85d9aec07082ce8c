//! Benchmarks for suffix array construction and the BWT built on top of it.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxiarc_bwt::{bwt, divsufsort};
use std::hint::black_box;

mod test_data {
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    pub fn random(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed: u64 = 0x123456789ABCDEF0;
        for _ in 0..size {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((seed >> 32) as u8);
        }
        data
    }

    pub fn text_like(size: usize) -> Vec<u8> {
        let text = b"The quick brown fox jumps over the lazy dog. \
                     Pack my box with five dozen liquor jugs. \
                     How vexingly quick daft zebras jump! ";
        let mut data = Vec::with_capacity(size);
        while data.len() < size {
            let remaining = size - data.len();
            let chunk_size = remaining.min(text.len());
            data.extend_from_slice(&text[..chunk_size]);
        }
        data
    }
}

mod data_sizes {
    pub const TINY: usize = 1024;
    pub const SMALL: usize = 10 * 1024;
    pub const MEDIUM: usize = 64 * 1024;
}

fn bench_suffix_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("suffix_array");

    let sizes = [("1KB", data_sizes::TINY), ("10KB", data_sizes::SMALL), ("64KB", data_sizes::MEDIUM)];

    for (size_name, size) in sizes {
        let data = test_data::text_like(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &data, |b, data| {
            b.iter(|| {
                let sa = divsufsort::suffix_array(black_box(data));
                black_box(sa);
            });
        });
    }

    group.finish();
}

fn bench_bwt_forward(c: &mut Criterion) {
    let mut group = c.benchmark_group("bwt_forward");

    let sizes = [("1KB", data_sizes::TINY), ("10KB", data_sizes::SMALL), ("64KB", data_sizes::MEDIUM)];

    for (size_name, size) in sizes {
        let data = test_data::text_like(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &data, |b, data| {
            b.iter(|| {
                let (l, pi) = bwt::forward(black_box(data)).unwrap();
                black_box((l, pi));
            });
        });
    }

    group.finish();
}

fn bench_bwt_inverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("bwt_inverse");

    let sizes = [("1KB", data_sizes::TINY), ("10KB", data_sizes::SMALL), ("64KB", data_sizes::MEDIUM)];

    for (size_name, size) in sizes {
        let data = test_data::text_like(size);
        let (l, pi) = bwt::forward(&data).unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &(l, pi), |b, (l, pi)| {
            b.iter(|| {
                let restored = bwt::inverse(black_box(l), pi).unwrap();
                black_box(restored);
            });
        });
    }

    group.finish();
}

fn bench_suffix_array_data_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("suffix_array_data_types");
    let size = data_sizes::SMALL;

    let uniform = test_data::uniform(size);
    let random = test_data::random(size);
    let text = test_data::text_like(size);

    for (name, data) in [("uniform", &uniform), ("random", &random), ("text", &text)] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), data, |b, data| {
            b.iter(|| {
                let sa = divsufsort::suffix_array(black_box(data));
                black_box(sa);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_suffix_array, bench_bwt_forward, bench_bwt_inverse, bench_suffix_array_data_types);
criterion_main!(benches);
