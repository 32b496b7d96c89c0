//! Бенчмарк уровней сжатия zlib 0-9
//!
//! Измеряет:
//! - Скорость сжатия/распаковки для каждого уровня
//! - Throughput на сжимаемых и случайных данных

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use podstore::engine::podx::compression::{compress_block, decompress_block, CompressionLevel};
use rand::{rngs::SmallRng, RngCore, SeedableRng};

fn create_compressible_data(size: usize) -> Vec<u8> {
    let pattern = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. ";
    let mut data = Vec::with_capacity(size);
    while data.len() < size {
        data.extend_from_slice(pattern);
    }
    data.truncate(size);
    data
}

fn create_random_data(size: usize) -> Vec<u8> {
    let mut data = vec![0u8; size];
    SmallRng::seed_from_u64(7).fill_bytes(&mut data);
    data
}

fn bench_levels(c: &mut Criterion) {
    let size = 256 * 1024;
    let inputs = [
        ("compressible", create_compressible_data(size)),
        ("random", create_random_data(size)),
    ];

    let mut group = c.benchmark_group("compress_block");
    group.throughput(Throughput::Bytes(size as u64));
    for (name, data) in &inputs {
        for level in 0..=9u8 {
            let level = CompressionLevel::new(level).unwrap();
            group.bench_with_input(BenchmarkId::new(*name, level.get()), data, |b, d| {
                b.iter(|| compress_block(black_box(d), level).unwrap())
            });
        }
    }
    group.finish();

    let mut group = c.benchmark_group("decompress_block");
    group.throughput(Throughput::Bytes(size as u64));
    for (name, data) in &inputs {
        for level in [1u8, 6, 9] {
            let level = CompressionLevel::new(level).unwrap();
            let packed = compress_block(data, level).unwrap();
            group.bench_with_input(BenchmarkId::new(*name, level.get()), &packed, |b, p| {
                b.iter(|| decompress_block(black_box(p), size).unwrap())
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_levels);
criterion_main!(benches);
