use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use podstore::{
    decode_container, encode_container, ChecksumKind, CompressionLevel, Container, Endianness,
    LoadOptions, SaveOptions,
};
use podstore_error::PodResult;
use rand::{rngs::SmallRng, Rng, SeedableRng};

// ============================================================================
// Helper functions для создания тестовых данных
// ============================================================================

/// Контейнер из `items` элементов по `len` значений каждый, типы чередуются.
fn create_container(
    items: usize,
    len: usize,
) -> PodResult<Container> {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut c = Container::new();
    for i in 0..items {
        let key = format!("item_{i}");
        match i % 4 {
            0 => {
                let v: Vec<u32> = (0..len).map(|_| rng.gen()).collect();
                c.set_values(&key, &v)?;
            }
            1 => {
                let v: Vec<f64> = (0..len).map(|_| rng.gen()).collect();
                c.set_values(&key, &v)?;
            }
            2 => {
                let v: Vec<i16> = (0..len).map(|j| (j % 100) as i16).collect();
                c.set_values(&key, &v)?;
            }
            _ => {
                c.set_text(&key, &"pod ".repeat(len / 4 + 1))?;
            }
        }
    }
    Ok(c)
}

fn options(
    checksum: ChecksumKind,
    level: CompressionLevel,
    endianness: Endianness,
) -> SaveOptions {
    SaveOptions {
        compression: level,
        checksum,
        checksum_seed: 0,
        endianness,
    }
}

// ============================================================================
// Бенчмарки
// ============================================================================

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_container");
    for &(items, len) in &[(10usize, 16usize), (100, 256), (20, 50_000)] {
        let container = create_container(items, len).unwrap();
        let plain = options(ChecksumKind::None, CompressionLevel::NONE, Endianness::Native);
        let raw = encode_container(&container, &plain).unwrap();
        group.throughput(Throughput::Bytes(raw.len() as u64));

        for checksum in ChecksumKind::ALL {
            let opts = options(checksum, CompressionLevel::NONE, Endianness::Native);
            group.bench_with_input(
                BenchmarkId::new(format!("{checksum}"), format!("{items}x{len}")),
                &container,
                |b, cont| b.iter(|| encode_container(black_box(cont), &opts).unwrap()),
            );
        }
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_container");
    let container = create_container(100, 1024).unwrap();

    for endianness in [Endianness::Little, Endianness::Big] {
        for level in [CompressionLevel::NONE, CompressionLevel::DEFAULT] {
            let opts = options(ChecksumKind::Crc32, level, endianness);
            let bytes = encode_container(&container, &opts).unwrap();
            let load = LoadOptions::from(&opts);
            group.throughput(Throughput::Bytes(bytes.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{endianness}"), format!("level_{level}")),
                &bytes,
                |b, data| b.iter(|| decode_container(black_box(data), &load).unwrap()),
            );
        }
    }
    group.finish();
}

fn bench_file_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_roundtrip");
    let container = create_container(50, 4096).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.pod");
    let opts = options(ChecksumKind::Adler32, CompressionLevel::DEFAULT, Endianness::Native);
    let load = LoadOptions::from(&opts);

    group.bench_function("save_then_load", |b| {
        b.iter(|| {
            container.save(&path, &opts).unwrap();
            black_box(Container::open(&path, &load).unwrap())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_file_roundtrip);
criterion_main!(benches);
