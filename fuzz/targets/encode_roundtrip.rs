#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use podstore::{
    decode_container, encode_container, ChecksumKind, CompressionLevel, Container, Endianness,
    LoadOptions, SaveOptions,
};

#[derive(Debug, Arbitrary)]
enum FuzzValue {
    U8(Vec<u8>),
    I32(Vec<i32>),
    U64(Vec<u64>),
    F64(Vec<f64>),
    Text(String),
    Unassigned,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    entries: Vec<(Vec<u8>, FuzzValue)>,
    level: u8,
    checksum: u8,
    big_endian: bool,
    seed: u32,
}

fuzz_target!(|input: FuzzInput| {
    let mut container = Container::new();
    for (key, value) in &input.entries {
        let Ok(handle) = container.get_or_create(key) else {
            // ключ с NUL отклоняется
            continue;
        };
        let Ok(item) = container.item_mut(handle) else {
            continue;
        };
        let _ = match value {
            FuzzValue::U8(v) => item.set_values(v),
            FuzzValue::I32(v) => item.set_values(v),
            FuzzValue::U64(v) => item.set_values(v),
            FuzzValue::F64(v) => item.set_values(v),
            FuzzValue::Text(s) => item.set_text(s),
            FuzzValue::Unassigned => Ok(()),
        };
    }

    let checksum = ChecksumKind::ALL[usize::from(input.checksum) % ChecksumKind::ALL.len()];
    let opts = SaveOptions {
        compression: CompressionLevel::new(input.level % 10).unwrap(),
        checksum,
        checksum_seed: input.seed,
        endianness: if input.big_endian {
            Endianness::Big
        } else {
            Endianness::Little
        },
    };

    let bytes = encode_container(&container, &opts).unwrap();
    let decoded = decode_container(&bytes, &LoadOptions::from(&opts)).unwrap();
    assert_eq!(decoded, container);
});
