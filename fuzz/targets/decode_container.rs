#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use podstore::{decode_container, ChecksumKind, ErrorExt, LoadOptions, StatusCode};

#[derive(Debug, Arbitrary)]
enum FuzzChecksum {
    None,
    Adler32,
    Crc32,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    data: Vec<u8>,
    checksum: FuzzChecksum,
    seed: u32,
}

impl From<FuzzChecksum> for ChecksumKind {
    fn from(c: FuzzChecksum) -> Self {
        match c {
            FuzzChecksum::None => ChecksumKind::None,
            FuzzChecksum::Adler32 => ChecksumKind::Adler32,
            FuzzChecksum::Crc32 => ChecksumKind::Crc32,
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    let opts = LoadOptions::new(input.checksum.into(), input.seed);
    // Произвольные байты: либо корректный контейнер, либо FileCorrupt.
    if let Err(e) = decode_container(&input.data, &opts) {
        assert_eq!(e.status_code(), StatusCode::FileCorrupt, "{e}");
    }
});
