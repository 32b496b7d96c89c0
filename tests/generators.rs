//! Генераторы для property-based тестирования контейнеров.
//!
//! Каждый генератор создаёт стратегии для случайных, но валидных данных
//! с акцентом на граничные случаи: пустые массивы, крайние значения, NaN.

use std::{collections::HashSet, ops::RangeInclusive};

use podstore::{
    ChecksumKind, CompressionLevel, Container, Endianness, LoadOptions, PodResult, SaveOptions,
};
use proptest::{collection::vec, prelude::*, string::string_regex};

/// Размеры массивов - от пустых до средних
const SMALL_SIZE: RangeInclusive<usize> = 0..=10;
const MEDIUM_SIZE: RangeInclusive<usize> = 10..=200;

/// Значение одного элемента для записи в контейнер.
#[derive(Debug, Clone)]
pub enum PodValue {
    Unassigned,
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Ascii(Vec<u8>),
    Utf8(String),
}

fn sized<T: Arbitrary + std::fmt::Debug + Clone + 'static>() -> impl Strategy<Value = Vec<T>> {
    prop_oneof![vec(any::<T>(), SMALL_SIZE), vec(any::<T>(), MEDIUM_SIZE)]
}

/// Генератор значений всех типов.
pub fn pod_value_strategy() -> impl Strategy<Value = PodValue> {
    prop_oneof![
        Just(PodValue::Unassigned),
        sized::<u8>().prop_map(PodValue::U8),
        sized::<u16>().prop_map(PodValue::U16),
        sized::<u32>().prop_map(PodValue::U32),
        sized::<u64>().prop_map(PodValue::U64),
        sized::<i8>().prop_map(PodValue::I8),
        sized::<i16>().prop_map(PodValue::I16),
        sized::<i32>().prop_map(PodValue::I32),
        sized::<i64>().prop_map(PodValue::I64),
        // any::<f32>() включает NaN и бесконечности
        sized::<f32>().prop_map(PodValue::F32),
        sized::<f64>().prop_map(PodValue::F64),
        vec(0u8..=127, SMALL_SIZE).prop_map(PodValue::Ascii),
        any::<String>().prop_map(PodValue::Utf8),
    ]
}

/// Генератор ключей: ASCII, Unicode и произвольные байты без NUL.
pub fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        string_regex("[a-zA-Z0-9_.]{0,16}")
            .unwrap()
            .prop_map(String::into_bytes),
        string_regex("[а-яА-Я]{1,8}")
            .unwrap()
            .prop_map(String::into_bytes),
        vec(1u8..=255, 1..=24),
    ]
}

/// Генератор набора записей с уникальными ключами.
pub fn entries_strategy() -> impl Strategy<Value = Vec<(Vec<u8>, PodValue)>> {
    vec((key_strategy(), pod_value_strategy()), 0..=12).prop_map(|entries| {
        let mut seen = HashSet::new();
        entries
            .into_iter()
            .filter(|(k, _)| seen.insert(k.clone()))
            .collect()
    })
}

/// Генератор параметров сохранения.
pub fn save_options_strategy() -> impl Strategy<Value = SaveOptions> {
    (
        0u8..=9,
        prop_oneof![
            Just(ChecksumKind::None),
            Just(ChecksumKind::Adler32),
            Just(ChecksumKind::Crc32),
        ],
        any::<u32>(),
        prop_oneof![
            Just(Endianness::Little),
            Just(Endianness::Big),
            Just(Endianness::Native),
        ],
    )
        .prop_map(|(level, checksum, checksum_seed, endianness)| SaveOptions {
            compression: CompressionLevel::new(level).unwrap(),
            checksum,
            checksum_seed,
            endianness,
        })
}

/// Записывает значение под ключом.
pub fn apply(
    container: &mut Container,
    key: &[u8],
    value: &PodValue,
) -> PodResult<()> {
    let handle = container.get_or_create(key)?;
    let item = container.item_mut(handle)?;
    match value {
        PodValue::Unassigned => Ok(()),
        PodValue::U8(v) => item.set_values(v),
        PodValue::U16(v) => item.set_values(v),
        PodValue::U32(v) => item.set_values(v),
        PodValue::U64(v) => item.set_values(v),
        PodValue::I8(v) => item.set_values(v),
        PodValue::I16(v) => item.set_values(v),
        PodValue::I32(v) => item.set_values(v),
        PodValue::I64(v) => item.set_values(v),
        PodValue::F32(v) => item.set_values(v),
        PodValue::F64(v) => item.set_values(v),
        PodValue::Ascii(v) => item.set_ascii(v),
        PodValue::Utf8(s) => item.set_text(s),
    }
}

/// Строит контейнер из записей.
pub fn build_container(entries: &[(Vec<u8>, PodValue)]) -> Container {
    let mut c = Container::new();
    for (k, v) in entries {
        apply(&mut c, k, v).unwrap();
    }
    c
}

/// Параметры загрузки, соответствующие параметрам сохранения.
pub fn load_options_for(opts: &SaveOptions) -> LoadOptions {
    LoadOptions::from(opts)
}
