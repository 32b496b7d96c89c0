//! Тесты модели контейнера: порядок обхода, удаление, дескрипторы.

use podstore::{Container, ErrorExt, ItemHandle, LoadOptions, SaveOptions, StatusCode};
use proptest::prelude::*;
use tempfile::tempdir;

/// Обход через first/next с ограничением на число шагов.
fn walk(c: &Container) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    let mut cursor = c.first();
    while let Some(h) = cursor {
        assert!(out.len() <= c.len(), "traversal does not terminate");
        out.push(c.try_key(h).unwrap().to_vec());
        cursor = c.next(h).unwrap();
    }
    out
}

/// Тест проверяет, что удаление отсутствующего ключа и устаревшего
/// дескриптора ничего не меняет.
#[test]
fn test_idempotent_removal() {
    let mut c = Container::new();
    c.set_values("a", &[1u8]).unwrap();
    let b = c.set_values("b", &[2u8]).unwrap();

    assert!(c.remove_key("zzz").is_none());
    assert!(c.remove(b).is_some());
    let snapshot = c.clone();
    assert!(c.remove(b).is_none());
    assert!(c.remove_key("b").is_none());
    assert_eq!(c, snapshot);
    assert_eq!(walk(&c), vec![b"a".to_vec()]);
}

/// Тест проверяет, что повторно созданный ключ встаёт в конец порядка.
#[test]
fn test_recreated_key_moves_to_end() {
    let mut c = Container::new();
    for k in ["x", "y", "z"] {
        c.get_or_create(k).unwrap();
    }
    c.remove_key("x");
    c.get_or_create("x").unwrap();
    assert_eq!(walk(&c), vec![b"y".to_vec(), b"z".to_vec(), b"x".to_vec()]);
}

/// Тест проверяет удаление во время обхода по дескрипторам.
#[test]
fn test_remove_while_walking() {
    let mut c = Container::new();
    for i in 0..10u8 {
        c.set_values([b'k', b'0' + i], &[i]).unwrap();
    }

    let mut cursor = c.first();
    while let Some(h) = cursor {
        cursor = c.next(h).unwrap();
        let value = c.item(h).unwrap().get_values::<u8>(1).unwrap()[0];
        if value % 2 == 0 {
            c.remove(h);
        }
    }
    let remaining: Vec<u8> = c
        .iter()
        .map(|item| item.get_values::<u8>(1).unwrap()[0])
        .collect();
    assert_eq!(remaining, vec![1, 3, 5, 7, 9]);
}

/// Тест проверяет, что дескриптор из другого состояния ячейки не даёт
/// доступ к новому элементу.
#[test]
fn test_handle_generation_reuse() {
    let mut c = Container::new();
    let old: ItemHandle = c.set_text("old", "v").unwrap();
    c.remove(old);
    let new = c.set_text("new", "w").unwrap();

    assert_ne!(old, new);
    assert_eq!(
        c.item(old).unwrap_err().status_code(),
        StatusCode::NullReference
    );
    assert_eq!(c.get_text("new").unwrap(), "w");
}

/// Тест проверяет, что после загрузки файла в существующий контейнер
/// дескрипторы, выданные до загрузки, не разрешаются в загруженные
/// элементы.
#[test]
fn test_load_from_invalidates_old_handles() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("foreign.pod");
    let mut foreign = Container::new();
    foreign.set_text("foreign", "theirs").unwrap();
    foreign.set_values("other", &[7u32]).unwrap();
    foreign.save(&path, &SaveOptions::default()).unwrap();

    let mut c = Container::new();
    let removed = c.set_text("mine", "ours").unwrap();
    c.remove(removed);
    let live = c.set_values("live", &[1u8]).unwrap();

    c.load_from(&path, &LoadOptions::default()).unwrap();
    assert_eq!(c, foreign);

    for h in [removed, live] {
        assert_eq!(
            c.item(h).unwrap_err().status_code(),
            StatusCode::NullReference
        );
        assert_eq!(
            c.next(h).unwrap_err().status_code(),
            StatusCode::NullReference
        );
        assert!(c.try_key(h).is_none());
        assert!(c.remove(h).is_none());
    }
    assert_eq!(c.len(), 2);

    // Новые дескрипторы после загрузки работают.
    let h = c.try_get("foreign").unwrap();
    assert_eq!(c.item(h).unwrap().get_text().unwrap(), "theirs");
}

/// Тест проверяет, что ключи чувствительны к регистру и сравниваются
/// побайтно.
#[test]
fn test_keys_are_exact_bytes() {
    let mut c = Container::new();
    c.set_values("Key", &[1u8]).unwrap();
    c.set_values("key", &[2u8]).unwrap();
    c.set_values([0xFFu8, 0xFE], &[3u8]).unwrap();
    assert_eq!(c.len(), 3);
    assert_eq!(c.get_values::<u8>("Key", 1).unwrap(), vec![1]);
    assert_eq!(c.get_values::<u8>([0xFFu8, 0xFE], 1).unwrap(), vec![3]);
}

#[derive(Debug, Clone)]
enum Op {
    Insert(u8),
    Remove(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..16).prop_map(Op::Insert),
        (0u8..16).prop_map(Op::Remove),
    ]
}

proptest! {
    /// Тест проверяет, что порядок обхода совпадает с эталонной моделью
    /// (вектор ключей в порядке вставки) после любой последовательности
    /// вставок и удалений.
    #[test]
    fn prop_traversal_matches_model(ops in proptest::collection::vec(op_strategy(), 0..100)) {
        let mut c = Container::new();
        let mut model: Vec<u8> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(k) => {
                    c.get_or_create([b'a' + k]).unwrap();
                    if !model.contains(&k) {
                        model.push(k);
                    }
                }
                Op::Remove(k) => {
                    c.remove_key([b'a' + k]);
                    model.retain(|&m| m != k);
                }
            }
        }

        let expected: Vec<Vec<u8>> = model.iter().map(|k| vec![b'a' + k]).collect();
        prop_assert_eq!(walk(&c), expected.clone());
        let via_iter: Vec<Vec<u8>> = c.keys().map(<[u8]>::to_vec).collect();
        prop_assert_eq!(via_iter, expected);
        prop_assert_eq!(c.len(), model.len());
    }
}
