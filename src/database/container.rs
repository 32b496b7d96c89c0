use std::collections::HashMap;

use podstore_error::{PodError, PodResult};

use super::{item::Item, types::PodElement};

/// Дескриптор элемента в контейнере: индекс ячейки арены и её поколение.
///
/// После удаления элемента поколение ячейки увеличивается, поэтому старый
/// дескриптор становится недействительным и операции с ним возвращают
/// [`PodError::NullReference`] вместо доступа к чужому элементу. То же
/// происходит после `clear` и после загрузки файла в существующий
/// контейнер.
///
/// Дескриптор не хранит идентичность контейнера: клон контейнера имеет те
/// же ячейки и поколения, поэтому дескриптор, полученный от оригинала,
/// разрешается и в клоне (и наоборот). Дескрипторы следует использовать
/// только с тем контейнером, который их выдал.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    item: Item,
    prev: Option<u32>,
    next: Option<u32>,
}

/// Упорядоченная по вставке коллекция элементов с доступом по ключу.
///
/// Элементы хранятся в арене ячеек; порядок обхода задаётся двусвязным
/// списком индексов, поиск по ключу идёт через хеш-таблицу. Ключи
/// сравниваются побайтно, с учётом регистра.
#[derive(Debug, Clone, Default)]
pub struct Container {
    slots: Vec<Slot>,
    free: Vec<u32>,
    index: HashMap<Box<[u8]>, u32>,
    head: Option<u32>,
    tail: Option<u32>,
}

impl Container {
    /// Создаёт пустой контейнер.
    pub fn new() -> Self {
        Self::default()
    }

    /// Количество живых элементов.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains_key(
        &self,
        key: impl AsRef<[u8]>,
    ) -> bool {
        self.index.contains_key(key.as_ref())
    }

    /// Возвращает дескриптор элемента с ключом `key`, создавая
    /// неназначенный элемент в конце порядка обхода, если его нет.
    ///
    /// Ключ с байтом NUL или длиннее `u32::MAX` байт даёт `ArgumentError`.
    pub fn get_or_create(
        &mut self,
        key: impl AsRef<[u8]>,
    ) -> PodResult<ItemHandle> {
        let key = key.as_ref();
        if let Some(handle) = self.try_get(key) {
            return Ok(handle);
        }
        validate_key(key)?;
        Ok(self.push_back(Item::unassigned(key.into())))
    }

    /// Дескриптор существующего элемента или `None`.
    pub fn try_get(
        &self,
        key: impl AsRef<[u8]>,
    ) -> Option<ItemHandle> {
        let index = *self.index.get(key.as_ref())?;
        Some(ItemHandle {
            index,
            generation: self.slots[index as usize].generation,
        })
    }

    /// Удаляет элемент и возвращает его. Устаревший дескриптор ничего не
    /// делает и возвращает `None`.
    pub fn remove(
        &mut self,
        handle: ItemHandle,
    ) -> Option<Item> {
        self.entry(handle)?;
        let slot = &mut self.slots[handle.index as usize];
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);

        match entry.prev {
            Some(p) => self.link_mut(p).next = entry.next,
            None => self.head = entry.next,
        }
        match entry.next {
            Some(n) => self.link_mut(n).prev = entry.prev,
            None => self.tail = entry.prev,
        }
        self.index.remove(entry.item.key());
        self.free.push(handle.index);
        Some(entry.item)
    }

    /// Удаляет элемент по ключу. Отсутствующий ключ ничего не делает.
    pub fn remove_key(
        &mut self,
        key: impl AsRef<[u8]>,
    ) -> Option<Item> {
        let handle = self.try_get(key)?;
        self.remove(handle)
    }

    /// Первый элемент в порядке вставки.
    pub fn first(&self) -> Option<ItemHandle> {
        self.head.map(|index| self.handle_at(index))
    }

    /// Следующий за `handle` элемент; `None` в конце обхода.
    pub fn next(
        &self,
        handle: ItemHandle,
    ) -> PodResult<Option<ItemHandle>> {
        let entry = self.entry(handle).ok_or_else(stale)?;
        Ok(entry.next.map(|index| self.handle_at(index)))
    }

    pub fn item(
        &self,
        handle: ItemHandle,
    ) -> PodResult<&Item> {
        self.entry(handle).map(|e| &e.item).ok_or_else(stale)
    }

    pub fn item_mut(
        &mut self,
        handle: ItemHandle,
    ) -> PodResult<&mut Item> {
        match self.slots.get_mut(handle.index as usize) {
            Some(slot) if slot.generation == handle.generation => {
                slot.entry.as_mut().map(|e| &mut e.item).ok_or_else(stale)
            }
            _ => Err(stale()),
        }
    }

    /// Ключ элемента или `None` для устаревшего дескриптора.
    pub fn try_key(
        &self,
        handle: ItemHandle,
    ) -> Option<&[u8]> {
        self.entry(handle).map(|e| e.item.key())
    }

    /// Записывает массив под ключом, создавая элемент при необходимости.
    pub fn set_values<T: PodElement>(
        &mut self,
        key: impl AsRef<[u8]>,
        values: &[T],
    ) -> PodResult<ItemHandle> {
        let handle = self.get_or_create(key)?;
        self.item_mut(handle)?.set_values(values)?;
        Ok(handle)
    }

    /// Читает `requested` значений; отсутствующий ключ даёт `UnassignedBlock`.
    pub fn get_values<T: PodElement>(
        &self,
        key: impl AsRef<[u8]>,
        requested: usize,
    ) -> PodResult<Vec<T>> {
        self.keyed(key.as_ref())?.get_values(requested)
    }

    /// Все значения элемента с ключом `key`.
    pub fn get_all<T: PodElement>(
        &self,
        key: impl AsRef<[u8]>,
    ) -> PodResult<Vec<T>> {
        self.keyed(key.as_ref())?.get_all()
    }

    pub fn set_text(
        &mut self,
        key: impl AsRef<[u8]>,
        text: &str,
    ) -> PodResult<ItemHandle> {
        let handle = self.get_or_create(key)?;
        self.item_mut(handle)?.set_text(text)?;
        Ok(handle)
    }

    pub fn get_text(
        &self,
        key: impl AsRef<[u8]>,
    ) -> PodResult<String> {
        self.keyed(key.as_ref())?.get_text()
    }

    /// Удаляет все элементы. Выданные ранее дескрипторы становятся
    /// недействительными.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free = (0..self.slots.len() as u32).rev().collect();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    /// Итератор по элементам в порядке вставки.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            container: self,
            cursor: self.head,
            remaining: self.len(),
        }
    }

    /// Ключи в порядке вставки.
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.iter().map(Item::key)
    }

    ////////// Вспомогательные методы

    /// Заменяет содержимое элементами `other` в его порядке обхода.
    ///
    /// Ячейки переиспользуются с увеличенными поколениями, поэтому ранее
    /// выданные дескрипторы этого контейнера становятся недействительными.
    pub(crate) fn replace_contents(
        &mut self,
        mut other: Container,
    ) {
        self.clear();
        let mut cursor = other.head;
        while let Some(index) = cursor {
            let Some(entry) = other.slots[index as usize].entry.take() else {
                break;
            };
            cursor = entry.next;
            self.push_back(entry.item);
        }
    }

    /// Добавляет уже проверенный элемент в конец порядка обхода.
    pub(crate) fn push_back(
        &mut self,
        item: Item,
    ) -> ItemHandle {
        let entry = Entry {
            item,
            prev: self.tail,
            next: None,
        };
        let key: Box<[u8]> = entry.item.key().into();

        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index as usize].entry = Some(entry);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                (self.slots.len() - 1) as u32
            }
        };

        match self.tail {
            Some(t) => self.link_mut(t).next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.index.insert(key, index);
        self.handle_at(index)
    }

    fn keyed(
        &self,
        key: &[u8],
    ) -> PodResult<&Item> {
        match self.index.get(key) {
            Some(&index) => self.item(self.handle_at(index)),
            None => Err(PodError::UnassignedBlock {
                key: Some(String::from_utf8_lossy(key).into_owned()),
            }),
        }
    }

    fn entry(
        &self,
        handle: ItemHandle,
    ) -> Option<&Entry> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn handle_at(
        &self,
        index: u32,
    ) -> ItemHandle {
        ItemHandle {
            index,
            generation: self.slots[index as usize].generation,
        }
    }

    /// Ссылка на живую запись по индексу из списка обхода.
    ///
    /// Индексы в `prev`/`next`/`head`/`tail` всегда указывают на занятые
    /// ячейки, поэтому отсутствие записи здесь невозможно.
    fn link_mut(
        &mut self,
        index: u32,
    ) -> &mut Entry {
        match self.slots[index as usize].entry.as_mut() {
            Some(entry) => entry,
            None => unreachable!("traversal list points to an empty slot {index}"),
        }
    }
}

impl PartialEq for Container {
    /// Контейнеры равны, если содержат равные элементы в одинаковом порядке.
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = &'a Item;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Итератор по элементам контейнера в порядке вставки.
pub struct Iter<'a> {
    container: &'a Container,
    cursor: Option<u32>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let entry = self.container.slots[index as usize].entry.as_ref()?;
        self.cursor = entry.next;
        self.remaining -= 1;
        Some(&entry.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// Проверяет ключ: без байта NUL и не длиннее `u32::MAX` байт.
pub(crate) fn validate_key(key: &[u8]) -> PodResult<()> {
    if key.len() > u32::MAX as usize {
        return Err(PodError::SizeLimit {
            what: "key".to_string(),
            size: key.len() as u64,
            limit: u64::from(u32::MAX),
            key: None,
        });
    }
    if let Some(pos) = key.iter().position(|&b| b == 0) {
        return Err(PodError::invalid_argument(
            "key",
            format!("contains NUL at byte {pos}"),
        ));
    }
    Ok(())
}

fn stale() -> PodError {
    PodError::NullReference {
        what: "item handle".to_string(),
    }
}
