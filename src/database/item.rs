use podstore_error::{PodError, PodResult};

use super::types::{PodElement, TypeTag};

/// Один именованный блок данных: ключ, тег типа, число значений и байты
/// значений в порядке байт хоста.
///
/// Элемент с `count == 0` считается неназначенным: все запросы значения и
/// типа возвращают [`PodError::UnassignedBlock`].
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    key: Box<[u8]>,
    tag: TypeTag,
    count: usize,
    data: Vec<u8>,
}

impl Item {
    /// Создаёт неназначенный элемент с заданным ключом.
    pub(crate) fn unassigned(key: Box<[u8]>) -> Self {
        Self {
            key,
            tag: TypeTag::UInt8,
            count: 0,
            data: Vec::new(),
        }
    }

    /// Создаёт элемент из уже проверенных частей (используется декодером).
    pub(crate) fn from_parts(
        key: Box<[u8]>,
        tag: TypeTag,
        count: usize,
        data: Vec<u8>,
    ) -> Self {
        debug_assert_eq!(data.len(), count * tag.element_width());
        Self {
            key,
            tag,
            count,
            data,
        }
    }

    ////////// Собственные методы

    /// Ключ элемента в виде байтов.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Ключ в виде строки с заменой невалидных последовательностей (для
    /// логов и сообщений об ошибках).
    pub fn key_lossy(&self) -> String {
        String::from_utf8_lossy(&self.key).into_owned()
    }

    pub fn is_assigned(&self) -> bool {
        self.count != 0
    }

    /// Размер значений в байтах (`count × width`).
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Число значений; `UnassignedBlock`, если значение не назначено.
    pub fn try_count(&self) -> PodResult<usize> {
        self.ensure_assigned()?;
        Ok(self.count)
    }

    /// Тег типа; `UnassignedBlock`, если значение не назначено.
    pub fn try_type(&self) -> PodResult<TypeTag> {
        self.ensure_assigned()?;
        Ok(self.tag)
    }

    /// Заменяет значение массивом `values`.
    ///
    /// Пустой срез делает элемент неназначенным. Тип, счётчик и байты
    /// меняются только после успешной проверки лимита.
    pub fn set_values<T: PodElement>(
        &mut self,
        values: &[T],
    ) -> PodResult<()> {
        self.check_count(T::TAG, values.len())?;
        let mut data = Vec::with_capacity(std::mem::size_of_val(values));
        T::extend_ne_bytes(values, &mut data);
        self.replace(T::TAG, values.len(), data);
        Ok(())
    }

    /// Заменяет значение заранее подготовленными байтами в порядке хоста.
    ///
    /// Длина `bytes` должна быть кратна ширине элемента `tag`. Для текстовых
    /// тегов байты проверяются так же, как при загрузке файла.
    pub fn set_raw(
        &mut self,
        tag: TypeTag,
        bytes: &[u8],
    ) -> PodResult<()> {
        let width = tag.element_width();
        if bytes.len() % width != 0 {
            return Err(PodError::invalid_argument(
                "bytes",
                format!(
                    "length {} is not a multiple of {width} ({tag})",
                    bytes.len()
                ),
            ));
        }
        validate_text(tag, bytes).map_err(|reason| PodError::invalid_argument("bytes", reason))?;
        let count = bytes.len() / width;
        self.check_count(tag, count)?;
        self.replace(tag, count, bytes.to_vec());
        Ok(())
    }

    /// Сохраняет строку как UTF-8 текст.
    pub fn set_text(
        &mut self,
        text: &str,
    ) -> PodResult<()> {
        self.set_raw(TypeTag::Utf8Char8, text.as_bytes())
    }

    /// Сохраняет ASCII-текст. Байт вне 0..=127 даёт `ArgumentError`.
    pub fn set_ascii(
        &mut self,
        text: &[u8],
    ) -> PodResult<()> {
        self.set_raw(TypeTag::AsciiChar8, text)
    }

    /// Возвращает ровно `requested` первых значений типа `T`.
    pub fn get_values<T: PodElement>(
        &self,
        requested: usize,
    ) -> PodResult<Vec<T>> {
        let bytes = self.checked_bytes(T::TAG, requested)?;
        Ok(bytes
            .chunks_exact(T::TAG.element_width())
            .map(T::from_ne_chunk)
            .collect())
    }

    /// Возвращает все значения типа `T`.
    pub fn get_all<T: PodElement>(&self) -> PodResult<Vec<T>> {
        self.ensure_assigned()?;
        self.get_values(self.count)
    }

    /// Возвращает байты первых `requested` значений в порядке хоста.
    pub fn get_raw(
        &self,
        tag: TypeTag,
        requested: usize,
    ) -> PodResult<&[u8]> {
        self.checked_bytes(tag, requested)
    }

    /// Возвращает текстовый элемент (ASCII или UTF-8) как `String`.
    pub fn get_text(&self) -> PodResult<String> {
        self.ensure_assigned()?;
        if !self.tag.is_text() {
            return Err(PodError::TypeMismatch {
                stored: self.tag.raw(),
                requested: TypeTag::Utf8Char8.raw(),
                key: Some(self.key_lossy()),
            });
        }
        // Валидность проверена при записи и при загрузке.
        String::from_utf8(self.data.clone())
            .map_err(|e| PodError::corrupted(e.to_string()).with_key(self.key_lossy()))
    }

    /// Возвращает значение в неназначенное состояние.
    pub fn clear(&mut self) {
        self.replace(TypeTag::UInt8, 0, Vec::new());
    }

    /// Тег и байты без проверок (для кодировщика).
    pub(crate) fn raw_parts(&self) -> (TypeTag, usize, &[u8]) {
        (self.tag, self.count, &self.data)
    }

    ////////// Вспомогательные методы

    fn replace(
        &mut self,
        tag: TypeTag,
        count: usize,
        data: Vec<u8>,
    ) {
        if count == 0 {
            self.tag = TypeTag::UInt8;
            self.count = 0;
            self.data = Vec::new();
        } else {
            self.tag = tag;
            self.count = count;
            self.data = data;
        }
    }

    fn ensure_assigned(&self) -> PodResult<()> {
        if self.count == 0 {
            return Err(PodError::UnassignedBlock {
                key: Some(self.key_lossy()),
            });
        }
        Ok(())
    }

    fn check_count(
        &self,
        tag: TypeTag,
        count: usize,
    ) -> PodResult<()> {
        let limit = tag.max_count();
        if count > limit {
            return Err(PodError::OutOfRange {
                requested: count as u64,
                available: limit as u64,
                key: Some(self.key_lossy()),
            });
        }
        Ok(())
    }

    fn checked_bytes(
        &self,
        tag: TypeTag,
        requested: usize,
    ) -> PodResult<&[u8]> {
        self.ensure_assigned()?;
        if self.tag != tag {
            return Err(PodError::TypeMismatch {
                stored: self.tag.raw(),
                requested: tag.raw(),
                key: Some(self.key_lossy()),
            });
        }
        if requested > self.count {
            return Err(PodError::OutOfRange {
                requested: requested as u64,
                available: self.count as u64,
                key: Some(self.key_lossy()),
            });
        }
        Ok(&self.data[..requested * tag.element_width()])
    }
}

/// Проверяет, что байты текстового тега образуют допустимый текст.
/// Для нетекстовых тегов всегда `Ok`.
pub(crate) fn validate_text(
    tag: TypeTag,
    bytes: &[u8],
) -> Result<(), String> {
    match tag {
        TypeTag::AsciiChar8 => match bytes.iter().position(|b| !b.is_ascii()) {
            Some(pos) => Err(format!(
                "non-ASCII byte 0x{:02X} at index {pos}",
                bytes[pos]
            )),
            None => Ok(()),
        },
        TypeTag::Utf8Char8 => std::str::from_utf8(bytes)
            .map(|_| ())
            .map_err(|e| format!("invalid UTF-8: {e}")),
        _ => Ok(()),
    }
}
