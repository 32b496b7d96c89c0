//! Сохранение контейнера в файл и загрузка из файла.
//!
//! Запись атомарна: данные пишутся во временный файл в каталоге назначения,
//! синхронизируются на диск и затем переименовываются поверх целевого пути.
//! При любой ошибке целевой файл остаётся прежним.

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
    time::Instant,
};

use podstore_error::{FileOp, PodError, PodResult};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::podx::{decode_container, encode_container, FileHeader, HEADER_LEN};
use crate::{
    config::{LoadOptions, SaveOptions},
    database::Container,
};

/// Атомарно сохраняет контейнер по пути `path`.
pub fn save_file(
    container: &Container,
    path: impl AsRef<Path>,
    opts: &SaveOptions,
) -> PodResult<()> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let start = Instant::now();

    let bytes = encode_container(container, opts)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut temp_file =
        NamedTempFile::new_in(dir).map_err(|e| PodError::file(FileOp::Open, &shown, &e))?;
    temp_file
        .write_all(&bytes)
        .map_err(|e| PodError::file(FileOp::Write, &shown, &e))?;
    temp_file
        .flush()
        .map_err(|e| PodError::file(FileOp::Write, &shown, &e))?;
    // синхронизируем данные на диск перед persist
    temp_file
        .as_file_mut()
        .sync_all()
        .map_err(|e| PodError::file(FileOp::Sync, &shown, &e))?;

    // Атомарное перемещение в конечное местоположение
    temp_file
        .persist(path)
        .map_err(|e| PodError::file(FileOp::Persist, &shown, &e.error))?;

    info!(
        path = %shown,
        items = container.len(),
        bytes = bytes.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "Saved container"
    );
    Ok(())
}

/// Загружает контейнер из файла.
pub fn load_file(
    path: impl AsRef<Path>,
    opts: &LoadOptions,
) -> PodResult<Container> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let start = Instant::now();

    let mut file = File::open(path).map_err(|e| PodError::file(FileOp::Open, &shown, &e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| PodError::file(FileOp::Read, &shown, &e))?;

    let container = decode_container(&bytes, opts).inspect_err(|e| {
        warn!(path = %shown, error = %e, "Rejected container file");
    })?;

    info!(
        path = %shown,
        items = container.len(),
        bytes = bytes.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "Loaded container"
    );
    Ok(container)
}

/// Читает и проверяет только заголовок файла, не разбирая элементы и не
/// проверяя контрольную сумму.
pub fn read_file_header(path: impl AsRef<Path>) -> PodResult<FileHeader> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    let file = File::open(path).map_err(|e| PodError::file(FileOp::Open, &shown, &e))?;
    let mut buf = Vec::with_capacity(HEADER_LEN);
    file.take(HEADER_LEN as u64)
        .read_to_end(&mut buf)
        .map_err(|e| PodError::file(FileOp::Read, &shown, &e))?;
    FileHeader::parse(&buf)
}

impl Container {
    /// Загружает контейнер из файла.
    pub fn open(
        path: impl AsRef<Path>,
        opts: &LoadOptions,
    ) -> PodResult<Self> {
        load_file(path, opts)
    }

    /// Заменяет содержимое контейнером из файла. При ошибке текущее
    /// содержимое не меняется; при успехе все ранее выданные дескрипторы
    /// становятся недействительными.
    pub fn load_from(
        &mut self,
        path: impl AsRef<Path>,
        opts: &LoadOptions,
    ) -> PodResult<()> {
        let loaded = load_file(path, opts)?;
        self.replace_contents(loaded);
        Ok(())
    }

    /// Атомарно сохраняет контейнер в файл.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        opts: &SaveOptions,
    ) -> PodResult<()> {
        save_file(self, path, opts)
    }
}
