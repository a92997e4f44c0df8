//! The obscured database file.
//!
//! The file holds the transformed bytes of newline-terminated
//! `<domain> <username> <password>` lines. It is only ever appended to,
//! converted in place, or removed whole.

use crate::cipher::transform;
use crate::config::StoreConfig;
use crate::error::{PamanError, PamanResult};
use crate::lock::StoreLockGuard;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const INITIAL_READ_CAPACITY: usize = 1024;

/// Reads `source` to the end and rewinds it, so the same handle can be
/// appended to afterwards.
pub fn load<R: Read + Seek>(source: &mut R) -> io::Result<Vec<u8>> {
    source.seek(SeekFrom::Start(0))?;
    let mut buf = Vec::with_capacity(INITIAL_READ_CAPACITY);
    source.read_to_end(&mut buf)?;
    source.seek(SeekFrom::Start(0))?;
    Ok(buf)
}

#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    file: File,
}

impl Store {
    /// Opens the database for read and append, creating it when absent.
    pub fn open<P: AsRef<Path>>(path: P) -> PamanResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .map_err(PamanError::io("open", &path))?;
        debug!(path = %path.display(), "database opened");
        Ok(Self { path, file })
    }

    pub fn open_with(config: &StoreConfig) -> PamanResult<Self> {
        Self::open(&config.database)
    }

    /// Raw obscured bytes of the whole database.
    pub fn load(&self) -> PamanResult<Vec<u8>> {
        let mut handle = &self.file;
        let bytes = load(&mut handle).map_err(PamanError::io("read", &self.path))?;
        debug!(bytes = bytes.len(), "database loaded");
        Ok(bytes)
    }

    /// Whole database, transformed back to plaintext.
    pub fn reveal(&self) -> PamanResult<Vec<u8>> {
        let mut bytes = self.load()?;
        transform(&mut bytes);
        Ok(bytes)
    }

    /// Obscures `plaintext_line` and writes it after the existing content.
    pub fn append(&self, plaintext_line: &str) -> PamanResult<()> {
        let mut bytes = plaintext_line.as_bytes().to_vec();
        transform(&mut bytes);
        let mut handle = &self.file;
        handle
            .write_all(&bytes)
            .and_then(|()| handle.flush())
            .map_err(PamanError::io("append to", &self.path))?;
        debug!(bytes = bytes.len(), "record appended");
        Ok(())
    }

    /// Writes the whole plaintext to `dest`. Returns the byte count.
    pub fn export_plain<W: Write>(&self, dest: &mut W) -> PamanResult<usize> {
        let plain = self.reveal()?;
        dest.write_all(&plain)
            .and_then(|()| dest.flush())
            .map_err(PamanError::io("write plaintext of", &self.path))?;
        Ok(plain.len())
    }

    /// Creates or truncates `dest` and exports the plaintext into it.
    pub fn export_to_file(&self, dest: &Path) -> PamanResult<usize> {
        let plain = self.reveal()?;
        fs::write(dest, &plain).map_err(PamanError::io("write", dest))?;
        info!(path = %dest.display(), bytes = plain.len(), "plaintext exported");
        Ok(plain.len())
    }

    /// Removes the database file. There is no backup.
    pub fn delete(self) -> PamanResult<()> {
        let Store { path, file } = self;
        drop(file);
        fs::remove_file(&path).map_err(PamanError::io("remove", &path))?;
        info!(path = %path.display(), "database deleted");
        Ok(())
    }

    pub fn lock(&self) -> PamanResult<StoreLockGuard<'_>> {
        StoreLockGuard::acquire(&self.file, &self.path)
    }
}

/// Transforms an arbitrary file in place: plaintext becomes obscured and
/// obscured becomes plaintext. The file is read completely before it is
/// rewritten.
pub fn convert_file(path: &Path) -> PamanResult<usize> {
    let mut bytes = fs::read(path).map_err(PamanError::io("read", path))?;
    transform(&mut bytes);
    fs::write(path, &bytes).map_err(PamanError::io("write", path))?;
    info!(path = %path.display(), bytes = bytes.len(), "file converted");
    Ok(bytes.len())
}
