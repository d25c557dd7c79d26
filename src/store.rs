//! Editable view of a ZIP document on disk.
//!
//! The ZIP codec itself is delegated to the `zip` crate; this module adapts
//! its read/write split into the mutable-archive surface the container layer
//! needs: enumerate, read, add, remove, rename, replace, mkdir, comment, a
//! dirty flag, and commit.
//!
//! Mutations are applied to an in-memory entry list and only hit the disk on
//! [`commit`][ZipStore::commit], which rewrites the whole archive. Unchanged
//! entries are raw-copied without recompression, in their original order, so
//! the leading `mimetype` entry of a conformant container keeps its
//! local-header offset of zero across commits.

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::reserved::normalize;
use crate::{Error, Result};

/// Metadata for one archive entry, as visible through the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// POSIX-style entry name; directory entries end with `/`.
    pub name: String,
    /// `true` for directory entries.
    pub is_dir: bool,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Compression method of the stored data.
    pub compression: CompressionMethod,
    /// Offset of the local file header, for entries already on disk.
    ///
    /// `None` for entries added since the last commit.
    pub header_offset: Option<u64>,
}

/// Where an entry's bytes currently live.
enum EntrySource {
    /// Index into the on-disk archive as of the last open/commit.
    Archive(usize),
    /// Bytes held in memory pending the next commit.
    Memory(Vec<u8>),
}

struct StoreEntry {
    info: EntryInfo,
    source: EntrySource,
}

/// An editable ZIP document.
///
/// One store exclusively owns one on-disk archive for its lifetime.
pub(crate) struct ZipStore {
    path: PathBuf,
    archive: ZipArchive<fs::File>,
    entries: Vec<StoreEntry>,
    comment: String,
    dirty: bool,
}

impl ZipStore {
    /// Opens the archive at `path` and snapshots its entry list.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = fs::File::open(&path)?;
        let mut archive = ZipArchive::new(file)?;
        let comment = String::from_utf8_lossy(archive.comment()).into_owned();
        let entries = Self::snapshot(&mut archive)?;
        Ok(Self {
            path,
            archive,
            entries,
            comment,
            dirty: false,
        })
    }

    fn snapshot(archive: &mut ZipArchive<fs::File>) -> Result<Vec<StoreEntry>> {
        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            // Raw access: no decompression, works for any method.
            let entry = archive.by_index_raw(index)?;
            entries.push(StoreEntry {
                info: EntryInfo {
                    name: entry.name().to_string(),
                    is_dir: entry.is_dir(),
                    size: entry.size(),
                    compression: entry.compression(),
                    header_offset: Some(entry.header_start()),
                },
                source: EntrySource::Archive(index),
            });
        }
        Ok(entries)
    }

    /// Returns the path of the underlying archive file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of entries in the current logical state.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over entry metadata in archive order.
    pub fn entries(&self) -> impl Iterator<Item = &EntryInfo> {
        self.entries.iter().map(|e| &e.info)
    }

    /// Finds an entry by exact name.
    pub fn find(&self, name: &str) -> Option<&EntryInfo> {
        self.entries.iter().map(|e| &e.info).find(|i| i.name == name)
    }

    /// Returns `true` if a file entry with exactly this name exists.
    pub fn contains_file(&self, name: &str) -> bool {
        self.find(name).is_some_and(|info| !info.is_dir)
    }

    /// Returns `true` if a directory entry with exactly this name (including
    /// the trailing `/`) exists.
    pub fn contains_dir(&self, name: &str) -> bool {
        self.find(name).is_some_and(|info| info.is_dir)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.info.name == name)
    }

    /// Reads the full contents of a file entry.
    pub fn read(&mut self, name: &str) -> Result<Vec<u8>> {
        let position = self.position(name).ok_or_else(|| Error::EntryNotFound {
            path: name.to_string(),
        })?;
        match &self.entries[position].source {
            EntrySource::Memory(data) => Ok(data.clone()),
            EntrySource::Archive(index) => {
                let mut entry = self.archive.by_index(*index)?;
                let mut contents = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut contents)?;
                Ok(contents)
            }
        }
    }

    /// Appends a new file entry with the given bytes.
    pub fn add_bytes(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        if self.find(name).is_some() {
            return Err(Error::EntryExists {
                path: name.to_string(),
            });
        }
        self.entries.push(StoreEntry {
            info: EntryInfo {
                name: name.to_string(),
                is_dir: false,
                size: data.len() as u64,
                compression: CompressionMethod::Deflated,
                header_offset: None,
            },
            source: EntrySource::Memory(data),
        });
        self.dirty = true;
        Ok(())
    }

    /// Appends a new file entry with the contents of a file-system file.
    pub fn add_path(&mut self, name: &str, source: impl AsRef<Path>) -> Result<()> {
        let data = fs::read(source)?;
        self.add_bytes(name, data)
    }

    /// Appends a new directory entry. The stored name always carries the
    /// conventional trailing `/`.
    pub fn mkdir(&mut self, name: &str) -> Result<()> {
        let dir_name = format!("{}/", normalize(name));
        if self.find(&dir_name).is_some() || self.find(normalize(name)).is_some() {
            return Err(Error::EntryExists {
                path: name.to_string(),
            });
        }
        self.entries.push(StoreEntry {
            info: EntryInfo {
                name: dir_name,
                is_dir: true,
                size: 0,
                compression: CompressionMethod::Stored,
                header_offset: None,
            },
            source: EntrySource::Memory(Vec::new()),
        });
        self.dirty = true;
        Ok(())
    }

    /// Removes an entry by exact name.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let position = self.position(name).ok_or_else(|| Error::EntryNotFound {
            path: name.to_string(),
        })?;
        self.entries.remove(position);
        self.dirty = true;
        Ok(())
    }

    /// Renames an entry. Directory entries keep their trailing `/` whatever
    /// the spelling of `new_name`.
    pub fn rename(&mut self, name: &str, new_name: &str) -> Result<()> {
        let position = self.position(name).ok_or_else(|| Error::EntryNotFound {
            path: name.to_string(),
        })?;
        let is_dir = self.entries[position].info.is_dir;
        let target = if is_dir {
            format!("{}/", normalize(new_name))
        } else {
            new_name.to_string()
        };
        if self.find(&target).is_some() {
            return Err(Error::EntryExists { path: target });
        }
        self.entries[position].info.name = target;
        self.dirty = true;
        Ok(())
    }

    /// Replaces the contents of an existing file entry, keeping its name and
    /// position.
    pub fn replace(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        let position = self.position(name).ok_or_else(|| Error::EntryNotFound {
            path: name.to_string(),
        })?;
        let entry = &mut self.entries[position];
        entry.info.size = data.len() as u64;
        entry.info.compression = CompressionMethod::Deflated;
        entry.info.header_offset = None;
        entry.source = EntrySource::Memory(data);
        self.dirty = true;
        Ok(())
    }

    /// Returns the archive comment.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Sets the archive comment and marks the store dirty.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
        self.dirty = true;
    }

    /// Returns `true` if there are uncommitted changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes pending changes back to disk.
    ///
    /// Returns `Ok(false)` without touching the file when nothing changed.
    /// On success the store re-snapshots the rewritten archive, so header
    /// offsets reported by [`entries`][Self::entries] are current again.
    pub fn commit(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        log::debug!(
            "committing {} entries to '{}'",
            self.entries.len(),
            self.path.display()
        );

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        // the comment length field is u16; an oversized comment must fail
        // the commit, not vanish
        writer.set_comment(self.comment.clone())?;
        for entry in &self.entries {
            match &entry.source {
                EntrySource::Archive(index) => {
                    let source = self.archive.by_index_raw(*index)?;
                    writer.raw_copy_file_rename(source, entry.info.name.as_str())?;
                }
                EntrySource::Memory(_) if entry.info.is_dir => {
                    writer.add_directory(
                        entry.info.name.trim_end_matches('/'),
                        SimpleFileOptions::default(),
                    )?;
                }
                EntrySource::Memory(data) => {
                    let options = SimpleFileOptions::default()
                        .compression_method(entry.info.compression);
                    writer.start_file(entry.info.name.as_str(), options)?;
                    writer.write_all(data)?;
                }
            }
        }
        let cursor = writer.finish()?;
        fs::write(&self.path, cursor.into_inner())?;

        *self = Self::open(&self.path)?;
        Ok(true)
    }
}
