//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One entry of a hand-built fixture archive.
pub struct FixtureEntry<'a> {
    pub name: &'a str,
    pub data: &'a [u8],
    pub compression: CompressionMethod,
}

impl<'a> FixtureEntry<'a> {
    pub fn stored(name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            data,
            compression: CompressionMethod::Stored,
        }
    }

    pub fn deflated(name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            data,
            compression: CompressionMethod::Deflated,
        }
    }
}

/// Writes a ZIP file with exactly the given entries, in order.
///
/// Used to build malformed containers (compressed mimetype, mimetype not
/// first) that the library itself refuses to produce.
pub fn write_fixture(path: &Path, entries: &[FixtureEntry<'_>]) {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        let options = SimpleFileOptions::default().compression_method(entry.compression);
        writer.start_file(entry.name, options).unwrap();
        writer.write_all(entry.data).unwrap();
    }
    let bytes = writer.finish().unwrap().into_inner();
    fs::write(path, bytes).unwrap();
}

/// Creates a fresh default container and returns its path.
pub fn create_container(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("test.ucf");
    ucf::Container::create(&path).unwrap().close().unwrap();
    path
}

/// Creates a fresh container with some ordinary (unmanaged) content.
pub fn create_container_with_content(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("content.ucf");
    ucf::Container::create_with(&path, ucf::DEFAULT_MIMETYPE, |c| {
        c.add_bytes("greeting.txt", "hello")?;
        c.add_bytes("dir/nested.txt", "nested")?;
        c.mkdir("media")?;
        Ok(())
    })
    .unwrap();
    path
}
