//! Structural verification tests against hand-built archives.
//!
//! The library refuses to produce a malformed container, so these fixtures
//! are written with a raw ZIP writer.

mod common;

use common::FixtureEntry;
use ucf::{Container, Error};

#[test]
fn test_missing_mimetype_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-mimetype.zip");
    common::write_fixture(&path, &[FixtureEntry::stored("content.xml", b"<doc/>")]);

    let err = Container::open(&path).unwrap_err();
    assert!(err.is_malformed());
    assert!(err.to_string().contains("'mimetype' file is missing"));
    assert!(!Container::verify(&path));
}

#[test]
fn test_mimetype_not_first_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("late-mimetype.zip");
    common::write_fixture(
        &path,
        &[
            FixtureEntry::stored("content.xml", b"<doc/>"),
            FixtureEntry::stored("mimetype", b"application/epub+zip"),
        ],
    );

    let err = Container::open(&path).unwrap_err();
    assert!(err.to_string().contains("not at offset 0"));
    assert!(!Container::verify(&path));
}

#[test]
fn test_compressed_mimetype() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deflated-mimetype.zip");
    common::write_fixture(
        &path,
        &[FixtureEntry::deflated("mimetype", b"application/epub+zip")],
    );

    let err = Container::open(&path).unwrap_err();
    assert!(err.is_malformed());
    assert!(err.to_string().contains("'mimetype' file is compressed"));
    assert!(!Container::verify(&path));
}

#[test]
fn test_mimetype_as_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dir-mimetype.zip");
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer
        .add_directory("mimetype", zip::write::SimpleFileOptions::default())
        .unwrap();
    std::fs::write(&path, writer.finish().unwrap().into_inner()).unwrap();

    // the directory entry does not satisfy the file requirement
    let err = Container::open(&path).unwrap_err();
    assert!(err.is_malformed());
    assert!(!Container::verify(&path));
}

#[test]
fn test_non_utf8_mimetype_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("binary-mimetype.zip");
    common::write_fixture(&path, &[FixtureEntry::stored("mimetype", &[0xff, 0xfe, 0x00])]);

    let err = Container::open(&path).unwrap_err();
    assert!(err.to_string().contains("not valid UTF-8"));
}

#[test]
fn test_not_a_zip_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.ucf");
    std::fs::write(&path, b"this is not an archive").unwrap();

    assert!(matches!(Container::open(&path), Err(Error::Zip(_))));
    assert!(!Container::verify(&path));
    assert!(Container::verify_strict(&path).is_err());
}

#[test]
fn test_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.ucf");

    assert!(matches!(Container::open(&path), Err(Error::Io(_))));
    assert!(!Container::verify(&path));
}

#[test]
fn test_strict_and_boolean_forms_agree() {
    let dir = tempfile::tempdir().unwrap();

    let good = common::create_container_with_content(&dir);
    assert_eq!(Container::verify(&good), Container::verify_strict(&good).is_ok());

    let bad = dir.path().join("bad.zip");
    common::write_fixture(&bad, &[FixtureEntry::deflated("mimetype", b"x")]);
    assert_eq!(Container::verify(&bad), Container::verify_strict(&bad).is_ok());
}

#[test]
fn test_verification_leaves_the_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_container_with_content(&dir);
    let before = std::fs::read(&path).unwrap();

    Container::verify_strict(&path).unwrap();
    assert!(Container::verify(&path));
    assert_eq!(std::fs::read(&path).unwrap(), before);
}
