//! Read-path and passthrough tests.
//!
//! Non-mutating operations pass straight through to the archive; comment
//! writes and structural mutations mark the container dirty and are only
//! flushed by commit.

mod common;

use ucf::{Container, Error};

#[test]
fn test_read_entry_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_container_with_content(&dir);
    let mut container = Container::open(&path).unwrap();

    assert_eq!(container.read("greeting.txt").unwrap(), b"hello");
    assert_eq!(container.read("dir/nested.txt").unwrap(), b"nested");
}

#[test]
fn test_read_missing_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_container(&dir);
    let mut container = Container::open(&path).unwrap();

    assert!(matches!(
        container.read("absent.txt"),
        Err(Error::EntryNotFound { .. })
    ));
}

#[test]
fn test_find_entry_and_enumeration() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_container_with_content(&dir);
    let container = Container::open(&path).unwrap();

    assert_eq!(container.size(), 4);
    let names = container.entry_names();
    assert_eq!(names[0], "mimetype");
    assert!(names.contains(&"greeting.txt".to_string()));
    assert!(names.contains(&"media/".to_string()));

    let media = container.find_entry("media/").unwrap();
    assert!(media.is_dir);
    assert!(container.find_entry("media").is_none(), "find is exact");

    let greeting = container.find_entry("greeting.txt").unwrap();
    assert_eq!(greeting.size, 5);
}

#[test]
fn test_queries_do_not_dirty_the_container() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_container_with_content(&dir);
    let mut container = Container::open(&path).unwrap();

    let _ = container.read("greeting.txt").unwrap();
    let _ = container.entry_names();
    let _ = container.comment();
    assert!(!container.is_dirty());
    assert!(!container.commit().unwrap(), "nothing to flush");
}

#[test]
fn test_comment_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_container(&dir);

    let mut container = Container::open(&path).unwrap();
    assert_eq!(container.comment(), "");
    container.set_comment("archive comment");
    assert!(container.is_dirty());
    assert!(container.commit().unwrap());
    assert!(!container.is_dirty());

    let reopened = Container::open(&path).unwrap();
    assert_eq!(reopened.comment(), "archive comment");
}

#[test]
fn test_open_with_scoped_commit() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_container(&dir);

    let mimetype = Container::open_with(&path, |c| {
        c.add_bytes("added.txt", "in scope")?;
        Ok(c.mimetype().to_string())
    })
    .unwrap();
    assert_eq!(mimetype, ucf::DEFAULT_MIMETYPE);

    let mut reopened = Container::open(&path).unwrap();
    assert_eq!(reopened.read("added.txt").unwrap(), b"in scope");
}

#[test]
fn test_mutations_survive_commit_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::create_container_with_content(&dir);

    let mut container = Container::open(&path).unwrap();
    container.remove("greeting.txt").unwrap();
    container.rename("dir/nested.txt", "dir/renamed.txt").unwrap();
    container.replace_bytes("dir/renamed.txt", "replaced").unwrap();
    assert!(container.commit().unwrap());

    let mut reopened = Container::open(&path).unwrap();
    assert!(reopened.find_entry("greeting.txt").is_none());
    assert!(reopened.find_entry("dir/nested.txt").is_none());
    assert_eq!(reopened.read("dir/renamed.txt").unwrap(), b"replaced");

    // the mimetype stayed first through the rewrite
    assert_eq!(
        reopened.find_entry("mimetype").unwrap().header_offset,
        Some(0)
    );
}
