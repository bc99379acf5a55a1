//! Integration tests for the JSON-file store.
//!
//! Each test works in its own randomly named directory under the system
//! temp dir and removes it afterwards, so tests can run in parallel.

use std::fs;
use std::path::PathBuf;

use quizgate_store::{FileStore, SessionStore, StoreError};
use rand::Rng;

// =========================================================================
// Helpers
// =========================================================================

/// A scratch directory that is deleted on drop.
struct Scratch(PathBuf);

impl Scratch {
    fn new() -> Self {
        let suffix: u64 = rand::rng().random();
        let dir = std::env::temp_dir().join(format!("quizgate-store-{suffix:016x}"));
        Self(dir)
    }

    fn file(&self) -> PathBuf {
        self.0.join("nested").join("session.json")
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

// =========================================================================
// Reads
// =========================================================================

#[test]
fn test_get_missing_file_returns_none() {
    let scratch = Scratch::new();
    let store = FileStore::new(scratch.file());

    assert_eq!(store.get("token").unwrap(), None);
    assert!(!scratch.file().exists(), "reads must not create the file");
}

#[test]
fn test_get_empty_file_returns_none() {
    let scratch = Scratch::new();
    fs::create_dir_all(scratch.file().parent().unwrap()).unwrap();
    fs::write(scratch.file(), "  \n").unwrap();
    let store = FileStore::new(scratch.file());

    assert_eq!(store.get("token").unwrap(), None);
}

#[test]
fn test_get_corrupt_file_returns_corrupt_error() {
    let scratch = Scratch::new();
    fs::create_dir_all(scratch.file().parent().unwrap()).unwrap();
    fs::write(scratch.file(), "{ truncated").unwrap();
    let store = FileStore::new(scratch.file());

    let result = store.get("token");

    assert!(matches!(result, Err(StoreError::Corrupt { .. })));
}

// =========================================================================
// Writes
// =========================================================================

#[test]
fn test_set_all_creates_parent_dirs_and_persists() {
    let scratch = Scratch::new();
    let mut store = FileStore::new(scratch.file());

    store
        .set_all(&[("token", "abc"), ("user", r#"{"id":1}"#)])
        .unwrap();

    // A fresh handle reads what the first one wrote.
    let reopened = FileStore::new(scratch.file());
    assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc"));
    assert_eq!(reopened.get("user").unwrap().as_deref(), Some(r#"{"id":1}"#));
}

#[test]
fn test_set_all_preserves_unrelated_keys() {
    let scratch = Scratch::new();
    let mut store = FileStore::new(scratch.file());
    store.set_all(&[("theme", "dark")]).unwrap();

    store.set_all(&[("token", "abc")]).unwrap();

    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn test_set_all_replaces_corrupt_file() {
    let scratch = Scratch::new();
    fs::create_dir_all(scratch.file().parent().unwrap()).unwrap();
    fs::write(scratch.file(), "garbage").unwrap();
    let mut store = FileStore::new(scratch.file());

    store.set_all(&[("token", "abc")]).unwrap();

    assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
}

#[test]
fn test_set_all_leaves_no_temp_files() {
    let scratch = Scratch::new();
    let mut store = FileStore::new(scratch.file());

    store.set_all(&[("token", "abc")]).unwrap();
    store.set_all(&[("token", "def")]).unwrap();

    let names: Vec<_> = fs::read_dir(scratch.file().parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("session.json")]);
}

// =========================================================================
// Removals
// =========================================================================

#[test]
fn test_remove_all_erases_both_keys_together() {
    let scratch = Scratch::new();
    let mut store = FileStore::new(scratch.file());
    store
        .set_all(&[("token", "abc"), ("user", "{}"), ("theme", "dark")])
        .unwrap();

    store.remove_all(&["token", "user"]).unwrap();

    assert_eq!(store.get("token").unwrap(), None);
    assert_eq!(store.get("user").unwrap(), None);
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn test_remove_all_on_missing_file_is_noop() {
    let scratch = Scratch::new();
    let mut store = FileStore::new(scratch.file());

    store.remove_all(&["token", "user"]).unwrap();

    assert!(!scratch.file().exists());
}

#[test]
fn test_remove_all_repairs_corrupt_file() {
    let scratch = Scratch::new();
    fs::create_dir_all(scratch.file().parent().unwrap()).unwrap();
    fs::write(scratch.file(), "[1, 2").unwrap();
    let mut store = FileStore::new(scratch.file());

    store.remove_all(&["token", "user"]).unwrap();

    // The file is readable again and empty.
    assert_eq!(store.get("token").unwrap(), None);
}
