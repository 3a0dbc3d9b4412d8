use std::fs;

use converter_engine::{ensure_state_dir, StateDir};
use tempfile::TempDir;

#[test]
fn creates_missing_state_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state").join("nested");
    assert!(!new_dir.exists());
    ensure_state_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn missing_slot_reads_as_none() {
    let temp = TempDir::new().unwrap();
    let slots = StateDir::new(temp.path());
    assert_eq!(slots.read("history.ron").unwrap(), None);
}

#[test]
fn write_replaces_slot_contents() {
    let temp = TempDir::new().unwrap();
    let slots = StateDir::new(temp.path().join("state"));

    let first = slots.write("history.ron", "[]").unwrap();
    assert_eq!(first.file_name().unwrap(), "history.ron");
    assert_eq!(slots.read("history.ron").unwrap().as_deref(), Some("[]"));

    let second = slots.write("history.ron", "[1]").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "[1]");
    // Only the slot itself remains; temp files are renamed away.
    assert_eq!(fs::read_dir(slots.path()).unwrap().count(), 1);
}

#[test]
fn state_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let slots = StateDir::new(file_path.clone());
    assert!(slots.write("preferences.ron", "()").is_err());
    assert!(!file_path.with_file_name("preferences.ron").exists());
}
