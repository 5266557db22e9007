use std::fs;

use autosnap_core::ResourceId;
use autosnap_engine::{ensure_download_dir, ArchiveSaver};
use tempfile::TempDir;

fn id(raw: &str) -> ResourceId {
    ResourceId::parse(raw).unwrap()
}

fn leftover_temp_files(dir: &std::path::Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) != Some("zip"))
        .count()
}

#[test]
fn creates_missing_download_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("downloads");
    assert!(!new_dir.exists());
    ensure_download_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn saves_archive_named_after_year() {
    let temp = TempDir::new().unwrap();
    let saver = ArchiveSaver::new(temp.path().join("downloads"));

    let path = saver.save(&id("2016"), b"PK\x03\x04").unwrap();
    assert_eq!(path.file_name().unwrap(), "2016.zip");
    assert_eq!(fs::read(&path).unwrap(), b"PK\x03\x04");
    assert_eq!(leftover_temp_files(saver.dir()), 0);
}

#[test]
fn existing_archive_is_not_overwritten() {
    let temp = TempDir::new().unwrap();
    let saver = ArchiveSaver::new(temp.path().to_path_buf());

    let first = saver.save(&id("2016"), b"first").unwrap();
    let second = saver.save(&id("2016"), b"second").unwrap();
    let third = saver.save(&id("2016"), b"third").unwrap();

    assert_eq!(second.file_name().unwrap(), "2016 (1).zip");
    assert_eq!(third.file_name().unwrap(), "2016 (2).zip");
    assert_eq!(fs::read(&first).unwrap(), b"first");
    assert_eq!(fs::read(&second).unwrap(), b"second");
    assert_eq!(leftover_temp_files(temp.path()), 0);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let saver = ArchiveSaver::new(file_path.clone());
    let result = saver.save(&id("2016"), b"data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("2016.zip").exists());
}
