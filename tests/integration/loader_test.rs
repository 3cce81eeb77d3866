//! Integration tests for decoding real files

use std::fs;

use imgrot::cache::{ImageStore, LoadError};
use imgrot::Loader;
use std::sync::Arc;
use tempfile::TempDir;

use crate::helpers::write_png;

#[test]
fn loads_png_from_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a.png");
    write_png(&path, 7, 5);

    let image = Loader::default().load(&path).unwrap();

    assert_eq!((image.width(), image.height()), (7, 5));
    assert!(image.byte_size() >= 7 * 5 * 3);
}

#[test]
fn format_is_sniffed_from_contents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("mislabelled.jpg");
    write_png(&path, 3, 3);

    let image = Loader::default().load(&path).unwrap();

    assert_eq!(image.width(), 3);
}

#[test]
fn corrupt_file_is_a_decode_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.png");
    fs::write(&path, b"definitely not a png").unwrap();

    let err = Loader::default().load(&path).unwrap_err();

    assert!(matches!(err, LoadError::Decode { .. }));
    assert_eq!(err.path(), path.as_path());
}

#[test]
fn missing_file_is_a_decode_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("gone.png");

    assert!(matches!(
        Loader::default().load(&path),
        Err(LoadError::Decode { .. })
    ));
}

#[test]
fn storing_the_same_load_twice_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("a.png");
    write_png(&path, 2, 2);
    let store = ImageStore::new(3);
    let loader = Loader::default();

    store.set_image(1, Arc::new(loader.load(&path).unwrap())).unwrap();
    let once = (store.resident_indices(), store.resident_bytes());
    store.set_image(1, Arc::new(loader.load(&path).unwrap())).unwrap();
    let twice = (store.resident_indices(), store.resident_bytes());

    assert_eq!(once, twice);
    assert_eq!(once.0, vec![1]);
}
