//! Integration tests for navigation, prefetch and eviction

use std::fs;

use imgrot::cache::PrefetchEvent;
use imgrot::{CatalogError, NavState, RotationOp};
use tempfile::TempDir;

use crate::helpers::{name, navigator, WAIT};

#[test]
fn opening_a_catalog_loads_the_first_image() {
    let (navigator, _codec) = navigator(50, 10);

    assert_eq!(navigator.state(), NavState::Ready);
    assert_eq!(navigator.focus(), Some(0));
    assert!(navigator.current_slot().unwrap().is_resident());

    assert!(navigator.wait_idle(WAIT));
    let store = navigator.session().unwrap().store();
    assert_eq!(store.resident_indices(), (0..10).collect::<Vec<_>>());
}

#[test]
fn seek_never_shows_a_blank_frame() {
    let (mut navigator, _codec) = navigator(100, 30);

    for target in [57, 99, 0, 31, 64] {
        navigator.seek(target);
        assert_eq!(navigator.focus(), Some(target));
        assert!(
            navigator.current_slot().unwrap().image.is_some(),
            "target {} not resident",
            target
        );
    }
}

#[test]
fn seek_clamps_out_of_range_targets() {
    let (mut navigator, _codec) = navigator(10, 4);

    navigator.seek(1_000);

    assert_eq!(navigator.focus(), Some(9));
    assert!(navigator.current_slot().unwrap().is_resident());
}

#[test]
fn stepping_stops_at_the_edges() {
    let (mut navigator, _codec) = navigator(3, 4);

    navigator.step_back();
    assert_eq!(navigator.focus(), Some(0));

    navigator.step_forward();
    navigator.step_forward();
    navigator.step_forward();
    assert_eq!(navigator.focus(), Some(2));
    assert_eq!(navigator.current_path().unwrap().to_string_lossy(), name(2));
}

#[test]
fn repeated_seek_decodes_once() {
    let (mut navigator, codec) = navigator(40, 10);

    navigator.seek(25);
    assert!(navigator.wait_idle(WAIT));
    navigator.seek(25);
    assert!(navigator.wait_idle(WAIT));

    assert_eq!(codec.count_of(&name(25)), 1);
}

#[test]
fn forward_step_prefetches_ascending() {
    let (mut navigator, codec) = navigator(20, 20);
    navigator.seek(10);
    assert!(navigator.wait_idle(WAIT));

    let store = navigator.session().unwrap().store().clone();
    for i in 12..20 {
        store.clear_image(i).unwrap();
    }
    codec.clear();

    navigator.step_forward();
    assert!(navigator.wait_idle(WAIT));

    let expected: Vec<String> = (12..20).map(name).collect();
    assert_eq!(codec.calls(), expected);
}

#[test]
fn backward_step_prefetches_descending() {
    let (mut navigator, codec) = navigator(40, 10);
    navigator.seek(30);
    assert!(navigator.wait_idle(WAIT));

    let store = navigator.session().unwrap().store().clone();
    for i in 19..29 {
        store.clear_image(i).unwrap();
    }
    codec.clear();

    navigator.step_back();
    assert!(navigator.wait_idle(WAIT));

    let expected: Vec<String> = (19..28).rev().map(name).collect();
    assert_eq!(codec.calls(), expected);
}

#[test]
fn eviction_keeps_exactly_the_retention_window() {
    let (mut navigator, _codec) = navigator(100, 30);
    assert!(navigator.wait_idle(WAIT));

    navigator.seek(50);
    assert!(navigator.wait_idle(WAIT));

    let store = navigator.session().unwrap().store().clone();
    assert!(store
        .resident_indices()
        .iter()
        .all(|i| (20..=80).contains(i)));

    // Fill the whole catalog, then evict again at the same focus
    for i in 0..100 {
        if !store.is_resident(i) {
            let image = store.get(50).unwrap().image.unwrap();
            store.set_image(i, image).unwrap();
        }
    }
    let cleared = navigator.evict();

    assert_eq!(cleared.len(), 100 - 61);
    assert_eq!(store.resident_indices(), (20..=80).collect::<Vec<_>>());
}

#[test]
fn rotation_survives_eviction() {
    let (mut navigator, _codec) = navigator(100, 10);
    assert_eq!(navigator.rotate(RotationOp::Quarter), Some(90.0));

    navigator.seek(99);
    assert!(navigator.wait_idle(WAIT));

    let store = navigator.session().unwrap().store();
    let slot = store.get(0).unwrap();
    assert!(!slot.is_resident());
    assert_eq!(slot.rotation_angle, 90.0);

    navigator.seek(0);
    assert_eq!(navigator.current_slot().unwrap().rotation_angle, 90.0);
}

#[test]
fn drag_rotation_accumulates_mod_360() {
    let (mut navigator, _codec) = navigator(1, 4);

    // -(dx + dy) * 0.5 => -100, +30, +200, -500
    for (dx, dy) in [(200.0, 0.0), (-60.0, 0.0), (0.0, -400.0), (1000.0, 0.0)] {
        navigator.rotate_drag(dx, dy, 0.5);
    }

    let expected = (-100.0f64 + 30.0 + 200.0 - 500.0).rem_euclid(360.0);
    assert_eq!(navigator.current_slot().unwrap().rotation_angle, expected);
}

#[test]
fn export_writes_prefix_up_to_focus() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out.csv");
    let (mut navigator, _codec) = navigator(0, 4);
    navigator.open_catalog(imgrot::Catalog::from_paths(vec![
        "c.png".into(),
        "a.png".into(),
        "b.png".into(),
    ]));

    navigator.seek(1);
    navigator.rotate(RotationOp::Quarter);
    navigator.seek(2);
    navigator.rotate(RotationOp::Quarter);
    navigator.rotate(RotationOp::Half);
    navigator.seek(1);
    navigator.export(&dest).unwrap();

    assert_eq!(
        fs::read_to_string(&dest).unwrap(),
        "Image,Rotation Angle\na.png,0\nb.png,90\n"
    );
}

#[test]
fn empty_directory_leaves_navigator_idle() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("notes.txt"), "no images here").unwrap();
    let dest = temp.path().join("out.csv");
    let (mut navigator, _codec) = navigator(5, 4);

    let result = navigator.open_directory(temp.path(), &["png"]);

    assert!(matches!(result, Err(CatalogError::Empty { .. })));
    assert_eq!(navigator.state(), NavState::Idle);
    assert_eq!(navigator.len(), 0);

    navigator.step_forward();
    navigator.step_back();
    navigator.seek(3);
    assert_eq!(navigator.focus(), None);
    assert_eq!(navigator.rotate(RotationOp::Quarter), None);
    assert!(navigator.evict().is_empty());

    navigator.export(&dest).unwrap();
    assert_eq!(fs::read_to_string(&dest).unwrap(), "Image,Rotation Angle\n");
}

#[test]
fn missing_directory_keeps_the_current_session() {
    let temp = TempDir::new().unwrap();
    let (mut navigator, _codec) = navigator(5, 4);
    navigator.seek(3);

    let result = navigator.open_directory(&temp.path().join("missing"), &["png"]);

    assert!(matches!(result, Err(CatalogError::NotADirectory { .. })));
    assert_eq!(navigator.state(), NavState::Ready);
    assert_eq!(navigator.focus(), Some(3));
}

#[test]
fn poll_reports_prefetch_progress() {
    let (navigator, _codec) = navigator(8, 4);
    assert!(navigator.wait_idle(WAIT));

    let events = navigator.poll();
    let loaded: Vec<usize> = events
        .iter()
        .filter_map(|event| match event {
            PrefetchEvent::Loaded { index, .. } => Some(*index),
            _ => None,
        })
        .collect();

    // Index 0 was loaded synchronously; the worker does the rest of the group
    assert_eq!(loaded, vec![1, 2, 3]);
    assert!(events
        .iter()
        .any(|event| matches!(event, PrefetchEvent::BatchDone { .. })));
    assert!(navigator.poll().is_empty());
}
