use super::options::{CompressionMode, SessionOptions};
use super::{apply_snapshot, clear_session, inspect_session, load_snapshot, save_snapshot, snapshot_from_state};
use crate::input::{InputState, PenMode, Tool};
use crate::util::Point;
use tempfile::tempdir;

fn drawn_state() -> InputState {
    let mut state = InputState::new(64, 64).unwrap();
    state.select_tool(Some(Tool::Pen)).unwrap();
    state.set_pen_mode(PenMode::Point);
    state.on_pointer_down(Point::new(30.0, 30.0)).unwrap();
    state.on_pointer_up(Point::new(30.0, 30.0)).unwrap();
    state
}

#[test]
fn save_and_restore_round_trip() {
    let dir = tempdir().unwrap();
    let options = SessionOptions::new(dir.path().to_path_buf(), "test");

    let state = drawn_state();
    let snapshot = snapshot_from_state(&state).unwrap();
    save_snapshot(&snapshot, &options).unwrap();

    let loaded = load_snapshot(&options).unwrap().expect("session present");
    assert_eq!(loaded.width, 64);
    assert_eq!(loaded.anchors, vec![Point::new(30.0, 30.0)]);

    let mut restored = InputState::new(64, 64).unwrap();
    apply_snapshot(&mut restored, loaded).unwrap();
    assert_ne!(restored.compositor_mut().main_mut().pixel(30, 30).unwrap(), 0);
    assert_eq!(restored.snap().len(), 1);
    // Tool state travels with the board.
    assert_eq!(restored.settings().line_width, 10.0);
    // Restored state is a fresh baseline.
    assert!(!restored.can_undo());
}

#[test]
fn forced_compression_writes_gzip() {
    let dir = tempdir().unwrap();
    let mut options = SessionOptions::new(dir.path().to_path_buf(), "gz");
    options.compression = CompressionMode::On;

    let snapshot = snapshot_from_state(&drawn_state()).unwrap();
    save_snapshot(&snapshot, &options).unwrap();

    let bytes = std::fs::read(options.session_file_path()).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);

    // The loader sniffs the magic bytes, no flag needed.
    assert!(load_snapshot(&options).unwrap().is_some());
}

#[test]
fn oversized_payload_is_not_written() {
    let dir = tempdir().unwrap();
    let mut options = SessionOptions::new(dir.path().to_path_buf(), "big");
    options.max_file_size_bytes = 64;

    let snapshot = snapshot_from_state(&drawn_state()).unwrap();
    save_snapshot(&snapshot, &options).unwrap();
    assert!(!options.session_file_path().exists());
}

#[test]
fn second_save_rotates_a_backup() {
    let dir = tempdir().unwrap();
    let options = SessionOptions::new(dir.path().to_path_buf(), "bak");

    let snapshot = snapshot_from_state(&drawn_state()).unwrap();
    save_snapshot(&snapshot, &options).unwrap();
    assert!(!options.backup_file_path().exists());

    save_snapshot(&snapshot, &options).unwrap();
    assert!(options.backup_file_path().exists());
}

#[test]
fn zero_retention_keeps_no_backup() {
    let dir = tempdir().unwrap();
    let mut options = SessionOptions::new(dir.path().to_path_buf(), "nobak");
    options.backup_retention = 0;

    let snapshot = snapshot_from_state(&drawn_state()).unwrap();
    save_snapshot(&snapshot, &options).unwrap();
    save_snapshot(&snapshot, &options).unwrap();
    assert!(!options.backup_file_path().exists());
    assert!(options.session_file_path().exists());
}

#[test]
fn clear_session_removes_all_files() {
    let dir = tempdir().unwrap();
    let options = SessionOptions::new(dir.path().to_path_buf(), "clear");

    let snapshot = snapshot_from_state(&drawn_state()).unwrap();
    save_snapshot(&snapshot, &options).unwrap();

    let outcome = clear_session(&options).unwrap();
    assert!(outcome.removed_session);
    assert!(outcome.removed_lock);
    assert!(!options.session_file_path().exists());
}

#[test]
fn missing_session_loads_none() {
    let dir = tempdir().unwrap();
    let options = SessionOptions::new(dir.path().to_path_buf(), "none");
    assert!(load_snapshot(&options).unwrap().is_none());
}

#[test]
fn inspect_reports_saved_contents() {
    let dir = tempdir().unwrap();
    let options = SessionOptions::new(dir.path().to_path_buf(), "inspect");

    let empty = inspect_session(&options).unwrap();
    assert!(!empty.exists);

    let snapshot = snapshot_from_state(&drawn_state()).unwrap();
    save_snapshot(&snapshot, &options).unwrap();

    let inspection = inspect_session(&options).unwrap();
    assert!(inspection.exists);
    assert_eq!(inspection.dimensions, Some((64, 64)));
    assert_eq!(inspection.anchor_count, Some(1));
    assert!(inspection.tool_state_present);
    assert!(inspection.size_bytes.unwrap() > 0);
}
