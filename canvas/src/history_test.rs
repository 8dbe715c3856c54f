use serde_json::json;

use super::*;

fn snap(n: usize) -> Snapshot {
    Snapshot::from_value(json!({ "version": 1, "objects": [], "n": n }))
}

fn n_of(snapshot: Option<&Snapshot>) -> Option<u64> {
    snapshot.and_then(|s| s.as_value()["n"].as_u64())
}

#[test]
fn new_history_is_empty() {
    let mut history = History::new();
    assert!(history.is_empty());
    assert_eq!(history.cursor(), None);
    assert!(history.current().is_none());
    assert!(history.undo().is_none());
    assert!(history.redo().is_none());
}

#[test]
fn commit_advances_cursor() {
    let mut history = History::new();
    history.commit(snap(0));
    history.commit(snap(1));
    assert_eq!(history.len(), 2);
    assert_eq!(history.cursor(), Some(1));
    assert_eq!(n_of(history.current()), Some(1));
}

#[test]
fn undo_stops_at_first_entry() {
    let mut history = History::new();
    history.commit(snap(0));
    assert!(!history.can_undo());
    assert!(history.undo().is_none());
    assert_eq!(history.cursor(), Some(0));

    history.commit(snap(1));
    assert_eq!(n_of(history.undo()), Some(0));
    assert!(history.undo().is_none());
}

#[test]
fn redo_replays_undone_entries() {
    let mut history = History::new();
    for n in 0..3 {
        history.commit(snap(n));
    }
    history.undo();
    history.undo();
    assert!(history.can_redo());
    assert_eq!(n_of(history.redo()), Some(1));
    assert_eq!(n_of(history.redo()), Some(2));
    assert!(history.redo().is_none());
    assert_eq!(history.cursor(), Some(2));
}

#[test]
fn commit_after_undo_truncates_redo_branch() {
    let mut history = History::new();
    history.commit(snap(0));
    history.commit(snap(1));
    history.undo();
    history.commit(snap(2));
    assert!(history.redo().is_none());
    assert_eq!(history.len(), 2);
    assert_eq!(n_of(history.undo()), Some(0));
    assert_eq!(n_of(history.redo()), Some(2));
}

#[test]
fn buffer_is_bounded_at_limit() {
    let mut history = History::new();
    for n in 0..(HISTORY_LIMIT + 7) {
        history.commit(snap(n));
    }
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert_eq!(history.cursor(), Some(HISTORY_LIMIT - 1));

    let mut oldest = None;
    while let Some(entry) = history.undo() {
        oldest = n_of(Some(entry));
    }
    // The first seven commits were evicted.
    assert_eq!(oldest, Some(7));
}

#[test]
fn eviction_keeps_cursor_on_same_entry() {
    let mut history = History::with_limit(3);
    for n in 0..3 {
        history.commit(snap(n));
    }
    history.commit(snap(3));
    assert_eq!(history.len(), 3);
    assert_eq!(history.cursor(), Some(2));
    assert_eq!(n_of(history.current()), Some(3));
}

#[test]
fn eviction_after_truncation() {
    let mut history = History::with_limit(3);
    for n in 0..3 {
        history.commit(snap(n));
    }
    history.undo();
    history.commit(snap(9));
    // Truncation made room, nothing evicted.
    assert_eq!(history.len(), 3);
    assert_eq!(n_of(history.undo()), Some(1));
    assert_eq!(n_of(history.undo()), Some(0));
}

#[test]
fn reset_starts_fresh() {
    let mut history = History::new();
    for n in 0..5 {
        history.commit(snap(n));
    }
    history.reset(snap(42));
    assert_eq!(history.len(), 1);
    assert_eq!(history.cursor(), Some(0));
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(n_of(history.current()), Some(42));
}
