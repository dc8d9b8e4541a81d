#![allow(non_snake_case)]
#![allow(clippy::unwrap_used)]

use super::*;
use std::fs;

struct Fixture {
    _dir: tempfile::TempDir,
    store: RecentsStore,
    base: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().to_path_buf();
    let store = RecentsStore::new(base.join("recents.json"));
    Fixture {
        store,
        base,
        _dir: dir,
    }
}

fn touch(fx: &Fixture, name: &str) -> String {
    let path = fx.base.join(name);
    fs::write(&path, b"bundle").unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn RecentsStore___missing_file___reads_as_empty() {
    let fx = fixture();

    assert!(fx.store.recents().is_empty());
    assert!(fx.store.last_path().is_none());
}

#[test]
fn RecentsStore___corrupt_file___reads_as_empty() {
    let fx = fixture();
    fs::write(fx.base.join("recents.json"), b"{ not json").unwrap();

    assert!(fx.store.recents().is_empty());
}

#[test]
fn RecentsStore___upsert___newest_first() {
    let fx = fixture();
    let a = touch(&fx, "a.bundle");
    let b = touch(&fx, "b.bundle");

    fx.store.upsert(&a, "A").unwrap();
    fx.store.upsert(&b, "B").unwrap();

    let recents = fx.store.recents();
    assert_eq!(recents.len(), 2);
    assert_eq!(recents[0].path, b);
    assert_eq!(recents[1].path, a);
}

#[test]
fn RecentsStore___upsert_same_path___moves_to_front_without_duplicate() {
    let fx = fixture();
    let a = touch(&fx, "a.bundle");
    let b = touch(&fx, "b.bundle");
    fx.store.upsert(&a, "A").unwrap();
    fx.store.upsert(&b, "B").unwrap();

    fx.store.upsert(&a, "A again").unwrap();

    let recents = fx.store.recents();
    assert_eq!(recents.len(), 2);
    assert_eq!(recents[0].path, a);
    assert_eq!(recents[0].display_name, "A again");
}

#[test]
fn RecentsStore___upsert___caps_at_max_recents() {
    let fx = fixture();

    for i in 0..(MAX_RECENTS + 5) {
        let path = touch(&fx, &format!("b{i}.bundle"));
        fx.store.upsert(&path, &format!("B{i}")).unwrap();
    }

    assert_eq!(fx.store.recents().len(), MAX_RECENTS);
}

#[test]
fn RecentsStore___recents___purges_vanished_files() {
    let fx = fixture();
    let keep = touch(&fx, "keep.bundle");
    let gone = touch(&fx, "gone.bundle");
    fx.store.upsert(&keep, "K").unwrap();
    fx.store.upsert(&gone, "G").unwrap();

    fs::remove_file(&gone).unwrap();
    let recents = fx.store.recents();

    assert_eq!(recents.len(), 1);
    assert_eq!(recents[0].path, keep);
}

#[test]
fn RecentsStore___remove___clears_matching_last_open() {
    let fx = fixture();
    let a = touch(&fx, "a.bundle");
    fx.store.upsert(&a, "A").unwrap();
    fx.store.set_last_open(Some(&a), Some("A")).unwrap();

    fx.store.remove(&a).unwrap();

    assert!(fx.store.recents().is_empty());
    assert!(fx.store.last_path().is_none());
    assert!(fx.store.last_name().is_none());
}

#[test]
fn RecentsStore___last_open___round_trips() {
    let fx = fixture();

    fx.store.set_last_open(Some("/tmp/x.bundle"), Some("X")).unwrap();

    assert_eq!(fx.store.last_path().as_deref(), Some("/tmp/x.bundle"));
    assert_eq!(fx.store.last_name().as_deref(), Some("X"));

    fx.store.clear_last().unwrap();

    assert!(fx.store.last_path().is_none());
}

#[test]
fn RecentsStore___clear___forgets_entries_and_deletes_cached_files() {
    let fx = fixture();
    let a = touch(&fx, "a.bundle");
    fx.store.upsert(&a, "A").unwrap();
    fx.store.set_last_open(Some(&a), Some("A")).unwrap();

    fx.store.clear().unwrap();

    assert!(fx.store.recents().is_empty());
    assert!(fx.store.last_path().is_none());
    assert!(!Path::new(&a).exists());
}
