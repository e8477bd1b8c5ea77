//! Bounded, cursor-addressed list of recorded selections.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::entry::HistoryEntry;
use super::host::SceneHost;
use super::snapshot::{HistorySnapshot, load_snapshot, save_snapshot};

/// Ordered selection records plus the cursor and lock flag.
///
/// When a snapshot path is attached the whole store is written back after
/// every mutation. Write failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    locked: bool,
    capacity: usize,
    snapshot_path: Option<PathBuf>,
}

impl HistoryStore {
    /// In-memory store that never touches disk.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            locked: false,
            capacity: capacity.max(1),
            snapshot_path: None,
        }
    }

    /// Store backed by the snapshot at `path`.
    ///
    /// A missing or unreadable snapshot starts an empty history.
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let mut store = match load_snapshot(&path) {
            Ok(Some(snapshot)) => {
                let store = Self::from_snapshot(snapshot, capacity);
                info!(
                    "Loaded selection history ({} entries) from {}",
                    store.len(),
                    path.display()
                );
                store
            }
            Ok(None) => Self::new(capacity),
            Err(err) => {
                warn!("Starting with empty selection history: {err}");
                Self::new(capacity)
            }
        };
        store.snapshot_path = Some(path);
        store
    }

    /// Rebuild a store from a snapshot, keeping the newest `capacity` entries.
    pub fn from_snapshot(snapshot: HistorySnapshot, capacity: usize) -> Self {
        let mut store = Self::new(capacity);
        store.entries = snapshot.entries.into();
        store.locked = snapshot.locked;
        let dropped = store.drop_overflow();
        store.cursor = store.clamp_index(snapshot.cursor_index.saturating_sub(dropped) as isize);
        store
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            cursor_index: self.cursor,
            locked: self.locked,
            entries: self.entries.iter().cloned().collect(),
        }
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn last_index(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Clamp any index into `0..=last_index`.
    pub fn clamp_index(&self, index: isize) -> usize {
        if self.entries.is_empty() {
            return 0;
        }
        index.clamp(0, self.last_index() as isize) as usize
    }

    /// Record a new selection.
    ///
    /// Drops everything after the cursor first. Re-selecting the object at
    /// the end of the remaining list records nothing. Returns whether an
    /// entry was added.
    pub fn append(&mut self, entry: HistoryEntry) -> bool {
        if self.locked {
            return false;
        }
        let truncated = self.truncate_after_cursor();
        if self
            .entries
            .back()
            .is_some_and(|last| last.same_object(&entry))
        {
            if truncated {
                self.persist();
            }
            return false;
        }
        debug!("Recording selection {:?}", entry.display_name());
        self.entries.push_back(entry);
        self.cursor = self.last_index();
        let dropped = self.drop_overflow();
        self.cursor = self.cursor.saturating_sub(dropped);
        self.persist();
        true
    }

    /// Move the cursor, clamping out-of-range targets. Returns the new cursor.
    pub fn move_cursor(&mut self, target: isize) -> usize {
        self.cursor = self.clamp_index(target);
        self.persist();
        self.cursor
    }

    /// Put the cursor on the newest entry. The next write persists it.
    pub(crate) fn seek_end(&mut self) {
        self.cursor = self.last_index();
    }

    /// Remove entries whose object is gone for good.
    ///
    /// Stale scene entries stay because a container reload can bring them
    /// back. Returns the number of removed entries.
    pub fn prune_dead(&mut self, host: &dyn SceneHost) -> usize {
        let before = self.entries.len();
        let mut removed_before_cursor = 0;
        let mut index = 0;
        let cursor = self.cursor;
        self.entries.retain(|entry| {
            let keep = entry.is_reresolvable() || entry.exists(host);
            if !keep && index < cursor {
                removed_before_cursor += 1;
            }
            index += 1;
            keep
        });
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Pruned {removed} dead history entries");
            self.cursor = self.clamp_index((cursor - removed_before_cursor) as isize);
            self.persist();
        }
        removed
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        self.persist();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.persist();
    }

    /// Replace each entry with `update(entry)`, writing changed values back
    /// at the same index. Returns the number of changed entries.
    pub fn update_entries(&mut self, mut update: impl FnMut(&HistoryEntry) -> HistoryEntry) -> usize {
        let mut changed = 0;
        for slot in self.entries.iter_mut() {
            let next = update(slot);
            if next != *slot {
                *slot = next;
                changed += 1;
            }
        }
        if changed > 0 {
            self.persist();
        }
        changed
    }

    fn truncate_after_cursor(&mut self) -> bool {
        if self.cursor + 1 < self.entries.len() {
            self.entries.truncate(self.cursor + 1);
            return true;
        }
        false
    }

    fn drop_overflow(&mut self) -> usize {
        let overflow = self.entries.len().saturating_sub(self.capacity);
        self.entries.drain(..overflow);
        overflow
    }

    fn persist(&self) {
        let Some(path) = self.snapshot_path.as_deref() else {
            return;
        };
        if let Err(err) = save_snapshot(path, &self.snapshot()) {
            warn!("Selection history not saved: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::host::ObjectId;
    use crate::history::test_host::FakeScene;
    use tempfile::tempdir;

    fn scene_with_assets(count: u64) -> FakeScene {
        let mut scene = FakeScene::new();
        for id in 0..count {
            scene.add_asset(id, &format!("Asset{id}"));
        }
        scene
    }

    fn entry(scene: &FakeScene, id: u64) -> HistoryEntry {
        HistoryEntry::capture(scene, ObjectId(id)).unwrap()
    }

    fn references(store: &HistoryStore) -> Vec<u64> {
        store
            .entries()
            .filter_map(|entry| entry.reference().map(|id| id.0))
            .collect()
    }

    #[test]
    fn same_object_twice_in_a_row_is_recorded_once() {
        let scene = scene_with_assets(2);
        let mut store = HistoryStore::new(16);
        assert!(store.append(entry(&scene, 0)));
        assert!(!store.append(entry(&scene, 0)));
        assert_eq!(store.len(), 1);
        assert!(store.append(entry(&scene, 1)));
        assert!(store.append(entry(&scene, 0)));
        assert_eq!(references(&store), vec![0, 1, 0]);
    }

    #[test]
    fn appending_after_moving_back_discards_forward_entries() {
        let scene = scene_with_assets(5);
        let mut store = HistoryStore::new(16);
        for id in 0..4 {
            store.append(entry(&scene, id));
        }
        store.move_cursor(1);
        store.append(entry(&scene, 4));
        assert_eq!(references(&store), vec![0, 1, 4]);
        assert_eq!(store.cursor(), 2);
    }

    #[test]
    fn reselecting_cursor_object_after_moving_back_still_truncates() {
        let scene = scene_with_assets(3);
        let mut store = HistoryStore::new(16);
        for id in 0..3 {
            store.append(entry(&scene, id));
        }
        store.move_cursor(1);
        assert!(!store.append(entry(&scene, 1)));
        assert_eq!(references(&store), vec![0, 1]);
        assert_eq!(store.cursor(), 1);
    }

    #[test]
    fn capacity_drops_oldest_and_shifts_cursor() {
        let scene = scene_with_assets(6);
        let mut store = HistoryStore::new(3);
        for id in 0..6 {
            store.append(entry(&scene, id));
            assert!(store.len() <= 3);
            assert_eq!(store.cursor(), store.len() - 1);
        }
        assert_eq!(references(&store), vec![3, 4, 5]);
    }

    #[test]
    fn move_cursor_clamps_any_target() {
        let scene = scene_with_assets(3);
        let mut store = HistoryStore::new(16);
        assert_eq!(store.move_cursor(5), 0);
        for id in 0..3 {
            store.append(entry(&scene, id));
        }
        for (target, expected) in [(-10, 0), (-1, 0), (0, 0), (1, 1), (2, 2), (3, 2), (isize::MAX, 2)] {
            assert_eq!(store.move_cursor(target), expected, "target {target}");
        }
    }

    #[test]
    fn locked_store_ignores_appends() {
        let scene = scene_with_assets(2);
        let mut store = HistoryStore::new(16);
        store.append(entry(&scene, 0));
        store.set_locked(true);
        assert!(!store.append(entry(&scene, 1)));
        assert_eq!(references(&store), vec![0]);
        assert_eq!(store.cursor(), 0);
    }

    #[test]
    fn prune_keeps_reresolvable_scene_entries() {
        let mut scene = scene_with_assets(3);
        let node = scene.add_node(10, "Level1", &["Root"]);
        let mut store = HistoryStore::new(16);
        for id in [0, 10, 1, 2] {
            store.append(entry(&scene, id));
        }
        scene.remove(ObjectId(0));
        scene.remove(ObjectId(2));
        scene.remove(node);

        assert_eq!(store.prune_dead(&scene), 2);
        assert_eq!(references(&store), vec![10, 1]);
        assert_eq!(store.cursor(), 1);
    }

    #[test]
    fn prune_shifts_cursor_past_removed_entries() {
        let mut scene = scene_with_assets(4);
        let mut store = HistoryStore::new(16);
        for id in 0..4 {
            store.append(entry(&scene, id));
        }
        store.move_cursor(2);
        scene.remove(ObjectId(0));
        scene.remove(ObjectId(3));
        store.prune_dead(&scene);
        assert_eq!(references(&store), vec![1, 2]);
        assert_eq!(store.get(store.cursor()).and_then(|e| e.reference()), Some(ObjectId(2)));
    }

    #[test]
    fn update_entries_writes_back_in_place() {
        let mut scene = FakeScene::new();
        let node = scene.add_node(1, "Level1", &["Root"]);
        let mut store = HistoryStore::new(16);
        store.append(entry(&scene, 1));
        scene.rename(node, "Renamed");
        assert_eq!(store.update_entries(|e| e.refreshed(&scene)), 1);
        assert_eq!(store.get(0).map(|e| e.display_name()), Some("Renamed"));
        assert_eq!(store.update_entries(|e| e.refreshed(&scene)), 0);
    }

    #[test]
    fn clear_resets_cursor() {
        let scene = scene_with_assets(2);
        let mut store = HistoryStore::new(16);
        store.append(entry(&scene, 0));
        store.append(entry(&scene, 1));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.cursor(), 0);
    }

    #[test]
    fn reopened_store_matches_persisted_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut scene = scene_with_assets(3);
        scene.add_node(10, "Level1", &["Root", "Child"]);
        {
            let mut store = HistoryStore::open(&path, 16);
            for id in [0, 10, 1, 2] {
                store.append(entry(&scene, id));
            }
            store.move_cursor(1);
            store.set_locked(true);
        }

        let reopened = HistoryStore::open(&path, 16);
        assert_eq!(references(&reopened), vec![0, 10, 1, 2]);
        assert_eq!(reopened.cursor(), 1);
        assert!(reopened.locked());
        assert_eq!(reopened.get(1).and_then(|e| e.path()), Some("Root/Child"));

        let fresh_session = FakeScene::new();
        assert!(reopened.entries().all(|e| !e.exists(&fresh_session)));
    }

    #[test]
    fn corrupt_snapshot_starts_empty_and_is_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, b"\x00garbage").unwrap();
        let scene = scene_with_assets(1);

        let mut store = HistoryStore::open(&path, 16);
        assert!(store.is_empty());
        store.append(entry(&scene, 0));

        assert_eq!(HistoryStore::open(&path, 16).len(), 1);
    }

    #[test]
    fn oversized_snapshot_keeps_newest_entries() {
        let scene = scene_with_assets(5);
        let snapshot = HistorySnapshot {
            cursor_index: 3,
            locked: false,
            entries: (0..5).map(|id| entry(&scene, id)).collect(),
        };
        let store = HistoryStore::from_snapshot(snapshot, 2);
        assert_eq!(references(&store), vec![3, 4]);
        assert_eq!(store.cursor(), 1);
    }

    #[test]
    fn snapshot_cursor_is_clamped_on_load() {
        let scene = scene_with_assets(2);
        let snapshot = HistorySnapshot {
            cursor_index: 40,
            locked: false,
            entries: (0..2).map(|id| entry(&scene, id)).collect(),
        };
        assert_eq!(HistoryStore::from_snapshot(snapshot, 16).cursor(), 1);
    }
}
