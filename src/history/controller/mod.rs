//! Coordinates the history store with host selection and navigation events.
//!
//! The controller is either `Live` (the host selection is whatever the user
//! last picked) or `Browsing` (the host selection mirrors the entry under the
//! cursor). Programmatic selections arm a one-shot guard so the host's
//! resulting change notification is not recorded again.

use std::sync::mpsc::Receiver;

use tracing::debug;

use super::entry::HistoryEntry;
use super::events::{HistoryUpdate, UpdateBroadcaster, UpdateReason};
use super::filter::HistoryFilter;
use super::host::{ObjectId, SceneHost};
use super::navigation::{NavigationDirection, NavigationEdges, NavigationInput, NavigationPolicy};
use super::store::HistoryStore;
use crate::config::{ConfigError, HistorySettings};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrowseMode {
    Live,
    Browsing,
}

/// Read model for one line of the history list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRow {
    pub index: usize,
    pub label: String,
    /// False when the recorded object no longer resolves.
    pub enabled: bool,
    pub current: bool,
}

pub struct HistoryController {
    store: HistoryStore,
    mode: BrowseMode,
    selection_was_set: bool,
    policy: NavigationPolicy,
    edges: NavigationEdges,
    updates: UpdateBroadcaster,
}

impl HistoryController {
    pub fn new(store: HistoryStore, policy: NavigationPolicy) -> Self {
        Self {
            store,
            mode: BrowseMode::Live,
            selection_was_set: false,
            policy,
            edges: NavigationEdges::default(),
            updates: UpdateBroadcaster::default(),
        }
    }

    /// Open the persisted history of `session` using the configured limits.
    pub fn from_settings(settings: &HistorySettings, session: &str) -> Result<Self, ConfigError> {
        let path = settings.snapshot_path(session)?;
        let store = HistoryStore::open(path, settings.history_max);
        Ok(Self::new(store, settings.navigation))
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn mode(&self) -> BrowseMode {
        self.mode
    }

    pub fn is_browsing(&self) -> bool {
        self.mode == BrowseMode::Browsing
    }

    pub fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    pub fn locked(&self) -> bool {
        self.store.locked()
    }

    /// Index the list highlights: the cursor while browsing, else the tail.
    pub fn location(&self) -> usize {
        match self.mode {
            BrowseMode::Browsing => self.store.cursor(),
            BrowseMode::Live => self.store.last_index(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<HistoryUpdate> {
        self.updates.subscribe()
    }

    /// Record whatever the host has selected when the session starts.
    pub fn attach(&mut self, host: &dyn SceneHost) {
        self.selection_was_set = false;
        self.record(host, host.active_selection());
    }

    /// Host notification that its active selection changed.
    pub fn on_selection_changed(&mut self, host: &dyn SceneHost, selection: Option<ObjectId>) {
        if self.selection_was_set {
            self.selection_was_set = false;
            return;
        }
        self.record(host, selection);
    }

    /// Select the entry at `index` (clamped) in the host, as a list click does.
    pub fn set_selection(&mut self, host: &mut dyn SceneHost, index: isize) -> bool {
        self.select_index(host, index, BrowseMode::Browsing, UpdateReason::Selected)
    }

    /// Step through the history. The first press while live lands on the tail.
    pub fn navigate(&mut self, host: &mut dyn SceneHost, direction: NavigationDirection) -> bool {
        if self.store.is_empty() {
            return false;
        }
        if !self.is_browsing() {
            let tail = self.store.last_index() as isize;
            return self.select_index(host, tail, BrowseMode::Browsing, UpdateReason::Navigated);
        }
        let Some(target) = self.step_target(&*host, self.store.cursor(), direction) else {
            return false;
        };
        debug!("Navigating {direction:?} to history entry {target}");
        self.select_index(
            host,
            target as isize,
            BrowseMode::Browsing,
            UpdateReason::Navigated,
        )
    }

    /// Per-frame poll of the directional buttons.
    pub fn tick(&mut self, host: &mut dyn SceneHost, input: NavigationInput) {
        for direction in self.edges.update(input) {
            self.navigate(host, direction);
        }
    }

    pub fn on_hierarchy_changed(&mut self, host: &dyn SceneHost) {
        if self.store.prune_dead(host) > 0 {
            self.notify(UpdateReason::Pruned);
        }
    }

    pub fn on_container_opened(&mut self, host: &dyn SceneHost, container: &str) {
        if self.store.update_entries(|entry| entry.reresolved(host, container)) > 0 {
            self.notify(UpdateReason::Reloaded);
        }
    }

    pub fn on_container_saved(&mut self, host: &dyn SceneHost, container: &str) {
        let changed = self.store.update_entries(|entry| {
            if entry.belongs_to(container) {
                entry.refreshed(host)
            } else {
                entry.clone()
            }
        });
        if changed > 0 {
            self.notify(UpdateReason::Reloaded);
        }
    }

    pub fn clear(&mut self) {
        self.store.clear();
        self.mode = BrowseMode::Live;
        self.notify(UpdateReason::Cleared);
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.store.set_locked(locked);
        self.notify(UpdateReason::LockChanged);
    }

    /// Whether the backward/forward buttons should be enabled.
    pub fn can_navigate(&self, direction: NavigationDirection) -> bool {
        if self.store.is_empty() {
            return false;
        }
        if !self.is_browsing() {
            return true;
        }
        let location = self.location();
        match direction {
            NavigationDirection::Backward => location > 0,
            NavigationDirection::Forward => location < self.store.last_index(),
        }
    }

    /// Rows for the list view, oldest first, skipping filtered-out entries.
    pub fn rows(&self, host: &dyn SceneHost, filter: &HistoryFilter) -> Vec<HistoryRow> {
        let location = self.location();
        self.store
            .entries()
            .enumerate()
            .filter(|(_, entry)| filter.matches(entry, host))
            .map(|(index, entry)| HistoryRow {
                index,
                label: entry.resolved_name(host),
                enabled: entry.exists(host),
                current: self.is_browsing() && index == location,
            })
            .collect()
    }

    fn record(&mut self, host: &dyn SceneHost, selection: Option<ObjectId>) {
        let Some(id) = selection else {
            self.mode = BrowseMode::Live;
            self.store.move_cursor(self.store.last_index() as isize);
            self.notify(UpdateReason::Navigated);
            return;
        };
        let Some(entry) = HistoryEntry::capture(host, id) else {
            debug!("Ignoring selection of unresolvable object {id}");
            return;
        };
        if self.store.locked() {
            debug!("History locked; not recording {id}");
            self.mode = BrowseMode::Live;
            self.notify(UpdateReason::Navigated);
            return;
        }
        // A live history has nothing in front of the cursor to drop, even when
        // a restored snapshot left the cursor mid-list.
        if self.mode == BrowseMode::Live {
            self.store.seek_end();
        }
        self.mode = BrowseMode::Browsing;
        self.store.append(entry);
        self.notify(UpdateReason::Recorded);
    }

    fn select_index(
        &mut self,
        host: &mut dyn SceneHost,
        index: isize,
        mode: BrowseMode,
        reason: UpdateReason,
    ) -> bool {
        if self.store.is_empty() || !host.accepts_programmatic_selection() {
            return false;
        }
        let target = self.store.clamp_index(index);
        let selection = self
            .store
            .get(target)
            .filter(|entry| entry.exists(&*host))
            .and_then(HistoryEntry::reference);
        self.mode = mode;
        if host.active_selection() != selection {
            self.selection_was_set = true;
            host.set_active_selection(selection);
        }
        self.store.move_cursor(target as isize);
        self.notify(reason);
        true
    }

    fn step_target(
        &self,
        host: &dyn SceneHost,
        from: usize,
        direction: NavigationDirection,
    ) -> Option<usize> {
        let step = direction.step();
        let next = self.store.clamp_index(from as isize + step);
        if next == from {
            return None;
        }
        if self.policy == NavigationPolicy::Step {
            return Some(next);
        }
        let mut candidate = next;
        loop {
            let usable = self
                .store
                .get(candidate)
                .is_some_and(|entry| entry.exists(host) || entry.is_reresolvable());
            let further = self.store.clamp_index(candidate as isize + step);
            if usable || further == candidate {
                return Some(candidate);
            }
            candidate = further;
        }
    }

    fn notify(&mut self, reason: UpdateReason) {
        let update = HistoryUpdate {
            location: self.location(),
            reason,
        };
        self.updates.send(update);
    }
}
