//! Selection history: recorded picks, a cursor, and browser-style navigation.

mod controller;
mod entry;
mod events;
mod filter;
mod host;
mod navigation;
mod snapshot;
mod store;
#[cfg(test)]
mod test_host;

pub use controller::{BrowseMode, HistoryController, HistoryRow};
pub use entry::HistoryEntry;
pub use events::{HistoryUpdate, UpdateReason};
pub use filter::{HistoryFilter, SearchMode};
pub use host::{ObjectId, ObjectInfo, ScenePlacement, SceneHost, structural_path};
pub use navigation::{NavigationDirection, NavigationInput, NavigationPolicy};
pub use snapshot::{HistorySnapshot, SnapshotError, load_snapshot, save_snapshot};
pub use store::HistoryStore;
