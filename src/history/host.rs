//! Boundary between the history and the editor that owns the objects.
//!
//! The history never owns host objects. It stores [`ObjectId`] handles and asks
//! the host whether they still resolve before every read.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle to an object owned by the host editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a scene-graph node lives, used to find it again after a reload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenePlacement {
    /// Name of the container (scene) holding the node.
    pub container: String,
    /// Node names from the root down to the node itself.
    pub hierarchy: Vec<String>,
}

/// Live description of a host object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectInfo {
    pub name: String,
    pub type_name: String,
    /// `None` for persistent assets whose handle survives reloads.
    pub placement: Option<ScenePlacement>,
}

/// Capabilities the history needs from the host editor.
pub trait SceneHost {
    /// Describe a live object, `None` once it no longer resolves.
    fn describe(&self, id: ObjectId) -> Option<ObjectInfo>;

    fn exists(&self, id: ObjectId) -> bool {
        self.describe(id).is_some()
    }

    /// Look up a node by its structural path inside a loaded container.
    fn find_in_container(&self, container: &str, path: &str) -> Option<ObjectId>;

    fn active_selection(&self) -> Option<ObjectId>;

    /// Change the host selection. The host reports the change back through
    /// its regular selection-changed notification.
    fn set_active_selection(&mut self, id: Option<ObjectId>);

    /// Whether programmatic selection is currently allowed (hosts refuse it
    /// while a running game view owns input focus).
    fn accepts_programmatic_selection(&self) -> bool {
        true
    }
}

/// Join root-to-node names into the path used to re-find a node.
pub fn structural_path<S: AsRef<str>>(hierarchy: &[S]) -> String {
    hierarchy
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}
