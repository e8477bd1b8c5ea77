use serde::{Deserialize, Serialize};

use super::host::{ObjectId, ObjectInfo, SceneHost, structural_path};

/// One recorded selection.
///
/// Entries captured from scene-graph nodes also remember their container and
/// structural path so they can be found again after the container reloads.
/// Asset entries only keep the handle and the last known name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    reference: Option<ObjectId>,
    display_name: String,
    #[serde(default)]
    type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    container_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl HistoryEntry {
    pub fn new(id: ObjectId, info: &ObjectInfo) -> Self {
        let (container_id, path) = match &info.placement {
            Some(placement) => (
                Some(placement.container.clone()),
                Some(structural_path(&placement.hierarchy)),
            ),
            None => (None, None),
        };
        Self {
            reference: Some(id),
            display_name: info.name.clone(),
            type_name: info.type_name.clone(),
            container_id,
            path,
        }
    }

    /// Capture the current state of a live object.
    pub fn capture(host: &dyn SceneHost, id: ObjectId) -> Option<Self> {
        host.describe(id).map(|info| Self::new(id, &info))
    }

    pub fn reference(&self) -> Option<ObjectId> {
        self.reference
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn exists(&self, host: &dyn SceneHost) -> bool {
        self.reference.is_some_and(|id| host.exists(id))
    }

    /// Scene entries may come back after their container reloads.
    pub fn is_reresolvable(&self) -> bool {
        self.container_id.is_some() && self.path.is_some()
    }

    pub fn belongs_to(&self, container: &str) -> bool {
        self.container_id.as_deref() == Some(container)
    }

    /// Same underlying object, by handle identity.
    pub fn same_object(&self, other: &HistoryEntry) -> bool {
        self.reference.is_some() && self.reference == other.reference
    }

    /// Live name when the object resolves, otherwise the last known one.
    /// Stale scene entries are prefixed with their container.
    pub fn resolved_name(&self, host: &dyn SceneHost) -> String {
        if let Some(info) = self.reference.and_then(|id| host.describe(id)) {
            return info.name;
        }
        match self.container_id.as_deref() {
            Some(container) if !container.is_empty() => {
                format!("[{container}] {}", self.display_name)
            }
            _ => self.display_name.clone(),
        }
    }

    /// Rebind a stale scene entry once `container` has been (re)loaded.
    pub fn reresolved(&self, host: &dyn SceneHost, container: &str) -> HistoryEntry {
        if !self.is_reresolvable() || !self.belongs_to(container) || self.exists(host) {
            return self.clone();
        }
        let Some(path) = self.path.as_deref() else {
            return self.clone();
        };
        let rebound = HistoryEntry {
            reference: host.find_in_container(container, path),
            ..self.clone()
        };
        rebound.refreshed(host)
    }

    /// Re-read name and path of a live scene entry.
    pub fn refreshed(&self, host: &dyn SceneHost) -> HistoryEntry {
        if !self.is_reresolvable() {
            return self.clone();
        }
        let Some(info) = self.reference.and_then(|id| host.describe(id)) else {
            return self.clone();
        };
        let mut next = self.clone();
        next.display_name = info.name;
        next.type_name = info.type_name;
        if let Some(placement) = info.placement {
            next.path = Some(structural_path(&placement.hierarchy));
        }
        next
    }
}
