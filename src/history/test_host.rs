//! In-memory scene used by the history unit tests.

use std::collections::BTreeMap;

use super::host::{ObjectId, ObjectInfo, ScenePlacement, SceneHost, structural_path};

#[derive(Default)]
pub(crate) struct FakeScene {
    objects: BTreeMap<ObjectId, ObjectInfo>,
    active: Option<ObjectId>,
    notifications: Vec<Option<ObjectId>>,
    pub(crate) blocked: bool,
}

impl FakeScene {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_asset(&mut self, id: u64, name: &str) -> ObjectId {
        let id = ObjectId(id);
        self.objects.insert(
            id,
            ObjectInfo {
                name: name.to_string(),
                type_name: "Material".to_string(),
                placement: None,
            },
        );
        id
    }

    pub(crate) fn add_node(&mut self, id: u64, container: &str, hierarchy: &[&str]) -> ObjectId {
        let id = ObjectId(id);
        self.objects.insert(
            id,
            ObjectInfo {
                name: hierarchy.last().copied().unwrap_or_default().to_string(),
                type_name: "GameObject".to_string(),
                placement: Some(ScenePlacement {
                    container: container.to_string(),
                    hierarchy: hierarchy.iter().map(|s| s.to_string()).collect(),
                }),
            },
        );
        id
    }

    pub(crate) fn remove(&mut self, id: ObjectId) {
        self.objects.remove(&id);
    }

    pub(crate) fn rename(&mut self, id: ObjectId, name: &str) {
        if let Some(info) = self.objects.get_mut(&id) {
            info.name = name.to_string();
            if let Some(last) = info
                .placement
                .as_mut()
                .and_then(|placement| placement.hierarchy.last_mut())
            {
                *last = name.to_string();
            }
        }
    }

    /// Simulate a user pick; returns the selection to feed the controller.
    pub(crate) fn user_select(&mut self, id: Option<ObjectId>) -> Option<ObjectId> {
        self.active = id;
        id
    }

    pub(crate) fn take_notifications(&mut self) -> Vec<Option<ObjectId>> {
        std::mem::take(&mut self.notifications)
    }
}

impl SceneHost for FakeScene {
    fn describe(&self, id: ObjectId) -> Option<ObjectInfo> {
        self.objects.get(&id).cloned()
    }

    fn find_in_container(&self, container: &str, path: &str) -> Option<ObjectId> {
        self.objects.iter().find_map(|(id, info)| {
            let placement = info.placement.as_ref()?;
            (placement.container == container && structural_path(&placement.hierarchy) == path)
                .then_some(*id)
        })
    }

    fn active_selection(&self) -> Option<ObjectId> {
        self.active
    }

    fn set_active_selection(&mut self, id: Option<ObjectId>) {
        if self.active != id {
            self.active = id;
            self.notifications.push(id);
        }
    }

    fn accepts_programmatic_selection(&self) -> bool {
        !self.blocked
    }
}
