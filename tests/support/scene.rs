use std::collections::HashMap;

use selection_history::history::{
    ObjectId, ObjectInfo, ScenePlacement, SceneHost, structural_path,
};

/// Minimal editor stand-in: a flat object table plus a queued
/// selection-changed notification.
#[derive(Default)]
pub struct StubEditor {
    objects: HashMap<ObjectId, ObjectInfo>,
    selection: Option<ObjectId>,
    pending: Vec<Option<ObjectId>>,
    next_id: u64,
}

impl StubEditor {
    pub fn spawn_asset(&mut self, name: &str) -> ObjectId {
        self.insert(name, None)
    }

    pub fn spawn_node(&mut self, container: &str, hierarchy: &[&str]) -> ObjectId {
        let name = hierarchy.last().copied().unwrap_or_default();
        self.insert(
            name,
            Some(ScenePlacement {
                container: container.to_string(),
                hierarchy: hierarchy.iter().map(|s| s.to_string()).collect(),
            }),
        )
    }

    /// Drop every node of `container`, as unloading a scene does.
    pub fn unload(&mut self, container: &str) {
        self.objects.retain(|_, info| {
            info.placement
                .as_ref()
                .is_none_or(|placement| placement.container != container)
        });
    }

    pub fn delete(&mut self, id: ObjectId) {
        self.objects.remove(&id);
    }

    pub fn click(&mut self, id: Option<ObjectId>) -> Option<ObjectId> {
        self.selection = id;
        id
    }

    pub fn drain_notifications(&mut self) -> Vec<Option<ObjectId>> {
        std::mem::take(&mut self.pending)
    }

    fn insert(&mut self, name: &str, placement: Option<ScenePlacement>) -> ObjectId {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        let type_name = if placement.is_some() { "GameObject" } else { "Texture2D" };
        self.objects.insert(
            id,
            ObjectInfo {
                name: name.to_string(),
                type_name: type_name.to_string(),
                placement,
            },
        );
        id
    }
}

impl SceneHost for StubEditor {
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
        self.selection
    }

    fn set_active_selection(&mut self, id: Option<ObjectId>) {
        if self.selection != id {
            self.selection = id;
            self.pending.push(id);
        }
    }
}
