use crate::entity::{Entity, EntityId};
use crate::manager::EntityManager;

/// Scene inspector for developer tooling.
///
/// Read-only queries against a scene for debugging and CLI output.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene state.
    pub fn summary(scene: &EntityManager) -> SceneSummary {
        SceneSummary {
            entity_count: scene.len(),
            root_count: scene.roots().len(),
            dirty_count: scene.iter().filter(|e| e.transform().is_dirty()).count(),
            main_camera: scene
                .main_camera()
                .and_then(|id| scene.entity(id))
                .map(|e| e.name().to_owned()),
        }
    }

    pub fn inspect_entity(scene: &EntityManager, id: EntityId) -> Option<EntityInfo> {
        let entity = scene.entity(id)?;
        Some(EntityInfo::new(entity, scene.depth(id)?))
    }

    /// Every entity in depth-first order.
    pub fn list_entities(scene: &EntityManager) -> Vec<EntityInfo> {
        scene
            .iter()
            .filter_map(|e| Self::inspect_entity(scene, e.id()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub entity_count: usize,
    pub root_count: usize,
    /// Entities whose world matrix is stale.
    pub dirty_count: usize,
    pub main_camera: Option<String>,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: entities={} roots={} dirty={} camera={}",
            self.entity_count,
            self.root_count,
            self.dirty_count,
            self.main_camera.as_deref().unwrap_or("none"),
        )
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: String,
    pub depth: usize,
    pub translation: [f32; 3],
    /// Euler degrees.
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub world_translation: [f32; 3],
    pub components: Vec<&'static str>,
}

impl EntityInfo {
    fn new(entity: &Entity, depth: usize) -> Self {
        let t = entity.transform();
        Self {
            id: entity.id(),
            name: entity.name().to_owned(),
            depth,
            translation: t.local_translation().to_array(),
            rotation: t.local_rotation().to_array(),
            scale: t.local_scale().to_array(),
            world_translation: t.world_translation().to_array(),
            components: entity.component_names(),
        }
    }
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x, y, z] = self.world_translation;
        let [sx, sy, sz] = self.scale;
        write!(
            f,
            "{:indent$}{} world=({x:.2}, {y:.2}, {z:.2}) scale=({sx:.2}, {sy:.2}, {sz:.2}) [{}]",
            "",
            self.name,
            self.components.join(", "),
            indent = self.depth * 2,
        )
    }
}
