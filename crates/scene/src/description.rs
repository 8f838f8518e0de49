use glam::Vec3;
use lumen_common::MeshHandle;
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, CameraSettings};
use crate::entity::{EntityBuilder, EntityId};
use crate::error::SceneError;
use crate::manager::EntityManager;
use crate::mesh_renderer::MeshRenderer;
use crate::transform::Transform;

/// A serialized scene: a forest of entity descriptions.
///
/// ```json
/// { "entities": [
///     { "name": "camera", "translation": [0, 2, -10], "camera": { "fov": 70 } },
///     { "name": "cube", "mesh": 1, "children": [
///         { "name": "moon", "translation": [2, 0, 0], "scale": [0.3, 0.3, 0.3], "mesh": 2 }
///     ] }
/// ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub entities: Vec<EntityDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDescription {
    pub name: String,
    pub translation: Vec3,
    /// Euler angles in degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshHandle>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EntityDescription>,
}

impl Default for EntityDescription {
    fn default() -> Self {
        Self {
            name: String::new(),
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            camera: None,
            mesh: None,
            children: Vec::new(),
        }
    }
}

impl SceneDescription {
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add every described entity to `manager` as a root, in order.
    ///
    /// When the manager has no main camera yet, the first camera met in
    /// depth-first order becomes the main camera.
    pub fn instantiate(&self, manager: &mut EntityManager) -> Result<Vec<EntityId>, SceneError> {
        let had_camera = manager.main_camera().is_some();
        let mut roots = Vec::with_capacity(self.entities.len());
        for description in &self.entities {
            roots.push(manager.add_entity(description.to_builder()?));
        }
        if !had_camera {
            let scene: &EntityManager = manager;
            let first_camera = roots
                .iter()
                .flat_map(move |&root| SubtreeIds::new(scene, root))
                .find(|&id| {
                    scene
                        .entity(id)
                        .is_some_and(|entity| entity.has_component::<Camera>())
                });
            if let Some(camera) = first_camera {
                manager.set_main_camera(camera)?;
            }
        }
        tracing::debug!(roots = roots.len(), entities = manager.len(), "scene instantiated");
        Ok(roots)
    }
}

impl EntityDescription {
    pub fn to_builder(&self) -> Result<EntityBuilder, SceneError> {
        let transform = Transform::from_trs(self.translation, self.rotation, self.scale);
        let mut builder = EntityBuilder::new(self.name.clone()).with_transform(transform);
        if let Some(settings) = self.camera {
            builder = builder.with_component(Camera::from_settings(settings))?;
        }
        if let Some(mesh) = self.mesh {
            builder = builder.with_component(MeshRenderer::new(mesh))?;
        }
        for child in &self.children {
            builder = builder.with_child(child.to_builder()?);
        }
        Ok(builder)
    }
}

/// Ids of a subtree in pre-order.
struct SubtreeIds<'a> {
    manager: &'a EntityManager,
    stack: Vec<EntityId>,
}

impl<'a> SubtreeIds<'a> {
    fn new(manager: &'a EntityManager, root: EntityId) -> Self {
        Self {
            manager,
            stack: vec![root],
        }
    }
}

impl Iterator for SubtreeIds<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.manager.children(id).iter().rev().copied());
        Some(id)
    }
}
