use glam::{Mat4, Vec2};
use lumen_common::{Ray, Viewport};
use lumen_render::RenderBackend;
use slotmap::SlotMap;

use crate::camera::Camera;
use crate::component::Component;
use crate::context::{CameraView, FrameContext, RenderContext};
use crate::entity::{Entity, EntityBuilder, EntityId};
use crate::error::SceneError;
use crate::transform::Transform;

/// Owns every entity of a scene and drives the per-frame traversals.
///
/// Entities live in a generational arena; the tree is expressed through ids.
/// Roots keep insertion order, children keep attach order.
#[derive(Debug, Default)]
pub struct EntityManager {
    entities: SlotMap<EntityId, Entity>,
    roots: Vec<EntityId>,
    main_camera: Option<EntityId>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize `builder` (and its subtree) as a new root.
    pub fn add_entity(&mut self, builder: EntityBuilder) -> EntityId {
        let id = self.materialize(builder, None);
        self.roots.push(id);
        id
    }

    /// Shorthand for a root with only a transform.
    pub fn spawn(&mut self, name: impl Into<String>) -> EntityId {
        self.add_entity(EntityBuilder::new(name))
    }

    /// Materialize `builder` as the last child of `parent`.
    pub fn add_child(
        &mut self,
        parent: EntityId,
        builder: EntityBuilder,
    ) -> Result<EntityId, SceneError> {
        if !self.entities.contains_key(parent) {
            return Err(SceneError::EntityNotFound(parent));
        }
        let id = self.materialize(builder, Some(parent));
        if let Some(entity) = self.entities.get_mut(parent) {
            entity.children.push(id);
        }
        Ok(id)
    }

    pub fn spawn_child(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
    ) -> Result<EntityId, SceneError> {
        self.add_child(parent, EntityBuilder::new(name))
    }

    fn materialize(&mut self, builder: EntityBuilder, parent: Option<EntityId>) -> EntityId {
        let EntityBuilder {
            name,
            transform,
            components,
            children,
        } = builder;
        let id = self
            .entities
            .insert_with_key(|id| Entity::new(id, name, parent, transform));
        if let Some(entity) = self.entities.get_mut(id) {
            tracing::debug!(entity = %entity.name(), ?id, ?parent, "entity created");
            for slot in components {
                entity.attach(slot);
            }
        }
        for child in children {
            let child_id = self.materialize(child, Some(id));
            if let Some(entity) = self.entities.get_mut(id) {
                entity.children.push(child_id);
            }
        }
        id
    }

    /// Destroy `id` and its whole subtree. Returns how many entities were
    /// destroyed (0 if `id` does not exist).
    pub fn remove_entity(&mut self, id: EntityId) -> usize {
        let Some(entity) = self.entities.get(id) else {
            return 0;
        };
        match entity.parent() {
            Some(parent) => {
                if let Some(parent) = self.entities.get_mut(parent) {
                    parent.children.retain(|&child| child != id);
                }
            }
            None => self.roots.retain(|&root| root != id),
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(entity) = self.entities.remove(current) {
                tracing::debug!(entity = %entity.name(), id = ?current, "entity destroyed");
                stack.extend(entity.children.iter().copied());
                removed += 1;
            }
        }
        if self
            .main_camera
            .is_some_and(|camera| !self.entities.contains_key(camera))
        {
            self.main_camera = None;
        }
        removed
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn transform_mut(&mut self, id: EntityId) -> Option<&mut Transform> {
        self.entities.get_mut(id).map(Entity::transform_mut)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.entities.get(id).map_or(&[][..], Entity::children)
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entities.get(id).and_then(Entity::parent)
    }

    /// Total number of entities, nested ones included.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of ancestors of `id`. Roots have depth 0.
    pub fn depth(&self, id: EntityId) -> Option<usize> {
        let mut entity = self.entities.get(id)?;
        let mut depth = 0;
        while let Some(parent) = entity.parent().and_then(|p| self.entities.get(p)) {
            entity = parent;
            depth += 1;
        }
        Some(depth)
    }

    /// Cached world matrix of `id`. Stale if the entity changed since the
    /// last `update`.
    pub fn world_matrix(&self, id: EntityId) -> Option<Mat4> {
        self.entities
            .get(id)
            .map(|entity| entity.transform().world_model_matrix())
    }

    /// Pre-order traversal of the whole tree, roots in order.
    pub fn iter(&self) -> DepthFirst<'_> {
        DepthFirst {
            manager: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// First root named `name`. Nested entities are not searched.
    pub fn get_entity_by_name(&self, name: &str) -> Option<EntityId> {
        self.roots
            .iter()
            .copied()
            .find(|&id| self.entities.get(id).is_some_and(|e| e.name() == name))
    }

    /// First entity named `name` in depth-first order, nested ones included.
    pub fn find_entity_by_name(&self, name: &str) -> Option<EntityId> {
        self.iter().find(|e| e.name() == name).map(Entity::id)
    }

    /// First root carrying a component of type `T`.
    pub fn get_entity_by_type<T: Component>(&self) -> Option<EntityId> {
        self.roots
            .iter()
            .copied()
            .find(|&id| self.entities.get(id).is_some_and(Entity::has_component::<T>))
    }

    /// Designate the camera the scene is rendered from.
    pub fn set_main_camera(&mut self, id: EntityId) -> Result<(), SceneError> {
        if !self.entities.contains_key(id) {
            return Err(SceneError::EntityNotFound(id));
        }
        self.main_camera = Some(id);
        Ok(())
    }

    /// The designated camera entity if it still carries a `Camera`, otherwise
    /// the first root that does.
    pub fn main_camera(&self) -> Option<EntityId> {
        self.main_camera
            .filter(|&id| {
                self.entities
                    .get(id)
                    .is_some_and(Entity::has_component::<Camera>)
            })
            .or_else(|| self.get_entity_by_type::<Camera>())
    }

    /// View, cached projection and eye of the main camera.
    pub fn main_camera_view(&self) -> Option<CameraView> {
        let entity = self.entities.get(self.main_camera()?)?;
        let camera = entity.get_component::<Camera>()?;
        Some(camera.view(entity.transform().world_translation()))
    }

    /// Picking ray from the main camera through a pixel of `viewport`.
    pub fn screen_point_to_ray(&self, screen: Vec2, viewport: Viewport) -> Option<Ray> {
        let entity = self.entities.get(self.main_camera()?)?;
        let camera = entity.get_component::<Camera>()?;
        Some(camera.screen_point_to_ray(screen, viewport, entity.transform().world_translation()))
    }

    /// Run one frame of component updates and refresh stale world matrices.
    pub fn update(&mut self, frame: &FrameContext<'_>, delta_time: f32) {
        let _span = tracing::trace_span!("scene_update", entities = self.entities.len()).entered();
        for root in self.roots.clone() {
            self.update_entity(root, frame, delta_time);
        }
    }

    fn update_entity(&mut self, id: EntityId, frame: &FrameContext<'_>, delta_time: f32) {
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        entity.update_components(frame, delta_time);
        self.refresh_transforms(id);
        for child in self.children(id).to_vec() {
            self.update_entity(child, frame, delta_time);
        }
    }

    /// Find the topmost dirty transforms below (and including) `id` and
    /// recompute their subtrees.
    fn refresh_transforms(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get(id) else {
            return;
        };
        if entity.transform().is_dirty() {
            self.recompute_subtree(id);
        } else {
            for child in entity.children.clone() {
                self.refresh_transforms(child);
            }
        }
    }

    /// Recompute `id` from its parent's world matrix and force every
    /// descendant to follow, dirty or not.
    fn recompute_subtree(&mut self, id: EntityId) {
        let parent_world = self.parent(id).and_then(|parent| self.world_matrix(parent));
        let mut stack = vec![(id, parent_world)];
        while let Some((current, parent_world)) = stack.pop() {
            let Some(entity) = self.entities.get_mut(current) else {
                continue;
            };
            let transform = entity.transform_mut();
            match parent_world {
                Some(parent_world) => transform.compute_model_matrix_with_parent(parent_world),
                None => transform.compute_model_matrix(),
            }
            let world = transform.world_model_matrix();
            stack.extend(entity.children.iter().map(|&child| (child, Some(world))));
        }
    }

    /// Issue draw calls for every active component, seen from the main
    /// camera. World matrices are drawn as the last `update` left them.
    pub fn render(&self, backend: &mut dyn RenderBackend) {
        let _span = tracing::trace_span!("scene_render", entities = self.entities.len()).entered();
        let mut frame = RenderContext::new(backend, self.main_camera_view());
        for &root in &self.roots {
            self.render_entity(root, &mut frame);
        }
    }

    fn render_entity(&self, id: EntityId, frame: &mut RenderContext<'_>) {
        let Some(entity) = self.entities.get(id) else {
            return;
        };
        entity.render_components(frame);
        for &child in entity.children() {
            self.render_entity(child, frame);
        }
    }
}

/// Depth-first iterator returned by `EntityManager::iter`.
pub struct DepthFirst<'a> {
    manager: &'a EntityManager,
    stack: Vec<EntityId>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(entity) = self.manager.entities.get(id) {
                self.stack.extend(entity.children().iter().rev().copied());
                return Some(entity);
            }
        }
        None
    }
}
