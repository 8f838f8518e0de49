use std::any::TypeId;

use crate::component::{AsAny, Component, ComponentContext, ComponentSlot};
use crate::context::{FrameContext, RenderContext};
use crate::error::SceneError;
use crate::transform::Transform;

slotmap::new_key_type! {
    /// Generational handle of an entity inside an `EntityManager`.
    ///
    /// Stale handles (entity destroyed) resolve to `None`, never to another
    /// entity.
    pub struct EntityId;
}

/// A node of the scene tree.
///
/// Owns its components. Children and parent are arena handles; the
/// `EntityManager` owns every entity. The transform is always present and is
/// reachable through `get_component::<Transform>()` like any other
/// component.
pub struct Entity {
    id: EntityId,
    name: String,
    parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    transform: Transform,
    components: Vec<ComponentSlot>,
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("components", &self.component_names())
            .finish()
    }
}

impl Entity {
    pub(crate) fn new(
        id: EntityId,
        name: String,
        parent: Option<EntityId>,
        transform: Transform,
    ) -> Self {
        Self {
            id,
            name,
            parent,
            children: Vec::new(),
            transform,
            components: Vec::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` for root entities.
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Attach a component and run its `initialize` hook.
    ///
    /// Fails with `ComponentAlreadyExists` if a component of the same
    /// concrete type is registered; the existing instance is left untouched.
    /// On success the returned reference points at the stored component.
    pub fn add_component<T: Component>(&mut self, component: T) -> Result<&mut T, SceneError> {
        let type_name = std::any::type_name::<T>();
        if self.has_component::<T>() {
            return Err(SceneError::ComponentAlreadyExists(type_name));
        }
        self.attach(ComponentSlot::new(component))
            .downcast_mut::<T>()
            .ok_or(SceneError::ComponentDowncast(type_name))
    }

    pub fn add_default_component<T: Component + Default>(&mut self) -> Result<&mut T, SceneError> {
        self.add_component(T::default())
    }

    pub(crate) fn attach(&mut self, mut slot: ComponentSlot) -> &mut ComponentSlot {
        let mut owner = ComponentContext {
            entity: self.id,
            transform: &mut self.transform,
        };
        slot.component.initialize(&mut owner);
        tracing::debug!(
            entity = %self.name,
            component = slot.short_name(),
            "component attached"
        );
        let index = self.components.len();
        self.components.push(slot);
        &mut self.components[index]
    }

    pub fn get_component<T: Component>(&self) -> Option<&T> {
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            return self.transform.as_any().downcast_ref::<T>();
        }
        self.components
            .iter()
            .find(|slot| slot.is::<T>())
            .and_then(ComponentSlot::downcast_ref::<T>)
    }

    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            return self.transform.as_any_mut().downcast_mut::<T>();
        }
        self.components
            .iter_mut()
            .find(|slot| slot.is::<T>())
            .and_then(ComponentSlot::downcast_mut::<T>)
    }

    pub fn has_component<T: Component>(&self) -> bool {
        TypeId::of::<T>() == TypeId::of::<Transform>()
            || self.components.iter().any(ComponentSlot::is::<T>)
    }

    /// Detach and drop the component of type `T`.
    ///
    /// Returns whether a component was removed. The transform cannot be
    /// removed.
    pub fn remove_component<T: Component>(&mut self) -> Result<bool, SceneError> {
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            return Err(SceneError::TransformNotRemovable);
        }
        let Some(index) = self.components.iter().position(ComponentSlot::is::<T>) else {
            return Ok(false);
        };
        let slot = self.components.remove(index);
        tracing::debug!(
            entity = %self.name,
            component = slot.short_name(),
            "component removed"
        );
        Ok(true)
    }

    /// Enable or disable per-frame hooks of `T`. Returns false if `T` is not
    /// registered.
    pub fn set_component_active<T: Component>(&mut self, active: bool) -> bool {
        match self.components.iter_mut().find(|slot| slot.is::<T>()) {
            Some(slot) => {
                slot.active = active;
                true
            }
            None => false,
        }
    }

    /// `None` if `T` is not registered. The transform is always active.
    pub fn is_component_active<T: Component>(&self) -> Option<bool> {
        if TypeId::of::<T>() == TypeId::of::<Transform>() {
            return Some(true);
        }
        self.components
            .iter()
            .find(|slot| slot.is::<T>())
            .map(|slot| slot.active)
    }

    /// Number of components, the transform included.
    pub fn component_count(&self) -> usize {
        self.components.len() + 1
    }

    /// Short type names in registration order, the transform first.
    pub fn component_names(&self) -> Vec<&'static str> {
        std::iter::once("Transform")
            .chain(self.components.iter().map(ComponentSlot::short_name))
            .collect()
    }

    pub(crate) fn update_components(&mut self, frame: &FrameContext<'_>, delta_time: f32) {
        let mut owner = ComponentContext {
            entity: self.id,
            transform: &mut self.transform,
        };
        for slot in self.components.iter_mut().filter(|slot| slot.active) {
            slot.component.update(&mut owner, frame, delta_time);
        }
    }

    pub(crate) fn render_components(&self, frame: &mut RenderContext<'_>) {
        for slot in self.components.iter().filter(|slot| slot.active) {
            slot.component.render(self.id, &self.transform, frame);
        }
    }
}

/// Detached description of an entity subtree, materialized by
/// `EntityManager::add_entity` or `EntityManager::add_child`.
///
/// Components are initialized when the subtree enters the manager, once the
/// owner id exists.
pub struct EntityBuilder {
    pub(crate) name: String,
    pub(crate) transform: Transform,
    pub(crate) components: Vec<ComponentSlot>,
    pub(crate) children: Vec<EntityBuilder>,
}

impl EntityBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::new(),
            components: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Queue a component. Fails on a second component of the same type,
    /// including `Transform`.
    pub fn with_component<T: Component>(mut self, component: T) -> Result<Self, SceneError> {
        let duplicate = TypeId::of::<T>() == TypeId::of::<Transform>()
            || self.components.iter().any(ComponentSlot::is::<T>);
        if duplicate {
            return Err(SceneError::ComponentAlreadyExists(std::any::type_name::<T>()));
        }
        self.components.push(ComponentSlot::new(component));
        Ok(self)
    }

    pub fn with_child(mut self, child: EntityBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use slotmap::SlotMap;

    #[derive(Debug, Default)]
    struct Counter {
        initialized: u32,
        value: i32,
    }

    impl Component for Counter {
        fn initialize(&mut self, owner: &mut ComponentContext<'_>) {
            self.initialized += 1;
            owner.transform.set_local_translation(Vec3::new(0.0, 1.0, 0.0));
        }
    }

    #[derive(Debug, Default)]
    struct Marker;

    impl Component for Marker {}

    fn entity(name: &str) -> Entity {
        let mut arena: SlotMap<EntityId, ()> = SlotMap::with_key();
        let id = arena.insert(());
        Entity::new(id, name.to_owned(), None, Transform::new())
    }

    #[test]
    fn every_entity_has_a_transform() {
        let e = entity("e");
        assert!(e.has_component::<Transform>());
        assert!(e.get_component::<Transform>().is_some());
        assert_eq!(e.component_count(), 1);
    }

    #[test]
    fn transform_cannot_be_removed_or_added() {
        let mut e = entity("e");
        assert!(matches!(
            e.remove_component::<Transform>(),
            Err(SceneError::TransformNotRemovable)
        ));
        assert!(matches!(
            e.add_component(Transform::new()),
            Err(SceneError::ComponentAlreadyExists(_))
        ));
        assert!(e.get_component::<Transform>().is_some());
    }

    #[test]
    fn add_runs_initialize_once_with_owner() {
        let mut e = entity("e");
        e.add_default_component::<Counter>().unwrap();
        let counter = e.get_component::<Counter>().unwrap();
        assert_eq!(counter.initialized, 1);
        assert_eq!(e.transform().local_translation(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn duplicate_component_rejected_first_kept() {
        let mut e = entity("e");
        e.add_component(Counter {
            value: 7,
            ..Default::default()
        })
        .unwrap();
        let err = e
            .add_component(Counter {
                value: 99,
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, SceneError::ComponentAlreadyExists(_)));
        assert_eq!(e.get_component::<Counter>().unwrap().value, 7);
        assert_eq!(e.component_count(), 2);
    }

    #[test]
    fn missing_component_is_none() {
        let e = entity("e");
        assert!(e.get_component::<Counter>().is_none());
        assert!(!e.has_component::<Counter>());
    }

    #[test]
    fn remove_component() {
        let mut e = entity("e");
        e.add_default_component::<Marker>().unwrap();
        assert!(e.remove_component::<Marker>().unwrap());
        assert!(!e.has_component::<Marker>());
        // Removing again is a no-op.
        assert!(!e.remove_component::<Marker>().unwrap());
    }

    #[test]
    fn get_component_mut_edits_in_place() {
        let mut e = entity("e");
        e.add_default_component::<Counter>().unwrap();
        e.get_component_mut::<Counter>().unwrap().value = 42;
        assert_eq!(e.get_component::<Counter>().unwrap().value, 42);

        e.get_component_mut::<Transform>()
            .unwrap()
            .set_local_scale(Vec3::splat(3.0));
        assert_eq!(e.transform().local_scale(), Vec3::splat(3.0));
    }

    #[test]
    fn component_names_in_registration_order() {
        let mut e = entity("e");
        e.add_default_component::<Marker>().unwrap();
        e.add_default_component::<Counter>().unwrap();
        assert_eq!(e.component_names(), ["Transform", "Marker", "Counter"]);
    }

    #[test]
    fn active_flag() {
        let mut e = entity("e");
        assert_eq!(e.is_component_active::<Marker>(), None);
        assert!(!e.set_component_active::<Marker>(false));

        e.add_default_component::<Marker>().unwrap();
        assert_eq!(e.is_component_active::<Marker>(), Some(true));
        assert!(e.set_component_active::<Marker>(false));
        assert_eq!(e.is_component_active::<Marker>(), Some(false));
        assert_eq!(e.is_component_active::<Transform>(), Some(true));
    }

    #[test]
    fn builder_rejects_duplicates() {
        let builder = EntityBuilder::new("b").with_component(Marker).unwrap();
        assert!(builder.with_component(Marker).is_err());
        assert!(
            EntityBuilder::new("t")
                .with_component(Transform::new())
                .is_err()
        );
    }

    #[test]
    fn add_component_returns_stored_instance() {
        let mut e = entity("e");
        let counter = e
            .add_component(Counter {
                value: 1,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(counter.initialized, 1);
        counter.value += 10;
        assert_eq!(e.get_component::<Counter>().unwrap().value, 11);

        e.add_default_component::<Marker>().unwrap();
        e.add_default_component::<Counter>().unwrap_err();
        assert_eq!(e.get_component::<Counter>().unwrap().value, 11);
        assert_eq!(e.component_count(), 3);
    }
}
