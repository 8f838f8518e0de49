use std::any::{Any, TypeId};

use crate::context::{FrameContext, RenderContext};
use crate::entity::EntityId;
use crate::transform::Transform;

/// Downcast support for component trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The owning entity as seen from inside a component hook.
///
/// Components never hold references to their entity; the owner id and its
/// transform are lent to them for the duration of each call.
pub struct ComponentContext<'a> {
    pub entity: EntityId,
    pub transform: &'a mut Transform,
}

/// A behavior unit attached to exactly one entity.
///
/// `initialize` runs once when the component is attached. `update` and
/// `render` run once per frame, in registration order, while the component
/// is active.
pub trait Component: AsAny {
    fn initialize(&mut self, _owner: &mut ComponentContext<'_>) {}

    fn update(
        &mut self,
        _owner: &mut ComponentContext<'_>,
        _frame: &FrameContext<'_>,
        _delta_time: f32,
    ) {
    }

    fn render(&self, _entity: EntityId, _transform: &Transform, _frame: &mut RenderContext<'_>) {}
}

/// Registry entry: a component instance keyed by its concrete type.
pub(crate) struct ComponentSlot {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) active: bool,
    pub(crate) component: Box<dyn Component>,
}

impl ComponentSlot {
    pub(crate) fn new<T: Component>(component: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            active: true,
            component: Box::new(component),
        }
    }

    pub(crate) fn is<T: Component>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub(crate) fn downcast_ref<T: Component>(&self) -> Option<&T> {
        AsAny::as_any(&*self.component).downcast_ref::<T>()
    }

    pub(crate) fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        AsAny::as_any_mut(&mut *self.component).downcast_mut::<T>()
    }

    /// Type name without its module path.
    pub(crate) fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }
}

/// `a::Wrapper<b::Inner>` becomes `Wrapper`; generic arguments are dropped.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Spinner {
        turns: u32,
    }

    impl Component for Spinner {}

    struct Other;

    impl Component for Other {}

    #[test]
    fn slot_downcasts_to_concrete_type() {
        let mut slot = ComponentSlot::new(Spinner { turns: 3 });
        assert!(slot.is::<Spinner>());
        assert!(!slot.is::<Other>());
        assert_eq!(slot.downcast_ref::<Spinner>().unwrap().turns, 3);
        assert!(slot.downcast_ref::<Other>().is_none());

        slot.downcast_mut::<Spinner>().unwrap().turns = 5;
        assert_eq!(slot.downcast_ref::<Spinner>().unwrap().turns, 5);
    }

    #[test]
    fn new_slot_is_active() {
        let slot = ComponentSlot::new(Other);
        assert!(slot.active);
    }

    #[test]
    fn short_name_strips_module_path() {
        let slot = ComponentSlot::new(Spinner::default());
        assert_eq!(slot.short_name(), "Spinner");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    struct Wrapper<T>(T);

    impl<T: 'static> Component for Wrapper<T> {}

    #[test]
    fn short_name_drops_generic_arguments() {
        assert_eq!(short_type_name("a::Wrapper<b::Bar>"), "Wrapper");
        assert_eq!(short_type_name("a::Pair<b::X, c::Y<d::Z>>"), "Pair");
        let slot = ComponentSlot::new(Wrapper(Spinner::default()));
        assert_eq!(slot.short_name(), "Wrapper");
    }
}
