//! Scene core: entity tree, typed components, transform propagation, camera.
//!
//! # Invariants
//! - Every entity has exactly one `Transform`; it cannot be added twice or
//!   removed.
//! - An entity holds at most one component per concrete type, kept in
//!   registration order.
//! - A transform's cached world matrix is valid iff it is not dirty. After
//!   `EntityManager::update`, no transform in the tree is dirty.
//! - The `EntityManager` owns every entity. Parent and child links are
//!   generational ids, so a destroyed entity is never reachable.

mod camera;
mod component;
mod context;
mod description;
mod entity;
mod error;
mod inspector;
mod manager;
mod mesh_renderer;
mod transform;

pub use camera::{
    Camera, CameraDirection, CameraSettings, MAX_PITCH, MovementKeys, compute_projection,
};
pub use component::{AsAny, Component, ComponentContext};
pub use context::{CameraView, FrameContext, RenderContext};
pub use description::{EntityDescription, SceneDescription};
pub use entity::{Entity, EntityBuilder, EntityId};
pub use error::SceneError;
pub use inspector::{EntityInfo, SceneInspector, SceneSummary};
pub use manager::{DepthFirst, EntityManager};
pub use mesh_renderer::MeshRenderer;
pub use transform::Transform;

pub fn crate_info() -> &'static str {
    concat!("lumen-scene v", env!("CARGO_PKG_VERSION"))
}
