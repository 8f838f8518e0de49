use crate::entity::EntityId;

/// Structural errors from scene operations.
///
/// Absence (a missing component, a missing named entity, no camera) is never
/// an error; lookups return `Option` so per-frame traversal stays error free.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("component of type {0} already exists on this entity")]
    ComponentAlreadyExists(&'static str),
    #[error("component slot does not hold a {0}")]
    ComponentDowncast(&'static str),
    #[error("the Transform component cannot be removed")]
    TransformNotRemovable,
    #[error("entity {0:?} not found")]
    EntityNotFound(EntityId),
    #[error("invalid scene description: {0}")]
    Description(#[from] serde_json::Error),
}
