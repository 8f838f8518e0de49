use glam::{Mat4, Vec3};
use lumen_input::InputSource;
use lumen_render::{RenderBackend, ResourceCache};

/// Collaborators available to components during `update`.
///
/// Passed explicitly by the frame driver each frame instead of being reached
/// through a global engine instance.
pub struct FrameContext<'a> {
    pub input: &'a dyn InputSource,
    pub resources: &'a dyn ResourceCache,
}

impl<'a> FrameContext<'a> {
    pub fn new(input: &'a dyn InputSource, resources: &'a dyn ResourceCache) -> Self {
        Self { input, resources }
    }
}

/// Matrices of the camera a frame is rendered from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub view: Mat4,
    pub projection: Mat4,
    /// Camera position in world space.
    pub eye: Vec3,
}

impl CameraView {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Collaborators available to components during `render`.
pub struct RenderContext<'a> {
    pub backend: &'a mut dyn RenderBackend,
    /// `None` when the scene has no camera.
    pub camera: Option<CameraView>,
}

impl<'a> RenderContext<'a> {
    pub fn new(backend: &'a mut dyn RenderBackend, camera: Option<CameraView>) -> Self {
        Self { backend, camera }
    }
}
