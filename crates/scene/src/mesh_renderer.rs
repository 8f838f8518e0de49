use lumen_common::{MeshHandle, ShaderHandle};
use lumen_render::DEFAULT_SHADER;

use crate::component::{Component, ComponentContext};
use crate::context::{FrameContext, RenderContext};
use crate::entity::EntityId;
use crate::transform::Transform;

/// Draws one mesh with the owner's world matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRenderer {
    pub mesh: MeshHandle,
    pub shader: Option<ShaderHandle>,
    missing_shader_reported: bool,
}

impl MeshRenderer {
    pub fn new(mesh: MeshHandle) -> Self {
        Self {
            mesh,
            shader: None,
            missing_shader_reported: false,
        }
    }

    pub fn with_shader(mut self, shader: ShaderHandle) -> Self {
        self.shader = Some(shader);
        self
    }
}

impl Component for MeshRenderer {
    fn update(&mut self, owner: &mut ComponentContext<'_>, frame: &FrameContext<'_>, _delta_time: f32) {
        if self.shader.is_some() {
            return;
        }
        self.shader = frame.resources.shader(DEFAULT_SHADER);
        if self.shader.is_none() && !self.missing_shader_reported {
            tracing::warn!(
                entity = ?owner.entity,
                shader = DEFAULT_SHADER,
                "no shader available, mesh will not be drawn"
            );
            self.missing_shader_reported = true;
        }
    }

    fn render(&self, _entity: EntityId, transform: &Transform, frame: &mut RenderContext<'_>) {
        let Some(shader) = self.shader else {
            return;
        };
        let backend = &mut *frame.backend;
        backend.bind_shader(shader);
        backend.set_uniform_mat4("model", transform.world_model_matrix());
        if let Some(camera) = frame.camera {
            backend.set_uniform_mat4("view", camera.view);
            backend.set_uniform_mat4("projection", camera.projection);
            backend.set_uniform_vec3("eye", camera.eye);
        }
        backend.draw_mesh(self.mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CameraView;
    use glam::{Mat4, Vec3};
    use lumen_input::InputState;
    use lumen_render::{CommandRecorder, RenderCommand, ResourceRegistry};
    use slotmap::SlotMap;

    fn owner_id() -> EntityId {
        let mut arena: SlotMap<EntityId, ()> = SlotMap::with_key();
        arena.insert(())
    }

    fn run_update(renderer: &mut MeshRenderer, resources: &ResourceRegistry) {
        let input = InputState::default();
        let frame = FrameContext::new(&input, resources);
        let mut transform = Transform::new();
        let mut owner = ComponentContext {
            entity: owner_id(),
            transform: &mut transform,
        };
        renderer.update(&mut owner, &frame, 0.016);
    }

    #[test]
    fn resolves_default_shader() {
        let mut resources = ResourceRegistry::new();
        resources
            .register_shader(DEFAULT_SHADER, ShaderHandle(9))
            .unwrap();
        let mut renderer = MeshRenderer::new(MeshHandle(1));
        run_update(&mut renderer, &resources);
        assert_eq!(renderer.shader, Some(ShaderHandle(9)));
    }

    #[test]
    fn explicit_shader_is_kept() {
        let mut resources = ResourceRegistry::new();
        resources
            .register_shader(DEFAULT_SHADER, ShaderHandle(9))
            .unwrap();
        let mut renderer = MeshRenderer::new(MeshHandle(1)).with_shader(ShaderHandle(3));
        run_update(&mut renderer, &resources);
        assert_eq!(renderer.shader, Some(ShaderHandle(3)));
    }

    #[test]
    fn missing_shader_reported_once() {
        let resources = ResourceRegistry::new();
        let mut renderer = MeshRenderer::new(MeshHandle(1));
        run_update(&mut renderer, &resources);
        assert!(renderer.shader.is_none());
        assert!(renderer.missing_shader_reported);
        run_update(&mut renderer, &resources);
        assert!(renderer.missing_shader_reported);
    }

    #[test]
    fn render_without_shader_draws_nothing() {
        let renderer = MeshRenderer::new(MeshHandle(1));
        let mut recorder = CommandRecorder::new();
        let mut frame = RenderContext::new(&mut recorder, None);
        renderer.render(owner_id(), &Transform::new(), &mut frame);
        assert!(recorder.commands().is_empty());
    }

    #[test]
    fn render_sets_uniforms_and_draws() {
        let renderer = MeshRenderer::new(MeshHandle(4)).with_shader(ShaderHandle(2));
        let mut transform = Transform::new();
        transform.set_local_translation(Vec3::new(1.0, 2.0, 3.0));
        transform.compute_model_matrix();

        let camera = CameraView {
            view: Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)),
            projection: Mat4::IDENTITY,
            eye: Vec3::new(0.0, 0.0, 5.0),
        };
        let mut recorder = CommandRecorder::new();
        let mut frame = RenderContext::new(&mut recorder, Some(camera));
        renderer.render(owner_id(), &transform, &mut frame);

        assert_eq!(recorder.commands()[0], RenderCommand::BindShader(ShaderHandle(2)));
        assert_eq!(
            recorder.last_mat4("model"),
            Some(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)))
        );
        assert_eq!(recorder.last_mat4("view"), Some(camera.view));
        assert_eq!(recorder.last_mat4("projection"), Some(Mat4::IDENTITY));
        assert_eq!(recorder.last_vec3("eye"), Some(camera.eye));
        assert_eq!(recorder.draw_count(), 1);
    }

    #[test]
    fn render_without_camera_only_sets_model() {
        let renderer = MeshRenderer::new(MeshHandle(4)).with_shader(ShaderHandle(2));
        let mut recorder = CommandRecorder::new();
        let mut frame = RenderContext::new(&mut recorder, None);
        renderer.render(owner_id(), &Transform::new(), &mut frame);
        assert!(recorder.last_mat4("model").is_some());
        assert!(recorder.last_mat4("view").is_none());
        assert_eq!(recorder.draw_count(), 1);
    }

    #[test]
    fn every_recorded_command_comes_from_renderer_state() {
        let renderer = MeshRenderer::new(MeshHandle(5)).with_shader(ShaderHandle(6));
        let mut recorder = CommandRecorder::new();
        let mut frame = RenderContext::new(&mut recorder, None);
        renderer.render(owner_id(), &Transform::new(), &mut frame);
        assert_eq!(
            recorder.commands(),
            [
                RenderCommand::BindShader(ShaderHandle(6)),
                RenderCommand::SetMat4 {
                    name: "model".into(),
                    value: Mat4::IDENTITY,
                },
                RenderCommand::Draw(MeshHandle(5)),
            ]
        );
    }
}
