use glam::{Mat4, Vec3};
use lumen_common::{MeshHandle, ShaderHandle};
use std::fmt;

/// Renderer-agnostic interface. All backends implement this trait.
///
/// Uniform setters apply to the most recently bound shader.
pub trait RenderBackend {
    fn bind_shader(&mut self, shader: ShaderHandle);

    fn set_uniform_mat4(&mut self, name: &str, value: Mat4);

    fn set_uniform_vec3(&mut self, name: &str, value: Vec3);

    /// Draw a mesh with the bound shader and uniforms.
    fn draw_mesh(&mut self, mesh: MeshHandle);
}

/// A single command received by a `CommandRecorder`.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    BindShader(ShaderHandle),
    SetMat4 { name: String, value: Mat4 },
    SetVec3 { name: String, value: Vec3 },
    Draw(MeshHandle),
}

/// Headless backend that records commands instead of drawing.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<RenderCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Drain and return all recorded commands.
    pub fn drain(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::Draw(_)))
            .count()
    }

    /// Last value written to the named matrix uniform, if any.
    pub fn last_mat4(&self, uniform: &str) -> Option<Mat4> {
        self.commands.iter().rev().find_map(|c| match c {
            RenderCommand::SetMat4 { name, value } if name == uniform => Some(*value),
            _ => None,
        })
    }

    /// Last value written to the named vector uniform, if any.
    pub fn last_vec3(&self, uniform: &str) -> Option<Vec3> {
        self.commands.iter().rev().find_map(|c| match c {
            RenderCommand::SetVec3 { name, value } if name == uniform => Some(*value),
            _ => None,
        })
    }
}

impl RenderBackend for CommandRecorder {
    fn bind_shader(&mut self, shader: ShaderHandle) {
        self.commands.push(RenderCommand::BindShader(shader));
    }

    fn set_uniform_mat4(&mut self, name: &str, value: Mat4) {
        self.commands.push(RenderCommand::SetMat4 {
            name: name.to_owned(),
            value,
        });
    }

    fn set_uniform_vec3(&mut self, name: &str, value: Vec3) {
        self.commands.push(RenderCommand::SetVec3 {
            name: name.to_owned(),
            value,
        });
    }

    fn draw_mesh(&mut self, mesh: MeshHandle) {
        tracing::trace!(mesh = mesh.0, "draw");
        self.commands.push(RenderCommand::Draw(mesh));
    }
}

impl fmt::Display for CommandRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Frame ({} commands, {} draws) ===",
            self.commands.len(),
            self.draw_count()
        )?;
        for command in &self.commands {
            match command {
                RenderCommand::BindShader(s) => writeln!(f, "  bind shader #{}", s.0)?,
                RenderCommand::SetMat4 { name, value } => {
                    let t = value.w_axis;
                    writeln!(
                        f,
                        "  mat4 {name}: translation=({:.2}, {:.2}, {:.2})",
                        t.x, t.y, t.z
                    )?;
                }
                RenderCommand::SetVec3 { name, value } => writeln!(
                    f,
                    "  vec3 {name}: ({:.2}, {:.2}, {:.2})",
                    value.x, value.y, value.z
                )?,
                RenderCommand::Draw(m) => writeln!(f, "  draw mesh #{}", m.0)?,
            }
        }
        Ok(())
    }
}
