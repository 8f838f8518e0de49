use glam::{Mat4, Vec2, Vec3};
use lumen_common::{Ray, Viewport};
use lumen_input::{InputSource, Key, MouseButton};
use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentContext};
use crate::context::{CameraView, FrameContext};
use crate::transform::Transform;

/// Pitch limit in degrees. At ±90° the front vector becomes parallel to the
/// world up axis and the basis flips.
pub const MAX_PITCH: f32 = 89.9;

const WORLD_UP: Vec3 = Vec3::Y;

/// Tunable camera parameters. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Degrees per pixel of cursor motion.
    pub sensitivity: f32,
    /// Units per second.
    pub speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: 60.0,
            near: 0.01,
            far: 1000.0,
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 0.1,
            speed: 15.0,
        }
    }
}

/// Keys driving the six movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementKeys {
    pub front: Key,
    pub back: Key,
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
}

impl Default for MovementKeys {
    fn default() -> Self {
        Self {
            front: Key::W,
            back: Key::S,
            left: Key::A,
            right: Key::D,
            up: Key::E,
            down: Key::Q,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraDirection {
    Front,
    Back,
    Left,
    Right,
    Up,
    Down,
}

/// Perspective projection with OpenGL depth conventions (NDC z in [-1, 1]).
pub fn compute_projection(fov_degrees: f32, viewport: Viewport, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov_degrees.to_radians(), viewport.aspect_ratio(), near, far)
}

/// Fly camera driven by polled mouse and keyboard input.
///
/// The camera position is the world translation of its owning entity;
/// movement translates that entity.
#[derive(Debug, Clone)]
pub struct Camera {
    yaw: f32,
    /// Always within `[-MAX_PITCH, MAX_PITCH]`.
    pitch: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub speed: f32,
    pub keys: MovementKeys,
    /// Mouse look is active while this button is held.
    pub rotate_button: MouseButton,
    projection: Mat4,
    previous_cursor: Option<Vec2>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_settings(CameraSettings::default())
    }
}

impl Camera {
    pub fn from_settings(settings: CameraSettings) -> Self {
        Self {
            yaw: settings.yaw,
            pitch: settings.pitch.clamp(-MAX_PITCH, MAX_PITCH),
            fov: settings.fov,
            near: settings.near,
            far: settings.far,
            sensitivity: settings.sensitivity,
            speed: settings.speed,
            keys: MovementKeys::default(),
            rotate_button: MouseButton::Right,
            projection: compute_projection(
                settings.fov,
                Viewport::default(),
                settings.near,
                settings.far,
            ),
            previous_cursor: None,
        }
    }

    pub fn settings(&self) -> CameraSettings {
        CameraSettings {
            fov: self.fov,
            near: self.near,
            far: self.far,
            yaw: self.yaw,
            pitch: self.pitch,
            sensitivity: self.sensitivity,
            speed: self.speed,
        }
    }

    /// Yaw in degrees.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn set_yaw(&mut self, degrees: f32) {
        self.yaw = degrees;
    }

    /// Pitch in degrees. Positive pitch looks down.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Set the pitch, clamped to `[-MAX_PITCH, MAX_PITCH]`.
    pub fn set_pitch(&mut self, degrees: f32) {
        self.pitch = degrees.clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Orthonormal `(front, right, up)` basis from yaw and pitch.
    pub fn direction_vectors(&self) -> (Vec3, Vec3, Vec3) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        let front = Vec3::new(
            pitch.cos() * -yaw.sin(),
            -pitch.sin(),
            pitch.cos() * yaw.cos(),
        );
        let right = front.cross(WORLD_UP).normalize();
        let up = right.cross(front).normalize();
        (front, right, up)
    }

    pub fn front(&self) -> Vec3 {
        self.direction_vectors().0
    }

    /// Look-at matrix from `eye` along the camera's front vector.
    pub fn view_matrix(&self, eye: Vec3) -> Mat4 {
        let (front, _, up) = self.direction_vectors();
        Mat4::look_at_rh(eye, eye + front, up)
    }

    /// Projection cached by the last `update` for the input source's
    /// viewport (or the default viewport before the first one).
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn update_projection(&mut self, viewport: Viewport) {
        self.projection = compute_projection(self.fov, viewport, self.near, self.far);
    }

    /// View and cached projection seen from `eye`.
    pub fn view(&self, eye: Vec3) -> CameraView {
        CameraView {
            view: self.view_matrix(eye),
            projection: self.projection,
            eye,
        }
    }

    /// Add a cursor delta (in pixels) to yaw and pitch.
    pub fn rotate(&mut self, cursor_delta: Vec2) {
        let delta = cursor_delta * self.sensitivity;
        self.yaw += delta.x;
        self.set_pitch(self.pitch + delta.y);
    }

    /// Mouse look: rotate by the cursor motion since the previous call.
    ///
    /// The first call after `reset` only records the cursor position.
    pub fn rotate_by_mouse(&mut self, input: &dyn InputSource) {
        let current = input.cursor_position();
        let previous = self.previous_cursor.unwrap_or(current);
        self.rotate(current - previous);
        self.previous_cursor = Some(current);
    }

    /// Forget the previous cursor position so the next mouse-look press does
    /// not apply a jump.
    pub fn reset(&mut self) {
        self.previous_cursor = None;
    }

    pub fn previous_cursor(&self) -> Option<Vec2> {
        self.previous_cursor
    }

    /// Translate `transform` for every held movement key.
    pub fn animate(&self, input: &dyn InputSource, transform: &mut Transform, delta_time: f32) {
        let bindings = [
            (self.keys.front, CameraDirection::Front),
            (self.keys.back, CameraDirection::Back),
            (self.keys.left, CameraDirection::Left),
            (self.keys.right, CameraDirection::Right),
            (self.keys.up, CameraDirection::Up),
            (self.keys.down, CameraDirection::Down),
        ];
        for (key, direction) in bindings {
            if input.is_key_down(key) {
                self.translate(direction, transform, delta_time);
            }
        }
    }

    pub fn translate(&self, direction: CameraDirection, transform: &mut Transform, delta_time: f32) {
        let (front, right, up) = self.direction_vectors();
        let axis = match direction {
            CameraDirection::Front => front,
            CameraDirection::Back => -front,
            CameraDirection::Left => -right,
            CameraDirection::Right => right,
            CameraDirection::Up => up,
            CameraDirection::Down => -up,
        };
        transform.translate(axis * self.speed * delta_time);
    }

    /// World-space picking ray through a pixel.
    ///
    /// The pixel is mapped to normalized device coordinates (Y flipped, since
    /// screen Y grows downwards), unprojected at the far plane through the
    /// inverse of the cached view-projection, and joined to `eye`.
    /// `viewport` only maps pixels to NDC.
    pub fn screen_point_to_ray(&self, screen: Vec2, viewport: Viewport, eye: Vec3) -> Ray {
        let width = viewport.width.max(1) as f32;
        let height = viewport.height.max(1) as f32;
        let ndc = Vec2::new(2.0 * screen.x / width - 1.0, 2.0 * screen.y / height - 1.0);

        let inverse_view_projection = self.view(eye).view_projection().inverse();
        let world = inverse_view_projection.project_point3(Vec3::new(ndc.x, -ndc.y, 1.0));

        Ray::new(eye, world - eye)
    }
}

impl Component for Camera {
    fn initialize(&mut self, owner: &mut ComponentContext<'_>) {
        tracing::debug!(entity = ?owner.entity, yaw = self.yaw, pitch = self.pitch, "camera attached");
    }

    fn update(&mut self, owner: &mut ComponentContext<'_>, frame: &FrameContext<'_>, delta_time: f32) {
        if frame.input.is_mouse_button_down(self.rotate_button) {
            self.rotate_by_mouse(frame.input);
        } else {
            self.reset();
        }
        self.animate(frame.input, owner.transform, delta_time);
        self.update_projection(frame.input.viewport_size());
    }
}
