use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::component::Component;

/// Spatial state of an entity plus its cached world matrix.
///
/// Rotation is authored as Euler degrees and stored as the quaternion
/// `Rx * Ry * Rz`. The cached world matrix is valid iff `is_dirty()` is
/// false; every setter marks the transform dirty and the next
/// `EntityManager::update` recomputes it together with the whole subtree
/// below it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    local_translation: Vec3,
    local_scale: Vec3,
    local_rotation: Vec3,
    local_orientation: Quat,
    world_matrix: Mat4,
    dirty: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            local_translation: Vec3::ZERO,
            local_scale: Vec3::ONE,
            local_rotation: Vec3::ZERO,
            local_orientation: Quat::IDENTITY,
            world_matrix: Mat4::IDENTITY,
            dirty: true,
        }
    }
}

impl Component for Transform {}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a transform from translation, Euler degrees and scale.
    pub fn from_trs(translation: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Self {
        let mut transform = Self::new();
        transform.set_local_translation(translation);
        transform.set_local_rotation(rotation_degrees);
        transform.set_local_scale(scale);
        transform
    }

    pub fn local_translation(&self) -> Vec3 {
        self.local_translation
    }

    pub fn local_scale(&self) -> Vec3 {
        self.local_scale
    }

    /// Authored rotation in Euler degrees (X, Y, Z).
    pub fn local_rotation(&self) -> Vec3 {
        self.local_rotation
    }

    pub fn local_orientation(&self) -> Quat {
        self.local_orientation
    }

    pub fn set_local_translation(&mut self, translation: Vec3) {
        self.local_translation = translation;
        self.dirty = true;
    }

    pub fn set_local_scale(&mut self, scale: Vec3) {
        self.local_scale = scale;
        self.dirty = true;
    }

    /// Set the rotation from Euler degrees, applied as intrinsic X, then Y,
    /// then Z rotations.
    pub fn set_local_rotation(&mut self, degrees: Vec3) {
        self.local_rotation = degrees;
        self.local_orientation = Quat::from_euler(
            EulerRot::XYZ,
            degrees.x.to_radians(),
            degrees.y.to_radians(),
            degrees.z.to_radians(),
        );
        self.dirty = true;
    }

    /// Offset the local translation.
    pub fn translate(&mut self, delta: Vec3) {
        self.local_translation += delta;
        self.dirty = true;
    }

    /// Rotate by `angle` radians around `axis`, applied after the current
    /// orientation.
    pub fn rotate_around_axis(&mut self, axis: Vec3, angle: f32) {
        let rotation = Quat::from_axis_angle(axis.normalize_or_zero(), angle);
        self.local_orientation = (rotation * self.local_orientation).normalize();
        let (x, y, z) = self.local_orientation.to_euler(EulerRot::XYZ);
        self.local_rotation = Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees());
        self.dirty = true;
    }

    /// Restore identity translation and rotation and unit scale.
    pub fn reset(&mut self) {
        self.local_translation = Vec3::ZERO;
        self.local_scale = Vec3::ONE;
        self.local_rotation = Vec3::ZERO;
        self.local_orientation = Quat::IDENTITY;
        self.dirty = true;
    }

    /// `translation * rotation * scale`, computed fresh from local state.
    pub fn local_model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.local_scale,
            self.local_orientation,
            self.local_translation,
        )
    }

    /// Recompute the world matrix of a root entity.
    pub fn compute_model_matrix(&mut self) {
        self.world_matrix = self.local_model_matrix();
        self.dirty = false;
    }

    /// Recompute the world matrix below a parent whose world matrix is
    /// `parent_world`.
    pub fn compute_model_matrix_with_parent(&mut self, parent_world: Mat4) {
        self.world_matrix = parent_world * self.local_model_matrix();
        self.dirty = false;
    }

    /// Cached world matrix. Not recomputed here: stale until the next update
    /// pass after a mutation.
    pub fn world_model_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    pub fn world_translation(&self) -> Vec3 {
        self.world_matrix.w_axis.truncate()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transform_is_identity_and_dirty() {
        let t = Transform::new();
        assert_eq!(t.local_translation(), Vec3::ZERO);
        assert_eq!(t.local_scale(), Vec3::ONE);
        assert_eq!(t.local_orientation(), Quat::IDENTITY);
        assert_eq!(t.world_model_matrix(), Mat4::IDENTITY);
        assert!(t.is_dirty());
    }

    #[test]
    fn setters_mark_dirty() {
        let mut t = Transform::new();
        t.compute_model_matrix();
        assert!(!t.is_dirty());

        t.set_local_translation(Vec3::X);
        assert!(t.is_dirty());
        t.compute_model_matrix();

        t.set_local_scale(Vec3::splat(2.0));
        assert!(t.is_dirty());
        t.compute_model_matrix();

        t.set_local_rotation(Vec3::new(0.0, 45.0, 0.0));
        assert!(t.is_dirty());
        t.compute_model_matrix();

        t.translate(Vec3::Y);
        assert!(t.is_dirty());
    }

    #[test]
    fn local_matrix_is_translate_rotate_scale() {
        let mut t = Transform::new();
        t.set_local_translation(Vec3::new(1.0, 2.0, 3.0));
        t.set_local_scale(Vec3::splat(2.0));
        // Scale happens about the origin, then translation:
        // (1,0,0) -> (2,0,0) -> (3,2,3)
        let p = t.local_model_matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(3.0, 2.0, 3.0), 1e-6));
    }

    #[test]
    fn rotation_applies_before_translation() {
        let mut t = Transform::new();
        t.set_local_rotation(Vec3::new(0.0, 0.0, 90.0));
        t.set_local_translation(Vec3::new(10.0, 0.0, 0.0));
        let p = t.local_model_matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(10.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn euler_order_is_x_then_y_then_z() {
        let mut t = Transform::new();
        t.set_local_rotation(Vec3::new(30.0, 45.0, 60.0));
        let expected = Quat::from_rotation_x(30f32.to_radians())
            * Quat::from_rotation_y(45f32.to_radians())
            * Quat::from_rotation_z(60f32.to_radians());
        assert!(t.local_orientation().abs_diff_eq(expected, 1e-6));
        assert_eq!(t.local_rotation(), Vec3::new(30.0, 45.0, 60.0));
    }

    #[test]
    fn compute_with_parent_composes() {
        let mut t = Transform::new();
        t.set_local_translation(Vec3::new(1.0, 0.0, 0.0));
        let parent = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
        t.compute_model_matrix_with_parent(parent);
        assert!(!t.is_dirty());
        assert!(t.world_translation().abs_diff_eq(Vec3::new(6.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn world_matrix_is_stale_until_recomputed() {
        let mut t = Transform::new();
        t.set_local_translation(Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(t.world_model_matrix(), Mat4::IDENTITY);
        t.compute_model_matrix();
        assert!(t.world_translation().abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut t = Transform::from_trs(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(10.0, 20.0, 30.0),
            Vec3::splat(4.0),
        );
        t.compute_model_matrix();
        t.reset();
        assert_eq!(t.local_translation(), Vec3::ZERO);
        assert_eq!(t.local_scale(), Vec3::ONE);
        assert_eq!(t.local_rotation(), Vec3::ZERO);
        assert_eq!(t.local_orientation(), Quat::IDENTITY);
        assert!(t.is_dirty());
    }

    #[test]
    fn rotate_around_axis_accumulates() {
        let mut t = Transform::new();
        t.rotate_around_axis(Vec3::Y, std::f32::consts::FRAC_PI_2);
        t.rotate_around_axis(Vec3::Y, std::f32::consts::FRAC_PI_2);
        let p = t.local_model_matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::NEG_X, 1e-5));
        assert!(t.is_dirty());
    }
}
