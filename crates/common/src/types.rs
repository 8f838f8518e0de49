use serde::{Deserialize, Serialize};

/// Opaque handle to a mesh uploaded by the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u64);

/// Opaque handle to a compiled shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShaderHandle(pub u64);

/// Size of the drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. A zero height is treated as one pixel.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Center of the viewport in pixel coordinates.
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio() {
        let vp = Viewport::new(1600, 900);
        assert!((vp.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn zero_height_does_not_divide_by_zero() {
        let vp = Viewport::new(640, 0);
        assert_eq!(vp.aspect_ratio(), 640.0);
    }

    #[test]
    fn center_is_half_extent() {
        let vp = Viewport::default();
        assert_eq!(vp.center(), glam::Vec2::new(400.0, 300.0));
    }

    #[test]
    fn handles_are_ordered() {
        assert!(MeshHandle(1) < MeshHandle(2));
        assert_ne!(ShaderHandle(0), ShaderHandle(1));
    }
}
