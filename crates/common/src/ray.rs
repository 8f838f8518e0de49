use glam::Vec3;

/// A half-line in world space, used for mouse picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Nearest hit in front of the origin with a sphere, if any.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<RayHit> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = -b - root;
        let far = -b + root;
        let t = if near >= 0.0 {
            near
        } else if far >= 0.0 {
            far
        } else {
            return None;
        };
        Some(RayHit::on_ray(self, t))
    }
}

/// Result of an intersection test performed by a picking collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub hit_point: Vec3,
}

impl RayHit {
    pub fn on_ray(ray: &Ray, distance: f32) -> Self {
        Self {
            distance,
            hit_point: ray.point_at(distance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn point_at_distance() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::X);
        assert!(ray.point_at(2.5).abs_diff_eq(Vec3::new(3.5, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn hit_on_ray() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let hit = RayHit::on_ray(&ray, 3.0);
        assert_eq!(hit.hit_point, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn sphere_hit_in_front() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let hit = ray.intersect_sphere(Vec3::new(0.0, 0.0, 5.0), 1.0).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert!(hit.hit_point.abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), 1e-5));
    }

    #[test]
    fn sphere_behind_or_beside_missed() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(ray.intersect_sphere(Vec3::new(0.0, 0.0, -5.0), 1.0).is_none());
        assert!(ray.intersect_sphere(Vec3::new(3.0, 0.0, 5.0), 1.0).is_none());
    }

    #[test]
    fn origin_inside_sphere_hits_far_side() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let hit = ray.intersect_sphere(Vec3::ZERO, 2.0).unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-5);
    }
}
