//! 2D and 3D cameras

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::sim::bodies::Ray;

/// Near clip distance for 3D projection
pub const NEAR: f32 = 0.1;
/// Far clip distance for 3D projection
pub const FAR: f32 = 1000.0;

/// Scrolling 2D camera: world point `target` appears at screen point `offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub target: Vec2,
    pub offset: Vec2,
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            target: Vec2::ZERO,
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera2D {
    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        (p - self.target) * self.zoom + self.offset
    }

    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        (p - self.offset) / self.zoom + self.target
    }

    /// Camera centred on `focus`, clamped so the view never leaves `world`
    ///
    /// A world narrower than the screen pins the target to the world centre.
    pub fn follow_clamped(focus: Vec2, screen: Vec2, world: Vec2) -> Self {
        let half = screen / 2.0;
        let clamp = |v: f32, lo: f32, hi: f32| if hi < lo { (lo + hi) / 2.0 } else { v.clamp(lo, hi) };
        Self {
            target: Vec2::new(
                clamp(focus.x, half.x, world.x - half.x),
                clamp(focus.y, half.y, world.y - half.y),
            ),
            offset: half,
            zoom: 1.0,
        }
    }
}

/// Perspective camera, y up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fovy: f32,
}

impl Camera3D {
    pub fn new(position: Vec3, target: Vec3, fovy: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fovy,
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy.to_radians(), aspect.max(1e-3), NEAR, FAR)
    }

    pub fn view_projection(&self, screen: Vec2) -> Mat4 {
        self.projection(screen.x / screen.y) * self.view()
    }

    /// Project a world point to screen pixels and depth
    ///
    /// Returns `None` for points behind the near plane.
    pub fn project(&self, p: Vec3, screen: Vec2) -> Option<Vec3> {
        clip_to_screen(self.view_projection(screen) * p.extend(1.0), screen)
    }

    /// World-space ray through a screen pixel
    pub fn ray_from_screen(&self, pixel: Vec2, screen: Vec2) -> Ray {
        let inv = self.view_projection(screen).inverse();
        let ndc = Vec2::new(pixel.x / screen.x * 2.0 - 1.0, 1.0 - pixel.y / screen.y * 2.0);
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        Ray::new(near, far - near)
    }
}

/// Perspective divide and viewport mapping; `None` when w is not positive
pub fn clip_to_screen(clip: Vec4, screen: Vec2) -> Option<Vec3> {
    if clip.w <= 1e-5 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec3::new(
        (ndc.x + 1.0) * 0.5 * screen.x,
        (1.0 - ndc.y) * 0.5 * screen.y,
        ndc.z,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera2d_round_trip() {
        let cam = Camera2D {
            target: Vec2::new(500.0, 300.0),
            offset: Vec2::new(400.0, 300.0),
            zoom: 2.0,
        };
        let s = cam.world_to_screen(Vec2::new(510.0, 290.0));
        assert_eq!(s, Vec2::new(420.0, 280.0));
        assert_eq!(cam.screen_to_world(s), Vec2::new(510.0, 290.0));
    }

    #[test]
    fn test_follow_clamped() {
        let screen = Vec2::new(800.0, 600.0);
        let world = Vec2::new(2000.0, 640.0);
        let cam = Camera2D::follow_clamped(Vec2::new(50.0, 600.0), screen, world);
        assert_eq!(cam.target, Vec2::new(400.0, 340.0));
        let cam = Camera2D::follow_clamped(Vec2::new(1900.0, 100.0), screen, world);
        assert_eq!(cam.target, Vec2::new(1600.0, 300.0));
    }

    #[test]
    fn test_project_target_is_screen_centre() {
        let cam = Camera3D::new(Vec3::new(20.0, 10.0, 20.0), Vec3::ZERO, 45.0);
        let screen = Vec2::new(1000.0, 700.0);
        let p = cam.project(Vec3::ZERO, screen).unwrap();
        assert!((p.x - 500.0).abs() < 0.01);
        assert!((p.y - 350.0).abs() < 0.01);
        // Behind the camera
        assert!(cam.project(Vec3::new(40.0, 20.0, 40.0), screen).is_none());
    }

    #[test]
    fn test_centre_ray_points_forward() {
        let cam = Camera3D::new(Vec3::new(0.0, 5.0, 20.0), Vec3::ZERO, 60.0);
        let screen = Vec2::new(1200.0, 800.0);
        let ray = cam.ray_from_screen(screen / 2.0, screen);
        assert!(ray.dir.dot(cam.forward()) > 0.999);
        assert!((ray.origin - cam.position).length() < 0.2);
    }
}
