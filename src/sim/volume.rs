//! 3D axis-aligned boxes and minimum-penetration resolution

use glam::Vec3;

/// Axis-aligned box stored as centre and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    pub center: Vec3,
    pub half: Vec3,
}

impl Aabb3 {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    pub fn cube(center: Vec3, size: f32) -> Self {
        Self::new(center, Vec3::splat(size))
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.half
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.half * 2.0
    }

    /// Strict overlap on all three axes
    pub fn overlaps(&self, other: &Aabb3) -> bool {
        let (a0, a1) = (self.min(), self.max());
        let (b0, b1) = (other.min(), other.max());
        a1.x > b0.x && a0.x < b1.x && a1.y > b0.y && a0.y < b1.y && a1.z > b0.z && a0.z < b1.z
    }

    /// Penetration depth per axis, assuming the boxes overlap
    pub fn penetration(&self, other: &Aabb3) -> Vec3 {
        let (a0, a1) = (self.min(), self.max());
        let (b0, b1) = (other.min(), other.max());
        Vec3::new(
            (b1.x - a0.x).min(a1.x - b0.x),
            (b1.y - a0.y).min(a1.y - b0.y),
            (b1.z - a0.z).min(a1.z - b0.z),
        )
    }
}

/// Result of pushing a box out of a static obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Push {
    None,
    /// Pushed up onto the obstacle's top face
    Landed,
    /// Pushed down from the obstacle's bottom face
    Ceiling,
    Side,
}

/// Move `body` out of `obstacle` along the axis of least penetration
///
/// Ties prefer y, then x, then z. The push direction is away from the
/// obstacle's centre.
pub fn resolve_min_penetration(body: &mut Aabb3, obstacle: &Aabb3) -> Push {
    if !body.overlaps(obstacle) {
        return Push::None;
    }
    let pen = body.penetration(obstacle);
    let delta = obstacle.center - body.center;
    let least = pen.min_element();

    if pen.y == least {
        if delta.y < 0.0 {
            body.center.y += pen.y;
            Push::Landed
        } else {
            body.center.y -= pen.y;
            Push::Ceiling
        }
    } else if pen.x == least {
        body.center.x += if delta.x < 0.0 { pen.x } else { -pen.x };
        Push::Side
    } else {
        body.center.z += if delta.z < 0.0 { pen.z } else { -pen.z };
        Push::Side
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_strict() {
        let a = Aabb3::cube(Vec3::ZERO, 2.0);
        let b = Aabb3::cube(Vec3::new(2.0, 0.0, 0.0), 2.0);
        assert!(!a.overlaps(&b));
        let c = Aabb3::cube(Vec3::new(1.9, 0.5, -0.5), 2.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_land_on_top() {
        let obstacle = Aabb3::cube(Vec3::new(15.0, 1.5, -5.0), 3.0);
        let mut player = Aabb3::cube(Vec3::new(15.0, 3.8, -5.0), 2.0);
        assert_eq!(resolve_min_penetration(&mut player, &obstacle), Push::Landed);
        assert!((player.min().y - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_side_push_uses_center_delta() {
        let obstacle = Aabb3::cube(Vec3::new(0.0, 4.0, 0.0), 8.0);
        let mut player = Aabb3::cube(Vec3::new(-4.7, 1.0, 0.5), 2.0);
        assert_eq!(resolve_min_penetration(&mut player, &obstacle), Push::Side);
        assert!((player.max().x + 4.0).abs() < 0.001);
    }

    #[test]
    fn test_no_overlap_is_untouched() {
        let obstacle = Aabb3::cube(Vec3::ZERO, 2.0);
        let mut player = Aabb3::cube(Vec3::new(5.0, 0.0, 0.0), 2.0);
        let before = player;
        assert_eq!(resolve_min_penetration(&mut player, &obstacle), Push::None);
        assert_eq!(player, before);
    }
}
