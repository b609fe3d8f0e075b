//! Rigid spheres: impulse collisions, arena bounds and ray picking

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f32,
    pub mass: f32,
}

impl Body {
    pub fn new(pos: Vec3, radius: f32, mass: f32) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            radius,
            mass,
        }
    }

    #[inline]
    pub fn momentum(&self) -> Vec3 {
        self.vel * self.mass
    }
}

/// Mass of a unit-density sphere
#[inline]
pub fn sphere_mass(radius: f32) -> f32 {
    4.0 / 3.0 * std::f32::consts::PI * radius.powi(3)
}

/// Mass of a unit-density cube
#[inline]
pub fn cube_mass(size: f32) -> f32 {
    size.powi(3)
}

/// Separate two overlapping spheres and exchange an impulse along the normal
///
/// Each body moves half the overlap. Coincident centres use +X as the
/// normal. The impulse is only applied while the bodies approach each other.
/// Returns true if they were touching.
pub fn resolve_sphere_pair(a: &mut Body, b: &mut Body, restitution: f32) -> bool {
    let offset = b.pos - a.pos;
    let dist = offset.length();
    let sum = a.radius + b.radius;
    if dist >= sum {
        return false;
    }

    let n = if dist < 1e-4 { Vec3::X } else { offset / dist };
    let overlap = sum - dist;
    a.pos -= n * overlap * 0.5;
    b.pos += n * overlap * 0.5;

    let approach = (a.vel - b.vel).dot(n);
    if approach > 0.0 {
        let j = (1.0 + restitution) * approach / (1.0 / a.mass + 1.0 / b.mass);
        a.vel -= n * (j / a.mass);
        b.vel += n * (j / b.mass);
    }
    true
}

/// Bounce a body inside the cube `[-half, half]^3`
///
/// Returns true when the floor face was hit.
pub fn bounce_in_cube(body: &mut Body, extent: f32, half: f32, restitution: f32) -> bool {
    let mut floor = false;
    for axis in 0..3 {
        let p = body.pos[axis];
        if p + extent > half {
            body.pos[axis] = half - extent;
            body.vel[axis] = -body.vel[axis] * restitution;
        } else if p - extent < -half {
            body.pos[axis] = -half + extent;
            body.vel[axis] = -body.vel[axis] * restitution;
            floor |= axis == 1;
        }
    }
    floor
}

/// Mutable references to two distinct elements of a slice
pub fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    assert!(i < j, "pair_mut expects i < j");
    let (head, tail) = items.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Nearest positive hit distance along the ray, ignoring hits closer than 0.001
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let e = ray.origin - center;
    let a = ray.dir.dot(ray.dir);
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * ray.dir.dot(e);
    let c = e.dot(e) - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t1 = (-b - sq) / (2.0 * a);
    let t2 = (-b + sq) / (2.0 * a);
    [t1, t2]
        .into_iter()
        .filter(|t| *t > 0.001)
        .fold(None, |best: Option<f32>, t| Some(best.map_or(t, |b| b.min(t))))
}

/// Index and distance of the closest sphere hit by the ray
pub fn pick_closest<'a, I>(ray: &Ray, spheres: I) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = &'a Body>,
{
    spheres
        .into_iter()
        .enumerate()
        .filter_map(|(i, b)| ray_sphere(ray, b.pos, b.radius).map(|t| (i, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_masses() {
        assert!((sphere_mass(1.0) - 4.18879).abs() < 0.001);
        assert_eq!(cube_mass(2.0), 8.0);
    }

    #[test]
    fn test_head_on_equal_masses_elastic_swap() {
        let mut a = Body::new(Vec3::new(-0.9, 0.0, 0.0), 1.0, 1.0);
        let mut b = Body::new(Vec3::new(0.9, 0.0, 0.0), 1.0, 1.0);
        a.vel = Vec3::new(2.0, 0.0, 0.0);
        b.vel = Vec3::new(-2.0, 0.0, 0.0);
        assert!(resolve_sphere_pair(&mut a, &mut b, 1.0));
        assert!((a.vel.x + 2.0).abs() < 0.001);
        assert!((b.vel.x - 2.0).abs() < 0.001);
        assert!((b.pos - a.pos).length() >= 1.999);
    }

    #[test]
    fn test_separating_pair_keeps_velocity() {
        let mut a = Body::new(Vec3::new(-0.5, 0.0, 0.0), 1.0, 1.0);
        let mut b = Body::new(Vec3::new(0.5, 0.0, 0.0), 1.0, 1.0);
        a.vel = Vec3::new(-1.0, 0.0, 0.0);
        b.vel = Vec3::new(1.0, 0.0, 0.0);
        resolve_sphere_pair(&mut a, &mut b, 0.8);
        assert_eq!(a.vel.x, -1.0);
        assert_eq!(b.vel.x, 1.0);
    }

    #[test]
    fn test_coincident_centres_use_x_normal() {
        let mut a = Body::new(Vec3::ZERO, 1.0, 1.0);
        let mut b = Body::new(Vec3::ZERO, 1.0, 1.0);
        resolve_sphere_pair(&mut a, &mut b, 0.5);
        assert!((a.pos.x + 1.0).abs() < 0.001);
        assert!((b.pos.x - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_bounce_in_cube_floor() {
        let mut b = Body::new(Vec3::new(0.0, -14.8, 0.0), 0.5, 1.0);
        b.vel = Vec3::new(0.0, -10.0, 0.0);
        assert!(bounce_in_cube(&mut b, 0.5, 15.0, 0.85));
        assert_eq!(b.pos.y, -14.5);
        assert!((b.vel.y - 8.5).abs() < 0.001);
    }

    #[test]
    fn test_ray_sphere() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let t = ray_sphere(&ray, Vec3::ZERO, 2.0).unwrap();
        assert!((t - 8.0).abs() < 0.001);
        // Origin inside the sphere hits the far side
        let inside = Ray::new(Vec3::ZERO, Vec3::X);
        assert!((ray_sphere(&inside, Vec3::ZERO, 2.0).unwrap() - 2.0).abs() < 0.001);
        // Sphere behind the origin
        let away = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(ray_sphere(&away, Vec3::ZERO, 2.0).is_none());
    }

    #[test]
    fn test_pick_closest() {
        let bodies = [
            Body::new(Vec3::new(0.0, 0.0, -10.0), 1.0, 1.0),
            Body::new(Vec3::new(0.0, 0.0, -4.0), 1.0, 1.0),
            Body::new(Vec3::new(5.0, 0.0, -4.0), 1.0, 1.0),
        ];
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let (idx, t) = pick_closest(&ray, &bodies).unwrap();
        assert_eq!(idx, 1);
        assert!((t - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_pair_mut() {
        let mut v = [1, 2, 3];
        let (a, b) = pair_mut(&mut v, 0, 2);
        std::mem::swap(a, b);
        assert_eq!(v, [3, 2, 1]);
    }

    proptest! {
        #[test]
        fn prop_impulse_conserves_momentum(
            ax in -1.0f32..1.0, ay in -1.0f32..1.0,
            bx in -1.0f32..1.0, by in -1.0f32..1.0,
            avx in -20.0f32..20.0, bvx in -20.0f32..20.0,
            ma in 0.1f32..10.0, mb in 0.1f32..10.0,
            e in 0.0f32..1.0,
        ) {
            let mut a = Body::new(Vec3::new(ax, ay, 0.0), 1.0, ma);
            let mut b = Body::new(Vec3::new(bx, by, 0.0), 1.0, mb);
            a.vel = Vec3::new(avx, 0.0, 0.0);
            b.vel = Vec3::new(bvx, 0.0, 0.0);
            let before = a.momentum() + b.momentum();
            resolve_sphere_pair(&mut a, &mut b, e);
            let after = a.momentum() + b.momentum();
            let scale = 1.0 + before.length();
            prop_assert!((after - before).length() / scale < 1e-3);
        }
    }
}
