//! Collision detection and response for axis-aligned geometry
//!
//! Rectangles are top-left anchored in y-down screen space. Overlap tests are
//! strict, so touching edges do not collide; that is what lets a body rest on
//! a floor and still be pushed into it by gravity the next step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of `size` centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Strict overlap (shared edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Shrink by `amount` on every side
    pub fn inset(&self, amount: f32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            (self.w - 2.0 * amount).max(0.0),
            (self.h - 2.0 * amount).max(0.0),
        )
    }
}

/// Circle against rectangle: distance from the centre to the closest point
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = Vec2::new(
        center.x.clamp(rect.x, rect.right()),
        center.y.clamp(rect.y, rect.bottom()),
    );
    center.distance_squared(closest) <= radius * radius
}

#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

/// Keep a circle inside `[0, bounds]`, flipping velocity on each wall it hits
///
/// Returns true if any wall was touched.
pub fn bounce_in_bounds(pos: &mut Vec2, vel: &mut Vec2, radius: f32, bounds: Vec2) -> bool {
    let mut hit = false;
    if pos.x + radius >= bounds.x {
        pos.x = bounds.x - radius;
        vel.x = -vel.x.abs();
        hit = true;
    } else if pos.x - radius <= 0.0 {
        pos.x = radius;
        vel.x = vel.x.abs();
        hit = true;
    }
    if pos.y + radius >= bounds.y {
        pos.y = bounds.y - radius;
        vel.y = -vel.y.abs();
        hit = true;
    } else if pos.y - radius <= 0.0 {
        pos.y = radius;
        vel.y = vel.y.abs();
        hit = true;
    }
    hit
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// What a body touched while resolving one move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contact {
    /// Blocked horizontally
    pub wall: bool,
    /// Landed on something (moving down or at rest)
    pub floor: bool,
    /// Bumped something above
    pub ceiling: bool,
}

impl Contact {
    fn merge(self, other: Contact) -> Contact {
        Contact {
            wall: self.wall || other.wall,
            floor: self.floor || other.floor,
            ceiling: self.ceiling || other.ceiling,
        }
    }
}

/// Push `rect` out of every overlapping solid along one axis
///
/// Direction comes from the sign of the velocity on that axis: moving right
/// snaps to the nearest left face, moving left to the nearest right face,
/// vy >= 0 lands on the nearest top face, vy < 0 hits the nearest bottom
/// face. The velocity component is zeroed on contact. With zero horizontal
/// velocity an X overlap is reported but left in place.
pub fn resolve_axis(rect: &mut Rect, vel: &mut Vec2, axis: Axis, solids: &[Rect]) -> Contact {
    let mut contact = Contact::default();
    let hits: Vec<&Rect> = solids.iter().filter(|s| rect.overlaps(s)).collect();
    if hits.is_empty() {
        return contact;
    }

    match axis {
        Axis::X => {
            if vel.x > 0.0 {
                let face = hits.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);
                rect.x = face - rect.w;
            } else if vel.x < 0.0 {
                let face = hits.iter().map(|s| s.right()).fold(f32::NEG_INFINITY, f32::max);
                rect.x = face;
            }
            vel.x = 0.0;
            contact.wall = true;
        }
        Axis::Y => {
            if vel.y >= 0.0 {
                let face = hits.iter().map(|s| s.y).fold(f32::INFINITY, f32::min);
                rect.y = face - rect.h;
                contact.floor = true;
            } else {
                let face = hits.iter().map(|s| s.bottom()).fold(f32::NEG_INFINITY, f32::max);
                rect.y = face;
                contact.ceiling = true;
            }
            vel.y = 0.0;
        }
    }
    contact
}

/// Integrate `vel * dt` one axis at a time, resolving against solids after each
///
/// `solids` is asked for candidates around the moved rectangle, so a tile map
/// can answer with just the nearby tiles.
pub fn move_and_collide<F>(rect: &mut Rect, vel: &mut Vec2, dt: f32, solids: F) -> Contact
where
    F: Fn(&Rect) -> Vec<Rect>,
{
    rect.x += vel.x * dt;
    let near = solids(rect);
    let cx = resolve_axis(rect, vel, Axis::X, &near);

    rect.y += vel.y * dt;
    let near = solids(rect);
    let cy = resolve_axis(rect, vel, Axis::Y, &near);

    cx.merge(cy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Rect::new(9.5, 9.5, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_circle_rect_overlap() {
        let r = Rect::new(100.0, 100.0, 50.0, 20.0);
        assert!(circle_rect_overlap(Vec2::new(95.0, 110.0), 6.0, &r));
        assert!(!circle_rect_overlap(Vec2::new(90.0, 110.0), 6.0, &r));
        // Corner distance uses the diagonal
        assert!(!circle_rect_overlap(Vec2::new(96.0, 96.0), 5.0, &r));
        assert!(circle_rect_overlap(Vec2::new(97.0, 97.0), 5.0, &r));
    }

    #[test]
    fn test_bounce_in_bounds() {
        let mut pos = Vec2::new(795.0, 200.0);
        let mut vel = Vec2::new(200.0, 150.0);
        assert!(bounce_in_bounds(&mut pos, &mut vel, 25.0, Vec2::new(800.0, 450.0)));
        assert_eq!(pos.x, 775.0);
        assert!(vel.x < 0.0);
        assert!(vel.y > 0.0);
    }

    #[test]
    fn test_land_on_floor() {
        let floor = [Rect::new(0.0, 100.0, 200.0, 40.0)];
        let mut body = Rect::new(10.0, 60.0, 32.0, 36.0);
        let mut vel = Vec2::new(0.0, 600.0);
        let contact = move_and_collide(&mut body, &mut vel, 1.0 / 60.0, |_| floor.to_vec());
        assert!(contact.floor);
        assert_eq!(body.bottom(), 100.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_wall_stops_horizontal() {
        let wall = [Rect::new(50.0, 0.0, 40.0, 200.0)];
        let mut body = Rect::new(15.0, 10.0, 32.0, 36.0);
        let mut vel = Vec2::new(300.0, 0.0);
        let contact = move_and_collide(&mut body, &mut vel, 1.0 / 60.0, |_| wall.to_vec());
        assert!(contact.wall);
        assert_eq!(body.right(), 50.0);
        assert_eq!(vel.x, 0.0);
    }

    #[test]
    fn test_ceiling_bump() {
        let ceiling = [Rect::new(0.0, 0.0, 200.0, 40.0)];
        let mut body = Rect::new(10.0, 45.0, 32.0, 36.0);
        let mut vel = Vec2::new(0.0, -750.0);
        let contact = move_and_collide(&mut body, &mut vel, 1.0 / 60.0, |_| ceiling.to_vec());
        assert!(contact.ceiling);
        assert_eq!(body.y, 40.0);
    }

    #[test]
    fn test_nearest_face_wins_across_rows() {
        // Two tiles in different rows; the nearer one must stop the body
        let solids = [
            Rect::new(200.0, 0.0, 40.0, 40.0),
            Rect::new(160.0, 40.0, 40.0, 40.0),
        ];
        let mut body = Rect::new(120.0, 20.0, 32.0, 36.0);
        let mut vel = Vec2::new(600.0, 0.0);
        move_and_collide(&mut body, &mut vel, 0.1, |_| solids.to_vec());
        assert_eq!(body.right(), 160.0);
        assert!(solids.iter().all(|s| !body.overlaps(s)));
    }

    fn room_solids(r: &Rect) -> Vec<Rect> {
        // Floor row at y = 200 and a wall column at x = 200 on a 40px grid
        let t = 40.0;
        let mut out = Vec::new();
        let c0 = (r.x / t).floor() as i32 - 1;
        let c1 = (r.right() / t).floor() as i32 + 1;
        let r0 = (r.y / t).floor() as i32 - 1;
        let r1 = (r.bottom() / t).floor() as i32 + 1;
        for row in r0..=r1 {
            for col in c0..=c1 {
                if row == 5 || col == 5 {
                    out.push(Rect::new(col as f32 * t, row as f32 * t, t, t));
                }
            }
        }
        out
    }

    proptest! {
        #[test]
        fn prop_move_never_ends_inside_solid(
            x in 40.0f32..120.0,
            y in -200.0f32..150.0,
            vx in -6000.0f32..6000.0,
            vy in -2000.0f32..6000.0,
        ) {
            let mut body = Rect::new(x, y.min(150.0), 32.0, 36.0);
            let mut vel = Vec2::new(vx, vy);
            move_and_collide(&mut body, &mut vel, 1.0 / 60.0, room_solids);
            let shrunk = body.inset(0.01);
            for s in room_solids(&body) {
                prop_assert!(!shrunk.overlaps(&s), "{:?} inside {:?}", body, s);
            }
        }
    }
}
