//! Tessellation of draw commands into coloured triangles
//!
//! Output vertices are in logical screen pixels (y down). 2D commands inside a
//! camera block are transformed by that camera. 3D commands are projected,
//! then painter-sorted by depth within each 3D block; there is no depth
//! buffer, so intersecting solids may overlap incorrectly.

use glam::{Mat4, Vec2, Vec3, Vec4};
use std::f32::consts::{PI, TAU};

use super::camera::{Camera2D, Camera3D, NEAR, clip_to_screen};
use super::draw::{DrawCmd, DrawList};
use super::vertex::{Color, Vertex, colors};
use crate::sim::collision::Rect;

const LINE_3D_WIDTH: f32 = 1.0;

/// Triangle count for a circle of the given on-screen radius
fn circle_segments(radius: f32) -> u32 {
    ((radius * 0.5) as u32).clamp(12, 64)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(center: Vec2, inner_radius: f32, outer_radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let (s1, c1) = theta1.sin_cos();
        let (s2, c2) = theta2.sin_cos();

        let inner1 = center + Vec2::new(c1, s1) * inner_radius;
        let outer1 = center + Vec2::new(c1, s1) * outer_radius;
        let inner2 = center + Vec2::new(c2, s2) * inner_radius;
        let outer2 = center + Vec2::new(c2, s2) * outer_radius;

        quad(&mut vertices, inner1, outer1, outer2, inner2, color);
    }

    vertices
}

/// Two triangles covering the quad a-b-c-d
fn quad(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: Color) {
    for p in [a, b, c, a, c, d] {
        out.push(Vertex::new(p.x, p.y, color));
    }
}

fn rect_fill(out: &mut Vec<Vertex>, r: &Rect, color: Color) {
    quad(
        out,
        Vec2::new(r.x, r.y),
        Vec2::new(r.right(), r.y),
        Vec2::new(r.right(), r.bottom()),
        Vec2::new(r.x, r.bottom()),
        color,
    );
}

/// Thick line as a quad along the segment
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, thickness: f32, color: Color) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let perp = Vec2::new(-dir.y, dir.x) * (thickness.max(1.0) / 2.0);
    quad(out, from + perp, to + perp, to - perp, from - perp, color);
}

/// Outline drawn inside the rectangle's bounds
fn rect_outline(out: &mut Vec<Vertex>, r: &Rect, thickness: f32, color: Color) {
    let t = thickness.min(r.w / 2.0).min(r.h / 2.0).max(0.0);
    rect_fill(out, &Rect::new(r.x, r.y, r.w, t), color);
    rect_fill(out, &Rect::new(r.x, r.bottom() - t, r.w, t), color);
    rect_fill(out, &Rect::new(r.x, r.y + t, t, r.h - 2.0 * t), color);
    rect_fill(out, &Rect::new(r.right() - t, r.y + t, t, r.h - 2.0 * t), color);
}

/// World-space triangle awaiting projection
struct Tri3 {
    points: [Vec3; 3],
    color: Color,
}

/// World-space segment awaiting projection
struct Seg3 {
    from: Vec3,
    to: Vec3,
    color: Color,
}

#[derive(Default)]
struct Scene3 {
    tris: Vec<Tri3>,
    segs: Vec<Seg3>,
}

impl Scene3 {
    fn tri(&mut self, a: Vec3, b: Vec3, c: Vec3, color: Color) {
        self.tris.push(Tri3 {
            points: [a, b, c],
            color,
        });
    }

    fn quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, color: Color) {
        self.tri(a, b, c, color);
        self.tri(a, c, d, color);
    }

    fn seg(&mut self, from: Vec3, to: Vec3, color: Color) {
        self.segs.push(Seg3 { from, to, color });
    }

    fn add(&mut self, cmd: &DrawCmd) {
        match cmd {
            DrawCmd::Cube {
                center,
                size,
                rotation_y,
                color,
            } => {
                let c = cube_corners(*center, *size, *rotation_y);
                for [a, b, cc, d] in CUBE_FACES {
                    self.quad(c[a], c[b], c[cc], c[d], *color);
                }
            }
            DrawCmd::CubeWires {
                center,
                size,
                rotation_y,
                color,
            } => {
                let c = cube_corners(*center, *size, *rotation_y);
                for [a, b] in CUBE_EDGES {
                    self.seg(c[a], c[b], *color);
                }
            }
            DrawCmd::Sphere {
                center,
                radius,
                color,
            } => {
                let grid = sphere_points(*center, *radius, 10, 16);
                for ring in grid.windows(2) {
                    for i in 0..ring[0].len() - 1 {
                        self.quad(ring[0][i], ring[0][i + 1], ring[1][i + 1], ring[1][i], *color);
                    }
                }
            }
            DrawCmd::SphereWires {
                center,
                radius,
                rings,
                slices,
                color,
            } => {
                let grid = sphere_points(*center, *radius, (*rings).max(2), (*slices).max(3));
                for (r, ring) in grid.iter().enumerate() {
                    for i in 0..ring.len() - 1 {
                        self.seg(ring[i], ring[i + 1], *color);
                        if let Some(next) = grid.get(r + 1) {
                            self.seg(ring[i], next[i], *color);
                        }
                    }
                }
            }
            DrawCmd::Grid { slices, spacing } => {
                let half = (*slices / 2) as f32 * spacing;
                for i in 0..=*slices {
                    let o = -half + i as f32 * spacing;
                    let color = if i == *slices / 2 { colors::GRAY } else { colors::DARKGRAY };
                    self.seg(Vec3::new(o, 0.0, -half), Vec3::new(o, 0.0, half), color);
                    self.seg(Vec3::new(-half, 0.0, o), Vec3::new(half, 0.0, o), color);
                }
            }
            DrawCmd::Line3D { from, to, color } => self.seg(*from, *to, *color),
            DrawCmd::Plane {
                center,
                size,
                color,
            } => {
                let h = *size / 2.0;
                self.quad(
                    *center + Vec3::new(-h.x, 0.0, -h.y),
                    *center + Vec3::new(h.x, 0.0, -h.y),
                    *center + Vec3::new(h.x, 0.0, h.y),
                    *center + Vec3::new(-h.x, 0.0, h.y),
                    *color,
                );
            }
            _ => {}
        }
    }

    /// Project, depth-sort back to front and emit
    fn flush(&mut self, camera: &Camera3D, screen: Vec2, out: &mut Vec<Vertex>) {
        let vp = camera.view_projection(screen);
        let view = camera.view();
        // (view depth, vertices) pairs
        let mut items: Vec<(f32, Vec<Vertex>)> = Vec::new();

        for tri in self.tris.drain(..) {
            let clip = clip_polygon(&tri.points.map(|p| vp * p.extend(1.0)));
            let projected: Option<Vec<Vec3>> = clip.iter().map(|c| clip_to_screen(*c, screen)).collect();
            let Some(s) = projected else {
                continue;
            };
            if s.len() < 3 {
                continue;
            }
            let depth = tri.points.iter().map(|p| -(view * p.extend(1.0)).z).sum::<f32>() / 3.0;
            // Fan out the clipped polygon (3 or 4 corners)
            let mut verts = Vec::with_capacity((s.len() - 2) * 3);
            for i in 1..s.len() - 1 {
                for p in [s[0], s[i], s[i + 1]] {
                    verts.push(Vertex::new(p.x, p.y, tri.color));
                }
            }
            items.push((depth, verts));
        }

        for seg in self.segs.drain(..) {
            let Some((a, b)) = clip_segment(vp * seg.from.extend(1.0), vp * seg.to.extend(1.0)) else {
                continue;
            };
            let (Some(sa), Some(sb)) = (clip_to_screen(a, screen), clip_to_screen(b, screen)) else {
                continue;
            };
            let mid = (seg.from + seg.to) / 2.0;
            // Lines sit slightly in front of the faces they outline
            let depth = -(view * mid.extend(1.0)).z - 0.01;
            let mut verts = Vec::with_capacity(6);
            line(&mut verts, sa.truncate(), sb.truncate(), LINE_3D_WIDTH, seg.color);
            items.push((depth, verts));
        }

        items.sort_by(|a, b| b.0.total_cmp(&a.0));
        for (_, verts) in items {
            out.extend(verts);
        }
    }
}

/// Clip a clip-space segment against the near plane (w >= NEAR)
fn clip_segment(a: Vec4, b: Vec4) -> Option<(Vec4, Vec4)> {
    match (a.w >= NEAR, b.w >= NEAR) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        (a_in, _) => {
            let t = (NEAR - a.w) / (b.w - a.w);
            let cut = a + (b - a) * t;
            if a_in { Some((a, cut)) } else { Some((cut, b)) }
        }
    }
}

/// Clip a clip-space triangle against the near plane (w >= NEAR).
/// Returns 0, 3 or 4 corners in winding order.
fn clip_polygon(points: &[Vec4; 3]) -> Vec<Vec4> {
    let mut out = Vec::with_capacity(4);
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        let (a_in, b_in) = (a.w >= NEAR, b.w >= NEAR);
        if a_in {
            out.push(a);
        }
        if a_in != b_in {
            let t = (NEAR - a.w) / (b.w - a.w);
            out.push(a + (b - a) * t);
        }
    }
    out
}

// Corner index bits: x = 1, y = 2, z = 4
const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 1, 3, 2],
    [4, 5, 7, 6],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [0, 2, 6, 4],
    [1, 3, 7, 5],
];

const CUBE_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [2, 3],
    [4, 5],
    [6, 7],
    [0, 2],
    [1, 3],
    [4, 6],
    [5, 7],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

fn cube_corners(center: Vec3, size: Vec3, rotation_y: f32) -> [Vec3; 8] {
    let model = Mat4::from_translation(center) * Mat4::from_rotation_y(rotation_y);
    let h = size / 2.0;
    std::array::from_fn(|i| {
        let local = Vec3::new(
            if i & 1 != 0 { h.x } else { -h.x },
            if i & 2 != 0 { h.y } else { -h.y },
            if i & 4 != 0 { h.z } else { -h.z },
        );
        model.transform_point3(local)
    })
}

/// Latitude rings from pole to pole, each closed (first point repeated)
fn sphere_points(center: Vec3, radius: f32, rings: u32, slices: u32) -> Vec<Vec<Vec3>> {
    (0..=rings)
        .map(|r| {
            let lat = PI * r as f32 / rings as f32;
            let (sy, cy) = lat.sin_cos();
            (0..=slices)
                .map(|s| {
                    let lon = TAU * s as f32 / slices as f32;
                    let (sx, cx) = lon.sin_cos();
                    center + Vec3::new(sy * cx, cy, sy * sx) * radius
                })
                .collect()
        })
        .collect()
}

/// Tessellate a draw list into screen-space triangles
///
/// Text and clear commands produce no geometry; see [`DrawList::texts`] and
/// [`DrawList::clear_color`].
pub fn tessellate(list: &DrawList, screen: Vec2) -> Vec<Vertex> {
    let mut out = Vec::new();
    let mut cam2d: Option<Camera2D> = None;
    let mut cam3d: Option<Camera3D> = None;
    let mut scene = Scene3::default();

    for cmd in list.commands() {
        let to_screen = move |p: Vec2| cam2d.map_or(p, |c| c.world_to_screen(p));
        let scale = cam2d.map_or(1.0, |c| c.zoom);
        match cmd {
            DrawCmd::Clear(_) | DrawCmd::Text { .. } => {}
            DrawCmd::Begin2D(c) => cam2d = Some(*c),
            DrawCmd::End2D => cam2d = None,
            DrawCmd::Begin3D(c) => cam3d = Some(*c),
            DrawCmd::End3D => {
                if let Some(c) = cam3d.take() {
                    scene.flush(&c, screen, &mut out);
                }
            }
            DrawCmd::Rect { rect, color } => {
                let p = to_screen(rect.pos());
                rect_fill(&mut out, &Rect::new(p.x, p.y, rect.w * scale, rect.h * scale), *color);
            }
            DrawCmd::RectLines {
                rect,
                thickness,
                color,
            } => {
                let p = to_screen(rect.pos());
                let r = Rect::new(p.x, p.y, rect.w * scale, rect.h * scale);
                rect_outline(&mut out, &r, thickness * scale, *color);
            }
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => {
                let r = radius * scale;
                out.extend(circle(to_screen(*center), r, *color, circle_segments(r)));
            }
            DrawCmd::CircleLines {
                center,
                radius,
                color,
            } => {
                let r = radius * scale;
                out.extend(ring(to_screen(*center), (r - 0.5).max(0.0), r + 0.5, *color, circle_segments(r)));
            }
            DrawCmd::Line {
                from,
                to,
                thickness,
                color,
            } => line(&mut out, to_screen(*from), to_screen(*to), thickness * scale, *color),
            DrawCmd::Triangle { points, color } => {
                for p in points {
                    let s = to_screen(*p);
                    out.push(Vertex::new(s.x, s.y, *color));
                }
            }
            other => {
                if cam3d.is_some() {
                    scene.add(other);
                }
            }
        }
    }
    if let Some(c) = cam3d {
        scene.flush(&c, screen, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_rect_and_circle_counts() {
        let mut list = DrawList::new();
        list.clear(colors::BLACK);
        list.rect(Rect::new(0.0, 0.0, 10.0, 10.0), colors::RED);
        list.circle(Vec2::new(50.0, 50.0), 10.0, colors::RED);
        list.text("ignored", 0.0, 0.0, 20.0, colors::WHITE);
        let verts = tessellate(&list, SCREEN);
        assert_eq!(verts.len(), 6 + 12 * 3);
    }

    #[test]
    fn test_camera_2d_offsets_geometry() {
        let mut list = DrawList::new();
        list.begin_2d(Camera2D {
            target: Vec2::new(1000.0, 300.0),
            offset: Vec2::new(400.0, 300.0),
            zoom: 1.0,
        });
        list.rect(Rect::new(1000.0, 300.0, 10.0, 10.0), colors::RED);
        list.end_2d();
        list.rect(Rect::new(5.0, 5.0, 10.0, 10.0), colors::RED);
        let verts = tessellate(&list, SCREEN);
        assert_eq!(verts[0].position, [400.0, 300.0]);
        assert_eq!(verts[6].position, [5.0, 5.0]);
    }

    #[test]
    fn test_3d_cube_visible_and_behind_culled() {
        let camera = Camera3D::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 45.0);
        let mut list = DrawList::new();
        list.begin_3d(camera);
        list.cube(Vec3::ZERO, Vec3::splat(2.0), colors::RED);
        list.cube(Vec3::new(0.0, 0.0, 20.0), Vec3::splat(2.0), colors::BLUE);
        list.end_3d();
        let verts = tessellate(&list, SCREEN);
        assert_eq!(verts.len(), 36);
        assert!(verts.iter().all(|v| v.color == colors::RED));
        assert!(verts.iter().all(|v| v.position[0] > 300.0 && v.position[0] < 500.0));
    }

    #[test]
    fn test_3d_painter_order_far_first() {
        let camera = Camera3D::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 45.0);
        let mut list = DrawList::new();
        list.begin_3d(camera);
        list.sphere(Vec3::new(0.0, 0.0, 5.0), 0.5, colors::RED);
        list.sphere(Vec3::new(0.0, 0.0, -5.0), 0.5, colors::BLUE);
        list.end_3d();
        let verts = tessellate(&list, SCREEN);
        assert_eq!(verts.first().map(|v| v.color), Some(colors::BLUE));
        assert_eq!(verts.last().map(|v| v.color), Some(colors::RED));
    }

    #[test]
    fn test_segment_crossing_near_plane_is_clipped() {
        let camera = Camera3D::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, -1.0), 60.0);
        let mut list = DrawList::new();
        list.begin_3d(camera);
        list.line_3d(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -5.0), colors::WHITE);
        list.end_3d();
        let verts = tessellate(&list, SCREEN);
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().all(|v| v.position[1].is_finite()));
    }

    #[test]
    fn test_plane_around_camera_is_clipped_not_dropped() {
        let camera = Camera3D::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 1.0, -5.0), 60.0);
        let mut list = DrawList::new();
        list.begin_3d(camera);
        list.plane(Vec3::ZERO, Vec2::splat(100.0), colors::GRAY);
        list.end_3d();
        let verts = tessellate(&list, SCREEN);
        assert!(!verts.is_empty());
        assert_eq!(verts.len() % 3, 0);
        assert!(verts.iter().all(|v| v.color == colors::GRAY));
        assert!(verts.iter().all(|v| v.position[0].is_finite() && v.position[1].is_finite()));
        // The ground fills the bottom centre of the view
        assert!(verts.iter().any(|v| v.position[1] >= SCREEN.y - 1.0));
    }

    #[test]
    fn test_clip_polygon() {
        let inside = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let behind = Vec4::new(0.0, 0.0, 0.0, -1.0);
        assert_eq!(clip_polygon(&[inside, inside, inside]).len(), 3);
        assert_eq!(clip_polygon(&[inside, inside, behind]).len(), 4);
        assert_eq!(clip_polygon(&[inside, behind, behind]).len(), 3);
        assert!(clip_polygon(&[behind, behind, behind]).is_empty());
        assert!(clip_polygon(&[inside, behind, behind]).iter().all(|c| c.w >= NEAR - 1e-5));
    }

    #[test]
    fn test_clip_segment() {
        let a = Vec4::new(0.0, 0.0, 0.0, -1.0);
        let b = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let (ca, cb) = clip_segment(a, b).unwrap();
        assert!((ca.w - NEAR).abs() < 1e-5);
        assert_eq!(cb, b);
        assert!(clip_segment(a, a).is_none());
    }
}
