//! Free-fly camera over bouncing spheres that can be grabbed and thrown

use glam::{Quat, Vec2, Vec3};

use super::{Game, GameId};
use crate::platform::{InputState, Key, MouseButton};
use crate::renderer::{Camera3D, Color, DrawList, colors, fade};
use crate::sim::bodies::{Body, Ray, bounce_in_cube, pair_mut, pick_closest, resolve_sphere_pair};
use crate::sim::collision::Rect;

const SCREEN: Vec2 = Vec2::new(1200.0, 800.0);
const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
/// Half size of the simulation cube
const BOUNDS: f32 = 15.0;
const RESTITUTION: f32 = 0.85;
const THROW_FACTOR: f32 = 0.5;
/// Floor bounces slower than this come to rest
const REST_SPEED: f32 = 0.5;

const CAM_SPEED: f32 = 15.0;
/// Degrees per pixel of mouse movement
const CAM_SENSITIVITY: f32 = 0.15;
const CAM_BOUNDS: f32 = 18.0;
/// Largest |forward . up| the view may reach
const PITCH_LIMIT_DOT: f32 = 0.995;

const HOLD_MIN: f32 = 1.0;
const HOLD_MAX: f32 = 50.0;
const HOLD_PER_NOTCH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub body: Body,
    pub color: Color,
}

fn initial_spheres() -> Vec<Sphere> {
    [
        (Vec3::new(-5.0, 5.0, 0.0), 0.7, 0.5, colors::SKYBLUE),
        (Vec3::new(5.0, 10.0, 0.0), 1.5, 3.0, colors::LIME),
        (Vec3::new(0.0, 15.0, 5.0), 0.5, 0.2, colors::YELLOW),
        (Vec3::new(-10.0, 10.0, -5.0), 2.0, 5.0, colors::MAGENTA),
    ]
    .into_iter()
    .map(|(pos, radius, mass, color)| Sphere {
        body: Body::new(pos, radius, mass),
        color,
    })
    .collect()
}

/// Grab state for the sphere under the crosshair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grab {
    pub index: usize,
    pub distance: f32,
    last_hand: Vec3,
    hand_vel: Vec3,
}

pub struct PhysicsSandbox {
    pub spheres: Vec<Sphere>,
    pub camera: Camera3D,
    pub grab: Option<Grab>,
}

impl PhysicsSandbox {
    pub fn new() -> Self {
        Self {
            spheres: initial_spheres(),
            camera: Camera3D::new(Vec3::new(0.0, 5.0, 20.0), Vec3::ZERO, 60.0),
            grab: None,
        }
    }

    fn is_held(&self, index: usize) -> bool {
        self.grab.is_some_and(|g| g.index == index)
    }

    /// WASD along the view, Space/Shift vertical, then mouse look
    fn fly(&mut self, input: &InputState, dt: f32) {
        let cam = &mut self.camera;
        let forward = cam.forward();
        let right = cam.right();
        let mut movement = forward * input.axis(&[Key::S], &[Key::W]) + right * input.axis(&[Key::A], &[Key::D]);
        movement += cam.up * input.axis(&[Key::LeftShift, Key::RightShift], &[Key::Space]);

        let next = (cam.position + movement * CAM_SPEED * dt).clamp(Vec3::splat(-CAM_BOUNDS), Vec3::splat(CAM_BOUNDS));
        cam.target += next - cam.position;
        cam.position = next;

        let delta = input.mouse_delta;
        if delta == Vec2::ZERO {
            return;
        }
        let yaw = (-delta.x * CAM_SENSITIVITY).to_radians();
        let pitch = (-delta.y * CAM_SENSITIVITY).to_radians();
        let yawed = Quat::from_axis_angle(cam.up, yaw) * cam.forward();
        let side = yawed.cross(cam.up).normalize_or_zero();
        let proposed = Quat::from_axis_angle(side, pitch) * yawed;
        // Past the limit only the yaw is kept
        let look = if proposed.dot(cam.up).abs() < PITCH_LIMIT_DOT {
            proposed
        } else {
            yawed
        };
        cam.target = cam.position + look;
    }

    /// Ray through the screen centre, where the crosshair sits
    fn crosshair_ray(&self) -> Ray {
        self.camera.ray_from_screen(SCREEN * 0.5, SCREEN)
    }

    fn grab_or_throw(&mut self, input: &InputState, dt: f32) {
        if self.grab.is_none() && input.is_button_pressed(MouseButton::Left) {
            let ray = self.crosshair_ray();
            if let Some((index, t)) = pick_closest(&ray, self.spheres.iter().map(|s| &s.body)) {
                let distance = (ray.at(t) - self.camera.position).length();
                log::debug!("grabbed sphere {index} at {distance:.2}");
                self.grab = Some(Grab {
                    index,
                    distance,
                    last_hand: self.spheres[index].body.pos,
                    hand_vel: Vec3::ZERO,
                });
            }
        }

        let Some(grab) = self.grab.as_mut() else {
            return;
        };
        let body = &mut self.spheres[grab.index].body;

        if input.is_button_down(MouseButton::Left) {
            grab.distance = (grab.distance - input.wheel * HOLD_PER_NOTCH).clamp(HOLD_MIN, HOLD_MAX);
            let limit = BOUNDS - body.radius;
            let hand = (self.camera.position + self.camera.forward() * grab.distance)
                .clamp(Vec3::splat(-limit), Vec3::splat(limit));
            if dt > 0.0 {
                grab.hand_vel = (hand - grab.last_hand) / dt;
            }
            grab.last_hand = hand;
            body.pos = hand;
            body.vel = Vec3::ZERO;
        }

        if input.is_button_released(MouseButton::Left) {
            body.vel = grab.hand_vel * THROW_FACTOR;
            self.grab = None;
        }
    }

    fn step_spheres(&mut self, dt: f32) {
        for i in 0..self.spheres.len() {
            if self.is_held(i) {
                continue;
            }
            let body = &mut self.spheres[i].body;
            body.vel += GRAVITY * dt;
            body.pos += body.vel * dt;
            let radius = body.radius;
            if bounce_in_cube(body, radius, BOUNDS, RESTITUTION) && body.vel.y.abs() < REST_SPEED {
                body.vel.y = 0.0;
            }
        }

        let n = self.spheres.len();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.is_held(i) || self.is_held(j) {
                    continue;
                }
                let (a, b) = pair_mut(&mut self.spheres, i, j);
                resolve_sphere_pair(&mut a.body, &mut b.body, RESTITUTION);
            }
        }
    }
}

impl Default for PhysicsSandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for PhysicsSandbox {
    fn id(&self) -> GameId {
        GameId::PhysicsSandbox
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        if input.is_pressed(Key::R) {
            *self = Self::new();
            return;
        }
        self.fly(input, dt);
        self.step_spheres(dt);
        self.grab_or_throw(input, dt);
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::DARKGRAY);

        list.begin_3d(self.camera);
        list.cube_wires(Vec3::ZERO, Vec3::splat(BOUNDS * 2.0), colors::RAYWHITE);
        list.plane(Vec3::new(0.0, -BOUNDS, 0.0), Vec2::splat(BOUNDS * 2.0), colors::DARKGREEN);
        for (i, s) in self.spheres.iter().enumerate() {
            let (fill, wire) = if self.is_held(i) {
                (colors::RAYWHITE, colors::GOLD)
            } else {
                (s.color, colors::BLACK)
            };
            list.sphere(s.body.pos, s.body.radius, fill);
            list.sphere_wires(s.body.pos, s.body.radius, 10, 10, wire);
        }
        list.end_3d();

        let c = SCREEN * 0.5;
        list.rect(Rect::new(c.x - 10.0, c.y - 1.0, 20.0, 2.0), colors::RAYWHITE);
        list.rect(Rect::new(c.x - 1.0, c.y - 10.0, 2.0, 20.0), colors::RAYWHITE);
        list.rect(Rect::new(c.x - 1.0, c.y - 1.0, 2.0, 2.0), colors::RED);

        list.rect(Rect::new(10.0, 10.0, 350.0, 130.0), fade(colors::BLACK, 0.7));
        list.text("3D Physics Sandbox (Multi-Sphere)", 20.0, 20.0, 20.0, colors::YELLOW);
        list.line(Vec2::new(20.0, 45.0), Vec2::new(340.0, 45.0), 1.0, colors::GRAY);
        list.text("Movement:", 20.0, 60.0, 16.0, colors::WHITE);
        list.text("WASD: Move | SPACE: Up | SHIFT: Down", 30.0, 80.0, 14.0, colors::LIME);
        list.text("Mouse: Look | R: Reset", 30.0, 95.0, 14.0, colors::LIME);
        list.text("Interaction:", 20.0, 110.0, 16.0, colors::WHITE);
        list.text("LMB Click/Hold: Grab | Scroll: Change Distance", 30.0, 125.0, 14.0, colors::LIME);

        if self.grab.is_some() {
            list.text(
                "SPHERE HELD (Throw by flicking mouse/releasing LMB)",
                SCREEN.x - 500.0,
                SCREEN.y - 30.0,
                18.0,
                colors::RED,
            );
        }
    }

    fn summary(&self) -> String {
        let lowest = self.spheres.iter().map(|s| s.body.pos.y).fold(f32::INFINITY, f32::min);
        format!("{} spheres, lowest at y = {lowest:.2}", self.spheres.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    /// One sphere at the origin and a camera looking at it down -Z
    fn single_target() -> PhysicsSandbox {
        let mut game = PhysicsSandbox::new();
        game.spheres = vec![Sphere {
            body: Body::new(Vec3::ZERO, 1.0, 1.0),
            color: colors::RED,
        }];
        game.camera = Camera3D::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, 60.0);
        game
    }

    #[test]
    fn test_spheres_fall_under_gravity() {
        let mut game = PhysicsSandbox::new();
        let start = game.spheres[1].body.pos.y;
        let idle = InputState::default();
        for _ in 0..30 {
            game.update(&idle, DT);
        }
        let fallen = start - game.spheres[1].body.pos.y;
        // Half a second at 9.81
        assert!((fallen - 1.27).abs() < 0.05, "fell {fallen}");
    }

    #[test]
    fn test_slow_floor_bounce_comes_to_rest() {
        let mut game = single_target();
        let body = &mut game.spheres[0].body;
        body.pos = Vec3::new(0.0, -BOUNDS + 1.001, 0.0);
        body.vel = Vec3::new(0.0, -0.3, 0.0);
        game.update(&InputState::default(), DT);
        let body = game.spheres[0].body;
        assert_eq!(body.pos.y, -BOUNDS + 1.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_grab_hold_and_throw() {
        let mut game = single_target();
        let mut input = InputState::default();
        input.press_button(MouseButton::Left);
        game.update(&input, DT);
        let grab = game.grab.unwrap();
        assert_eq!(grab.index, 0);
        assert!((grab.distance - 9.0).abs() < 1e-3);
        assert!((game.spheres[0].body.pos - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-3);

        // Held spheres ignore gravity
        input.end_step();
        for _ in 0..10 {
            game.update(&input, DT);
        }
        assert!(game.spheres[0].body.pos.y.abs() < 1e-4);

        // Wheel pulls it one unit closer, then release throws toward the camera
        input.wheel_moved(2.0);
        game.update(&input, DT);
        input.end_step();
        assert!((game.spheres[0].body.pos.z - 2.0).abs() < 1e-3);
        input.release_button(MouseButton::Left);
        game.update(&input, DT);
        assert!(game.grab.is_none());
        assert!((game.spheres[0].body.vel.z - 30.0).abs() < 0.1);
    }

    #[test]
    fn test_click_on_empty_space_grabs_nothing() {
        let mut game = single_target();
        game.camera.target = Vec3::new(0.0, 10.0, 10.0);
        let mut input = InputState::default();
        input.press_button(MouseButton::Left);
        game.update(&input, DT);
        assert!(game.grab.is_none());
    }

    #[test]
    fn test_camera_stays_inside_bounds() {
        let mut game = PhysicsSandbox::new();
        let w = InputState::holding(&[Key::S, Key::Space]);
        for _ in 0..600 {
            game.update(&w, DT);
        }
        let p = game.camera.position;
        assert!(p.abs().max_element() <= CAM_BOUNDS + 1e-4);
        assert!((p.y - CAM_BOUNDS).abs() < 1e-3);
        // Target moved by the same clamped amount
        let look = game.camera.target - p;
        assert!((look - Vec3::new(0.0, -5.0, -20.0)).length() < 1e-3);
    }

    #[test]
    fn test_pitch_stops_short_of_vertical() {
        let mut game = PhysicsSandbox::new();
        let mut input = InputState::default();
        for _ in 0..50 {
            input.mouse_moved(Vec2::ZERO, Vec2::new(0.0, -100.0));
            game.update(&input, DT);
            input.end_step();
        }
        let f = game.camera.forward();
        assert!(f.dot(Vec3::Y).abs() < PITCH_LIMIT_DOT);
        assert!(f.y > 0.9);
    }

    #[test]
    fn test_reset_restores_scene() {
        let mut game = PhysicsSandbox::new();
        let idle = InputState::default();
        for _ in 0..120 {
            game.update(&idle, DT);
        }
        game.update(&InputState::pressing(&[Key::R]), DT);
        assert_eq!(game.spheres, initial_spheres());
        assert_eq!(game.camera.position, Vec3::new(0.0, 5.0, 20.0));
    }
}
