//! Spheres and boxes dropped into a walled arena

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId};
use crate::platform::{InputState, Key};
use crate::renderer::{Camera3D, Color, DrawList, colors, rgb, rgba};
use crate::seeded_rng;
use crate::sim::bodies::{Body, cube_mass, pair_mut, resolve_sphere_pair, sphere_mass};
use crate::sim::collision::Rect;

const SCREEN: Vec2 = Vec2::new(1200.0, 800.0);
const GRAVITY: f32 = -20.0;
/// Half width of the arena on X and Z
const ARENA: f32 = 15.0;
const RESTITUTION: f32 = 0.7;
/// Horizontal damping on each ground contact
const GROUND_FRICTION: f32 = 0.98;
const SPAWN_HEIGHT: f32 = 12.0;

const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 2.0, 0.0);
/// Radians per second
const AUTO_ORBIT: f32 = 0.5;
const TURN_RATE: f32 = 1.5;
const ZOOM_PER_NOTCH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Sphere,
    Cube,
}

/// A dynamic object; `body.radius` is the sphere radius or the cube half size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Object {
    pub body: Body,
    pub shape: Shape,
    pub color: Color,
    pub restitution: f32,
}

impl Object {
    pub fn sphere(pos: Vec3, vel: Vec3, radius: f32, color: Color) -> Self {
        let mut body = Body::new(pos, radius, sphere_mass(radius));
        body.vel = vel;
        Self {
            body,
            shape: Shape::Sphere,
            color,
            restitution: RESTITUTION,
        }
    }

    pub fn cube(pos: Vec3, size: f32, color: Color) -> Self {
        Self {
            body: Body::new(pos, size * 0.5, cube_mass(size)),
            shape: Shape::Cube,
            color,
            restitution: RESTITUTION,
        }
    }

    /// Gravity, motion, then the floor and the four arena walls
    pub fn integrate(&mut self, dt: f32) {
        let e = self.restitution;
        let b = &mut self.body;
        b.vel.y += GRAVITY * dt;
        b.pos += b.vel * dt;

        let extent = b.radius;
        if b.pos.y - extent <= 0.0 {
            b.pos.y = extent;
            b.vel.y = -b.vel.y * e;
            b.vel.x *= GROUND_FRICTION;
            b.vel.z *= GROUND_FRICTION;
        }
        for axis in [0, 2] {
            let p = b.pos[axis];
            if p.abs() + extent > ARENA {
                b.pos[axis] = (ARENA - extent).copysign(p);
                b.vel[axis] = -b.vel[axis] * e;
            }
        }
    }
}

fn random_color(rng: &mut Pcg32) -> Color {
    rgb(
        rng.random_range(100..=255),
        rng.random_range(100..=255),
        rng.random_range(100..=255),
    )
}

pub struct PhysicsPlayground {
    pub objects: Vec<Object>,
    pub paused: bool,
    pub show_vectors: bool,
    /// Orbit angle around the target in the XZ plane
    pub yaw: f32,
    pub distance: f32,
    /// Camera height above the target as a fraction of `distance`
    elevation: f32,
    rng: Pcg32,
}

impl PhysicsPlayground {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let objects = (0..5)
            .map(|_| {
                let pos = Vec3::new(
                    rng.random_range(-8.0..8.0),
                    rng.random_range(5.0..15.0),
                    rng.random_range(-8.0..8.0),
                );
                let vel = Vec3::new(rng.random_range(-3.0..3.0), 0.0, rng.random_range(-3.0..3.0));
                let radius = rng.random_range(0.4..0.8);
                Object::sphere(pos, vel, radius, random_color(&mut rng))
            })
            .collect();

        let offset = Vec3::new(25.0, 15.0, 25.0) - CAMERA_TARGET;
        Self {
            objects,
            paused: false,
            show_vectors: false,
            yaw: offset.z.atan2(offset.x),
            distance: offset.length(),
            elevation: offset.y / offset.length(),
            rng,
        }
    }

    pub fn camera(&self) -> Camera3D {
        let flat = (1.0 - self.elevation * self.elevation).max(0.0).sqrt();
        let (s, c) = self.yaw.sin_cos();
        let offset = Vec3::new(c * flat, self.elevation, s * flat) * self.distance;
        Camera3D::new(CAMERA_TARGET + offset, CAMERA_TARGET, 45.0)
    }

    pub fn spawn_sphere(&mut self) {
        let rng = &mut self.rng;
        let pos = Vec3::new(rng.random_range(-5.0..5.0), SPAWN_HEIGHT, rng.random_range(-5.0..5.0));
        let vel = Vec3::new(rng.random_range(-2.0..2.0), 0.0, rng.random_range(-2.0..2.0));
        let radius = rng.random_range(0.4..0.9);
        let color = random_color(rng);
        self.objects.push(Object::sphere(pos, vel, radius, color));
    }

    pub fn spawn_cube(&mut self) {
        let rng = &mut self.rng;
        let pos = Vec3::new(rng.random_range(-5.0..5.0), SPAWN_HEIGHT, rng.random_range(-5.0..5.0));
        let size = rng.random_range(0.8..1.5);
        let color = random_color(rng);
        self.objects.push(Object::cube(pos, size, color));
    }

    /// Sphere pairs only; cubes collide with the arena alone
    fn collide(&mut self) {
        let n = self.objects.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = pair_mut(&mut self.objects, i, j);
                if a.shape == Shape::Sphere && b.shape == Shape::Sphere {
                    let e = a.restitution.min(b.restitution);
                    resolve_sphere_pair(&mut a.body, &mut b.body, e);
                }
            }
        }
    }

    fn steer_camera(&mut self, input: &InputState, dt: f32) {
        self.yaw += (AUTO_ORBIT + input.axis(&[Key::Left], &[Key::Right]) * TURN_RATE) * dt;
        self.distance = (self.distance - input.wheel * ZOOM_PER_NOTCH).clamp(5.0, 120.0);
    }
}

impl Game for PhysicsPlayground {
    fn id(&self) -> GameId {
        GameId::PhysicsPlayground
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        self.steer_camera(input, dt);

        if input.is_pressed(Key::Space) {
            self.paused = !self.paused;
        }
        if input.is_pressed(Key::V) {
            self.show_vectors = !self.show_vectors;
        }
        if input.is_pressed(Key::C) {
            self.objects.clear();
            log::info!("Cleared all objects");
        }
        if input.is_pressed(Key::B) {
            self.spawn_sphere();
        }
        if input.is_pressed(Key::N) {
            self.spawn_cube();
        }

        if self.paused {
            return;
        }
        for obj in &mut self.objects {
            obj.integrate(dt);
        }
        self.collide();
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::RAYWHITE);

        list.begin_3d(self.camera());
        list.grid(30, 1.0);
        let wall_h = 10.0;
        let span = ARENA * 2.0;
        for (center, size) in [
            (Vec3::new(0.0, 5.0, ARENA), Vec3::new(span, wall_h, 0.1)),
            (Vec3::new(0.0, 5.0, -ARENA), Vec3::new(span, wall_h, 0.1)),
            (Vec3::new(ARENA, 5.0, 0.0), Vec3::new(0.1, wall_h, span)),
            (Vec3::new(-ARENA, 5.0, 0.0), Vec3::new(0.1, wall_h, span)),
        ] {
            list.cube_wires(center, size, colors::BLUE);
        }

        for obj in &self.objects {
            let b = &obj.body;
            match obj.shape {
                Shape::Sphere => {
                    list.sphere(b.pos, b.radius, obj.color);
                    list.sphere_wires(b.pos, b.radius, 8, 8, colors::BLACK);
                }
                Shape::Cube => {
                    let size = Vec3::splat(b.radius * 2.0);
                    list.cube(b.pos, size, obj.color);
                    list.cube_wires(b.pos, size, colors::BLACK);
                }
            }
            if self.show_vectors {
                let tip = b.pos + b.vel * 0.2;
                list.line_3d(b.pos, tip, colors::RED);
                list.sphere(tip, 0.1, colors::RED);
            }
        }
        list.end_3d();

        list.rect(Rect::new(10.0, 10.0, 320.0, 160.0), rgba(0, 0, 0, 150));
        list.text("3D PHYSICS PLAYGROUND", 20.0, 20.0, 20.0, colors::WHITE);
        list.text(format!("Objects: {}", self.objects.len()), 20.0, 50.0, 16.0, colors::WHITE);
        let help = [
            "B - Spawn Ball",
            "N - Spawn Box",
            "V - Toggle Vectors",
            "C - Clear All",
            "SPACE - Pause",
        ];
        for (i, line) in help.iter().enumerate() {
            list.text(*line, 20.0, 75.0 + i as f32 * 20.0, 14.0, colors::LIGHTGRAY);
        }
        let (status, color) = if self.paused {
            ("PAUSED", colors::YELLOW)
        } else {
            ("RUNNING", colors::GREEN)
        };
        list.text(status, SCREEN.x - 100.0, 20.0, 20.0, color);
    }

    fn summary(&self) -> String {
        format!("{} objects{}", self.objects.len(), if self.paused { ", paused" } else { "" })
    }
}
