//! Sun, earth and moon driven by nested transforms

use glam::{Mat4, Vec2, Vec3};

use super::{Game, GameId};
use crate::platform::{InputState, Key};
use crate::renderer::{Camera3D, Color, DrawList, colors, rgb};
use crate::sim::hierarchy::{Transform, origin};

const SCREEN: Vec2 = Vec2::new(1000.0, 700.0);

// Degrees per second
const EARTH_ORBIT_RATE: f32 = 10.0;
const EARTH_SPIN_RATE: f32 = 150.0;
const MOON_ORBIT_RATE: f32 = 150.0;
const MOON_SPIN_RATE: f32 = 300.0;

const EARTH_ORBIT: f32 = 20.0;
const MOON_ORBIT: f32 = 5.0;
const SUN_RADIUS: f32 = 4.0;
const EARTH_RADIUS: f32 = 1.5;
const MOON_RADIUS: f32 = 0.5;

/// Radians per second
const CAMERA_TURN_RATE: f32 = 1.0;
const ZOOM_RATE: f32 = 40.0;
const ZOOM_PER_NOTCH: f32 = 5.0;
const HEIGHT_RATE: f32 = 20.0;
const MIN_DISTANCE: f32 = 10.0;
const MAX_DISTANCE: f32 = 300.0;

/// World frames of the moving bodies at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frames {
    pub earth: Mat4,
    pub moon: Mat4,
}

/// Compose earth and moon transforms at `t` seconds
pub fn frames_at(t: f32) -> Frames {
    let earth = Transform {
        orbit_deg: t * EARTH_ORBIT_RATE,
        offset: EARTH_ORBIT,
        spin_deg: t * EARTH_SPIN_RATE,
    }
    .world(&Mat4::IDENTITY);
    let moon = Transform {
        orbit_deg: t * MOON_ORBIT_RATE,
        offset: MOON_ORBIT,
        spin_deg: t * MOON_SPIN_RATE,
    }
    .world(&earth);
    Frames { earth, moon }
}

pub struct SolarSystem {
    pub time: f32,
    pub paused: bool,
    /// Camera angle around the sun in the XZ plane (radians)
    pub yaw: f32,
    /// Horizontal distance from the sun
    pub distance: f32,
    pub height: f32,
}

impl SolarSystem {
    pub fn new() -> Self {
        let start = Vec3::new(50.0, 50.0, 50.0);
        Self {
            time: 0.0,
            paused: false,
            yaw: start.z.atan2(start.x),
            distance: Vec2::new(start.x, start.z).length(),
            height: start.y,
        }
    }

    pub fn camera(&self) -> Camera3D {
        let (s, c) = self.yaw.sin_cos();
        let position = Vec3::new(c * self.distance, self.height, s * self.distance);
        Camera3D::new(position, Vec3::ZERO, 60.0)
    }

    fn steer_camera(&mut self, input: &InputState, dt: f32) {
        self.yaw += input.axis(&[Key::Left], &[Key::Right]) * CAMERA_TURN_RATE * dt;
        let zoom = input.axis(&[Key::W], &[Key::S]) * ZOOM_RATE * dt - input.wheel * ZOOM_PER_NOTCH;
        self.distance = (self.distance + zoom).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.height += input.axis(&[Key::E], &[Key::Q]) * HEIGHT_RATE * dt;
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_body(list: &mut DrawList, frame: &Mat4, radius: f32, color: Color) {
    let center = origin(frame);
    list.sphere(center, radius, color);
    // Marker along the body's local +X shows its spin
    list.line_3d(center, frame.transform_point3(Vec3::X * radius * 1.6), colors::WHITE);
}

impl Game for SolarSystem {
    fn id(&self) -> GameId {
        GameId::SolarSystem
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        if input.is_pressed(Key::Space) {
            self.paused = !self.paused;
        }
        self.steer_camera(input, dt);
        if !self.paused {
            self.time += dt;
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(rgb(10, 10, 25));
        let frames = frames_at(self.time);

        list.begin_3d(self.camera());
        list.grid(100, 10.0);
        let segments = 64;
        for i in 0..segments {
            let a = i as f32 / segments as f32 * std::f32::consts::TAU;
            let b = (i + 1) as f32 / segments as f32 * std::f32::consts::TAU;
            list.line_3d(
                Vec3::new(a.cos(), 0.0, -a.sin()) * EARTH_ORBIT,
                Vec3::new(b.cos(), 0.0, -b.sin()) * EARTH_ORBIT,
                colors::DARKGRAY,
            );
        }
        list.sphere(Vec3::ZERO, SUN_RADIUS, colors::YELLOW);
        draw_body(list, &frames.earth, EARTH_RADIUS, colors::BLUE);
        draw_body(list, &frames.moon, MOON_RADIUS, colors::GRAY);
        list.end_3d();

        list.text("3D Solar System Simulator", 10.0, 40.0, 20.0, colors::WHITE);
        list.text(
            "Arrows: Orbit | W/S or Wheel: Zoom | Q/E: Height | SPACE: Pause",
            10.0,
            70.0,
            20.0,
            colors::GRAY,
        );
        if self.paused {
            list.text("PAUSED", 10.0, 100.0, 20.0, colors::YELLOW);
        }
    }

    fn summary(&self) -> String {
        let earth = origin(&frames_at(self.time).earth);
        format!("t = {:.1}s, earth at ({:.1}, {:.1})", self.time, earth.x, earth.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_earth_quarter_orbit_after_nine_seconds() {
        let earth = origin(&frames_at(9.0).earth);
        assert!(earth.x.abs() < 1e-3);
        assert!((earth.z + EARTH_ORBIT).abs() < 1e-3);
    }

    #[test]
    fn test_moon_stays_on_its_orbit() {
        for t in [0.0, 0.7, 3.3, 12.0, 40.5] {
            let f = frames_at(t);
            let d = (origin(&f.moon) - origin(&f.earth)).length();
            assert!((d - MOON_ORBIT).abs() < 1e-3, "t={t} d={d}");
        }
    }

    #[test]
    fn test_moon_inherits_earth_spin() {
        // At t = 0.6 the earth has spun 90 degrees and the moon orbited 90 more,
        // so the moon sits 180 degrees around from the earth's +X side.
        let f = frames_at(0.6);
        let rel = origin(&f.moon) - origin(&f.earth);
        let earth_dir = origin(&f.earth).normalize();
        assert!(rel.dot(earth_dir) < -4.0);
    }

    #[test]
    fn test_pause_stops_time() {
        let mut game = SolarSystem::new();
        game.update(&InputState::pressing(&[Key::Space]), DT);
        assert!(game.paused);
        let t = game.time;
        game.update(&InputState::default(), DT);
        assert_eq!(game.time, t);
    }

    #[test]
    fn test_camera_starts_at_fifty_and_zoom_clamps() {
        let mut game = SolarSystem::new();
        let p = game.camera().position;
        assert!((p - Vec3::splat(50.0)).length() < 1e-3);

        let mut input = InputState::default();
        input.wheel_moved(100.0);
        game.update(&input, DT);
        assert_eq!(game.distance, MIN_DISTANCE);
        assert_eq!(game.camera().target, Vec3::ZERO);
    }
}
