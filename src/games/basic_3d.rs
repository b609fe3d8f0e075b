//! Fly around a spinning cube on a grid

use glam::{Quat, Vec2, Vec3};

use super::{Game, GameId};
use crate::platform::{InputState, Key, MouseButton};
use crate::renderer::{Camera3D, DrawList, colors, rgb};

const SCREEN: Vec2 = Vec2::new(1000.0, 700.0);
const MOVE_SPEED: f32 = 15.0;
/// Radians of orbit per pixel of horizontal drag
const ORBIT_SENSITIVITY: f32 = 0.005;
const CUBE_POS: Vec3 = Vec3::new(0.0, 2.5, 0.0);
const CUBE_SIZE: f32 = 5.0;
/// Degrees per second
const SPIN_RATE: f32 = 20.0;
const SPHERE_POS: Vec3 = Vec3::new(10.0, 1.0, 10.0);

pub struct Basic3d {
    pub camera: Camera3D,
    /// Cube rotation in degrees
    pub spin: f32,
}

impl Basic3d {
    pub fn new() -> Self {
        Self {
            camera: Camera3D::new(Vec3::new(20.0, 10.0, 20.0), Vec3::ZERO, 45.0),
            spin: 0.0,
        }
    }

    /// Move position and target together along the flattened view axes
    fn fly(&mut self, input: &InputState, dt: f32) {
        let mut forward = self.camera.target - self.camera.position;
        forward.y = 0.0;
        let forward = forward.normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();

        let mut step = forward * input.axis(&[Key::S], &[Key::W]) + right * input.axis(&[Key::A], &[Key::D]);
        step.y += input.axis(&[Key::Q], &[Key::E]);
        let step = step * MOVE_SPEED * dt;
        self.camera.position += step;
        self.camera.target += step;
    }

    /// Swing the camera around its target about the up axis
    fn orbit(&mut self, input: &InputState) {
        if !(input.is_button_down(MouseButton::Right) || input.is_down(Key::LeftAlt)) {
            return;
        }
        let dx = input.mouse_delta.x;
        if dx == 0.0 {
            return;
        }
        let offset = self.camera.position - self.camera.target;
        let turn = Quat::from_rotation_y(-dx * ORBIT_SENSITIVITY);
        self.camera.position = self.camera.target + turn * offset;
    }
}

impl Default for Basic3d {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Basic3d {
    fn id(&self) -> GameId {
        GameId::Basic3d
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        self.fly(input, dt);
        self.orbit(input);
        self.spin = (self.spin + SPIN_RATE * dt) % 360.0;
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(rgb(20, 20, 30));
        list.begin_3d(self.camera);
        list.grid(30, 1.0);
        let angle = self.spin.to_radians();
        list.cube_rotated(CUBE_POS, Vec3::splat(CUBE_SIZE), angle, colors::RED);
        list.cube_wires_rotated(CUBE_POS, Vec3::splat(CUBE_SIZE), angle, colors::MAROON);
        list.sphere(SPHERE_POS, 1.0, colors::BLUE);
        list.end_3d();

        list.text("Controls: WASD/QE to move, right drag to orbit", 10.0, 10.0, 20.0, colors::RAYWHITE);
        list.text("Cube is rotating using matrix transformations.", 10.0, 35.0, 20.0, colors::GRAY);
        let p = self.camera.position;
        list.text(
            format!("Pos: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z),
            10.0,
            SCREEN.y - 30.0,
            20.0,
            colors::LIGHTGRAY,
        );
    }

    fn summary(&self) -> String {
        let p = self.camera.position;
        format!("camera at ({:.1}, {:.1}, {:.1}), cube at {:.0} deg", p.x, p.y, p.z, self.spin)
    }
}
