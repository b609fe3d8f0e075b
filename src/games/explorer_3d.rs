//! Walk and jump a cube around a field of blocks in first or third person

use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};

use super::{Game, GameId};
use crate::platform::{InputState, Key};
use crate::renderer::{Camera3D, Color, DrawList, colors, fade, rgb};
use crate::sim::volume::{Aabb3, Push, resolve_min_penetration};

const SCREEN: Vec2 = Vec2::new(1200.0, 800.0);
const GRAVITY: f32 = -20.0;
const SPEED: f32 = 10.0;
const JUMP_VELOCITY: f32 = 10.0;
/// Radians per pixel
const MOUSE_SENSITIVITY: f32 = 0.005;
const PLAYER_SIZE: f32 = 2.0;
const HALF: f32 = PLAYER_SIZE / 2.0;
const WORLD_LIMIT: f32 = 50.0;
const CHASE_DISTANCE: f32 = 12.0;
const CHASE_LIFT: f32 = 5.0;
const GROUND: Color = rgb(50, 50, 50);

const OBSTACLES: [(Vec3, f32, Color); 3] = [
    (Vec3::new(15.0, 1.5, -5.0), 3.0, colors::BLUE),
    (Vec3::new(-10.0, 4.0, 20.0), 8.0, colors::ORANGE),
    (Vec3::new(-20.0, 2.5, -20.0), 5.0, colors::GREEN),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    ThirdPerson,
    FirstPerson,
}

impl View {
    fn label(self) -> &'static str {
        match self {
            View::ThirdPerson => "THIRD",
            View::FirstPerson => "FIRST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub pos: Vec3,
    pub vel_y: f32,
    pub grounded: bool,
    /// Heading about Y; zero faces +Z
    pub yaw: f32,
}

impl Player {
    fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, self.yaw.cos())
    }

    fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }
}

pub struct Explorer3d {
    pub player: Player,
    pub pitch: f32,
    pub view: View,
}

impl Explorer3d {
    pub fn new() -> Self {
        Self {
            player: Player {
                pos: Vec3::new(0.0, HALF, 0.0),
                vel_y: 0.0,
                grounded: true,
                yaw: 0.0,
            },
            pitch: 0.0,
            view: View::default(),
        }
    }

    /// Horizontal walking relative to the heading, plus jumping
    fn walk(&mut self, input: &InputState, dt: f32) {
        let p = &mut self.player;
        let forward = p.forward() * input.axis(&[Key::S], &[Key::W]);
        // Strafing runs opposite the right vector
        let strafe = p.right() * input.axis(&[Key::D], &[Key::A]);
        let dir = forward + strafe;
        if dir.length_squared() > 1e-4 {
            p.pos += dir.normalize() * SPEED * dt;
        }
        if input.is_pressed(Key::Space) && p.grounded {
            p.vel_y = JUMP_VELOCITY;
            p.grounded = false;
        }
    }

    fn fall(&mut self, dt: f32) {
        let p = &mut self.player;
        p.vel_y += GRAVITY * dt;
        p.pos.y += p.vel_y * dt;
    }

    /// Ground, world edge, then each obstacle along its shallowest axis
    fn collide(&mut self) {
        let p = &mut self.player;
        p.grounded = false;
        if p.pos.y <= HALF {
            p.pos.y = HALF;
            p.vel_y = 0.0;
            p.grounded = true;
        }
        p.pos.x = p.pos.x.clamp(-WORLD_LIMIT, WORLD_LIMIT);
        p.pos.z = p.pos.z.clamp(-WORLD_LIMIT, WORLD_LIMIT);

        for (center, size, _) in OBSTACLES {
            let mut bounds = Aabb3::cube(p.pos, PLAYER_SIZE);
            match resolve_min_penetration(&mut bounds, &Aabb3::cube(center, size)) {
                Push::None | Push::Side => {}
                Push::Landed => {
                    p.grounded = true;
                    p.vel_y = 0.0;
                }
                Push::Ceiling => p.vel_y = 0.0,
            }
            p.pos = bounds.center;
        }
    }

    fn look(&mut self, input: &InputState) {
        let d = input.mouse_delta;
        self.player.yaw += d.x * MOUSE_SENSITIVITY;
        self.pitch = (self.pitch - d.y * MOUSE_SENSITIVITY).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Unit view direction from heading and pitch
    pub fn look_dir(&self) -> Vec3 {
        let (sy, cy) = self.player.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, cy * cp).normalize_or_zero()
    }

    pub fn camera(&self) -> Camera3D {
        let eye = self.player.pos + Vec3::new(0.0, HALF * 0.5, 0.0);
        let look = self.look_dir();
        match self.view {
            View::ThirdPerson => {
                let position = eye - look * CHASE_DISTANCE + Vec3::new(0.0, CHASE_LIFT, 0.0);
                Camera3D::new(position, self.player.pos, 60.0)
            }
            View::FirstPerson => Camera3D::new(eye, eye + look, 60.0),
        }
    }
}

impl Default for Explorer3d {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Explorer3d {
    fn id(&self) -> GameId {
        GameId::Explorer3d
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        if input.is_pressed(Key::C) {
            self.view = match self.view {
                View::ThirdPerson => View::FirstPerson,
                View::FirstPerson => View::ThirdPerson,
            };
        }
        self.walk(input, dt);
        self.fall(dt);
        self.collide();
        self.look(input);
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::BLACK);

        list.begin_3d(self.camera());
        list.grid(100, 1.0);
        list.plane(Vec3::ZERO, Vec2::splat(100.0), GROUND);
        if self.view == View::ThirdPerson {
            let size = Vec3::splat(PLAYER_SIZE);
            list.cube_rotated(self.player.pos, size, self.player.yaw, colors::RED);
            list.cube_wires_rotated(self.player.pos, size, self.player.yaw, colors::DARKGRAY);
        }
        for (center, size, color) in OBSTACLES {
            list.cube(center, Vec3::splat(size), color);
            list.cube_wires(center, Vec3::splat(size), fade(color, 0.5));
        }
        list.end_3d();

        let mode_color = match self.view {
            View::FirstPerson => colors::YELLOW,
            View::ThirdPerson => colors::GREEN,
        };
        list.text(
            format!("Camera Mode: {} PERSON (Press C to switch)", self.view.label()),
            10.0,
            10.0,
            20.0,
            mode_color,
        );
        list.text("Controls:", 10.0, 40.0, 20.0, colors::WHITE);
        list.text(" - WASD: Move Character (Relative to view)", 10.0, 60.0, 20.0, colors::BLUE);
        list.text(" - SPACE: Jump", 10.0, 80.0, 20.0, colors::BLUE);
        list.text(" - MOUSE: Look Around", 10.0, 100.0, 20.0, colors::RED);
        list.text(" - C: Toggle Camera Mode", 10.0, 120.0, 20.0, colors::RED);
        list.text(
            format!("Grounded: {}", self.player.grounded),
            SCREEN.x - 200.0,
            10.0,
            20.0,
            colors::GREEN,
        );
    }

    fn summary(&self) -> String {
        let p = self.player.pos;
        format!("player at ({:.1}, {:.1}, {:.1}), grounded: {}", p.x, p.y, p.z, self.player.grounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(game: &mut Explorer3d, input: &InputState, steps: usize) {
        for _ in 0..steps {
            game.update(input, DT);
        }
    }

    #[test]
    fn test_ground_is_drawn_in_both_views() {
        let mut game = Explorer3d::new();
        for _ in 0..2 {
            let mut list = DrawList::new();
            game.draw(&mut list);
            let verts = crate::renderer::tessellate(&list, SCREEN);
            assert!(verts.iter().any(|v| v.color == GROUND), "{:?}", game.view);
            game.update(&InputState::pressing(&[Key::C]), DT);
        }
        assert_eq!(game.view, View::ThirdPerson);
    }

    #[test]
    fn test_walk_forward_along_z() {
        let mut game = Explorer3d::new();
        run(&mut game, &InputState::holding(&[Key::W]), 60);
        let p = game.player.pos;
        assert!((p.z - SPEED).abs() < 1e-3);
        assert!(p.x.abs() < 1e-4);
        assert_eq!(p.y, HALF);
        assert!(game.player.grounded);
    }

    #[test]
    fn test_strafe_keys_are_mirrored() {
        let mut game = Explorer3d::new();
        run(&mut game, &InputState::holding(&[Key::D]), 30);
        assert!(game.player.pos.x < -4.9);

        let mut game = Explorer3d::new();
        run(&mut game, &InputState::holding(&[Key::A]), 30);
        assert!(game.player.pos.x > 4.9);
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let mut game = Explorer3d::new();
        run(&mut game, &InputState::holding(&[Key::W, Key::A]), 60);
        let flat = Vec2::new(game.player.pos.x, game.player.pos.z);
        assert!((flat.length() - SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_jump_and_land() {
        let mut game = Explorer3d::new();
        game.update(&InputState::pressing(&[Key::Space]), DT);
        assert!(!game.player.grounded);
        assert!(game.player.pos.y > HALF);

        let idle = InputState::default();
        let mut peak = 0.0f32;
        for _ in 0..120 {
            game.update(&idle, DT);
            peak = peak.max(game.player.pos.y);
        }
        // v^2 / 2g = 2.5 above the start
        assert!((peak - HALF - 2.5).abs() < 0.2, "peak {peak}");
        assert_eq!(game.player.pos.y, HALF);
        assert!(game.player.grounded);
    }

    #[test]
    fn test_no_jump_in_mid_air() {
        let mut game = Explorer3d::new();
        game.player.pos.y = 10.0;
        game.player.grounded = false;
        game.update(&InputState::pressing(&[Key::Space]), DT);
        assert!(game.player.vel_y < 0.0);
    }

    #[test]
    fn test_lands_on_obstacle_top() {
        let mut game = Explorer3d::new();
        game.player.pos = Vec3::new(15.0, 6.0, -5.0);
        run(&mut game, &InputState::default(), 90);
        let p = game.player;
        assert!(p.grounded);
        assert!((p.pos.y - (3.0 + HALF)).abs() < 0.05, "y = {}", p.pos.y);
    }

    #[test]
    fn test_wall_blocks_walking() {
        let mut game = Explorer3d::new();
        // Orange tower spans z in 16..24; walk into its south face
        game.player.pos = Vec3::new(-10.0, HALF, 10.0);
        run(&mut game, &InputState::holding(&[Key::W]), 120);
        assert!((game.player.pos.z - (16.0 - HALF)).abs() < 0.2);
        assert_eq!(game.player.pos.y, HALF);
    }

    #[test]
    fn test_world_edge_clamps() {
        let mut game = Explorer3d::new();
        run(&mut game, &InputState::holding(&[Key::S]), 600);
        assert_eq!(game.player.pos.z, -WORLD_LIMIT);
    }

    #[test]
    fn test_camera_modes() {
        let mut game = Explorer3d::new();
        let cam = game.camera();
        assert_eq!(cam.target, game.player.pos);
        assert!((cam.position - Vec3::new(0.0, 6.5, -12.0)).length() < 1e-4);

        game.update(&InputState::pressing(&[Key::C]), DT);
        assert_eq!(game.view, View::FirstPerson);
        let cam = game.camera();
        assert_eq!(cam.position, game.player.pos + Vec3::new(0.0, 0.5, 0.0));
        assert!((cam.forward() - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut game = Explorer3d::new();
        let mut input = InputState::default();
        input.mouse_moved(Vec2::ZERO, Vec2::new(0.0, -10_000.0));
        game.update(&input, DT);
        assert_eq!(game.pitch, FRAC_PI_2);
    }
}
