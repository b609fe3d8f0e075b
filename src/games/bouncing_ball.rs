//! A ball bouncing around the window

use glam::Vec2;

use super::{Game, GameId};
use crate::platform::InputState;
use crate::renderer::{DrawList, colors};
use crate::sim::collision::bounce_in_bounds;

const SCREEN: Vec2 = Vec2::new(800.0, 450.0);
const RADIUS: f32 = 25.0;
const START_VEL: Vec2 = Vec2::new(200.0, 150.0);

pub struct BouncingBall {
    pub pos: Vec2,
    pub vel: Vec2,
    pub bounces: u32,
}

impl Default for BouncingBall {
    fn default() -> Self {
        Self::new()
    }
}

impl BouncingBall {
    pub fn new() -> Self {
        Self {
            pos: SCREEN / 2.0,
            vel: START_VEL,
            bounces: 0,
        }
    }
}

impl Game for BouncingBall {
    fn id(&self) -> GameId {
        GameId::BouncingBall
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, _input: &InputState, dt: f32) {
        self.pos += self.vel * dt;
        if bounce_in_bounds(&mut self.pos, &mut self.vel, RADIUS, SCREEN) {
            self.bounces += 1;
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::RAYWHITE);
        list.circle(self.pos.floor(), RADIUS, colors::GOLD);
        list.text("Bouncing ball: press ESC to close.", 10.0, 10.0, 20.0, colors::DARKGRAY);
    }

    fn summary(&self) -> String {
        format!("ball at ({:.0}, {:.0}), {} bounces", self.pos.x, self.pos.y, self.bounces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stays_inside_window() {
        let mut game = BouncingBall::new();
        let input = InputState::default();
        for _ in 0..6000 {
            game.update(&input, 1.0 / 60.0);
            assert!(game.pos.x >= RADIUS && game.pos.x <= SCREEN.x - RADIUS);
            assert!(game.pos.y >= RADIUS && game.pos.y <= SCREEN.y - RADIUS);
        }
        assert!(game.bounces > 0);
        assert!((game.vel.x.abs() - 200.0).abs() < 0.001);
        assert!((game.vel.y.abs() - 150.0).abs() < 0.001);
    }

    #[test]
    fn test_right_wall_flips_vx() {
        let mut game = BouncingBall::new();
        game.pos = Vec2::new(770.0, 200.0);
        game.update(&InputState::default(), 0.1);
        assert_eq!(game.pos.x, 775.0);
        assert!(game.vel.x < 0.0);
    }
}
