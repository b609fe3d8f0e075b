//! Steer a circle into a goal square that jumps elsewhere when reached

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId};
use crate::platform::{InputState, Key};
use crate::renderer::{Color, DrawList, colors, rgb};
use crate::sim::collision::Rect;
use crate::seeded_rng;

const SCREEN: Vec2 = Vec2::new(800.0, 450.0);
const PLAYER_SIZE: f32 = 40.0;
const PLAYER_SPEED: f32 = 300.0;
const GOAL_SIZE: f32 = 50.0;
const HIT_COLOR: Color = rgb(255, 100, 0);

pub struct PlayerGoal {
    pub player: Vec2,
    pub goal: Vec2,
    pub score: u32,
    /// Player touched the goal this step
    pub hit: bool,
    rng: Pcg32,
}

impl PlayerGoal {
    pub fn new(seed: u64) -> Self {
        Self {
            player: Vec2::new(50.0, SCREEN.y / 2.0),
            goal: Vec2::new(SCREEN.x - 50.0, SCREEN.y / 2.0),
            score: 0,
            hit: false,
            rng: seeded_rng(seed),
        }
    }

    fn player_rect(&self) -> Rect {
        Rect::from_center(self.player, Vec2::splat(PLAYER_SIZE))
    }

    fn goal_rect(&self) -> Rect {
        Rect::from_center(self.goal, Vec2::splat(GOAL_SIZE))
    }

    fn reposition_goal(&mut self) {
        let s = GOAL_SIZE as i32;
        self.goal = Vec2::new(
            self.rng.random_range(s..=SCREEN.x as i32 - s) as f32,
            self.rng.random_range(s..=SCREEN.y as i32 - s) as f32,
        );
    }
}

impl Game for PlayerGoal {
    fn id(&self) -> GameId {
        GameId::PlayerGoal
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        let dir = Vec2::new(
            input.axis(&[Key::Left, Key::A], &[Key::Right, Key::D]),
            input.axis(&[Key::Up, Key::W], &[Key::Down, Key::S]),
        );
        self.player += dir * PLAYER_SPEED * dt;
        let half = PLAYER_SIZE / 2.0;
        self.player = self.player.clamp(Vec2::splat(half), SCREEN - half);

        self.hit = self.player_rect().overlaps(&self.goal_rect());
        if self.hit {
            self.reposition_goal();
            self.score += 1;
            log::debug!("Goal reached, score {}", self.score);
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::RAYWHITE);
        list.rect(self.goal_rect(), colors::GREEN);
        let color = if self.hit { HIT_COLOR } else { colors::BLUE };
        list.circle(self.player.floor(), PLAYER_SIZE / 2.0, color);
        list.text(format!("Score: {}", self.score), 10.0, 10.0, 30.0, colors::DARKGRAY);
        list.text("Use WASD or Arrows to move!", 10.0, SCREEN.y - 30.0, 20.0, colors::MAROON);
    }

    fn summary(&self) -> String {
        format!("score {}", self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_clamped_to_window() {
        let mut game = PlayerGoal::new(1);
        let input = InputState::holding(&[Key::Left, Key::Up]);
        for _ in 0..200 {
            game.update(&input, 1.0 / 60.0);
        }
        assert_eq!(game.player, Vec2::splat(20.0));
    }

    #[test]
    fn test_reaching_goal_scores_and_moves_it() {
        let mut game = PlayerGoal::new(3);
        game.player = game.goal - Vec2::new(40.0, 0.0);
        game.update(&InputState::default(), 1.0 / 60.0);
        assert!(game.hit);
        assert_eq!(game.score, 1);
        assert!(game.goal.x >= GOAL_SIZE && game.goal.x <= SCREEN.x - GOAL_SIZE);
        assert!(game.goal.y >= GOAL_SIZE && game.goal.y <= SCREEN.y - GOAL_SIZE);
        assert_eq!(game.goal.fract(), Vec2::ZERO);
    }

    #[test]
    fn test_walking_right_reaches_first_goal() {
        let mut game = PlayerGoal::new(5);
        let input = InputState::holding(&[Key::D]);
        for _ in 0..180 {
            game.update(&input, 1.0 / 60.0);
            if game.score > 0 {
                break;
            }
        }
        assert_eq!(game.score, 1);
    }
}
