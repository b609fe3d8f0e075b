//! Breakout: clear the wall of bricks without dropping the ball

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId, Phase, banner};
use crate::platform::{InputState, Key};
use crate::renderer::{Color, DrawList, colors};
use crate::sim::collision::{Rect, circle_rect_overlap};
use crate::seeded_rng;

const SCREEN: Vec2 = Vec2::new(800.0, 600.0);
const PADDLE_W: f32 = 100.0;
const PADDLE_H: f32 = 20.0;
const PADDLE_SPEED: f32 = 500.0;
const BALL_RADIUS: f32 = 10.0;
const BALL_SPEED: f32 = 450.0;
/// Ball rests this far above the paddle before launch
const REST_OFFSET: f32 = 30.0;
/// Horizontal speed per pixel of offset from the paddle centre
const ANGLE_FACTOR: f32 = 5.0;
const SPEEDUP: f32 = 1.01;
const BRICK_POINTS: u32 = 10;

const BRICK_ROWS: usize = 5;
const BRICK_COLS: usize = 10;
const BRICK_W: f32 = 70.0;
const BRICK_H: f32 = 20.0;
const BRICK_GAP: f32 = 5.0;
const BRICK_OFFSET: Vec2 = Vec2::new(50.0, 50.0);
const ROW_COLORS: [Color; 6] = [
    colors::RED,
    colors::ORANGE,
    colors::YELLOW,
    colors::GREEN,
    colors::SKYBLUE,
    colors::BLUE,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brick {
    pub rect: Rect,
    pub color: Color,
    pub active: bool,
}

/// Brick grid, keeping only bricks inside the screen width and upper half
pub fn build_bricks() -> Vec<Brick> {
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
    for r in 0..BRICK_ROWS {
        for c in 0..BRICK_COLS {
            let x = BRICK_OFFSET.x + c as f32 * (BRICK_W + BRICK_GAP);
            let y = BRICK_OFFSET.y + r as f32 * (BRICK_H + BRICK_GAP);
            if x + BRICK_W <= SCREEN.x && y + BRICK_H <= SCREEN.y / 2.0 {
                bricks.push(Brick {
                    rect: Rect::new(x, y, BRICK_W, BRICK_H),
                    color: ROW_COLORS[r % ROW_COLORS.len()],
                    active: true,
                });
            }
        }
    }
    bricks
}

pub struct BrickBreaker {
    pub phase: Phase,
    pub paddle: Rect,
    pub ball: Vec2,
    pub ball_vel: Vec2,
    pub bricks: Vec<Brick>,
    pub score: u32,
    rng: Pcg32,
}

impl BrickBreaker {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            phase: Phase::Ready,
            paddle: Rect::new(0.0, 0.0, PADDLE_W, PADDLE_H),
            ball: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            bricks: Vec::new(),
            score: 0,
            rng: seeded_rng(seed),
        };
        game.reset();
        game
    }

    fn reset(&mut self) {
        let paddle = Rect::new(
            SCREEN.x / 2.0 - PADDLE_W / 2.0,
            SCREEN.y - PADDLE_H - 30.0,
            PADDLE_W,
            PADDLE_H,
        );
        self.phase = Phase::Ready;
        self.ball = Vec2::new(paddle.center().x, paddle.y - REST_OFFSET);
        self.paddle = paddle;
        self.ball_vel = Vec2::ZERO;
        self.bricks = build_bricks();
        self.score = 0;
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }

    fn move_paddle(&mut self, input: &InputState, dt: f32) {
        let dir = input.axis(&[Key::Left, Key::A], &[Key::Right, Key::D]);
        self.paddle.x = (self.paddle.x + dir * PADDLE_SPEED * dt).clamp(0.0, SCREEN.x - PADDLE_W);
    }

    fn launch(&mut self) {
        let vx = if self.rng.random_bool(0.5) { BALL_SPEED } else { -BALL_SPEED };
        self.ball_vel = Vec2::new(vx, -BALL_SPEED);
        self.phase = Phase::Playing;
        log::info!("Ball launched");
    }

    fn step_ball(&mut self, dt: f32) {
        self.ball += self.ball_vel * dt;

        if self.ball.x - BALL_RADIUS <= 0.0 {
            self.ball_vel.x = self.ball_vel.x.abs();
        } else if self.ball.x + BALL_RADIUS >= SCREEN.x {
            self.ball_vel.x = -self.ball_vel.x.abs();
        }
        if self.ball.y - BALL_RADIUS <= 0.0 {
            self.ball_vel.y = self.ball_vel.y.abs();
        }

        if self.ball_vel.y > 0.0 && circle_rect_overlap(self.ball, BALL_RADIUS, &self.paddle) {
            self.ball_vel.y = -self.ball_vel.y;
            self.ball_vel.x = (self.ball.x - self.paddle.center().x) * ANGLE_FACTOR;
        }

        // At most one brick per step
        if let Some(brick) = self
            .bricks
            .iter_mut()
            .find(|b| b.active && circle_rect_overlap(self.ball, BALL_RADIUS, &b.rect))
        {
            brick.active = false;
            self.ball_vel.y = -self.ball_vel.y;
            self.ball_vel *= SPEEDUP;
            self.score += BRICK_POINTS;
        }
    }
}

impl Game for BrickBreaker {
    fn id(&self) -> GameId {
        GameId::BrickBreaker
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        match self.phase {
            Phase::Ready => {
                self.move_paddle(input, dt);
                self.ball.x = self.paddle.center().x;
                if input.is_pressed(Key::Space) {
                    self.launch();
                }
            }
            Phase::Playing => {
                self.move_paddle(input, dt);
                self.step_ball(dt);
                if self.ball.y + BALL_RADIUS >= SCREEN.y {
                    self.phase = Phase::GameOver;
                    log::info!("Game over with {} points", self.score);
                } else if self.bricks_left() == 0 {
                    self.phase = Phase::Won;
                    log::info!("Wall cleared with {} points", self.score);
                }
            }
            Phase::GameOver | Phase::Won => {
                if input.is_pressed(Key::Enter) {
                    self.reset();
                    log::info!("Restarted");
                }
            }
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::BLACK);
        list.rect(self.paddle, colors::GREEN);
        list.circle(self.ball.floor(), BALL_RADIUS, colors::WHITE);
        for brick in self.bricks.iter().filter(|b| b.active) {
            list.rect(brick.rect, brick.color);
            list.rect_lines(brick.rect, 1.0, colors::BLACK);
        }

        list.text(format!("Score: {}", self.score), 10.0, 10.0, 20.0, colors::WHITE);
        let screen = self.screen_size();
        match self.phase {
            Phase::Ready => banner(list, screen, "Press SPACE to Start", "", colors::WHITE),
            Phase::GameOver => banner(list, screen, "GAME OVER", "Press ENTER to Restart", colors::RED),
            Phase::Won => banner(list, screen, "YOU WIN!", "Press ENTER to Restart", colors::GOLD),
            _ => {}
        }
        list.text("Controls: A/D or Left/Right", 10.0, SCREEN.y - 25.0, 15.0, colors::GRAY);
    }

    fn summary(&self) -> String {
        format!("{:?}, score {}, {} bricks left", self.phase, self.score, self.bricks_left())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_brick_layout() {
        let bricks = build_bricks();
        assert_eq!(bricks.len(), 50);
        assert!(bricks.iter().all(|b| b.rect.bottom() <= SCREEN.y / 2.0));
        assert_eq!(bricks[0].rect, Rect::new(50.0, 50.0, 70.0, 20.0));
        assert_eq!(bricks[10].color, colors::ORANGE);
    }

    #[test]
    fn test_ready_ball_rides_paddle_then_launches() {
        let mut game = BrickBreaker::new(7);
        game.update(&InputState::holding(&[Key::Right]), DT);
        assert_eq!(game.phase, Phase::Ready);
        assert_eq!(game.ball.x, game.paddle.center().x);
        assert_eq!(game.ball.y, game.paddle.y - REST_OFFSET);

        game.update(&InputState::pressing(&[Key::Space]), DT);
        assert_eq!(game.phase, Phase::Playing);
        assert_eq!(game.ball_vel.y, -BALL_SPEED);
        assert_eq!(game.ball_vel.x.abs(), BALL_SPEED);
    }

    #[test]
    fn test_paddle_hit_sets_angle_from_offset() {
        let mut game = BrickBreaker::new(1);
        game.phase = Phase::Playing;
        game.ball = Vec2::new(game.paddle.center().x + 20.0, game.paddle.y - 8.0);
        game.ball_vel = Vec2::new(0.0, 100.0);
        game.update(&InputState::default(), DT);
        assert!(game.ball_vel.y < 0.0);
        assert!((game.ball_vel.x - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_brick_hit_scores_once_per_step() {
        let mut game = BrickBreaker::new(1);
        game.phase = Phase::Playing;
        // Straddle two adjacent bricks in the bottom row
        let a = game.bricks[40].rect;
        game.ball = Vec2::new(a.right() + BRICK_GAP / 2.0, a.bottom() + 8.0);
        game.ball_vel = Vec2::new(0.0, -100.0);
        game.update(&InputState::default(), DT);
        assert_eq!(game.score, BRICK_POINTS);
        assert_eq!(game.bricks_left(), 49);
        assert!((game.ball_vel.y - 101.0).abs() < 0.01);
    }

    #[test]
    fn test_ball_below_screen_is_game_over_and_enter_restarts() {
        let mut game = BrickBreaker::new(1);
        game.phase = Phase::Playing;
        game.ball = Vec2::new(20.0, SCREEN.y - 5.0);
        game.ball_vel = Vec2::new(0.0, 100.0);
        game.update(&InputState::default(), DT);
        assert_eq!(game.phase, Phase::GameOver);

        game.update(&InputState::pressing(&[Key::Enter]), DT);
        assert_eq!(game.phase, Phase::Ready);
        assert_eq!(game.bricks_left(), 50);
    }

    #[test]
    fn test_launch_direction_varies_across_serves() {
        let mut game = BrickBreaker::new(5);
        let mut signs = Vec::new();
        for _ in 0..32 {
            game.update(&InputState::pressing(&[Key::Space]), DT);
            signs.push(game.ball_vel.x.signum());
            game.phase = Phase::GameOver;
            game.update(&InputState::pressing(&[Key::Enter]), DT);
        }
        assert!(signs.contains(&1.0) && signs.contains(&-1.0), "{signs:?}");
    }

    #[test]
    fn test_last_brick_wins() {
        let mut game = BrickBreaker::new(1);
        game.phase = Phase::Playing;
        for b in game.bricks.iter_mut().skip(1) {
            b.active = false;
        }
        let target = game.bricks[0].rect;
        game.ball = Vec2::new(target.center().x, target.bottom() + 8.0);
        game.ball_vel = Vec2::new(0.0, -100.0);
        game.update(&InputState::default(), DT);
        assert_eq!(game.phase, Phase::Won);
    }
}
