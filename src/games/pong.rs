//! Pong against a chasing CPU paddle, or two players on one keyboard

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId};
use crate::platform::{InputState, Key};
use crate::renderer::{DrawList, colors};
use crate::sim::collision::{Rect, circle_rect_overlap};
use crate::{move_toward, seeded_rng};

const SCREEN: Vec2 = Vec2::new(1000.0, 600.0);
const BALL_RADIUS: f32 = 10.0;
const PADDLE_W: f32 = 15.0;
const PADDLE_H: f32 = 90.0;
const PADDLE_MARGIN: f32 = 20.0;
/// Horizontal speed multiplier per paddle hit
const HIT_BOOST: f32 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    VsCpu,
    TwoPlayer,
}

impl Mode {
    fn ball_speed(self) -> f32 {
        match self {
            Mode::VsCpu => 300.0,
            Mode::TwoPlayer => 350.0,
        }
    }

    fn paddle_speed(self) -> f32 {
        match self {
            Mode::VsCpu => 400.0,
            Mode::TwoPlayer => 500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub rect: Rect,
}

impl Paddle {
    fn new(x: f32) -> Self {
        Self {
            rect: Rect::new(x, SCREEN.y / 2.0 - PADDLE_H / 2.0, PADDLE_W, PADDLE_H),
        }
    }

    fn shift(&mut self, dy: f32) {
        self.rect.y = (self.rect.y + dy).clamp(0.0, SCREEN.y - PADDLE_H);
    }
}

pub struct Pong {
    mode: Mode,
    pub ball: Vec2,
    pub ball_vel: Vec2,
    /// Left paddle (player / P1)
    pub left: Paddle,
    /// Right paddle (CPU / P2)
    pub right: Paddle,
    pub left_score: u32,
    pub right_score: u32,
    rng: Pcg32,
}

impl Pong {
    pub fn new(mode: Mode, seed: u64) -> Self {
        let mut pong = Self {
            mode,
            ball: SCREEN / 2.0,
            ball_vel: Vec2::ZERO,
            left: Paddle::new(PADDLE_MARGIN),
            right: Paddle::new(SCREEN.x - PADDLE_MARGIN - PADDLE_W),
            left_score: 0,
            right_score: 0,
            rng: seeded_rng(seed),
        };
        pong.serve();
        pong
    }

    /// Centre the ball and pick a random diagonal
    fn serve(&mut self) {
        let speed = self.mode.ball_speed();
        self.ball = (SCREEN / 2.0).floor();
        let sx = if self.rng.random_bool(0.5) { speed } else { -speed };
        let sy = if self.rng.random_bool(0.5) { speed } else { -speed };
        self.ball_vel = Vec2::new(sx, sy);
    }

    fn move_paddles(&mut self, input: &InputState, dt: f32) {
        let step = self.mode.paddle_speed() * dt;
        match self.mode {
            Mode::VsCpu => {
                let dir = input.axis(&[Key::W, Key::Up], &[Key::S, Key::Down]);
                self.left.shift(dir * step);
                let center = self.right.rect.center().y;
                let target = move_toward(center, self.ball.y, step);
                self.right.shift(target - center);
            }
            Mode::TwoPlayer => {
                self.left.shift(input.axis(&[Key::W], &[Key::S]) * step);
                self.right.shift(input.axis(&[Key::Up], &[Key::Down]) * step);
            }
        }
    }

    fn bounce_off_paddles(&mut self) {
        if self.ball_vel.x < 0.0 && circle_rect_overlap(self.ball, BALL_RADIUS, &self.left.rect) {
            self.ball_vel.x = -self.ball_vel.x * HIT_BOOST;
            self.ball.x = self.left.rect.right() + BALL_RADIUS;
        } else if self.ball_vel.x > 0.0
            && circle_rect_overlap(self.ball, BALL_RADIUS, &self.right.rect)
        {
            self.ball_vel.x = -self.ball_vel.x * HIT_BOOST;
            self.ball.x = self.right.rect.x - BALL_RADIUS;
        }
    }
}

impl Game for Pong {
    fn id(&self) -> GameId {
        match self.mode {
            Mode::VsCpu => GameId::Pong,
            Mode::TwoPlayer => GameId::PongTwoPlayer,
        }
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        self.move_paddles(input, dt);

        self.ball += self.ball_vel * dt;
        if self.ball.y - BALL_RADIUS <= 0.0 {
            self.ball_vel.y = self.ball_vel.y.abs();
        } else if self.ball.y + BALL_RADIUS >= SCREEN.y {
            self.ball_vel.y = -self.ball_vel.y.abs();
        }
        self.bounce_off_paddles();

        if self.ball.x + BALL_RADIUS >= SCREEN.x {
            self.left_score += 1;
            log::debug!("Left scores: {} - {}", self.left_score, self.right_score);
            self.serve();
        } else if self.ball.x - BALL_RADIUS <= 0.0 {
            self.right_score += 1;
            log::debug!("Right scores: {} - {}", self.left_score, self.right_score);
            self.serve();
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::BLACK);
        let mid = SCREEN.x / 2.0;
        list.line(Vec2::new(mid, 0.0), Vec2::new(mid, SCREEN.y), 1.0, colors::WHITE);
        list.rect(self.left.rect, colors::WHITE);
        list.rect(self.right.rect, colors::WHITE);
        list.circle(self.ball.floor(), BALL_RADIUS, colors::WHITE);

        let score = format!("{}  |  {}", self.left_score, self.right_score);
        list.text_centered(&score, mid, 20.0, 40.0, colors::WHITE);
        if self.mode == Mode::TwoPlayer {
            list.text("P1: W/S", 20.0, SCREEN.y - 30.0, 20.0, colors::GRAY);
            list.text("P2: Up/Down", SCREEN.x - 140.0, SCREEN.y - 30.0, 20.0, colors::GRAY);
        }
    }

    fn summary(&self) -> String {
        format!("{} - {}", self.left_score, self.right_score)
    }
}
