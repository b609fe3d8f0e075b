//! Flappy bird: flap through gaps in scrolling pipes

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId, Phase};
use crate::platform::{InputState, Key, MouseButton};
use crate::renderer::{DrawList, colors};
use crate::sim::collision::{Rect, circle_rect_overlap};
use crate::seeded_rng;

const SCREEN: Vec2 = Vec2::new(800.0, 600.0);
const GRAVITY: f32 = 1800.0;
const FLAP_VELOCITY: f32 = -500.0;
const MAX_FALL_SPEED: f32 = 1000.0;
const PIPE_SPEED: f32 = 250.0;
const PIPE_WIDTH: f32 = 70.0;
const PIPE_GAP: f32 = 180.0;
const PIPE_SPAWN_INTERVAL: f32 = 1.6;
const BIRD_RADIUS: f32 = 20.0;
/// Decorative ground strip height
const GROUND_H: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    pub x: f32,
    pub gap_center: f32,
    pub scored: bool,
}

impl Pipe {
    pub fn top(&self) -> Rect {
        Rect::new(self.x, 0.0, PIPE_WIDTH, self.gap_center - PIPE_GAP / 2.0)
    }

    pub fn bottom(&self) -> Rect {
        let y = self.gap_center + PIPE_GAP / 2.0;
        Rect::new(self.x, y, PIPE_WIDTH, SCREEN.y - y)
    }

    fn hits(&self, bird: Vec2) -> bool {
        circle_rect_overlap(bird, BIRD_RADIUS, &self.top())
            || circle_rect_overlap(bird, BIRD_RADIUS, &self.bottom())
    }
}

pub struct Flappy {
    pub phase: Phase,
    pub bird: Vec2,
    pub bird_vel: f32,
    pub pipes: Vec<Pipe>,
    pub pipe_timer: f32,
    pub score: u32,
    rng: Pcg32,
}

impl Flappy {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: Phase::Ready,
            bird: Vec2::new(SCREEN.x / 4.0, SCREEN.y / 2.0),
            bird_vel: 0.0,
            pipes: Vec::new(),
            pipe_timer: PIPE_SPAWN_INTERVAL,
            score: 0,
            rng: seeded_rng(seed),
        }
    }

    fn reset(&mut self) {
        self.phase = Phase::Ready;
        self.bird = Vec2::new(SCREEN.x / 4.0, SCREEN.y / 2.0);
        self.bird_vel = 0.0;
        self.pipes.clear();
        self.pipe_timer = PIPE_SPAWN_INTERVAL;
        self.score = 0;
        log::info!("Restarted");
    }

    fn flap_requested(input: &InputState) -> bool {
        input.is_pressed(Key::Space) || input.is_pressed(Key::Up) || input.is_button_pressed(MouseButton::Left)
    }

    fn step_bird(&mut self, dt: f32) {
        self.bird_vel += GRAVITY * dt;
        self.bird.y += self.bird_vel * dt;
        self.bird_vel = self.bird_vel.min(MAX_FALL_SPEED);
        if self.bird.y - BIRD_RADIUS <= 0.0 {
            self.bird.y = BIRD_RADIUS;
            self.bird_vel = 0.0;
        }
    }

    fn step_pipes(&mut self, dt: f32) -> bool {
        self.pipe_timer -= dt;
        if self.pipe_timer <= 0.0 {
            let gap_center = self.rng.random_range(PIPE_GAP..=SCREEN.y - PIPE_GAP);
            self.pipes.push(Pipe {
                x: SCREEN.x,
                gap_center,
                scored: false,
            });
            self.pipe_timer = PIPE_SPAWN_INTERVAL;
        }

        let mut crashed = false;
        let bird_left = self.bird.x - BIRD_RADIUS;
        for pipe in &mut self.pipes {
            pipe.x -= PIPE_SPEED * dt;
            crashed |= pipe.hits(self.bird);
            if !pipe.scored && pipe.x + PIPE_WIDTH < bird_left {
                pipe.scored = true;
                self.score += 1;
            }
        }
        self.pipes.retain(|p| p.x + PIPE_WIDTH >= 0.0);
        crashed
    }
}

impl Game for Flappy {
    fn id(&self) -> GameId {
        GameId::Flappy
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        match self.phase {
            Phase::Ready => {
                if Self::flap_requested(input) {
                    self.bird_vel = FLAP_VELOCITY;
                    self.phase = Phase::Playing;
                }
            }
            Phase::Playing => {
                if Self::flap_requested(input) {
                    self.bird_vel = FLAP_VELOCITY;
                }
                self.step_bird(dt);
                let crashed = self.step_pipes(dt);
                let floored = self.bird.y + BIRD_RADIUS >= SCREEN.y;
                if floored {
                    self.bird.y = SCREEN.y - BIRD_RADIUS;
                }
                if crashed || floored {
                    self.phase = Phase::GameOver;
                    log::info!("Crashed with score {}", self.score);
                }
            }
            _ => {
                if input.is_pressed(Key::Enter) || input.is_pressed(Key::Space) {
                    self.reset();
                }
            }
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::SKYBLUE);
        for pipe in &self.pipes {
            for r in [pipe.top(), pipe.bottom()] {
                list.rect(r, colors::DARKGREEN);
                list.rect_lines(r, 1.0, colors::BLACK);
            }
        }
        list.rect(Rect::new(0.0, SCREEN.y - GROUND_H, SCREEN.x, GROUND_H), colors::BROWN);

        let bird = self.bird.floor();
        list.circle(bird, BIRD_RADIUS, colors::YELLOW);
        list.circle(bird + Vec2::new(5.0, -5.0), 4.0, colors::BLACK);

        list.text(format!("Score: {}", self.score), 10.0, 10.0, 30.0, colors::WHITE);
        let cx = SCREEN.x / 2.0;
        let cy = SCREEN.y / 2.0;
        match self.phase {
            Phase::Ready => list.text_centered("Press SPACE or Click to Start", cx, cy, 40.0, colors::WHITE),
            Phase::GameOver => {
                list.text_centered("GAME OVER", cx, cy - 80.0, 60.0, colors::RED);
                list.text_centered(&format!("Final Score: {}", self.score), cx, cy + 10.0, 40.0, colors::WHITE);
                list.text_centered("Press ENTER to Restart", cx, cy + 70.0, 20.0, colors::GRAY);
            }
            _ => {}
        }
    }

    fn summary(&self) -> String {
        format!("{:?}, score {}", self.phase, self.score)
    }
}
