//! Two-player platform shootout on one keyboard

use glam::Vec2;

use super::{Game, GameId, Phase};
use crate::platform::{InputState, Key};
use crate::renderer::{Color, DrawList, colors, fade, measure_text, rgb};
use crate::sim::collision::{Rect, move_and_collide};

const SCREEN: Vec2 = Vec2::new(800.0, 600.0);
const GRAVITY: f32 = 900.0;
const JUMP_VELOCITY: f32 = -500.0;
const MAX_FALL_SPEED: f32 = 1000.0;
const PLAYER_SPEED: f32 = 250.0;
const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 60.0);
const BULLET_SPEED: f32 = 600.0;
const BULLET_SIZE: Vec2 = Vec2::new(15.0, 5.0);
const MAX_HEALTH: u32 = 3;
const INVULN_TIME: f32 = 1.0;
const SHOT_COOLDOWN: f32 = 0.3;
const BACKGROUND: Color = rgb(30, 41, 59);

/// Floor, two side ledges, a centre ledge and two high ledges
pub fn arena() -> [Rect; 6] {
    let (w, h) = (SCREEN.x, SCREEN.y);
    [
        Rect::new(0.0, h - 40.0, w, 40.0),
        Rect::new(w / 4.0 - 80.0, h - 120.0, 160.0, 20.0),
        Rect::new(w * 3.0 / 4.0 - 80.0, h - 120.0, 160.0, 20.0),
        Rect::new(w / 2.0 - 120.0, h - 240.0, 240.0, 20.0),
        Rect::new(20.0, h - 350.0, 100.0, 20.0),
        Rect::new(w - 120.0, h - 350.0, 100.0, 20.0),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub left: Key,
    pub right: Key,
    pub jump: Key,
    pub shoot: Key,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fighter {
    pub rect: Rect,
    pub vel: Vec2,
    pub grounded: bool,
    pub health: u32,
    pub invuln: f32,
    pub cooldown: f32,
    /// +1 right, -1 left
    pub facing: f32,
    start: Vec2,
    controls: Controls,
    color: Color,
    bullet_color: Color,
}

impl Fighter {
    fn new(start: Vec2, controls: Controls, color: Color, bullet_color: Color) -> Self {
        Self {
            rect: Rect::new(start.x, start.y, PLAYER_SIZE.x, PLAYER_SIZE.y),
            vel: Vec2::ZERO,
            grounded: false,
            health: MAX_HEALTH,
            invuln: 0.0,
            cooldown: 0.0,
            facing: 1.0,
            start,
            controls,
            color,
            bullet_color,
        }
    }

    fn respawn(&mut self) {
        self.rect.x = self.start.x;
        self.rect.y = self.start.y;
        self.vel = Vec2::ZERO;
        self.grounded = false;
    }

    /// Costs one health and sends the fighter home unless still flashing
    fn take_hit(&mut self) -> bool {
        if self.invuln > 0.0 || self.health == 0 {
            return false;
        }
        self.health -= 1;
        self.invuln = INVULN_TIME;
        self.respawn();
        true
    }

    fn visible(&self) -> bool {
        self.invuln <= 0.0 || ((self.invuln * 10.0) as i32) % 2 == 0
    }

    /// Movement and physics; returns a bullet when one is fired
    fn step(&mut self, input: &InputState, platforms: &[Rect], dt: f32) -> Option<Bullet> {
        self.invuln = (self.invuln - dt).max(0.0);
        self.cooldown = (self.cooldown - dt).max(0.0);

        let c = self.controls;
        self.vel.x = 0.0;
        if input.is_down(c.left) {
            self.vel.x = -PLAYER_SPEED;
            self.facing = -1.0;
        }
        if input.is_down(c.right) {
            self.vel.x = PLAYER_SPEED;
            self.facing = 1.0;
        }
        if input.is_pressed(c.jump) && self.grounded {
            self.vel.y = JUMP_VELOCITY;
        }

        let mut shot = None;
        if input.is_pressed(c.shoot) && self.cooldown <= 0.0 {
            let center = self.rect.center();
            shot = Some(Bullet {
                rect: Rect::new(
                    center.x + self.facing * (self.rect.w / 2.0 + 5.0),
                    center.y - 2.0,
                    BULLET_SIZE.x,
                    BULLET_SIZE.y,
                ),
                vel_x: self.facing * BULLET_SPEED,
                color: self.bullet_color,
            });
            self.cooldown = SHOT_COOLDOWN;
        }

        self.vel.y = (self.vel.y + GRAVITY * dt).min(MAX_FALL_SPEED);
        let contact = move_and_collide(&mut self.rect, &mut self.vel, dt, |_| platforms.to_vec());
        self.grounded = contact.floor;
        self.rect.x = self.rect.x.clamp(0.0, SCREEN.x - self.rect.w);

        if self.rect.y > SCREEN.y + 100.0 {
            self.respawn();
            self.take_hit();
        }
        shot
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub rect: Rect,
    pub vel_x: f32,
    pub color: Color,
}

pub struct GunFight {
    pub phase: Phase,
    pub players: [Fighter; 2],
    /// Bullets with the index of the fighter that fired them
    pub bullets: Vec<(usize, Bullet)>,
    pub platforms: [Rect; 6],
    pub winner: Option<usize>,
}

impl GunFight {
    pub fn new() -> Self {
        let p1 = Controls {
            left: Key::A,
            right: Key::D,
            jump: Key::W,
            shoot: Key::Q,
        };
        let p2 = Controls {
            left: Key::Left,
            right: Key::Right,
            jump: Key::Up,
            shoot: Key::P,
        };
        Self {
            phase: Phase::Playing,
            players: [
                Fighter::new(Vec2::new(SCREEN.x * 0.25 - 16.0, SCREEN.y / 2.0), p1, colors::RED, colors::ORANGE),
                Fighter::new(Vec2::new(SCREEN.x * 0.75 - 16.0, SCREEN.y / 2.0), p2, colors::BLUE, colors::SKYBLUE),
            ],
            bullets: Vec::new(),
            platforms: arena(),
            winner: None,
        }
    }

    fn reset(&mut self) {
        for p in &mut self.players {
            p.health = MAX_HEALTH;
            p.invuln = 0.0;
            p.cooldown = 0.0;
            p.respawn();
        }
        self.bullets.clear();
        self.winner = None;
        self.phase = Phase::Playing;
        log::info!("New round");
    }

    fn update_bullets(&mut self, dt: f32) {
        let platforms = self.platforms;
        let players = &mut self.players;
        self.bullets.retain_mut(|(owner, b)| {
            b.rect.x += b.vel_x * dt;
            if b.rect.x < 0.0 || b.rect.x > SCREEN.x {
                return false;
            }
            if platforms.iter().any(|p| p.overlaps(&b.rect)) {
                return false;
            }
            let target = &mut players[1 - *owner];
            if target.health > 0 && target.rect.overlaps(&b.rect) {
                if target.take_hit() {
                    log::debug!("Player {} hit, health {}", 2 - *owner, target.health);
                }
                return false;
            }
            true
        });
    }

    fn check_knockout(&mut self) {
        if let Some(loser) = self.players.iter().position(|p| p.health == 0) {
            let winner = 1 - loser;
            self.winner = Some(winner);
            self.phase = Phase::GameOver;
            log::info!("Player {} wins", winner + 1);
        }
    }
}

impl Default for GunFight {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for GunFight {
    fn id(&self) -> GameId {
        GameId::GunFight
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        if self.phase != Phase::Playing {
            if input.any_pressed(&[Key::Enter, Key::Space]) {
                self.reset();
            }
            return;
        }
        for (i, p) in self.players.iter_mut().enumerate() {
            if p.health == 0 {
                continue;
            }
            if let Some(b) = p.step(input, &self.platforms, dt) {
                self.bullets.push((i, b));
            }
        }
        self.update_bullets(dt);
        self.check_knockout();
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(BACKGROUND);
        for p in &self.platforms {
            list.rect(*p, colors::RAYWHITE);
            list.rect_lines(*p, 2.0, colors::BLACK);
        }
        for p in &self.players {
            if p.health == 0 || !p.visible() {
                continue;
            }
            list.rect(p.rect, p.color);
            list.rect_lines(p.rect, 3.0, p.bullet_color);
            let c = p.rect.center();
            list.triangle(
                c,
                c + Vec2::new(10.0 * p.facing, -10.0),
                c + Vec2::new(10.0 * p.facing, 10.0),
                p.bullet_color,
            );
        }
        for (_, b) in &self.bullets {
            list.rect(b.rect, b.color);
        }

        let [p1, p2] = &self.players;
        list.text(format!("P1 Health: {}", p1.health), 10.0, 10.0, 25.0, p1.color);
        list.text("W/A/D | Q (Shoot)", 10.0, 35.0, 18.0, colors::WHITE);
        let health = format!("P2 Health: {}", p2.health);
        let hw = measure_text(&health, 25.0);
        list.text(health, SCREEN.x - hw - 10.0, 10.0, 25.0, p2.color);
        let hint = "ARROWS | P (Shoot)";
        list.text(hint, SCREEN.x - measure_text(hint, 18.0) - 10.0, 35.0, 18.0, colors::WHITE);

        if self.phase == Phase::GameOver {
            list.rect(Rect::new(0.0, 0.0, SCREEN.x, SCREEN.y), fade(colors::BLACK, 0.7));
            let title = match self.winner {
                Some(0) => "PLAYER 1 WINS!",
                Some(_) => "PLAYER 2 WINS!",
                None => "GAME OVER",
            };
            list.text_centered(title, SCREEN.x / 2.0, SCREEN.y / 2.0 - 40.0, 60.0, colors::YELLOW);
            list.text_centered("Press ENTER or SPACE to restart", SCREEN.x / 2.0, SCREEN.y / 2.0 + 20.0, 30.0, colors::WHITE);
        }
    }

    fn summary(&self) -> String {
        format!(
            "P1 health {}, P2 health {}, winner {:?}",
            self.players[0].health,
            self.players[1].health,
            self.winner.map(|w| w + 1)
        )
    }
}
