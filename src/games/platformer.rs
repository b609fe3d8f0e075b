//! Tile platformers: a single screen, a scrolling level, and a level with
//! coins and stompable enemies

use glam::Vec2;

use super::{Game, GameId};
use crate::error::Result;
use crate::platform::{InputState, Key};
use crate::renderer::{Camera2D, DrawList, colors, measure_text};
use crate::sim::collision::{Rect, move_and_collide};
use crate::sim::tiles::{TileGrid, TileKind};

const SCREEN: Vec2 = Vec2::new(800.0, 600.0);
const TILE: f32 = 40.0;
const GRAVITY: f32 = 1800.0;
const JUMP_VELOCITY: f32 = -750.0;
const STOMP_BOUNCE: f32 = JUMP_VELOCITY * 0.6;
const MAX_FALL_SPEED: f32 = 1000.0;
const PLAYER_SPEED: f32 = 300.0;
const PLAYER_SIZE: Vec2 = Vec2::new(TILE * 0.8, TILE * 0.9);
const PLAYER_START: Vec2 = Vec2::new(TILE * 2.0, TILE * 2.0);
const ENEMY_SPEED: f32 = 100.0;
const ENEMY_SIZE: f32 = TILE * 0.7;
const COIN_HITBOX: f32 = TILE * 0.5;
const COIN_POINTS: u32 = 10;
const STOMP_POINTS: u32 = 100;
const HIT_PENALTY: u32 = 50;

const BASIC_LEVEL: [&str; 16] = [
    "00000000000000000000",
    "00000000000000000000",
    "00000000000000000000",
    "00000000000000000000",
    "00000000000000000000",
    "00000000000000000000",
    "00000000000000000000",
    "00000000000000000000",
    "00000000000000000000",
    "00000000000000000000",
    "00000000000000000000",
    "00000001110000000000",
    "00000000000000000000",
    "00011000000000111000",
    "00000000000000000000",
    "11111111111111111111",
];

const SCROLLING_LEVEL: [&str; 16] = [
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000001110000000000000000000000000000001111110000",
    "00000000000000000000000000000000000000000000000000",
    "00011000000000111000000111000001110000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "11111111111111111111111111111111111111111111111111",
];

const CLONE_LEVEL: [&str; 16] = [
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000",
    "00000001110000000000000000000000000000001111110000",
    "00000000200000000000000000000000000000000222000000",
    "00011300000000111000000111003001110000000000000000",
    "00200000002000020002000000000000000000000000000000",
    "11111111111111111111111111111111111111111111111111",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// One screen, no camera
    Basic,
    /// Wide level followed by a clamped camera
    Camera,
    /// Wide level with coins and enemies
    Clone,
}

impl Variant {
    fn level(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            Variant::Basic => ("platformer", &BASIC_LEVEL),
            Variant::Camera => ("platformer_camera", &SCROLLING_LEVEL),
            Variant::Clone => ("platformer_clone", &CLONE_LEVEL),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Walker {
    pub rect: Rect,
    pub vel: Vec2,
    pub grounded: bool,
}

impl Walker {
    fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            rect: Rect::new(pos.x, pos.y, size.x, size.y),
            vel: Vec2::ZERO,
            grounded: false,
        }
    }

    /// Gravity plus one axis-separated move through the map
    fn fall_and_move(&mut self, map: &TileGrid, dt: f32) {
        if self.grounded {
            self.vel.y = 0.0;
        }
        self.vel.y = (self.vel.y + GRAVITY * dt).min(MAX_FALL_SPEED);
        let contact = move_and_collide(&mut self.rect, &mut self.vel, dt, |r| map.solids_overlapping(r));
        self.grounded = contact.floor;
    }
}

pub struct Platformer {
    pub variant: Variant,
    pub map: TileGrid,
    pub player: Walker,
    pub coins: Vec<Vec2>,
    pub enemies: Vec<Walker>,
    pub score: u32,
    pub camera: Camera2D,
}

impl Platformer {
    pub fn new(variant: Variant) -> Result<Self> {
        let (name, rows) = variant.level();
        let mut map = TileGrid::parse(name, rows, TILE)?;
        let coins = map
            .extract(TileKind::Coin)
            .into_iter()
            .map(|(c, r)| map.tile_rect(c, r).center())
            .collect();
        let enemies = map
            .extract(TileKind::Enemy)
            .into_iter()
            .map(|(c, r)| {
                let mut enemy = Walker::new(map.tile_rect(c, r).pos(), Vec2::splat(ENEMY_SIZE));
                enemy.vel.x = ENEMY_SPEED;
                enemy
            })
            .collect();
        let mut game = Self {
            variant,
            map,
            player: Walker::new(PLAYER_START, PLAYER_SIZE),
            coins,
            enemies,
            score: 0,
            camera: Camera2D::default(),
        };
        game.follow_player();
        Ok(game)
    }

    fn scrolls(&self) -> bool {
        self.variant != Variant::Basic
    }

    /// Horizontal limit for the player
    fn x_limit(&self) -> f32 {
        if self.scrolls() { self.map.world_size().x } else { SCREEN.x }
    }

    fn follow_player(&mut self) {
        if self.scrolls() {
            self.camera = Camera2D::follow_clamped(self.player.rect.center(), SCREEN, self.map.world_size());
        }
    }

    fn move_player(&mut self, input: &InputState, dt: f32) {
        let limit = self.x_limit();
        let player = &mut self.player;
        player.vel.x = input.axis(&[Key::Left, Key::A], &[Key::Right, Key::D]) * PLAYER_SPEED;
        if player.grounded && input.any_pressed(&[Key::Space, Key::Up]) {
            player.vel.y = JUMP_VELOCITY;
            player.grounded = false;
        }
        player.fall_and_move(&self.map, dt);
        player.rect.x = player.rect.x.clamp(0.0, limit - player.rect.w);
    }

    fn move_enemies(&mut self, dt: f32) {
        let world_w = self.map.world_size().x;
        for enemy in &mut self.enemies {
            let heading = enemy.vel.x;
            enemy.fall_and_move(&self.map, dt);
            let at_edge = (enemy.rect.x <= 0.0 && heading < 0.0)
                || (enemy.rect.right() >= world_w && heading > 0.0);
            enemy.rect.x = enemy.rect.x.clamp(0.0, world_w - enemy.rect.w);
            // resolve_axis zeroes vx on a wall hit
            enemy.vel.x = if enemy.vel.x == 0.0 || at_edge { -heading } else { heading };
        }
    }

    fn collect_coins(&mut self) {
        let player = self.player.rect;
        let before = self.coins.len();
        self.coins
            .retain(|c| !player.overlaps(&Rect::from_center(*c, Vec2::splat(COIN_HITBOX))));
        self.score += (before - self.coins.len()) as u32 * COIN_POINTS;
    }

    fn enemy_contact(&mut self) {
        let player = self.player;
        let Some(i) = self.enemies.iter().position(|e| player.rect.overlaps(&e.rect)) else {
            return;
        };
        let enemy = self.enemies[i].rect;
        let stomp = player.vel.y > 0.0 && player.rect.bottom() < enemy.y + enemy.h * 0.5;
        if stomp {
            self.enemies.remove(i);
            self.score += STOMP_POINTS;
            self.player.vel.y = STOMP_BOUNCE;
            log::debug!("Stomped, {} enemies left", self.enemies.len());
        } else {
            self.player = Walker::new(PLAYER_START, PLAYER_SIZE);
            self.score = self.score.saturating_sub(HIT_PENALTY);
            log::debug!("Hit by an enemy, back to start");
        }
    }

    fn draw_world(&self, list: &mut DrawList) {
        for (c, r) in self.map.positions(TileKind::Solid) {
            let tile = self.map.tile_rect(c, r);
            list.rect(tile, colors::DARKGRAY);
            list.rect_lines(tile, 1.0, colors::BLACK);
        }

        let radius = TILE * 0.3 / 2.0;
        for &c in &self.coins {
            let top = c - Vec2::new(0.0, radius * 2.0);
            let right = c + Vec2::new(radius * 1.5, 0.0);
            let bottom = c + Vec2::new(0.0, radius * 2.0);
            let left = c - Vec2::new(radius * 1.5, 0.0);
            list.triangle(top, right, left, colors::YELLOW);
            list.triangle(right, bottom, left, colors::GOLD);
            list.line(top, bottom, 1.0, colors::BLACK);
            list.line(right, left, 1.0, colors::BLACK);
        }

        for e in &self.enemies {
            list.rect(e.rect, colors::RED);
            list.rect_lines(e.rect, 1.0, colors::BLACK);
            let center = e.rect.center();
            let s = e.rect.w * 0.2;
            let dir = if e.vel.x >= 0.0 { 1.0 } else { -1.0 };
            list.triangle(
                center + Vec2::new(s * dir, 0.0),
                center + Vec2::new(-s * dir, -s),
                center + Vec2::new(-s * dir, s),
                colors::WHITE,
            );
        }

        let body = if self.variant == Variant::Clone { colors::BLUE } else { colors::GOLD };
        let outline = if self.player.grounded { colors::WHITE } else { colors::GRAY };
        list.rect(self.player.rect, body);
        list.rect_lines(self.player.rect, 1.0, outline);
    }
}

impl Game for Platformer {
    fn id(&self) -> GameId {
        match self.variant {
            Variant::Basic => GameId::Platformer,
            Variant::Camera => GameId::PlatformerCamera,
            Variant::Clone => GameId::PlatformerClone,
        }
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        self.move_player(input, dt);
        self.move_enemies(dt);
        self.follow_player();
        self.collect_coins();
        self.enemy_contact();
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::SKYBLUE);
        if self.scrolls() {
            list.begin_2d(self.camera);
            self.draw_world(list);
            list.end_2d();
        } else {
            self.draw_world(list);
        }

        let p = self.player.rect;
        if self.variant == Variant::Clone {
            let score = format!("Score: {}", self.score);
            let w = measure_text(&score, 20.0);
            list.text(score, SCREEN.x - w - 10.0, 10.0, 20.0, colors::BLACK);
            let status = format!("Grounded: {} | Enemies: {}", self.player.grounded, self.enemies.len());
            list.text(status, 10.0, 10.0, 20.0, colors::BLACK);
        } else {
            let status = format!(
                "Grounded: {} | Pos: ({:.0}, {:.0}) | Vel: ({:.0}, {:.0})",
                self.player.grounded, p.x, p.y, self.player.vel.x, self.player.vel.y
            );
            list.text(status, 10.0, 10.0, 20.0, colors::BLACK);
        }
    }

    fn summary(&self) -> String {
        let p = self.player.rect;
        format!(
            "player at ({:.0}, {:.0}), score {}, {} coins, {} enemies",
            p.x, p.y, self.score, self.coins.len(), self.enemies.len()
        )
    }
}
