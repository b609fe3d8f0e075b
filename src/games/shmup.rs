//! Vertical shooter with a parallax starfield and alternating enemy waves

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId, Phase};
use crate::platform::{InputState, Key, MouseButton};
use crate::renderer::{DrawList, colors, measure_text};
use crate::seeded_rng;
use crate::sim::collision::circles_overlap;

const SCREEN: Vec2 = Vec2::new(800.0, 600.0);
const STAR_COUNT: usize = 100;
const SCROLL_SPEED: f32 = 200.0;
const PLAYER_SPEED: f32 = 300.0;
const PLAYER_RADIUS: f32 = 20.0;
/// Height of the band at the bottom the player may move in
const PLAYER_BAND: f32 = 100.0;
const PLAYER_FIRE_RATE: f32 = 0.2;
const PLAYER_BULLET_SPEED: f32 = 800.0;
const PLAYER_BULLET_RADIUS: f32 = 4.0;
const ENEMY_SPEED: f32 = 150.0;
const ENEMY_FIRE_MIN: f32 = 3.0;
const ENEMY_FIRE_MAX: f32 = 6.0;
const ENEMY_BULLET_SPEED: f32 = 400.0;
const ENEMY_BULLET_RADIUS: f32 = 3.0;
const ENEMY_POINTS: u32 = 100;
const WAVE_INTERVAL: f32 = 5.0;
const FIRST_WAVE_DELAY: f32 = 1.0;
const START_LIVES: u32 = 3;
/// Entities further than this beyond the screen are dropped
const CULL_MARGIN: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Shot {
    fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Straight,
    Sine,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub pattern: Pattern,
    pub age: f32,
    pub fire_timer: f32,
}

/// Enemies enter from above, so only the bottom and side margins drop them.
fn enemy_on_field(pos: Vec2) -> bool {
    pos.x >= -CULL_MARGIN && pos.x <= SCREEN.x + CULL_MARGIN && pos.y <= SCREEN.y + CULL_MARGIN
}

fn on_field(pos: Vec2) -> bool {
    pos.x >= -CULL_MARGIN
        && pos.x <= SCREEN.x + CULL_MARGIN
        && pos.y >= -CULL_MARGIN
        && pos.y <= SCREEN.y + CULL_MARGIN
}

pub struct Shmup {
    pub phase: Phase,
    pub player: Vec2,
    pub fire_timer: f32,
    pub lives: u32,
    pub score: u32,
    pub wave: u32,
    pub wave_timer: f32,
    pub stars: Vec<Star>,
    pub bullets: Vec<Shot>,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<Shot>,
    rng: Pcg32,
}

impl Shmup {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random_range(0..=SCREEN.x as i32) as f32,
                    rng.random_range(0..=SCREEN.y as i32) as f32,
                ),
                size: rng.random_range(1.0..3.0),
            })
            .collect();
        Self {
            phase: Phase::Ready,
            player: Vec2::new(SCREEN.x / 2.0, SCREEN.y - 50.0),
            fire_timer: 0.0,
            lives: START_LIVES,
            score: 0,
            wave: 0,
            wave_timer: WAVE_INTERVAL,
            stars,
            bullets: Vec::new(),
            enemies: Vec::new(),
            enemy_bullets: Vec::new(),
            rng,
        }
    }

    fn restart(&mut self) {
        self.phase = Phase::Ready;
        self.player = Vec2::new(SCREEN.x / 2.0, SCREEN.y - 50.0);
        self.fire_timer = 0.0;
        self.lives = START_LIVES;
        self.score = 0;
        self.wave = 0;
        self.wave_timer = WAVE_INTERVAL;
        self.bullets.clear();
        self.enemies.clear();
        self.enemy_bullets.clear();
        log::info!("Restarted");
    }

    /// Odd waves fly straight down in a row of five, even waves weave in threes.
    pub fn spawn_wave(&mut self) {
        let (count, pattern, radius) = if self.wave % 2 == 1 {
            (5, Pattern::Straight, 15.0)
        } else {
            (3, Pattern::Sine, 20.0)
        };
        let spacing = SCREEN.x / (count + 1) as f32;
        for i in 0..count {
            let y = -self.rng.random_range(50.0..150.0);
            let fire_timer = self.rng.random_range(ENEMY_FIRE_MIN..ENEMY_FIRE_MAX);
            self.enemies.push(Enemy {
                pos: Vec2::new(spacing * (i + 1) as f32, y),
                vel: Vec2::new(0.0, ENEMY_SPEED),
                radius,
                pattern,
                age: 0.0,
                fire_timer,
            });
        }
        log::info!("Wave {} spawned: {:?}", self.wave, pattern);
    }

    fn move_player(&mut self, input: &InputState, dt: f32) {
        let dir = Vec2::new(
            input.axis(&[Key::Left, Key::A], &[Key::Right, Key::D]),
            input.axis(&[Key::Up, Key::W], &[Key::Down, Key::S]),
        );
        self.player += dir * PLAYER_SPEED * dt;
        self.player.x = self.player.x.clamp(PLAYER_RADIUS, SCREEN.x - PLAYER_RADIUS);
        self.player.y = self
            .player
            .y
            .clamp(SCREEN.y - PLAYER_BAND - PLAYER_RADIUS, SCREEN.y - PLAYER_RADIUS);
        if self.fire_timer > 0.0 {
            self.fire_timer -= dt;
        }
    }

    fn update_enemies(&mut self, dt: f32) {
        for enemy in &mut self.enemies {
            enemy.age += dt;
            if enemy.pattern == Pattern::Sine {
                enemy.vel.x = 150.0 * (3.0 * enemy.age).sin();
            }
            enemy.pos += enemy.vel * dt;
            enemy.fire_timer -= dt;
            if enemy.fire_timer <= 0.0 {
                enemy.fire_timer = self.rng.random_range(ENEMY_FIRE_MIN..ENEMY_FIRE_MAX);
                self.enemy_bullets.push(Shot {
                    pos: enemy.pos + Vec2::new(0.0, enemy.radius + 5.0),
                    vel: Vec2::new(0.0, ENEMY_BULLET_SPEED),
                    radius: ENEMY_BULLET_RADIUS,
                });
            }
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 && self.phase == Phase::Playing {
            self.phase = Phase::GameOver;
            log::info!("Game over with {} points on wave {}", self.score, self.wave);
        }
    }

    fn collisions(&mut self) {
        self.bullets.retain(|b| {
            let hit = self
                .enemies
                .iter()
                .position(|e| circles_overlap(b.pos, b.radius, e.pos, e.radius));
            match hit {
                Some(i) => {
                    self.enemies.swap_remove(i);
                    self.score += ENEMY_POINTS;
                    false
                }
                None => true,
            }
        });

        let player = self.player;
        let before = self.enemies.len() + self.enemy_bullets.len();
        self.enemies
            .retain(|e| !circles_overlap(player, PLAYER_RADIUS, e.pos, e.radius));
        self.enemy_bullets
            .retain(|b| !circles_overlap(player, PLAYER_RADIUS, b.pos, b.radius));
        let hits = before - self.enemies.len() - self.enemy_bullets.len();
        for _ in 0..hits {
            self.lose_life();
        }
    }

    fn play(&mut self, input: &InputState, fire: bool, dt: f32) {
        for star in &mut self.stars {
            star.pos.y += SCROLL_SPEED * dt * (star.size / 2.0);
            if star.pos.y > SCREEN.y {
                star.pos = Vec2::new(self.rng.random_range(0..=SCREEN.x as i32) as f32, 0.0);
            }
        }

        if self.enemies.is_empty() {
            self.wave_timer -= dt;
            if self.wave_timer <= 0.0 {
                self.spawn_wave();
                self.wave += 1;
                self.wave_timer = WAVE_INTERVAL;
            }
        }

        self.move_player(input, dt);
        if fire && self.fire_timer <= 0.0 {
            self.bullets.push(Shot {
                pos: self.player - Vec2::new(0.0, PLAYER_RADIUS + 5.0),
                vel: Vec2::new(0.0, -PLAYER_BULLET_SPEED),
                radius: PLAYER_BULLET_RADIUS,
            });
            self.fire_timer = PLAYER_FIRE_RATE;
        }

        self.update_enemies(dt);
        for shot in self.bullets.iter_mut().chain(self.enemy_bullets.iter_mut()) {
            shot.advance(dt);
        }
        self.enemies.retain(|e| enemy_on_field(e.pos));
        self.bullets.retain(|b| on_field(b.pos));
        self.enemy_bullets.retain(|b| on_field(b.pos));

        self.collisions();
    }
}

impl Game for Shmup {
    fn id(&self) -> GameId {
        GameId::Shmup
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        let fire = input.is_pressed(Key::Space) || input.is_button_pressed(MouseButton::Left);
        match self.phase {
            Phase::Ready => {
                if fire {
                    self.phase = Phase::Playing;
                    self.wave = 1;
                    self.wave_timer = FIRST_WAVE_DELAY;
                }
            }
            Phase::Playing => self.play(input, fire, dt),
            _ => {
                if input.is_pressed(Key::Enter) {
                    self.restart();
                }
            }
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::BLACK);
        for star in &self.stars {
            let color = if star.size < 2.0 { colors::GRAY } else { colors::WHITE };
            list.circle(star.pos.floor(), star.size.floor(), color);
        }
        for b in &self.enemy_bullets {
            list.circle(b.pos.floor(), b.radius, colors::ORANGE);
        }
        for e in &self.enemies {
            let c = e.pos.floor();
            list.circle(c, e.radius, colors::RED);
            list.line(c - Vec2::new(e.radius, 0.0), c + Vec2::new(e.radius, 0.0), 1.0, colors::PURPLE);
        }
        for b in &self.bullets {
            list.circle(b.pos.floor(), b.radius, colors::LIME);
        }
        if self.phase != Phase::GameOver {
            let p = self.player;
            list.triangle(
                p - Vec2::new(0.0, PLAYER_RADIUS),
                p + Vec2::new(-PLAYER_RADIUS, PLAYER_RADIUS / 2.0),
                p + Vec2::new(PLAYER_RADIUS, PLAYER_RADIUS / 2.0),
                colors::BLUE,
            );
            list.circle(p.floor(), 5.0, colors::SKYBLUE);
        }

        list.text(format!("Score: {}", self.score), 10.0, 10.0, 20.0, colors::WHITE);
        let lives = format!("Lives: {}", self.lives);
        let w = measure_text(&lives, 20.0);
        list.text(lives, SCREEN.x - w - 10.0, 10.0, 20.0, colors::WHITE);
        list.text(format!("Wave: {}", self.wave), 10.0, 40.0, 20.0, colors::YELLOW);

        let (cx, cy) = (SCREEN.x / 2.0, SCREEN.y / 2.0);
        match self.phase {
            Phase::Ready => {
                list.text_centered("VERTICAL SHOOTER", cx, cy - 80.0, 60.0, colors::LIME);
                list.text_centered("WASD/Arrows to Move | SPACE/Click to Shoot", cx, cy, 20.0, colors::GRAY);
            }
            Phase::GameOver => {
                list.text_centered("GAME OVER", cx, cy - 80.0, 60.0, colors::RED);
                list.text_centered(&format!("Final Score: {}", self.score), cx, cy + 10.0, 40.0, colors::WHITE);
                list.text_centered("Press ENTER to Restart", cx, cy + 70.0, 20.0, colors::GRAY);
            }
            _ => {}
        }
    }

    fn summary(&self) -> String {
        format!("{:?}, score {}, lives {}, wave {}", self.phase, self.score, self.lives, self.wave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn started(seed: u64) -> Shmup {
        let mut game = Shmup::new(seed);
        game.update(&InputState::pressing(&[Key::Space]), DT);
        assert_eq!(game.phase, Phase::Playing);
        game
    }

    fn enemy_at(pos: Vec2) -> Enemy {
        Enemy {
            pos,
            vel: Vec2::ZERO,
            radius: 15.0,
            pattern: Pattern::Straight,
            age: 0.0,
            fire_timer: 10.0,
        }
    }

    #[test]
    fn test_first_wave_arrives_after_one_second() {
        let mut game = started(1);
        let idle = InputState::default();
        for _ in 0..55 {
            game.update(&idle, DT);
        }
        assert!(game.enemies.is_empty());
        for _ in 0..10 {
            game.update(&idle, DT);
        }
        assert_eq!(game.enemies.len(), 5);
        assert_eq!(game.wave, 2);
        for (i, e) in game.enemies.iter().enumerate() {
            assert_eq!(e.pattern, Pattern::Straight);
            assert!((e.pos.x - SCREEN.x / 6.0 * (i + 1) as f32).abs() < 1e-3);
            assert!(e.pos.y < 0.0);
        }
    }

    #[test]
    fn test_even_waves_weave() {
        let mut game = Shmup::new(2);
        game.wave = 2;
        game.spawn_wave();
        assert_eq!(game.enemies.len(), 3);
        assert!(game.enemies.iter().all(|e| e.pattern == Pattern::Sine && e.radius == 20.0));
        game.phase = Phase::Playing;
        game.update(&InputState::default(), DT);
        assert!(game.enemies[0].vel.x > 0.0);
    }

    #[test]
    fn test_player_stays_in_bottom_band() {
        let mut game = started(3);
        let up = InputState::holding(&[Key::Up, Key::Left]);
        for _ in 0..120 {
            game.update(&up, DT);
        }
        assert_eq!(game.player.y, SCREEN.y - PLAYER_BAND - PLAYER_RADIUS);
        assert_eq!(game.player.x, PLAYER_RADIUS);
    }

    #[test]
    fn test_bullet_destroys_enemy_for_points() {
        let mut game = started(4);
        game.wave_timer = 100.0;
        game.enemies.push(enemy_at(Vec2::new(300.0, 100.0)));
        game.bullets.push(Shot {
            pos: Vec2::new(300.0, 110.0),
            vel: Vec2::ZERO,
            radius: PLAYER_BULLET_RADIUS,
        });
        game.update(&InputState::default(), DT);
        assert!(game.enemies.is_empty());
        assert!(game.bullets.is_empty());
        assert_eq!(game.score, ENEMY_POINTS);
    }

    #[test]
    fn test_fire_rate_limits_shots() {
        let mut game = started(5);
        game.fire_timer = 0.0;
        game.update(&InputState::pressing(&[Key::Space]), DT);
        game.update(&InputState::pressing(&[Key::Space]), DT);
        assert_eq!(game.bullets.len(), 1);
    }

    #[test]
    fn test_contact_costs_lives_until_game_over() {
        let mut game = started(6);
        game.wave_timer = 100.0;
        for _ in 0..3 {
            game.enemy_bullets.push(Shot {
                pos: game.player,
                vel: Vec2::ZERO,
                radius: ENEMY_BULLET_RADIUS,
            });
            game.update(&InputState::default(), DT);
        }
        assert_eq!(game.lives, 0);
        assert_eq!(game.phase, Phase::GameOver);
        game.update(&InputState::pressing(&[Key::Enter]), DT);
        assert_eq!(game.phase, Phase::Ready);
        assert_eq!(game.lives, START_LIVES);
    }

    #[test]
    fn test_offscreen_entities_are_dropped() {
        let mut game = started(7);
        game.wave_timer = 100.0;
        game.bullets.push(Shot {
            pos: Vec2::new(400.0, -99.0),
            vel: Vec2::new(0.0, -PLAYER_BULLET_SPEED),
            radius: PLAYER_BULLET_RADIUS,
        });
        game.update(&InputState::default(), DT);
        assert!(game.bullets.is_empty());
    }
}
