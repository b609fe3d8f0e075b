//! Asteroids: thrust, turn and shoot rocks that split when hit

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId, Phase};
use crate::platform::{InputState, Key, MouseButton};
use crate::renderer::{DrawList, colors};
use crate::sim::collision::circles_overlap;
use crate::{seeded_rng, wrap_position};

const SCREEN: Vec2 = Vec2::new(800.0, 600.0);
const SHIP_SIZE: f32 = 15.0;
/// Degrees per second
const ROTATION_SPEED: f32 = 200.0;
const THRUST: f32 = 150.0;
const MAX_SPEED: f32 = 400.0;
/// Fraction of speed lost per second while coasting
const FRICTION: f32 = 0.5;
const BULLET_SPEED: f32 = 600.0;
const BULLET_RADIUS: f32 = 2.0;
const BULLET_LIFETIME: f32 = 2.0;
const FIRE_COOLDOWN: f32 = 0.2;
const START_LIVES: u32 = 3;
const START_ROCKS: usize = 4;

/// Radius and points per rock level (3 = large)
pub fn rock_stats(level: u8) -> (f32, u32) {
    match level {
        3 => (50.0, 20),
        2 => (30.0, 50),
        _ => (15.0, 100),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in degrees, 0 = up, clockwise positive
    pub heading: f32,
    pub thrusting: bool,
    pub fire_timer: f32,
}

impl Ship {
    fn new() -> Self {
        Self {
            pos: SCREEN / 2.0,
            vel: Vec2::ZERO,
            heading: 0.0,
            thrusting: false,
            fire_timer: 0.0,
        }
    }

    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.heading.to_radians().sin_cos();
        Vec2::new(s, -c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rock {
    pub pos: Vec2,
    pub vel: Vec2,
    pub level: u8,
}

impl Rock {
    pub fn radius(&self) -> f32 {
        rock_stats(self.level).0
    }
}

pub struct Asteroids {
    pub phase: Phase,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub rocks: Vec<Rock>,
    pub score: u32,
    pub lives: u32,
    rng: Pcg32,
}

impl Asteroids {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let rocks = spawn_rocks(&mut rng, START_ROCKS);
        Self {
            phase: Phase::Ready,
            ship: Ship::new(),
            bullets: Vec::new(),
            rocks,
            score: 0,
            lives: START_LIVES,
            rng,
        }
    }

    fn restart(&mut self) {
        self.phase = Phase::Ready;
        self.ship = Ship::new();
        self.bullets.clear();
        self.rocks = spawn_rocks(&mut self.rng, START_ROCKS);
        self.score = 0;
        self.lives = START_LIVES;
        log::info!("Restarted");
    }

    fn steer(&mut self, input: &InputState, dt: f32) {
        let ship = &mut self.ship;
        ship.pos = wrap_position(ship.pos + ship.vel * dt, SCREEN);

        let turn = input.axis(&[Key::Left, Key::A], &[Key::Right, Key::D]);
        ship.heading = (ship.heading + turn * ROTATION_SPEED * dt).rem_euclid(360.0);

        ship.thrusting = input.any_down(&[Key::Up, Key::W]);
        if ship.thrusting {
            ship.vel += ship.forward() * THRUST * dt;
        } else {
            ship.vel *= 1.0 - FRICTION * dt;
        }
        ship.vel = ship.vel.clamp_length_max(MAX_SPEED);

        if ship.fire_timer > 0.0 {
            ship.fire_timer -= dt;
        }
    }

    fn fire(&mut self) {
        if self.ship.fire_timer > 0.0 {
            return;
        }
        let dir = self.ship.forward();
        self.bullets.push(Bullet {
            pos: self.ship.pos + dir * (SHIP_SIZE + 5.0),
            vel: dir * BULLET_SPEED + self.ship.vel,
            life: BULLET_LIFETIME,
        });
        self.ship.fire_timer = FIRE_COOLDOWN;
    }

    fn ship_collisions(&mut self) {
        let hit = self
            .rocks
            .iter()
            .position(|r| circles_overlap(self.ship.pos, SHIP_SIZE, r.pos, r.radius()));
        let Some(i) = hit else {
            return;
        };
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = Phase::GameOver;
            log::info!("Game over with {} points", self.score);
        } else {
            self.ship.pos = SCREEN / 2.0;
            self.ship.vel = Vec2::ZERO;
            self.rocks.swap_remove(i);
            log::debug!("Ship hit, {} lives left", self.lives);
        }
    }

    fn bullet_collisions(&mut self) {
        let mut children = Vec::new();
        for bullet in &mut self.bullets {
            let hit = self
                .rocks
                .iter()
                .position(|r| circles_overlap(bullet.pos, BULLET_RADIUS, r.pos, r.radius()));
            if let Some(i) = hit {
                let rock = self.rocks.swap_remove(i);
                bullet.life = 0.0;
                self.score += rock_stats(rock.level).1;
                if rock.level > 1 {
                    for _ in 0..2 {
                        children.push(split_rock(&mut self.rng, &rock));
                    }
                }
            }
        }
        self.rocks.extend(children);
        self.bullets.retain(|b| b.life > 0.0);
    }
}

fn split_rock(rng: &mut Pcg32, parent: &Rock) -> Rock {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let speed = rng.random_range(50.0..200.0);
    let offset = Vec2::new(rng.random_range(-5..=5) as f32, rng.random_range(-5..=5) as f32);
    Rock {
        pos: parent.pos + offset,
        vel: Vec2::from_angle(angle) * speed,
        level: parent.level - 1,
    }
}

/// Large rocks placed just outside a random screen edge
fn spawn_rocks(rng: &mut Pcg32, count: usize) -> Vec<Rock> {
    (0..count)
        .map(|_| {
            let pos = match rng.random_range(0..4) {
                0 => Vec2::new(rng.random_range(-50.0..0.0), rng.random_range(0.0..SCREEN.y)),
                1 => Vec2::new(rng.random_range(SCREEN.x..SCREEN.x + 50.0), rng.random_range(0.0..SCREEN.y)),
                2 => Vec2::new(rng.random_range(0.0..SCREEN.x), rng.random_range(-50.0..0.0)),
                _ => Vec2::new(rng.random_range(0.0..SCREEN.x), rng.random_range(SCREEN.y..SCREEN.y + 50.0)),
            };
            let vel = Vec2::new(rng.random_range(-100.0..=100.0), rng.random_range(-100.0..=100.0));
            Rock { pos, vel, level: 3 }
        })
        .collect()
}

impl Game for Asteroids {
    fn id(&self) -> GameId {
        GameId::Asteroids
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
                }
            }
            Phase::Playing => {
                self.steer(input, dt);
                if fire {
                    self.fire();
                }
                for b in &mut self.bullets {
                    b.pos = wrap_position(b.pos + b.vel * dt, SCREEN);
                    b.life -= dt;
                }
                for r in &mut self.rocks {
                    r.pos = wrap_position(r.pos + r.vel * dt, SCREEN);
                }
                self.ship_collisions();
                if self.phase != Phase::Playing {
                    return;
                }
                self.bullet_collisions();
                if self.rocks.is_empty() {
                    self.phase = Phase::Won;
                    log::info!("Field cleared with {} points", self.score);
                }
            }
            _ => {
                if input.is_pressed(Key::Enter) {
                    self.restart();
                }
            }
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::BLACK);

        if self.phase != Phase::GameOver {
            let ship = &self.ship;
            let fwd = ship.forward();
            let nose = ship.pos + fwd * SHIP_SIZE;
            let left = ship.pos + Vec2::from_angle(140f32.to_radians()).rotate(fwd) * SHIP_SIZE;
            let right = ship.pos + Vec2::from_angle(-140f32.to_radians()).rotate(fwd) * SHIP_SIZE;
            for (a, b) in [(nose, left), (left, right), (right, nose)] {
                list.line(a, b, 2.0, colors::WHITE);
            }
            if ship.thrusting {
                list.circle((ship.pos - fwd * (SHIP_SIZE - 5.0)).floor(), 3.0, colors::RED);
            }
        }
        for b in &self.bullets {
            list.circle(b.pos.floor(), BULLET_RADIUS, colors::YELLOW);
        }
        for r in &self.rocks {
            list.circle_lines(r.pos.floor(), r.radius(), colors::GRAY);
            list.circle(r.pos.floor(), 2.0, colors::GRAY);
        }

        list.text(format!("Score: {}", self.score), 10.0, 10.0, 25.0, colors::WHITE);
        let lives = format!("Lives: {}", self.lives);
        let w = crate::renderer::measure_text(&lives, 25.0);
        list.text(lives, SCREEN.x - w - 10.0, 10.0, 25.0, colors::WHITE);

        let (cx, cy) = (SCREEN.x / 2.0, SCREEN.y / 2.0);
        match self.phase {
            Phase::Ready => {
                list.text_centered("ASTEROIDS", cx, cy - 80.0, 60.0, colors::WHITE);
                list.text_centered("Press SPACE to Begin | UP/W to Thrust", cx, cy, 20.0, colors::GRAY);
            }
            Phase::GameOver | Phase::Won => {
                let (title, color, hint) = if self.phase == Phase::Won {
                    ("WAVE CLEARED!", colors::GOLD, "Press ENTER to Continue")
                } else {
                    ("GAME OVER", colors::RED, "Press ENTER to Restart")
                };
                list.text_centered(title, cx, cy - 80.0, 60.0, color);
                list.text_centered(&format!("Final Score: {}", self.score), cx, cy + 10.0, 40.0, colors::WHITE);
                list.text_centered(hint, cx, cy + 70.0, 20.0, colors::GRAY);
            }
            _ => {}
        }
    }

    fn summary(&self) -> String {
        format!("{:?}, score {}, lives {}, {} rocks", self.phase, self.score, self.lives, self.rocks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn playing(seed: u64) -> Asteroids {
        let mut game = Asteroids::new(seed);
        game.phase = Phase::Playing;
        game.rocks.clear();
        game
    }

    #[test]
    fn test_initial_rocks_spawn_off_screen() {
        let game = Asteroids::new(9);
        assert_eq!(game.rocks.len(), 4);
        for r in &game.rocks {
            assert_eq!(r.level, 3);
            let outside = r.pos.x <= 0.0 || r.pos.x >= SCREEN.x || r.pos.y <= 0.0 || r.pos.y >= SCREEN.y;
            assert!(outside, "{:?}", r.pos);
            assert!(r.vel.x.abs() <= 100.0 && r.vel.y.abs() <= 100.0);
        }
    }

    #[test]
    fn test_fire_spawns_ahead_and_respects_cooldown() {
        let mut game = playing(1);
        game.rocks.push(Rock {
            pos: Vec2::new(50.0, 550.0),
            vel: Vec2::ZERO,
            level: 1,
        });
        game.update(&InputState::pressing(&[Key::Space]), DT);
        assert_eq!(game.bullets.len(), 1);
        let b = game.bullets[0];
        assert!((b.pos.y - (SCREEN.y / 2.0 - 20.0 - BULLET_SPEED * DT)).abs() < 0.01);

        game.update(&InputState::pressing(&[Key::Space]), DT);
        assert_eq!(game.bullets.len(), 1);
    }

    #[test]
    fn test_large_rock_splits_into_two_mediums() {
        let mut game = playing(2);
        game.rocks.push(Rock {
            pos: Vec2::new(400.0, 200.0),
            vel: Vec2::ZERO,
            level: 3,
        });
        game.bullets.push(Bullet {
            pos: Vec2::new(400.0, 240.0),
            vel: Vec2::ZERO,
            life: 1.0,
        });
        game.update(&InputState::default(), DT);
        assert_eq!(game.score, 20);
        assert!(game.bullets.is_empty());
        assert_eq!(game.rocks.len(), 2);
        for r in &game.rocks {
            assert_eq!(r.level, 2);
            assert!((r.pos - Vec2::new(400.0, 200.0)).abs().max_element() <= 5.0 + 200.0 * DT);
        }
    }

    #[test]
    fn test_small_rock_vanishes_and_field_clear_wins() {
        let mut game = playing(3);
        game.rocks.push(Rock {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
            level: 1,
        });
        game.bullets.push(Bullet {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
            life: 1.0,
        });
        game.update(&InputState::default(), DT);
        assert_eq!(game.score, 100);
        assert_eq!(game.phase, Phase::Won);
    }

    #[test]
    fn test_collision_costs_life_and_respawns() {
        let mut game = playing(4);
        game.ship.pos = Vec2::new(100.0, 100.0);
        game.ship.vel = Vec2::new(50.0, 0.0);
        game.rocks.push(Rock {
            pos: Vec2::new(120.0, 100.0),
            vel: Vec2::ZERO,
            level: 2,
        });
        game.rocks.push(Rock {
            pos: Vec2::new(700.0, 500.0),
            vel: Vec2::ZERO,
            level: 2,
        });
        game.update(&InputState::default(), DT);
        assert_eq!(game.lives, 2);
        assert_eq!(game.ship.pos, SCREEN / 2.0);
        assert_eq!(game.ship.vel, Vec2::ZERO);
        assert_eq!(game.rocks.len(), 1);
    }

    #[test]
    fn test_last_life_is_game_over() {
        let mut game = playing(5);
        game.lives = 1;
        game.rocks.push(Rock {
            pos: SCREEN / 2.0,
            vel: Vec2::ZERO,
            level: 1,
        });
        game.update(&InputState::default(), DT);
        assert_eq!(game.phase, Phase::GameOver);
        game.update(&InputState::pressing(&[Key::Enter]), DT);
        assert_eq!(game.phase, Phase::Ready);
        assert_eq!(game.lives, START_LIVES);
        assert_eq!(game.rocks.len(), 4);
    }

    #[test]
    fn test_thrust_is_capped_and_ship_wraps() {
        let mut game = playing(6);
        game.rocks.push(Rock {
            pos: Vec2::new(-500.0, -500.0),
            vel: Vec2::ZERO,
            level: 1,
        });
        let input = InputState::holding(&[Key::Up]);
        for _ in 0..600 {
            game.update(&input, DT);
            assert!(game.ship.pos.x >= 0.0 && game.ship.pos.x <= SCREEN.x);
            assert!(game.ship.pos.y >= 0.0 && game.ship.pos.y <= SCREEN.y);
        }
        assert!(game.ship.vel.length() <= MAX_SPEED + 0.01);
    }
}
