//! Particles drifting through an animated flow field

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId};
use crate::platform::{InputState, Key, MouseButton};
use crate::renderer::{Color, DrawList, colors, rgb};
use crate::seeded_rng;
use crate::sim::collision::Rect;
use crate::wrap_position;

const SCREEN: Vec2 = Vec2::new(1000.0, 700.0);
/// Spacing between drawn arrows
const GRID_SPACING: f32 = 25.0;
const PARTICLE_COUNT: usize = 2500;
const FIELD_STRENGTH: f32 = 1.5;
const DECAY: f32 = 0.99;
/// Pixels per step
const MAX_SPEED: f32 = 5.0;
const REPEL_RADIUS: f32 = 200.0;
const REPEL_FORCE: f32 = 1000.0;
const MIN_DIST_SQ: f32 = 100.0;

const BACKGROUND: Color = rgb(20, 20, 30);
const PARTICLE: Color = rgb(100, 255, 255);
const FIELD: Color = rgb(150, 150, 200);

/// Flow direction at `p` and time `t`, plus repulsion from `repel` if given
pub fn field_at(p: Vec2, t: f32, repel: Option<Vec2>) -> Vec2 {
    let s = p / 100.0;
    let centre = SCREEN / 200.0;
    let swirl = (s.y - centre.y).atan2(s.x - centre.x);
    let angle = s.x * 0.5 + s.y * 0.3 + t * 0.2 + swirl * 0.1;
    let mut v = Vec2::from_angle(angle);

    if let Some(m) = repel {
        let away = p - m;
        let d2 = away.length_squared();
        if d2 < REPEL_RADIUS * REPEL_RADIUS {
            v += away.normalize_or_zero() * (REPEL_FORCE / d2.max(MIN_DIST_SQ));
        }
    }
    v
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Particle {
    fn advance(&mut self, force: Vec2) {
        self.vel = ((self.vel + force * FIELD_STRENGTH) * DECAY).clamp_length_max(MAX_SPEED);
        self.pos = wrap_position(self.pos + self.vel, SCREEN);
    }
}

pub struct VectorField {
    pub particles: Vec<Particle>,
    pub time: f32,
    pub paused: bool,
    /// Cursor position while the repel button is held
    pub repel: Option<Vec2>,
    rng: Pcg32,
}

impl VectorField {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            particles: Vec::with_capacity(PARTICLE_COUNT),
            time: 0.0,
            paused: false,
            repel: None,
            rng: seeded_rng(seed),
        };
        game.scatter();
        game
    }

    /// Place every particle at a random integer pixel, at rest
    pub fn scatter(&mut self) {
        let rng = &mut self.rng;
        self.particles = (0..PARTICLE_COUNT)
            .map(|_| Particle {
                pos: Vec2::new(
                    rng.random_range(0..=SCREEN.x as i32) as f32,
                    rng.random_range(0..=SCREEN.y as i32) as f32,
                ),
                vel: Vec2::ZERO,
            })
            .collect();
    }
}

impl Game for VectorField {
    fn id(&self) -> GameId {
        GameId::VectorField
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        if input.is_pressed(Key::Space) {
            self.paused = !self.paused;
        }
        if input.is_pressed(Key::R) {
            self.scatter();
            log::info!("Particles reseeded");
        }
        self.repel = input.is_button_down(MouseButton::Left).then_some(input.mouse_pos);
        if self.paused {
            return;
        }
        self.time += dt;
        let (t, repel) = (self.time, self.repel);
        for p in &mut self.particles {
            p.advance(field_at(p.pos, t, repel));
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(BACKGROUND);
        let (cols, rows) = ((SCREEN.x / GRID_SPACING) as u32, (SCREEN.y / GRID_SPACING) as u32);
        for i in 0..cols {
            for j in 0..rows {
                let start = Vec2::new(i as f32, j as f32) * GRID_SPACING;
                let end = start + field_at(start, self.time, self.repel).normalize_or_zero() * GRID_SPACING * 0.3;
                list.line(start, end, 1.0, FIELD);
                list.circle(end, 2.0, FIELD);
            }
        }
        for p in &self.particles {
            list.rect(Rect::new(p.pos.x, p.pos.y, 1.0, 1.0), PARTICLE);
        }
        list.text("LEFT CLICK: Repel Particles", 10.0, 40.0, 20.0, colors::GRAY);
        if self.paused {
            list.text("PAUSED (SPACE) | R: Reseed", 10.0, 65.0, 20.0, colors::GRAY);
        }
    }

    fn summary(&self) -> String {
        let mean_speed = self.particles.iter().map(|p| p.vel.length()).sum::<f32>() / self.particles.len().max(1) as f32;
        format!("t = {:.1}s, mean speed {:.2} px/step", self.time, mean_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_field_is_unit_without_cursor() {
        for p in [Vec2::ZERO, Vec2::new(500.0, 350.0), Vec2::new(999.0, 1.0)] {
            assert!((field_at(p, 3.0, None).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cursor_repels_nearby_points() {
        let m = Vec2::new(500.0, 350.0);
        let p = Vec2::new(520.0, 350.0);
        let base = field_at(p, 0.0, None);
        let pushed = field_at(p, 0.0, Some(m));
        assert!((pushed.x - base.x - REPEL_FORCE / 400.0).abs() < 1e-4);
        // Outside the radius nothing changes
        let far = Vec2::new(800.0, 350.0);
        assert_eq!(field_at(far, 0.0, Some(m)), field_at(far, 0.0, None));
        // Minimum distance caps the push
        let close = field_at(m + Vec2::new(1.0, 0.0), 0.0, Some(m)) - field_at(m + Vec2::new(1.0, 0.0), 0.0, None);
        assert!((close.length() - REPEL_FORCE / MIN_DIST_SQ).abs() < 1e-3);
    }

    #[test]
    fn test_speed_is_capped_and_positions_wrap() {
        let mut game = VectorField::new(1);
        assert_eq!(game.particles.len(), PARTICLE_COUNT);
        let idle = InputState::default();
        for _ in 0..240 {
            game.update(&idle, DT);
        }
        for p in &game.particles {
            assert!(p.vel.length() <= MAX_SPEED + 1e-4);
            assert!(p.pos.x >= 0.0 && p.pos.x <= SCREEN.x);
            assert!(p.pos.y >= 0.0 && p.pos.y <= SCREEN.y);
        }
    }

    #[test]
    fn test_pause_freezes_and_reseed_moves() {
        let mut game = VectorField::new(2);
        game.update(&InputState::pressing(&[Key::Space]), DT);
        assert!(game.paused);
        let frozen = game.particles.clone();
        game.update(&InputState::default(), DT);
        assert_eq!(game.particles, frozen);

        game.update(&InputState::pressing(&[Key::R]), DT);
        assert_ne!(game.particles, frozen);
        assert!(game.particles.iter().all(|p| p.vel == Vec2::ZERO));
    }
}
