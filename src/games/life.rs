//! Conway's Game of Life on a wrapping grid with mouse editing

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId};
use crate::platform::{InputState, Key, MouseButton};
use crate::renderer::{Color, DrawList, colors, measure_text, rgb};
use crate::seeded_rng;
use crate::sim::collision::Rect;

pub const COLS: usize = 80;
pub const ROWS: usize = 60;
const CELL: f32 = 10.0;
const HUD_H: f32 = 50.0;
const SCREEN: Vec2 = Vec2::new(COLS as f32 * CELL, ROWS as f32 * CELL + HUD_H);
/// Seconds between generations
const STEP_DELAY: f32 = 0.1;
const START_DENSITY: f64 = 0.3;
const RANDOM_DENSITY: f64 = 0.2;

const LIVE: Color = rgb(144, 238, 144);
const DEAD: Color = rgb(40, 40, 50);
const GRID_LINES: Color = rgb(50, 50, 60);
const HUD: Color = rgb(20, 20, 30);

/// Live neighbours of (col, row) with toroidal wrap
pub fn neighbours(cells: &[bool], cols: usize, rows: usize, col: usize, row: usize) -> u8 {
    let mut count = 0;
    for dr in [rows - 1, 0, 1] {
        for dc in [cols - 1, 0, 1] {
            if dr == 0 && dc == 0 {
                continue;
            }
            let r = (row + dr) % rows;
            let c = (col + dc) % cols;
            count += cells[r * cols + c] as u8;
        }
    }
    count
}

/// B3/S23
pub fn next_generation(cells: &[bool], cols: usize, rows: usize) -> Vec<bool> {
    (0..rows * cols)
        .map(|i| {
            let n = neighbours(cells, cols, rows, i % cols, i / cols);
            matches!((cells[i], n), (true, 2) | (_, 3))
        })
        .collect()
}

pub struct Life {
    pub cells: Vec<bool>,
    pub paused: bool,
    pub generation: u64,
    timer: f32,
    rng: Pcg32,
}

impl Life {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            cells: vec![false; COLS * ROWS],
            paused: true,
            generation: 0,
            timer: 0.0,
            rng: seeded_rng(seed),
        };
        game.randomize(START_DENSITY);
        game
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
        self.generation = 0;
        self.paused = true;
    }

    pub fn randomize(&mut self, density: f64) {
        self.clear();
        for cell in &mut self.cells {
            *cell = self.rng.random_bool(density);
        }
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    pub fn get(&self, col: usize, row: usize) -> bool {
        self.cells[row * COLS + col]
    }

    pub fn set(&mut self, col: usize, row: usize, alive: bool) {
        self.cells[row * COLS + col] = alive;
    }

    pub fn step(&mut self) {
        self.cells = next_generation(&self.cells, COLS, ROWS);
        self.generation += 1;
    }

    fn paint(&mut self, input: &InputState) {
        let p = input.mouse_pos;
        if p.x < 0.0 || p.y < 0.0 {
            return;
        }
        let (col, row) = ((p.x / CELL) as usize, (p.y / CELL) as usize);
        if col >= COLS || row >= ROWS {
            return;
        }
        if input.is_button_down(MouseButton::Left) {
            self.set(col, row, true);
        } else if input.is_button_down(MouseButton::Right) {
            self.set(col, row, false);
        }
    }
}

impl Game for Life {
    fn id(&self) -> GameId {
        GameId::Life
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        if input.is_pressed(Key::Space) {
            self.paused = !self.paused;
        }
        if input.is_pressed(Key::R) {
            self.clear();
            log::info!("Grid cleared");
        }
        if input.is_pressed(Key::A) {
            self.randomize(RANDOM_DENSITY);
            log::info!("Grid randomized");
        }
        if self.paused {
            self.paint(input);
            return;
        }
        self.timer += dt;
        if self.timer >= STEP_DELAY {
            self.timer = 0.0;
            self.step();
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(rgb(30, 30, 40));
        let (grid_w, grid_h) = (COLS as f32 * CELL, ROWS as f32 * CELL);
        list.rect(Rect::new(0.0, 0.0, grid_w, grid_h), DEAD);
        for (i, _) in self.cells.iter().enumerate().filter(|(_, alive)| **alive) {
            let (c, r) = ((i % COLS) as f32, (i / COLS) as f32);
            list.rect(Rect::new(c * CELL, r * CELL, CELL, CELL), LIVE);
        }
        for c in 0..=COLS {
            let x = c as f32 * CELL;
            list.line(Vec2::new(x, 0.0), Vec2::new(x, grid_h), 1.0, GRID_LINES);
        }
        for r in 0..=ROWS {
            let y = r as f32 * CELL;
            list.line(Vec2::new(0.0, y), Vec2::new(grid_w, y), 1.0, GRID_LINES);
        }

        list.rect(Rect::new(0.0, grid_h, SCREEN.x, HUD_H), HUD);
        let status = if self.paused {
            "[PAUSED] - Edit Grid or Press SPACE to Start"
        } else {
            "[RUNNING] - Press SPACE to Pause"
        };
        list.text(status, 10.0, grid_h + 10.0, 20.0, colors::RAYWHITE);
        list.text(format!("Generation: {}", self.generation), 10.0, grid_h + 30.0, 15.0, colors::RAYWHITE);
        let controls = "R: Reset | A: Randomize | L-Click: Draw | R-Click: Erase";
        let w = measure_text(controls, 15.0);
        list.text(controls, SCREEN.x - w - 10.0, grid_h + 30.0, 15.0, colors::RAYWHITE);
    }

    fn summary(&self) -> String {
        format!("generation {}, population {}", self.generation, self.population())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn empty() -> Life {
        let mut life = Life::new(0);
        life.clear();
        life
    }

    #[test]
    fn test_starts_paused_with_random_fill() {
        let life = Life::new(5);
        assert!(life.paused);
        let density = life.population() as f32 / (COLS * ROWS) as f32;
        assert!((0.25..0.35).contains(&density), "{density}");
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut life = empty();
        for c in 10..13 {
            life.set(c, 20, true);
        }
        life.step();
        assert!(life.get(11, 19) && life.get(11, 20) && life.get(11, 21));
        assert!(!life.get(10, 20) && !life.get(12, 20));
        life.step();
        assert!(life.get(10, 20) && life.get(11, 20) && life.get(12, 20));
        assert_eq!(life.population(), 3);
    }

    #[test]
    fn test_glider_wraps_around_corner() {
        let mut life = empty();
        let glider = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
        for (c, r) in glider {
            life.set(COLS - 3 + c, ROWS - 3 + r, true);
        }
        for _ in 0..8 {
            life.step();
        }
        assert_eq!(life.population(), 5);
        for (c, r) in glider {
            assert!(life.get((COLS - 1 + c) % COLS, (ROWS - 1 + r) % ROWS));
        }
    }

    #[test]
    fn test_space_runs_generations_on_timer() {
        let mut life = empty();
        life.update(&InputState::pressing(&[Key::Space]), DT);
        assert!(!life.paused);
        let idle = InputState::default();
        for _ in 0..61 {
            life.update(&idle, DT);
        }
        assert!((8..=10).contains(&life.generation), "{}", life.generation);
    }

    #[test]
    fn test_mouse_paints_only_while_paused() {
        let mut life = empty();
        let mut input = InputState::default();
        input.press_button(MouseButton::Left);
        input.mouse_moved(Vec2::new(55.0, 35.0), Vec2::ZERO);
        life.update(&input, DT);
        assert!(life.get(5, 3));

        input.end_step();
        input.release_button(MouseButton::Left);
        input.press_button(MouseButton::Right);
        life.update(&input, DT);
        assert!(!life.get(5, 3));

        life.paused = false;
        input.release_button(MouseButton::Right);
        input.press_button(MouseButton::Left);
        input.mouse_moved(Vec2::new(5.0, 5.0), Vec2::ZERO);
        life.update(&input, DT);
        assert!(!life.get(0, 0));
    }

    #[test]
    fn test_reset_and_randomize_keys() {
        let mut life = Life::new(2);
        life.generation = 7;
        life.update(&InputState::pressing(&[Key::R]), DT);
        assert_eq!(life.population(), 0);
        assert_eq!(life.generation, 0);
        life.update(&InputState::pressing(&[Key::A]), DT);
        let density = life.population() as f32 / (COLS * ROWS) as f32;
        assert!((0.15..0.25).contains(&density), "{density}");
    }

    proptest! {
        #[test]
        fn prop_step_commutes_with_translation(
            cells in prop::collection::vec(any::<bool>(), 48),
            dx in 0usize..8,
            dy in 0usize..6,
        ) {
            let (cols, rows) = (8, 6);
            let shift = |src: &[bool]| -> Vec<bool> {
                let mut out = vec![false; cols * rows];
                for r in 0..rows {
                    for c in 0..cols {
                        out[((r + dy) % rows) * cols + (c + dx) % cols] = src[r * cols + c];
                    }
                }
                out
            };
            let a = shift(&next_generation(&cells, cols, rows));
            let b = next_generation(&shift(&cells), cols, rows);
            prop_assert_eq!(a, b);
        }
    }
}
