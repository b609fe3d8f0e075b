//! Falling-block puzzle on a 10x20 well

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::{Game, GameId, Phase};
use crate::platform::{InputState, Key};
use crate::renderer::{Color, DrawList, colors, fade, rgb};
use crate::seeded_rng;
use crate::sim::collision::Rect;

pub const COLS: usize = 10;
pub const ROWS: usize = 20;
const BLOCK: f32 = 30.0;
const PREVIEW_BLOCK: f32 = 20.0;
const OFFSET: f32 = 20.0;
const SIDE_PANEL: f32 = 150.0;
const SCREEN: Vec2 = Vec2::new(
    OFFSET + COLS as f32 * BLOCK + SIDE_PANEL + 20.0,
    OFFSET + ROWS as f32 * BLOCK + 20.0,
);
const HUD_X: f32 = OFFSET + COLS as f32 * BLOCK + 20.0;
const DROP_TIME: f32 = 0.5;
const SOFT_DROP_TIME: f32 = 0.05;
const LINE_POINTS: [u32; 5] = [0, 100, 300, 500, 800];
const SPAWN_X: i32 = COLS as i32 / 2 - 2;

/// Colour per cell value; 0 is empty
const PALETTE: [Color; 8] = [
    colors::BLACK,
    colors::LIME,
    colors::RED,
    colors::PURPLE,
    colors::ORANGE,
    colors::BLUE,
    colors::SKYBLUE,
    colors::YELLOW,
];

type Shape = [u8; 16];

const I_SHAPES: [Shape; 2] = [
    [0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0],
];
const Z_SHAPES: [Shape; 2] = [
    [1, 1, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0],
];
const T_SHAPES: [Shape; 4] = [
    [0, 1, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 0, 1, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 1, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0],
];
const L_SHAPES: [Shape; 4] = [
    [0, 0, 1, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0],
    [1, 1, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0],
];
const J_SHAPES: [Shape; 4] = [
    [1, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 1, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0],
];
const S_SHAPES: [Shape; 2] = [
    [0, 1, 1, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 1, 0, 0, 0, 1, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0],
];
const O_SHAPES: [Shape; 1] = [[0, 1, 1, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0]];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tetromino {
    I,
    Z,
    T,
    L,
    J,
    S,
    O,
}

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::Z,
        Tetromino::T,
        Tetromino::L,
        Tetromino::J,
        Tetromino::S,
        Tetromino::O,
    ];

    pub fn rotations(&self) -> &'static [Shape] {
        match self {
            Tetromino::I => &I_SHAPES,
            Tetromino::Z => &Z_SHAPES,
            Tetromino::T => &T_SHAPES,
            Tetromino::L => &L_SHAPES,
            Tetromino::J => &J_SHAPES,
            Tetromino::S => &S_SHAPES,
            Tetromino::O => &O_SHAPES,
        }
    }

    /// Value written into the well when locked
    pub fn color_index(&self) -> u8 {
        *self as u8 + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: Tetromino,
    pub rotation: usize,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    pub fn new(kind: Tetromino) -> Self {
        Self {
            kind,
            rotation: 0,
            x: SPAWN_X,
            y: 0,
        }
    }

    /// Occupied well cells as (col, row)
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let shape = &self.kind.rotations()[self.rotation];
        (0..16)
            .filter(move |i| shape[*i] != 0)
            .map(move |i| (self.x + (i % 4) as i32, self.y + (i / 4) as i32))
    }

    fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    fn rotated(&self, dir: i32) -> Self {
        let n = self.kind.rotations().len() as i32;
        Self {
            rotation: (self.rotation as i32 + dir).rem_euclid(n) as usize,
            ..*self
        }
    }
}

pub struct Tetris {
    pub phase: Phase,
    pub grid: [[u8; COLS]; ROWS],
    pub current: Piece,
    pub next: Piece,
    pub score: u32,
    pub lines: u32,
    pub drop_timer: f32,
    pub drop_interval: f32,
    rng: Pcg32,
}

impl Tetris {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let current = random_piece(&mut rng);
        let next = random_piece(&mut rng);
        Self {
            phase: Phase::Playing,
            grid: [[0; COLS]; ROWS],
            current,
            next,
            score: 0,
            lines: 0,
            drop_timer: 0.0,
            drop_interval: DROP_TIME,
            rng,
        }
    }

    fn restart(&mut self) {
        self.grid = [[0; COLS]; ROWS];
        self.current = random_piece(&mut self.rng);
        self.next = random_piece(&mut self.rng);
        self.score = 0;
        self.lines = 0;
        self.drop_timer = 0.0;
        self.drop_interval = DROP_TIME;
        self.phase = Phase::Playing;
        log::info!("Restarted");
    }

    /// Inside the walls and floor and clear of locked blocks; rows above the
    /// well are allowed.
    pub fn fits(&self, piece: &Piece) -> bool {
        piece.cells().all(|(c, r)| {
            if c < 0 || c >= COLS as i32 || r >= ROWS as i32 {
                return false;
            }
            r < 0 || self.grid[r as usize][c as usize] == 0
        })
    }

    fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let moved = self.current.moved(dx, dy);
        if self.fits(&moved) {
            self.current = moved;
            true
        } else {
            false
        }
    }

    /// Rotate with kicks of 0, +1 and -1 columns
    pub fn rotate(&mut self, dir: i32) -> bool {
        let turned = self.current.rotated(dir);
        for kick in [0, 1, -1] {
            let candidate = turned.moved(kick, 0);
            if self.fits(&candidate) {
                self.current = candidate;
                return true;
            }
        }
        false
    }

    pub fn hard_drop(&mut self) {
        while self.try_move(0, 1) {}
        self.lock();
    }

    fn lock(&mut self) {
        let index = self.current.kind.color_index();
        let cells: Vec<_> = self.current.cells().collect();
        for (c, r) in cells {
            if r < 0 {
                self.game_over();
                return;
            }
            self.grid[r as usize][c as usize] = index;
        }
        self.clear_lines();
        self.spawn();
    }

    fn spawn(&mut self) {
        let upcoming = random_piece(&mut self.rng);
        self.current = std::mem::replace(&mut self.next, upcoming);
        self.drop_timer = 0.0;
        if !self.fits(&self.current) {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        log::info!("Game over with {} points, {} lines", self.score, self.lines);
    }

    /// Remove full rows, shift the rest down and score them
    pub fn clear_lines(&mut self) -> usize {
        let kept: Vec<[u8; COLS]> = self
            .grid
            .iter()
            .filter(|row| row.contains(&0))
            .copied()
            .collect();
        let cleared = ROWS - kept.len();
        if cleared == 0 {
            return 0;
        }
        let mut grid = [[0; COLS]; ROWS];
        grid[cleared..].copy_from_slice(&kept);
        self.grid = grid;
        self.lines += cleared as u32;
        self.score += LINE_POINTS[cleared];
        self.drop_interval = DROP_TIME * 0.9f32.powi((self.lines / 10) as i32);
        log::debug!("Cleared {cleared} rows");
        cleared
    }

    fn draw_piece(list: &mut DrawList, piece: &Piece, origin: Vec2, block: f32) {
        let color = PALETTE[piece.kind.color_index() as usize];
        for (c, r) in piece.cells() {
            let cell = Rect::new(origin.x + c as f32 * block, origin.y + r as f32 * block, block, block);
            list.rect(cell, color);
            list.rect_lines(cell, 1.0, colors::BLACK);
        }
    }
}

fn random_piece(rng: &mut Pcg32) -> Piece {
    Piece::new(Tetromino::ALL[rng.random_range(0..Tetromino::ALL.len())])
}

impl Game for Tetris {
    fn id(&self) -> GameId {
        GameId::Tetris
    }

    fn screen_size(&self) -> (u32, u32) {
        (SCREEN.x as u32, SCREEN.y as u32)
    }

    fn update(&mut self, input: &InputState, dt: f32) {
        if self.phase != Phase::Playing {
            if input.is_pressed(Key::Enter) {
                self.restart();
            }
            return;
        }

        if input.any_pressed(&[Key::Left, Key::A]) {
            self.try_move(-1, 0);
        }
        if input.any_pressed(&[Key::Right, Key::D]) {
            self.try_move(1, 0);
        }
        if input.is_pressed(Key::Space) {
            self.hard_drop();
            return;
        }
        if input.any_pressed(&[Key::Up, Key::W, Key::X]) {
            self.rotate(1);
        }
        if input.any_pressed(&[Key::Z, Key::LeftCtrl]) {
            self.rotate(-1);
        }

        self.drop_timer += dt;
        let interval = if input.any_down(&[Key::Down, Key::S]) {
            SOFT_DROP_TIME
        } else {
            self.drop_interval
        };
        if self.drop_timer >= interval {
            self.drop_timer = 0.0;
            if !self.try_move(0, 1) {
                self.lock();
            }
        }
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::DARKGRAY);
        let well = Rect::new(OFFSET, OFFSET, COLS as f32 * BLOCK, ROWS as f32 * BLOCK);
        list.rect(well, rgb(30, 41, 59));
        list.rect_lines(well, 4.0, colors::LIGHTGRAY);

        for (r, row) in self.grid.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                if v == 0 {
                    continue;
                }
                let cell = Rect::new(OFFSET + c as f32 * BLOCK, OFFSET + r as f32 * BLOCK, BLOCK, BLOCK);
                list.rect(cell, PALETTE[v as usize]);
                list.rect_lines(cell, 1.0, colors::BLACK);
            }
        }
        if self.phase == Phase::Playing {
            Self::draw_piece(list, &self.current, Vec2::splat(OFFSET), BLOCK);
        }

        list.text("SCORE", HUD_X, 40.0, 20.0, colors::RAYWHITE);
        list.text(self.score.to_string(), HUD_X, 65.0, 30.0, colors::YELLOW);
        list.text("LINES", HUD_X, 110.0, 20.0, colors::RAYWHITE);
        list.text(self.lines.to_string(), HUD_X, 135.0, 30.0, colors::LIME);
        list.text("NEXT", HUD_X, 190.0, 20.0, colors::RAYWHITE);
        let preview = Vec2::new(HUD_X + 30.0 - SPAWN_X as f32 * PREVIEW_BLOCK, 220.0);
        Self::draw_piece(list, &self.next, preview, PREVIEW_BLOCK);

        let h = SCREEN.y;
        list.text("Controls:", 10.0, h - 35.0, 15.0, colors::WHITE);
        list.text("L/R: A/D", 10.0, h - 20.0, 15.0, colors::WHITE);
        list.text("Rotate: W/Up", 90.0, h - 35.0, 15.0, colors::WHITE);
        list.text("Soft Drop: S/Down", 90.0, h - 20.0, 15.0, colors::WHITE);
        list.text("Hard Drop: SPACE", 230.0, h - 20.0, 15.0, colors::RED);

        if self.phase == Phase::GameOver {
            list.rect(Rect::new(0.0, 0.0, SCREEN.x, SCREEN.y), fade(colors::BLACK, 0.8));
            list.text_centered("GAME OVER", SCREEN.x / 2.0, SCREEN.y / 2.0 - 60.0, 60.0, colors::RED);
            list.text_centered("Press ENTER to Restart", SCREEN.x / 2.0, SCREEN.y / 2.0 + 20.0, 25.0, colors::RAYWHITE);
        }
    }

    fn summary(&self) -> String {
        format!("{:?}, score {}, lines {}", self.phase, self.score, self.lines)
    }
}
