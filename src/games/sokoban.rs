//! Box-pushing puzzles loaded from ASCII maps

use std::collections::VecDeque;

use glam::IVec2;

use super::{Game, GameId, Phase};
use crate::error::{ArcadeError, Result};
use crate::platform::{InputState, Key};
use crate::renderer::{Color, DrawList, colors, fade, rgb};
use crate::sim::collision::Rect;

const BLOCK: f32 = 40.0;
const HUD_H: f32 = 50.0;
/// Snapshots kept for undo, including the current one
const MAX_HISTORY: usize = 50;

const WALL: Color = rgb(100, 100, 100);
const FLOOR: Color = rgb(40, 40, 50);
const GOAL: Color = rgb(20, 20, 30);
const PLAYER: Color = rgb(255, 165, 0);
const BOX_OFF: Color = rgb(139, 69, 19);
const BOX_ON: Color = rgb(0, 255, 0);
const HUD: Color = rgb(30, 30, 30);

pub const LEVELS: [(&str, &[&str]); 3] = [
    (
        "1",
        &[
            "##########",
            "#  #     #",
            "# $# $ $ #",
            "#  # . . #",
            "# @. $ . #",
            "##########",
        ],
    ),
    (
        "2",
        &[
            "########",
            "#@.$  .#",
            "# $    #",
            "# . $  #",
            "## #   #",
            "#  . $ #",
            "########",
        ],
    ),
    (
        "3",
        &[
            "#########",
            "#@      #",
            "# $ # $ #",
            "# . # . #",
            "#       #",
            "# $ # $ #",
            "# . # . #",
            "#########",
        ],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Floor,
    Goal,
}

/// A parsed map: static cells plus the starting player and boxes
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub name: String,
    pub cols: usize,
    pub rows: usize,
    cells: Vec<Cell>,
    pub player: IVec2,
    pub boxes: Vec<IVec2>,
}

impl Level {
    /// `#` wall, `.` goal, `@` player, `+` player on goal, `$` box,
    /// `*` box on goal, space floor. Short rows are padded with floor.
    pub fn parse(name: &str, rows: &[&str]) -> Result<Self> {
        let shape_err = |reason| ArcadeError::LevelShape {
            level: name.to_string(),
            reason,
        };
        let cols = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        if cols == 0 {
            return Err(shape_err("no rows"));
        }

        let mut cells = vec![Cell::Floor; cols * rows.len()];
        let mut player = None;
        let mut boxes = Vec::new();
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let at = IVec2::new(col as i32, row as i32);
                let cell = &mut cells[row * cols + col];
                match ch {
                    '#' => *cell = Cell::Wall,
                    ' ' => {}
                    '.' => *cell = Cell::Goal,
                    '@' | '+' => {
                        if player.replace(at).is_some() {
                            return Err(shape_err("more than one player"));
                        }
                        if ch == '+' {
                            *cell = Cell::Goal;
                        }
                    }
                    '$' => boxes.push(at),
                    '*' => {
                        boxes.push(at);
                        *cell = Cell::Goal;
                    }
                    _ => {
                        return Err(ArcadeError::LevelChar {
                            level: name.to_string(),
                            row,
                            col,
                            ch,
                        });
                    }
                }
            }
        }

        let player = player.ok_or_else(|| shape_err("no player"))?;
        let goals = cells.iter().filter(|c| **c == Cell::Goal).count();
        if boxes.is_empty() {
            return Err(shape_err("no boxes"));
        }
        if goals != boxes.len() {
            return Err(shape_err("box and goal counts differ"));
        }
        Ok(Self {
            name: name.to_string(),
            cols,
            rows: rows.len(),
            cells,
            player,
            boxes,
        })
    }

    /// Outside the map counts as wall
    pub fn cell(&self, at: IVec2) -> Cell {
        if at.x < 0 || at.y < 0 || at.x as usize >= self.cols || at.y as usize >= self.rows {
            return Cell::Wall;
        }
        self.cells[at.y as usize * self.cols + at.x as usize]
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    player: IVec2,
    boxes: Vec<IVec2>,
}

pub struct Sokoban {
    pub phase: Phase,
    pub levels: Vec<Level>,
    pub current: usize,
    pub player: IVec2,
    pub boxes: Vec<IVec2>,
    pub moves: u32,
    history: VecDeque<Snapshot>,
}

impl Sokoban {
    pub fn new() -> Result<Self> {
        let levels = LEVELS
            .iter()
            .map(|(name, rows)| Level::parse(name, rows))
            .collect::<Result<Vec<_>>>()?;
        Self::with_levels(levels)
    }

    /// Play a custom list of levels
    pub fn with_levels(levels: Vec<Level>) -> Result<Self> {
        if levels.is_empty() {
            return Err(ArcadeError::LevelShape {
                level: "(none)".to_string(),
                reason: "no levels",
            });
        }
        let mut game = Self {
            phase: Phase::Playing,
            levels,
            current: 0,
            player: IVec2::ZERO,
            boxes: Vec::new(),
            moves: 0,
            history: VecDeque::new(),
        };
        game.load(0);
        Ok(game)
    }

    fn level(&self) -> &Level {
        &self.levels[self.current]
    }

    pub fn load(&mut self, index: usize) {
        self.current = index % self.levels.len().max(1);
        let (player, boxes) = (self.level().player, self.level().boxes.clone());
        self.player = player;
        self.boxes = boxes;
        self.moves = 0;
        self.history.clear();
        self.save();
        self.phase = Phase::Playing;
        log::info!("Loaded level {}", self.level().name);
    }

    fn save(&mut self) {
        if self.history.len() >= MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(Snapshot {
            player: self.player,
            boxes: self.boxes.clone(),
        });
    }

    pub fn undo(&mut self) -> bool {
        if self.history.len() <= 1 {
            return false;
        }
        self.history.pop_back();
        if let Some(prev) = self.history.back() {
            self.player = prev.player;
            self.boxes = prev.boxes.clone();
        }
        self.moves = self.moves.saturating_sub(1);
        true
    }

    /// Step the player, pushing a box when the cell beyond it is open
    pub fn step(&mut self, dir: IVec2) -> bool {
        let next = self.player + dir;
        if self.level().cell(next) == Cell::Wall {
            return false;
        }
        if let Some(i) = self.boxes.iter().position(|b| *b == next) {
            let beyond = next + dir;
            if self.level().cell(beyond) == Cell::Wall || self.boxes.contains(&beyond) {
                return false;
            }
            self.boxes[i] = beyond;
        }
        self.player = next;
        self.moves += 1;
        self.save();
        if self.solved() {
            self.phase = Phase::Won;
            log::info!("Level {} solved in {} moves", self.level().name, self.moves);
        }
        true
    }

    pub fn solved(&self) -> bool {
        let level = self.level();
        self.boxes.iter().all(|b| level.cell(*b) == Cell::Goal)
    }

    fn is_last_level(&self) -> bool {
        self.current + 1 == self.levels.len()
    }
}

impl Game for Sokoban {
    fn id(&self) -> GameId {
        GameId::Sokoban
    }

    /// Sized for the largest level
    fn screen_size(&self) -> (u32, u32) {
        let cols = self.levels.iter().map(|l| l.cols).max().unwrap_or(0);
        let rows = self.levels.iter().map(|l| l.rows).max().unwrap_or(0);
        ((cols as f32 * BLOCK) as u32, (rows as f32 * BLOCK + HUD_H) as u32)
    }

    fn update(&mut self, input: &InputState, _dt: f32) {
        if self.phase == Phase::Won {
            if input.is_pressed(Key::Enter) {
                self.load(self.current + 1);
            }
            return;
        }
        if input.is_pressed(Key::R) {
            self.load(self.current);
            return;
        }
        if input.is_pressed(Key::Z) {
            self.undo();
        }

        let dir = if input.any_pressed(&[Key::Right, Key::D]) {
            IVec2::X
        } else if input.any_pressed(&[Key::Left, Key::A]) {
            IVec2::NEG_X
        } else if input.any_pressed(&[Key::Up, Key::W]) {
            IVec2::NEG_Y
        } else if input.any_pressed(&[Key::Down, Key::S]) {
            IVec2::Y
        } else {
            return;
        };
        self.step(dir);
    }

    fn draw(&self, list: &mut DrawList) {
        list.clear(colors::DARKGRAY);
        let level = self.level();
        let tile = |at: IVec2| Rect::new(at.x as f32 * BLOCK, at.y as f32 * BLOCK, BLOCK, BLOCK);

        for row in 0..level.rows {
            for col in 0..level.cols {
                let at = IVec2::new(col as i32, row as i32);
                let r = tile(at);
                list.rect(r, FLOOR);
                match level.cell(at) {
                    Cell::Wall => list.rect(r, WALL),
                    Cell::Goal => list.circle(r.center(), (BLOCK / 3.0).floor(), GOAL),
                    Cell::Floor => {}
                }
            }
        }
        for b in &self.boxes {
            let r = tile(*b);
            let color = if level.cell(*b) == Cell::Goal { BOX_ON } else { BOX_OFF };
            list.rect(r.inset(2.0), color);
            list.rect_lines(r, 1.0, colors::BLACK);
        }
        list.circle(tile(self.player).center(), BLOCK / 2.0 - 5.0, PLAYER);

        let (w, h) = self.screen_size();
        let (w, h) = (w as f32, h as f32);
        let hud_y = level.rows as f32 * BLOCK;
        list.rect(Rect::new(0.0, hud_y, w, HUD_H), HUD);
        list.text("LEVEL:", 10.0, hud_y + 5.0, 20.0, colors::RAYWHITE);
        list.text(format!("{} / {}", self.current + 1, self.levels.len()), 90.0, hud_y + 5.0, 20.0, colors::LIME);
        list.text("MOVES:", 200.0, hud_y + 5.0, 20.0, colors::RAYWHITE);
        list.text(self.moves.to_string(), 290.0, hud_y + 5.0, 20.0, colors::YELLOW);
        list.text("Arrows/WASD | Undo: Z | Reset: R", 10.0, hud_y + 30.0, 14.0, colors::RAYWHITE);

        if self.phase == Phase::Won {
            list.rect(Rect::new(0.0, 0.0, w, h), fade(colors::BLACK, 0.8));
            let (title, hint) = if self.is_last_level() {
                ("ALL LEVELS CONQUERED!", "Press ENTER to Restart from Level 1")
            } else {
                ("LEVEL CLEARED!", "Press ENTER for Next Level")
            };
            list.text_centered(title, w / 2.0, h / 2.0 - 60.0, 40.0, colors::GREEN);
            list.text_centered(&format!("Total Moves: {}", self.moves), w / 2.0, h / 2.0, 25.0, colors::RAYWHITE);
            list.text_centered(hint, w / 2.0, h / 2.0 + 40.0, 20.0, colors::RAYWHITE);
        }
    }

    fn summary(&self) -> String {
        format!("level {}, {} moves, {:?}", self.level().name, self.moves, self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn corridor() -> Level {
        Level::parse("corridor", &["#####", "#@$.#", "#####"]).unwrap()
    }

    #[test]
    fn test_builtin_levels_parse() {
        let game = Sokoban::new().unwrap();
        assert_eq!(game.levels.len(), 3);
        for level in &game.levels {
            assert_eq!(level.boxes.len(), 4);
        }
        assert_eq!(game.player, IVec2::new(2, 4));
        assert_eq!(game.screen_size(), (400, 370));
    }

    #[test]
    fn test_parse_rejects_bad_maps() {
        match Level::parse("x", &["#@$.#", "#?  #"]) {
            Err(ArcadeError::LevelChar { row, col, ch, .. }) => {
                assert_eq!((row, col, ch), (1, 1, '?'));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            Level::parse("x", &["#$.#"]),
            Err(ArcadeError::LevelShape { reason: "no player", .. })
        ));
        assert!(matches!(
            Level::parse("x", &["#@$$.#"]),
            Err(ArcadeError::LevelShape { reason: "box and goal counts differ", .. })
        ));
        assert!(matches!(Level::parse("x", &[]), Err(ArcadeError::LevelShape { .. })));
    }

    #[test]
    fn test_empty_level_list_is_rejected() {
        assert!(matches!(
            Sokoban::with_levels(Vec::new()),
            Err(ArcadeError::LevelShape { reason: "no levels", .. })
        ));
    }

    #[test]
    fn test_parse_player_and_box_on_goal() {
        let level = Level::parse("x", &["#+*$#"]).unwrap();
        assert_eq!(level.player, IVec2::new(1, 0));
        assert_eq!(level.cell(IVec2::new(1, 0)), Cell::Goal);
        assert_eq!(level.cell(IVec2::new(2, 0)), Cell::Goal);
        assert_eq!(level.boxes, vec![IVec2::new(2, 0), IVec2::new(3, 0)]);
        assert_eq!(level.cell(IVec2::new(-1, 0)), Cell::Wall);
    }

    #[test]
    fn test_push_box_onto_goal() {
        let mut game = Sokoban::new().unwrap();
        let right = InputState::pressing(&[Key::Right]);
        for _ in 0..4 {
            game.update(&right, DT);
        }
        assert_eq!(game.moves, 4);
        assert_eq!(game.player, IVec2::new(6, 4));
        assert!(game.boxes.contains(&IVec2::new(7, 4)));
        assert_eq!(game.phase, Phase::Playing);
    }

    #[test]
    fn test_cannot_push_two_boxes() {
        let level = Level::parse("pair", &["#######", "#@$$..#", "#######"]).unwrap();
        let mut game = Sokoban::with_levels(vec![level]).unwrap();
        assert!(!game.step(IVec2::X));
        assert_eq!(game.moves, 0);
        assert!(!game.step(IVec2::NEG_Y));
    }

    #[test]
    fn test_undo_restores_previous_state() {
        let mut game = Sokoban::new().unwrap();
        let start = (game.player, game.boxes.clone());
        for _ in 0..3 {
            game.step(IVec2::X);
        }
        game.update(&InputState::pressing(&[Key::Z]), DT);
        assert_eq!(game.moves, 2);
        assert_eq!(game.player, IVec2::new(4, 4));
        assert!(game.boxes.contains(&IVec2::new(5, 4)));
        game.undo();
        game.undo();
        assert_eq!((game.player, game.boxes.clone()), start);
        assert!(!game.undo());
    }

    #[test]
    fn test_undo_history_is_capped() {
        let mut game = Sokoban::new().unwrap();
        game.load(2);
        for i in 0..60 {
            game.step(if i % 2 == 0 { IVec2::X } else { IVec2::NEG_X });
        }
        assert_eq!(game.moves, 60);
        let mut undone = 0;
        while game.undo() {
            undone += 1;
        }
        assert_eq!(undone, MAX_HISTORY - 1);
        assert_eq!(game.moves, 60 - (MAX_HISTORY as u32 - 1));
    }

    #[test]
    fn test_solving_advances_and_wraps() {
        let mut game = Sokoban::with_levels(vec![corridor(), corridor()]).unwrap();
        game.update(&InputState::pressing(&[Key::D]), DT);
        assert_eq!(game.phase, Phase::Won);

        let enter = InputState::pressing(&[Key::Enter]);
        game.update(&enter, DT);
        assert_eq!(game.current, 1);
        assert_eq!(game.phase, Phase::Playing);
        assert_eq!(game.moves, 0);

        game.step(IVec2::X);
        game.update(&enter, DT);
        assert_eq!(game.current, 0);
    }

    #[test]
    fn test_restart_level() {
        let mut game = Sokoban::new().unwrap();
        game.step(IVec2::X);
        game.update(&InputState::pressing(&[Key::R]), DT);
        assert_eq!(game.moves, 0);
        assert_eq!(game.player, IVec2::new(2, 4));
    }
}
