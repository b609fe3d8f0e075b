//! Tile maps parsed from rows of digits

use glam::Vec2;

use crate::error::{ArcadeError, Result};
use crate::sim::collision::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileKind {
    #[default]
    Air,
    Solid,
    Coin,
    Enemy,
}

impl TileKind {
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '0' => Some(Self::Air),
            '1' => Some(Self::Solid),
            '2' => Some(Self::Coin),
            '3' => Some(Self::Enemy),
            _ => None,
        }
    }
}

/// Row-major grid of square tiles
#[derive(Debug, Clone)]
pub struct TileGrid {
    cols: usize,
    rows: usize,
    tile_size: f32,
    cells: Vec<TileKind>,
}

impl TileGrid {
    /// Parse digit rows: 0 air, 1 solid, 2 coin, 3 enemy spawn
    pub fn parse(level: &str, rows: &[&str], tile_size: f32) -> Result<Self> {
        let cols = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(ArcadeError::LevelShape {
                level: level.to_string(),
                reason: "no rows",
            });
        }
        let mut cells = Vec::with_capacity(cols * rows.len());
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(ArcadeError::LevelShape {
                    level: level.to_string(),
                    reason: "ragged rows",
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let kind = TileKind::from_char(ch).ok_or_else(|| ArcadeError::LevelChar {
                    level: level.to_string(),
                    row,
                    col,
                    ch,
                })?;
                cells.push(kind);
            }
        }
        Ok(Self {
            cols,
            rows: rows.len(),
            tile_size,
            cells,
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Size of the whole map in pixels
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.cols as f32 * self.tile_size,
            self.rows as f32 * self.tile_size,
        )
    }

    pub fn get(&self, col: usize, row: usize) -> TileKind {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col]
        } else {
            TileKind::Air
        }
    }

    pub fn tile_rect(&self, col: usize, row: usize) -> Rect {
        let t = self.tile_size;
        Rect::new(col as f32 * t, row as f32 * t, t, t)
    }

    /// Every cell of `kind` as `(col, row)`, in row-major order
    pub fn positions(&self, kind: TileKind) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, k)| **k == kind)
            .map(|(i, _)| (i % self.cols, i / self.cols))
    }

    /// Remove all cells of `kind` (leaving air) and return their positions
    pub fn extract(&mut self, kind: TileKind) -> Vec<(usize, usize)> {
        let found: Vec<_> = self.positions(kind).collect();
        for &(c, r) in &found {
            self.cells[r * self.cols + c] = TileKind::Air;
        }
        found
    }

    /// Rectangles of solid tiles whose cells the given rectangle spans
    ///
    /// Cells are scanned from floor(x/T) to floor((x+w)/T), so a rectangle
    /// whose edge sits exactly on a tile boundary also picks up the
    /// neighbouring column; strict overlap rejects it later.
    pub fn solids_overlapping(&self, r: &Rect) -> Vec<Rect> {
        let t = self.tile_size;
        let col_range = span(r.x, r.right(), t, self.cols);
        let row_range = span(r.y, r.bottom(), t, self.rows);
        let (Some((c0, c1)), Some((r0, r1))) = (col_range, row_range) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for row in r0..=r1 {
            for col in c0..=c1 {
                if self.get(col, row) == TileKind::Solid {
                    out.push(self.tile_rect(col, row));
                }
            }
        }
        out
    }
}

fn span(lo: f32, hi: f32, tile: f32, count: usize) -> Option<(usize, usize)> {
    let a = (lo / tile).floor() as i64;
    let b = (hi / tile).floor() as i64;
    let max = count as i64 - 1;
    if b < 0 || a > max {
        return None;
    }
    Some((a.max(0) as usize, b.min(max) as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: [&str; 3] = ["0020", "0300", "1111"];

    #[test]
    fn test_parse_and_lookup() {
        let grid = TileGrid::parse("test", &ROWS, 40.0).unwrap();
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.get(2, 0), TileKind::Coin);
        assert_eq!(grid.get(1, 1), TileKind::Enemy);
        assert_eq!(grid.get(3, 2), TileKind::Solid);
        assert_eq!(grid.get(9, 9), TileKind::Air);
        assert_eq!(grid.world_size(), Vec2::new(160.0, 120.0));
    }

    #[test]
    fn test_parse_rejects_bad_char() {
        let err = TileGrid::parse("bad", &["0010", "00x0"], 40.0).unwrap_err();
        match err {
            ArcadeError::LevelChar { row, col, ch, .. } => {
                assert_eq!((row, col, ch), (1, 2, 'x'));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_ragged() {
        assert!(matches!(
            TileGrid::parse("bad", &["000", "00"], 40.0),
            Err(ArcadeError::LevelShape { .. })
        ));
    }

    #[test]
    fn test_extract_replaces_with_air() {
        let mut grid = TileGrid::parse("test", &ROWS, 40.0).unwrap();
        let coins = grid.extract(TileKind::Coin);
        assert_eq!(coins, vec![(2, 0)]);
        assert_eq!(grid.get(2, 0), TileKind::Air);
        assert_eq!(grid.positions(TileKind::Coin).count(), 0);
    }

    #[test]
    fn test_solids_overlapping() {
        let grid = TileGrid::parse("test", &ROWS, 40.0).unwrap();
        let near = grid.solids_overlapping(&Rect::new(30.0, 70.0, 32.0, 36.0));
        // Spans cols 0..=1 and rows 1..=2; only row 2 is solid
        assert_eq!(near.len(), 2);
        assert!(near.iter().all(|r| r.y == 80.0));
        assert!(grid.solids_overlapping(&Rect::new(-100.0, -100.0, 10.0, 10.0)).is_empty());
    }
}
