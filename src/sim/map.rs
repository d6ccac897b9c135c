//! Static occupancy grid
//!
//! World coordinates are continuous; a cell covers `[col * tile, (col + 1) * tile)`
//! on each axis. Anything outside the grid reads as a wall.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Cell codes stored in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Wall,
    /// Stalker spawn point; traversable
    Spawn,
}

/// Result of a world-space occupancy query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    Empty,
    Wall,
}

impl Cell {
    fn from_char(ch: char) -> Option<(Cell, Option<char>)> {
        match ch {
            '#' | '1' => Some((Cell::Wall, None)),
            '.' | ' ' | '0' => Some((Cell::Empty, None)),
            'S' | '2' => Some((Cell::Spawn, Some('S'))),
            'P' => Some((Cell::Empty, Some('P'))),
            _ => None,
        }
    }

    #[inline]
    pub fn is_traversable(self) -> bool {
        self != Cell::Wall
    }
}

const DEFAULT_LEVEL: &str = "\
################
#P.....#.......#
#.####.#.####..#
#.#....#....#..#
#.#.######..#..#
#.#......#..#..#
#.####.#.#..##.#
#......#.#.....#
####.###.#####.#
#....#.........#
#.##.#.#####.#.#
#.#..#.....#.#.#
#.#.####.#.#.#.#
#.#......#...#S#
################";

/// Immutable maze grid
#[derive(Debug, Clone)]
pub struct GridMap {
    width: usize,
    height: usize,
    tile_size: f32,
    cells: Vec<Cell>,
    player_start: (usize, usize),
    stalker_spawn: (usize, usize),
}

impl GridMap {
    /// Parse a map from ASCII rows and validate it
    ///
    /// Blank leading/trailing lines are ignored; every remaining row must have
    /// the same width. Exactly one `P` and one `S` are required.
    pub fn parse(text: &str, tile_size: f32) -> Result<Self, ConfigError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .skip_while(|line| line.trim().is_empty())
            .collect();
        let rows: Vec<&str> = {
            let end = rows
                .iter()
                .rposition(|line| !line.trim().is_empty())
                .map_or(0, |i| i + 1);
            rows[..end].to_vec()
        };

        let Some(first) = rows.first() else {
            return Err(ConfigError::EmptyMap);
        };
        let width = first.chars().count();
        if width == 0 {
            return Err(ConfigError::EmptyMap);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut player_start = None;
        let mut stalker_spawn = None;

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ConfigError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let (cell, marker) =
                    Cell::from_char(ch).ok_or(ConfigError::UnknownCell { row, col, ch })?;
                let slot = match marker {
                    Some('P') => Some(&mut player_start),
                    Some(_) => Some(&mut stalker_spawn),
                    None => None,
                };
                if let Some(slot) = slot {
                    if slot.is_some() {
                        return Err(ConfigError::DuplicateMarker(marker.unwrap_or(ch)));
                    }
                    *slot = Some((col, row));
                }
                cells.push(cell);
            }
        }

        if !cells.iter().any(|c| c.is_traversable()) {
            return Err(ConfigError::NoOpenCells);
        }
        let player_start = player_start.ok_or(ConfigError::MissingPlayerStart)?;
        let stalker_spawn = stalker_spawn.ok_or(ConfigError::MissingStalkerSpawn)?;

        let map = Self {
            width,
            height: rows.len(),
            tile_size,
            cells,
            player_start,
            stalker_spawn,
        };

        if !map.reachable(player_start, stalker_spawn) {
            return Err(ConfigError::UnreachableSpawn {
                col: stalker_spawn.0,
                row: stalker_spawn.1,
            });
        }

        log::debug!(
            "Parsed {}x{} map, player at {:?}, stalker at {:?}",
            map.width,
            map.height,
            player_start,
            stalker_spawn
        );
        Ok(map)
    }

    /// The built-in level
    pub fn default_level(tile_size: f32) -> Result<Self, ConfigError> {
        Self::parse(DEFAULT_LEVEL, tile_size)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World-space extent of the grid
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    /// Cell code at grid indices; out of range is a wall
    pub fn cell_at_index(&self, col: i64, row: i64) -> Cell {
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return Cell::Wall;
        }
        self.cells[row as usize * self.width + col as usize]
    }

    /// Occupancy at a world position
    pub fn cell_at(&self, pos: Vec2) -> Occupancy {
        // NaN compares false everywhere, so guard it explicitly
        if !pos.is_finite() {
            return Occupancy::Wall;
        }
        let col = (pos.x / self.tile_size).floor() as i64;
        let row = (pos.y / self.tile_size).floor() as i64;
        if self.cell_at_index(col, row).is_traversable() {
            Occupancy::Empty
        } else {
            Occupancy::Wall
        }
    }

    #[inline]
    pub fn is_open(&self, pos: Vec2) -> bool {
        self.cell_at(pos) == Occupancy::Empty
    }

    #[inline]
    pub fn is_wall(&self, pos: Vec2) -> bool {
        self.cell_at(pos) == Occupancy::Wall
    }

    /// World-space center of a cell
    pub fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * self.tile_size,
            (row as f32 + 0.5) * self.tile_size,
        )
    }

    pub fn player_start(&self) -> Vec2 {
        self.cell_center(self.player_start.0, self.player_start.1)
    }

    pub fn stalker_spawn(&self) -> Vec2 {
        self.cell_center(self.stalker_spawn.0, self.stalker_spawn.1)
    }

    /// Longest straight-line distance inside the grid
    pub fn diagonal(&self) -> f32 {
        self.world_size().length()
    }

    /// 4-connected flood fill between two cells
    fn reachable(&self, from: (usize, usize), to: (usize, usize)) -> bool {
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([from]);
        seen[from.1 * self.width + from.0] = true;

        while let Some((col, row)) = queue.pop_front() {
            if (col, row) == to {
                return true;
            }
            let neighbors = [
                (col as i64 + 1, row as i64),
                (col as i64 - 1, row as i64),
                (col as i64, row as i64 + 1),
                (col as i64, row as i64 - 1),
            ];
            for (nc, nr) in neighbors {
                if !self.cell_at_index(nc, nr).is_traversable() {
                    continue;
                }
                let idx = nr as usize * self.width + nc as usize;
                if !seen[idx] {
                    seen[idx] = true;
                    queue.push_back((nc as usize, nr as usize));
                }
            }
        }
        false
    }
}
