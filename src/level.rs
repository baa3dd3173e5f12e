/// Level grid: static tile classification plus spawn metadata.
///
/// A `LevelLayout` is the raw table as shipped; a `LevelGrid` is the
/// validated, world-space view built from it.  Grids are immutable and are
/// rebuilt whenever a level starts or restarts.

use crate::config::SimConfig;
use crate::entities::Tile;
use crate::error::LevelError;
use crate::geometry::{Rect, Vec2};

#[derive(Clone, Debug, PartialEq)]
pub struct LevelLayout {
    pub id: usize,
    /// Indexed `[row][col]`.
    pub tiles: Vec<Vec<Tile>>,
}

impl LevelLayout {
    /// Build a layout from ASCII rows (`#` wall, `.` empty, `E` enemy spawn,
    /// `P` player spawn).
    pub fn from_ascii(id: usize, rows: &[&str]) -> Result<Self, LevelError> {
        let mut tiles = Vec::with_capacity(rows.len());
        for (row, line) in rows.iter().enumerate() {
            let parsed = line
                .chars()
                .enumerate()
                .map(|(col, glyph)| {
                    Tile::from_glyph(glyph).ok_or(LevelError::UnknownTile { row, col, glyph })
                })
                .collect::<Result<Vec<_>, _>>()?;
            tiles.push(parsed);
        }
        Ok(Self { id, tiles })
    }

    /// Build a layout from the numeric codes of a numeric level table.
    pub fn from_codes(id: usize, rows: &[Vec<u8>]) -> Result<Self, LevelError> {
        let mut tiles = Vec::with_capacity(rows.len());
        for (row, codes) in rows.iter().enumerate() {
            let parsed = codes
                .iter()
                .enumerate()
                .map(|(col, &code)| {
                    Tile::from_code(code).ok_or(LevelError::UnknownTile {
                        row,
                        col,
                        glyph: char::from_digit(code as u32, 10).unwrap_or('?'),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            tiles.push(parsed);
        }
        Ok(Self { id, tiles })
    }

    pub fn width(&self) -> usize {
        self.tiles.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.tiles.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnPoints {
    pub player: Vec2,
    /// Row-major order.
    pub enemies: Vec<Vec2>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LevelGrid {
    id: usize,
    tiles: Vec<Vec<Tile>>,
    tile_size: f64,
    /// Full tile bounds, used for sight and cover tests.
    walls: Vec<Rect>,
    /// Inset bounds, used for collision.
    wall_bodies: Vec<Rect>,
    spawns: SpawnPoints,
}

impl LevelGrid {
    /// Validate `layout` and place it in world space.  Either the whole
    /// grid is built or an error is returned.
    pub fn new(layout: &LevelLayout, config: &SimConfig) -> Result<Self, LevelError> {
        let width = layout.width();
        if layout.height() == 0 || width == 0 {
            return Err(LevelError::EmptyGrid);
        }
        for (row, cells) in layout.tiles.iter().enumerate() {
            if cells.len() != width {
                return Err(LevelError::RaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
        }

        let tile_size = config.tile_size;
        let body_edge = tile_size - 2.0 * config.wall_body_inset;
        let mut walls = Vec::new();
        let mut wall_bodies = Vec::new();
        let mut player = None;
        let mut enemies = Vec::new();

        for (row, cells) in layout.tiles.iter().enumerate() {
            for (col, tile) in cells.iter().enumerate() {
                let center = tile_center(row, col, tile_size);
                match tile {
                    Tile::Wall => {
                        walls.push(Rect::from_center(center, tile_size, tile_size));
                        wall_bodies.push(Rect::from_center(center, body_edge, body_edge));
                    }
                    // Several markers: the last one in row-major order wins.
                    Tile::PlayerSpawn => player = Some(center),
                    Tile::EnemySpawn => enemies.push(center),
                    Tile::Empty => {}
                }
            }
        }

        let player = player.ok_or(LevelError::MissingPlayerSpawn)?;
        if enemies.is_empty() {
            return Err(LevelError::NoEnemySpawns);
        }

        Ok(Self {
            id: layout.id,
            tiles: layout.tiles.clone(),
            tile_size,
            walls,
            wall_bodies,
            spawns: SpawnPoints { player, enemies },
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Tile at `(row, col)`; cells off the grid read as `Empty`.
    pub fn tile_at(&self, row: usize, col: usize) -> Tile {
        self.tiles
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(Tile::Empty)
    }

    pub fn rows(&self) -> usize {
        self.tiles.len()
    }

    pub fn cols(&self) -> usize {
        self.tiles[0].len()
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// World extent `(width, height)`.
    pub fn world_bounds(&self) -> (f64, f64) {
        (
            self.cols() as f64 * self.tile_size,
            self.rows() as f64 * self.tile_size,
        )
    }

    pub fn spawn_points(&self) -> &SpawnPoints {
        &self.spawns
    }

    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }

    pub fn wall_bodies(&self) -> &[Rect] {
        &self.wall_bodies
    }
}

pub fn tile_center(row: usize, col: usize, tile_size: f64) -> Vec2 {
    Vec2::new(
        col as f64 * tile_size + tile_size / 2.0,
        row as f64 * tile_size + tile_size / 2.0,
    )
}

/// Patrol rectangle for an enemy spawned at `spawn`: the room containing it
/// is a block of `room_tiles` tiles, and the route runs clockwise from the
/// top-left corner inset by `patrol_margin_tiles`.
pub fn patrol_path(spawn: Vec2, config: &SimConfig) -> [Vec2; 4] {
    let tile = config.tile_size;
    let room_edge = config.room_tiles as f64 * tile;
    let room_x = (spawn.x / tile / config.room_tiles as f64).floor() * room_edge;
    let room_y = (spawn.y / tile / config.room_tiles as f64).floor() * room_edge;
    let margin = config.patrol_margin_tiles * tile;

    [
        Vec2::new(room_x + margin, room_y + margin),
        Vec2::new(room_x + room_edge - margin, room_y + margin),
        Vec2::new(room_x + room_edge - margin, room_y + room_edge - margin),
        Vec2::new(room_x + margin, room_y + room_edge - margin),
    ]
}
