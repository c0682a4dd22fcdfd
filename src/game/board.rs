use super::config::ConfigError;
use super::state::Position;

/// Fixed board geometry. Positions are pixel coordinates quantized to
/// `tile_size`, so the playable area is `[0, width) x [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    columns: u32,
    rows: u32,
    tile_size: u32,
}

impl Board {
    pub fn new(columns: u32, rows: u32, tile_size: u32) -> Result<Self, ConfigError> {
        for (field, value) in [("columns", columns), ("rows", rows), ("tile_size", tile_size)] {
            if value == 0 {
                return Err(ConfigError::ZeroDimension { field });
            }
        }

        let fits = |tiles: u32| {
            tiles
                .checked_mul(tile_size)
                .is_some_and(|extent| i32::try_from(extent).is_ok())
        };
        if !fits(columns) || !fits(rows) {
            return Err(ConfigError::BoardTooLarge {
                columns,
                rows,
                tile_size,
            });
        }

        // Head plus one food tile is the smallest playable board.
        if u64::from(columns) * u64::from(rows) < 2 {
            return Err(ConfigError::BoardTooSmall { columns, rows });
        }

        Ok(Self {
            columns,
            rows,
            tile_size,
        })
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Pixel width of the board
    pub fn width(&self) -> i32 {
        (self.columns * self.tile_size) as i32
    }

    /// Pixel height of the board
    pub fn height(&self) -> i32 {
        (self.rows * self.tile_size) as i32
    }

    pub fn tile_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width() && pos.y >= 0 && pos.y < self.height()
    }

    /// Position of the tile at `column`, `row`
    pub fn tile_at(&self, column: u32, row: u32) -> Position {
        Position::new(
            (column * self.tile_size) as i32,
            (row * self.tile_size) as i32,
        )
    }

    /// Position of the tile with the given row-major index
    pub fn tile_position(&self, index: usize) -> Position {
        let columns = self.columns as usize;
        self.tile_at((index % columns) as u32, (index / columns) as u32)
    }

    /// Column and row of an in-bounds, tile-aligned position
    pub fn tile_of(&self, pos: Position) -> Option<(u32, u32)> {
        let size = self.tile_size as i32;
        if !self.contains(pos) || pos.x % size != 0 || pos.y % size != 0 {
            return None;
        }
        Some(((pos.x / size) as u32, (pos.y / size) as u32))
    }

    /// Every tile on the board in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.tile_count()).map(move |index| self.tile_position(index))
    }
}
