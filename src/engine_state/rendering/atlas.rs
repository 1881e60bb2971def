//! Texture atlas layout.
//!
//! Block textures live in one image of 16 px tiles, 6 columns by 3 rows,
//! numbered row by row from the top left. Only the layout is known here; the
//! image itself belongs to the renderer.

/// Edge length of one tile in pixels.
pub const TILE_SIZE: u32 = 16;
/// Tiles per atlas row.
pub const ATLAS_COLUMNS: u32 = 6;
/// Tile rows in the atlas.
pub const ATLAS_ROWS: u32 = 3;

/// Normalized texture rectangle of one tile. `v0` is the top edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl TileRect {
    /// Texture coordinate of a face corner.
    ///
    /// `su` and `sv` are the corner's signs along the face's u and v axes. The
    /// bottom of the face (`sv == -1`) maps to the bottom of the tile.
    pub fn corner(&self, su: i32, sv: i32) -> [f32; 2] {
        let u = if su < 0 { self.u0 } else { self.u1 };
        let v = if sv < 0 { self.v1 } else { self.v0 };
        [u, v]
    }
}

/// The rectangle of tile `index`.
pub fn tile_rect(index: usize) -> TileRect {
    let index = index as u32;
    let column = (index % ATLAS_COLUMNS) as f32;
    let row = (index / ATLAS_COLUMNS) as f32;
    let width = 1.0 / ATLAS_COLUMNS as f32;
    let height = 1.0 / ATLAS_ROWS as f32;

    TileRect {
        u0: column * width,
        v0: row * height,
        u1: (column + 1.0) * width,
        v1: (row + 1.0) * height,
    }
}

/// Atlas size in pixels.
pub fn atlas_dimensions() -> (u32, u32) {
    (ATLAS_COLUMNS * TILE_SIZE, ATLAS_ROWS * TILE_SIZE)
}
