//! Grid-space primitives: cells, rectangles of cells and pixel conversion.

use bevy::prelude::*;
use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// An integer `(x, y)` coordinate in tile units. Can be negative while a drag
/// wanders off the top-left edge of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Pixel coordinate of this cell's top-left corner.
    pub fn pixel_origin(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }
}

/// Convert a pixel position to the grid cell containing it:
/// `floor(pixel / tile_size)` on both axes.
pub fn pixel_to_grid(pixel: Vec2, tile_size: f32) -> GridPos {
    GridPos {
        x: (pixel.x / tile_size).floor() as i32,
        y: (pixel.y / tile_size).floor() as i32,
    }
}

/// A rectangle of grid cells. Used for blocked terrain and for the implicit
/// occupancy of a placement's footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: `x <= cx < x + width`, same for y.
    pub fn contains(&self, cell: GridPos) -> bool {
        let cx = i64::from(cell.x);
        let cy = i64::from(cell.y);
        let x = i64::from(self.x);
        let y = i64::from(self.y);
        cx >= x && cx < x + i64::from(self.width) && cy >= y && cy < y + i64::from(self.height)
    }

    /// Every cell of the rectangle, row by row. Cells past the `i32` range
    /// are not representable and are left out.
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        let (x0, y0) = (i64::from(self.x), i64::from(self.y));
        let (width, height) = (i64::from(self.width), i64::from(self.height));
        (0..height).flat_map(move |dy| {
            (0..width).filter_map(move |dx| {
                let x = i32::try_from(x0 + dx).ok()?;
                let y = i32::try_from(y0 + dy).ok()?;
                Some(GridPos::new(x, y))
            })
        })
    }

    /// True when at least one cell of `self` is contained in `other`.
    ///
    /// Tested cell by cell, so the result composes correctly over a union of
    /// rectangles.
    pub fn shares_cell_with(&self, other: &Rect) -> bool {
        self.cells().any(|cell| other.contains(cell))
    }

    /// Pixel-space center and size, for drawing.
    pub fn pixel_center_and_size(&self, tile_size: f32) -> (Vec2, Vec2) {
        let size = Vec2::new(self.width as f32, self.height as f32) * tile_size;
        let origin = GridPos::new(self.x, self.y).pixel_origin(tile_size);
        (origin + size * 0.5, size)
    }
}
