//! Texture coordinate layout for pipe walls and end caps.

use nalgebra::Vector2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tiling and offset for one lengthwise wall.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SideUv {
    /// Component-wise scale applied to the base coordinates. Default: (1, 1)
    pub tiling: Vector2<f64>,

    /// Added after tiling. Default: (0, 0)
    pub offset: Vector2<f64>,

    /// Scale U by `length / (2 * radius) * tiling.y` so texels stay roughly
    /// square whatever the pipe proportions. Default: false
    pub auto_tiling: bool,
}

impl Default for SideUv {
    fn default() -> Self {
        Self {
            tiling: Vector2::new(1.0, 1.0),
            offset: Vector2::zeros(),
            auto_tiling: false,
        }
    }
}

impl SideUv {
    /// Set the tiling.
    #[must_use]
    pub const fn with_tiling(mut self, tiling: Vector2<f64>) -> Self {
        self.tiling = tiling;
        self
    }

    /// Set the offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: Vector2<f64>) -> Self {
        self.offset = offset;
        self
    }

    /// Enable or disable automatic U tiling.
    #[must_use]
    pub const fn with_auto_tiling(mut self, auto_tiling: bool) -> Self {
        self.auto_tiling = auto_tiling;
        self
    }

    /// Apply tiling then offset to `uvs` in place.
    pub fn apply(&self, uvs: &mut [Vector2<f64>]) {
        apply_tiling_and_offset(uvs, &self.tiling, &self.offset);
    }

    /// Apply automatic U tiling for a wall of `length` and `radius`, if enabled.
    pub fn apply_auto_tiling(&self, uvs: &mut [Vector2<f64>], length: f64, radius: f64) {
        if !self.auto_tiling || radius <= 0.0 {
            return;
        }
        let scale = length / (radius * 2.0) * self.tiling.y;
        for uv in uvs {
            uv.x *= scale;
        }
    }
}

/// Tiling and offset for the end-cap discs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeUv {
    /// Component-wise scale. Default: (1, 1)
    pub tiling: Vector2<f64>,

    /// Added after tiling. Default: (0, 0)
    pub offset: Vector2<f64>,
}

impl Default for EdgeUv {
    fn default() -> Self {
        Self {
            tiling: Vector2::new(1.0, 1.0),
            offset: Vector2::zeros(),
        }
    }
}

impl EdgeUv {
    /// Apply tiling then offset to `uvs` in place.
    pub fn apply(&self, uvs: &mut [Vector2<f64>]) {
        apply_tiling_and_offset(uvs, &self.tiling, &self.offset);
    }
}

/// UV configuration for every side of a pipe.
///
/// # Example
///
/// ```
/// use pipe_mesh::{SideUv, TextureAtlas, UvProperties};
///
/// let uv = UvProperties::default()
///     .with_outer(SideUv::default().with_auto_tiling(true))
///     .with_atlas(&TextureAtlas::default().with_rows(2, 0.0));
///
/// assert!((uv.outer.tiling.y - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UvProperties {
    /// Outer wall.
    pub outer: SideUv,
    /// Inner wall.
    pub inner: SideUv,
    /// End caps.
    pub edges: EdgeUv,
}

impl UvProperties {
    /// Set the outer wall layout.
    #[must_use]
    pub const fn with_outer(mut self, outer: SideUv) -> Self {
        self.outer = outer;
        self
    }

    /// Set the inner wall layout.
    #[must_use]
    pub const fn with_inner(mut self, inner: SideUv) -> Self {
        self.inner = inner;
        self
    }

    /// Set the end-cap layout.
    #[must_use]
    pub const fn with_edges(mut self, edges: EdgeUv) -> Self {
        self.edges = edges;
        self
    }

    /// Derive the atlas-controlled tiling and offsets from `atlas`.
    #[must_use]
    pub fn with_atlas(mut self, atlas: &TextureAtlas) -> Self {
        atlas.apply(&mut self);
        self
    }
}

/// A texture laid out as a grid of rows (walls) and columns (caps).
///
/// Rows and columns are numbered from 1; row 1 is the top of the texture.
/// Walls span the full width of their row. The end caps take one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextureAtlas {
    /// Number of rows. Default: 1
    pub rows: u32,
    /// Gap between rows, in UV units. Default: 0
    pub rows_gap: f64,
    /// Number of columns. Default: 1
    pub columns: u32,
    /// Gap between columns, in UV units. Default: 0
    pub columns_gap: f64,
    /// Row used by the outer wall. Default: 1
    pub outer_row: u32,
    /// Row used by the inner wall. Default: 1
    pub inner_row: u32,
    /// Row used by the end caps. Default: 1
    pub edge_row: u32,
    /// Column used by the end caps. Default: 1
    pub edge_column: u32,
}

impl Default for TextureAtlas {
    fn default() -> Self {
        Self {
            rows: 1,
            rows_gap: 0.0,
            columns: 1,
            columns_gap: 0.0,
            outer_row: 1,
            inner_row: 1,
            edge_row: 1,
            edge_column: 1,
        }
    }
}

impl TextureAtlas {
    /// Set the row count and the gap between rows.
    #[must_use]
    pub fn with_rows(mut self, rows: u32, gap: f64) -> Self {
        self.rows = rows;
        self.rows_gap = gap.max(0.0);
        self
    }

    /// Set the column count and the gap between columns.
    #[must_use]
    pub fn with_columns(mut self, columns: u32, gap: f64) -> Self {
        self.columns = columns;
        self.columns_gap = gap.max(0.0);
        self
    }

    /// Choose the rows of the outer and inner walls.
    #[must_use]
    pub const fn with_wall_rows(mut self, outer_row: u32, inner_row: u32) -> Self {
        self.outer_row = outer_row;
        self.inner_row = inner_row;
        self
    }

    /// Choose the cell of the end caps.
    #[must_use]
    pub const fn with_edge_cell(mut self, row: u32, column: u32) -> Self {
        self.edge_row = row;
        self.edge_column = column;
        self
    }

    /// Clamp counts to at least one and every index into range.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.rows = self.rows.max(1);
        self.columns = self.columns.max(1);
        self.outer_row = self.outer_row.clamp(1, self.rows);
        self.inner_row = self.inner_row.clamp(1, self.rows);
        self.edge_row = self.edge_row.clamp(1, self.rows);
        self.edge_column = self.edge_column.clamp(1, self.columns);
        self
    }

    /// Height of one row in UV units.
    #[must_use]
    pub fn row_height(&self) -> f64 {
        let rows = f64::from(self.rows.max(1));
        (1.0 - self.rows_gap * (rows - 1.0)) / rows
    }

    /// Width of one column in UV units.
    #[must_use]
    pub fn column_width(&self) -> f64 {
        let columns = f64::from(self.columns.max(1));
        (1.0 - self.columns_gap * (columns - 1.0)) / columns
    }

    fn row_offset(&self, row: u32) -> f64 {
        f64::from(self.rows - row) * (self.row_height() + self.rows_gap)
    }

    /// Write the atlas-controlled fields of `uv`.
    ///
    /// Sets the V tiling and V offset of both walls and the full tiling and
    /// offset of the end caps. U tiling and U offset of the walls are kept.
    pub fn apply(&self, uv: &mut UvProperties) {
        let atlas = self.clamped();
        let height = atlas.row_height();
        let width = atlas.column_width();

        uv.outer.tiling.y = height;
        uv.outer.offset.y = atlas.row_offset(atlas.outer_row);
        uv.inner.tiling.y = height;
        uv.inner.offset.y = atlas.row_offset(atlas.inner_row);

        uv.edges.tiling = Vector2::new(width, height);
        uv.edges.offset = Vector2::new(
            f64::from(atlas.edge_column - 1) * (width + atlas.columns_gap),
            atlas.row_offset(atlas.edge_row),
        );
    }
}

/// Multiply every coordinate by `tiling`, then add `offset`.
pub fn apply_tiling_and_offset(uvs: &mut [Vector2<f64>], tiling: &Vector2<f64>, offset: &Vector2<f64>) {
    for uv in uvs {
        *uv = uv.component_mul(tiling) + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn tiling_then_offset() {
        let mut uvs = vec![Vector2::new(0.5, 1.0)];
        let side = SideUv::default()
            .with_tiling(Vector2::new(2.0, 0.5))
            .with_offset(Vector2::new(0.1, 0.2));
        side.apply(&mut uvs);
        assert_relative_eq!(uvs[0], Vector2::new(1.1, 0.7), epsilon = 1e-12);
    }

    #[test]
    fn auto_tiling_scales_u_only() {
        let mut uvs = vec![Vector2::new(0.5, 0.25)];
        let side = SideUv::default().with_auto_tiling(true);
        side.apply_auto_tiling(&mut uvs, 10.0, 1.0);
        assert_relative_eq!(uvs[0], Vector2::new(2.5, 0.25), epsilon = 1e-12);

        let mut untouched = vec![Vector2::new(0.5, 0.25)];
        SideUv::default().apply_auto_tiling(&mut untouched, 10.0, 1.0);
        assert_eq!(untouched[0], Vector2::new(0.5, 0.25));
    }

    #[test]
    fn single_cell_atlas_is_identity() {
        let uv = UvProperties::default().with_atlas(&TextureAtlas::default());
        assert_eq!(uv, UvProperties::default());
    }

    #[test]
    fn atlas_rows_with_gap() {
        let atlas = TextureAtlas::default()
            .with_rows(3, 0.05)
            .with_wall_rows(1, 3);
        let uv = UvProperties::default().with_atlas(&atlas);

        let height = 0.9 / 3.0;
        assert_relative_eq!(uv.outer.tiling.y, height, epsilon = 1e-12);
        assert_relative_eq!(uv.outer.offset.y, 2.0 * (height + 0.05), epsilon = 1e-12);
        assert_relative_eq!(uv.inner.offset.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(uv.outer.tiling.x, 1.0);
    }

    #[test]
    fn atlas_edge_cell_uses_column_gap() {
        let atlas = TextureAtlas::default()
            .with_rows(2, 0.0)
            .with_columns(4, 0.02)
            .with_edge_cell(2, 3);
        let uv = UvProperties::default().with_atlas(&atlas);

        let width = (1.0 - 0.02 * 3.0) / 4.0;
        assert_relative_eq!(uv.edges.tiling, Vector2::new(width, 0.5), epsilon = 1e-12);
        assert_relative_eq!(uv.edges.offset.x, 2.0 * (width + 0.02), epsilon = 1e-12);
        assert_relative_eq!(uv.edges.offset.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn atlas_clamps_out_of_range_cells() {
        let atlas = TextureAtlas::default()
            .with_rows(0, 0.0)
            .with_wall_rows(5, 0)
            .with_edge_cell(9, 9)
            .clamped();
        assert_eq!(atlas.rows, 1);
        assert_eq!(atlas.outer_row, 1);
        assert_eq!(atlas.inner_row, 1);
        assert_eq!(atlas.edge_row, 1);
        assert_eq!(atlas.edge_column, 1);
    }

    #[test]
    fn negative_gaps_become_zero() {
        let atlas = TextureAtlas::default().with_rows(2, -0.5).with_columns(2, -1.0);
        assert_relative_eq!(atlas.rows_gap, 0.0);
        assert_relative_eq!(atlas.columns_gap, 0.0);
        assert_relative_eq!(atlas.row_height(), 0.5);
    }
}
