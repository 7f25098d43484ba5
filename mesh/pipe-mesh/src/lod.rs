//! Level-of-detail policy.
//!
//! Each LOD rebuilds the pipe with a coarser cross-section: LOD `i` uses
//! `circle_detail - degrade_step * i` sides, never fewer than
//! [`MIN_CIRCLE_DETAIL`]. Triangle counts are forecast analytically so a
//! host can show the cost of a LOD set before building it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::params::{MIN_CIRCLE_DETAIL, MeshSides};

/// Circle detail and forecast cost of one LOD level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LodInfo {
    /// Cross-section polygon sides.
    pub circle_detail: u32,
    /// Triangles the mesh will have.
    pub triangles: usize,
}

/// Triangles a pipe with `chord_count` samples has at `circle_detail`.
///
/// Each enabled wall has two triangles per ring step between consecutive
/// samples; the two end caps add four per ring step together.
#[must_use]
pub fn forecast_triangles(chord_count: usize, circle_detail: u32, sides: &MeshSides) -> usize {
    let detail = circle_detail as usize;
    let segments = chord_count.saturating_sub(1);
    let mut triangles = sides.wall_count() * segments * detail * 2;
    if sides.edges {
        triangles += detail * 4;
    }
    triangles
}

/// Triangle indices matching [`forecast_triangles`].
#[must_use]
pub fn forecast_indices(chord_count: usize, circle_detail: u32, sides: &MeshSides) -> usize {
    forecast_triangles(chord_count, circle_detail, sides) * 3
}

/// Asset name of LOD `index` of the pipe `base`.
#[must_use]
pub fn lod_name(base: &str, index: usize) -> String {
    format!("{base}_LOD[{index}]")
}

/// Screen-relative switch height for each of `count` LOD levels.
///
/// Level `i` is shown until the object shrinks below `1 - (i + 1) / (count + 1)`
/// of the screen height; the sequence is strictly decreasing.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn transition_heights(count: usize) -> Vec<f64> {
    let step = 1.0 / (count + 1) as f64;
    (0..count).map(|i| (i + 1) as f64).map(|n| 1.0 - n * step).collect()
}

/// How many LOD levels to build and how fast the detail drops.
///
/// Both values are clamped against the base circle detail by the setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LodSettings {
    count: u32,
    degrade_step: u32,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            count: 1,
            degrade_step: 0,
        }
    }
}

impl LodSettings {
    /// Settings clamped for `circle_detail`.
    #[must_use]
    pub fn new(count: u32, degrade_step: u32, circle_detail: u32) -> Self {
        let mut settings = Self::default();
        settings.set_degrade_step(degrade_step, circle_detail);
        settings.set_count(count, circle_detail);
        settings
    }

    /// Number of LOD levels.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Circle detail removed per level.
    #[must_use]
    pub const fn degrade_step(&self) -> u32 {
        self.degrade_step
    }

    /// Largest step that still leaves a valid second level.
    #[must_use]
    pub const fn max_degrade_step(circle_detail: u32) -> u32 {
        circle_detail.saturating_sub(MIN_CIRCLE_DETAIL)
    }

    /// Most levels reachable with the current step.
    #[must_use]
    pub const fn max_count(&self, circle_detail: u32) -> u32 {
        if self.degrade_step < 1 {
            1
        } else {
            1 + Self::max_degrade_step(circle_detail) / self.degrade_step
        }
    }

    /// Set the level count, clamped to `[1, max_count]`.
    pub fn set_count(&mut self, count: u32, circle_detail: u32) {
        self.count = if self.degrade_step < 1 {
            1
        } else {
            count.clamp(1, self.max_count(circle_detail))
        };
    }

    /// Set the step, clamped to `[0, max_degrade_step]`, then re-clamp the count.
    pub fn set_degrade_step(&mut self, step: u32, circle_detail: u32) {
        self.degrade_step = step.min(Self::max_degrade_step(circle_detail));
        self.set_count(self.count, circle_detail);
    }

    /// Re-clamp both values after the base circle detail changed.
    pub fn clamp_to(&mut self, circle_detail: u32) {
        self.set_degrade_step(self.degrade_step, circle_detail);
    }

    /// Detail and forecast for every level, finest first.
    ///
    /// Stops early at the first level that would drop below the minimum detail.
    #[must_use]
    pub fn lod_infos(&self, circle_detail: u32, chord_count: usize, sides: &MeshSides) -> Vec<LodInfo> {
        (0..self.count)
            .map_while(|i| {
                let detail = circle_detail.checked_sub(self.degrade_step * i)?;
                (detail >= MIN_CIRCLE_DETAIL).then(|| LodInfo {
                    circle_detail: detail,
                    triangles: forecast_triangles(chord_count, detail, sides),
                })
            })
            .collect()
    }
}
