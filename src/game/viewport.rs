//! Grid sizing from the available drawing area.

use crate::constants::{
    MAX_CELL_PX, USABLE_HEIGHT_FRACTION, USABLE_WIDTH_FRACTION, VIEWPORT_COLUMNS, VIEWPORT_ROWS,
};
use serde::{Deserialize, Serialize};

/// Tunables for `GridSpec::from_viewport`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSizing {
    /// Ceiling on the cell size, in pixels.
    pub max_cell_px: u16,
    /// Share of the viewport width the play field may use.
    pub usable_width_fraction: f64,
    /// Share of the viewport height the play field may use.
    pub usable_height_fraction: f64,
}

impl Default for GridSizing {
    fn default() -> Self {
        Self {
            max_cell_px: MAX_CELL_PX,
            usable_width_fraction: USABLE_WIDTH_FRACTION,
            usable_height_fraction: USABLE_HEIGHT_FRACTION,
        }
    }
}

impl GridSizing {
    pub fn validated(mut self) -> Self {
        self.max_cell_px = self.max_cell_px.max(1);
        for fraction in [
            &mut self.usable_width_fraction,
            &mut self.usable_height_fraction,
        ] {
            if !fraction.is_finite() || *fraction <= 0.0 || *fraction > 1.0 {
                *fraction = 1.0;
            }
        }
        self
    }
}

/// Grid geometry for one game session. Never changes while a game runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    /// Edge length of one cell, in pixels.
    pub cell_size: u16,
    /// Width in cells.
    pub width: i16,
    /// Height in cells.
    pub height: i16,
}

impl GridSpec {
    pub fn new(cell_size: u16, width: i16, height: i16) -> Self {
        Self {
            cell_size,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Compute cell size and grid dimensions from a viewport in pixels.
    ///
    /// `cell = min(vw / 40, vh / 30, cap)`; the grid fills the usable share
    /// of the viewport. A viewport too small for one pixel per cell yields a
    /// 0x0 grid, which the game refuses to start on.
    pub fn from_viewport(viewport_w: u32, viewport_h: u32, sizing: &GridSizing) -> Self {
        let cell_size = (viewport_w / VIEWPORT_COLUMNS)
            .min(viewport_h / VIEWPORT_ROWS)
            .min(u32::from(sizing.max_cell_px));

        if cell_size == 0 {
            return Self::new(0, 0, 0);
        }

        let usable_w = f64::from(viewport_w) * sizing.usable_width_fraction;
        let usable_h = f64::from(viewport_h) * sizing.usable_height_fraction;
        let width = (usable_w / f64::from(cell_size)).floor() as i64;
        let height = (usable_h / f64::from(cell_size)).floor() as i64;

        Self::new(
            cell_size as u16,
            width.clamp(0, i64::from(i16::MAX)) as i16,
            height.clamp(0, i64::from(i16::MAX)) as i16,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0 || self.cell_size == 0
    }

    pub fn contains(&self, x: i16, y: i16) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn cell_count(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }

    /// Canvas size in pixels.
    pub fn pixel_size(&self) -> (usize, usize) {
        let cell = usize::from(self.cell_size);
        (
            self.width.max(0) as usize * cell,
            self.height.max(0) as usize * cell,
        )
    }
}
