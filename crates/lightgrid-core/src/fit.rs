//! Grid fit sizing: the largest cell size that shows every photo without scrolling.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Largest cell size the fit scan considers.
pub const FIT_UPPER_BOUND: u32 = 120;
/// Smallest cell size the fit scan considers on regular viewports.
pub const FIT_LOWER_BOUND: u32 = 40;
/// Smallest cell size the fit scan considers on narrow viewports.
pub const FIT_LOWER_BOUND_NARROW: u32 = 36;
/// Viewports narrower than this use the narrow lower bound.
pub const NARROW_VIEWPORT_WIDTH: f64 = 500.0;
/// Gap between cells assumed while fitting.
pub const FIT_GAP: f64 = 2.0;
/// Vertical space taken by the toolbar above the grid.
pub const CHROME_HEIGHT: f64 = 70.0;

/// Tunables for the fit scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    pub upper_bound: u32,
    pub lower_bound: u32,
    pub narrow_lower_bound: u32,
    pub narrow_width: f64,
    pub gap: f64,
    pub chrome_height: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            upper_bound: FIT_UPPER_BOUND,
            lower_bound: FIT_LOWER_BOUND,
            narrow_lower_bound: FIT_LOWER_BOUND_NARROW,
            narrow_width: NARROW_VIEWPORT_WIDTH,
            gap: FIT_GAP,
            chrome_height: CHROME_HEIGHT,
        }
    }
}

impl FitConfig {
    /// Lower bound of the scan for a viewport width.
    pub fn lower_bound_for(&self, viewport_width: f64) -> u32 {
        if viewport_width < self.narrow_width {
            self.narrow_lower_bound
        } else {
            self.lower_bound
        }
    }

    /// Fit size for the full browser viewport, minus the toolbar.
    pub fn fit(&self, count: usize, viewport: Size) -> u32 {
        let height = (viewport.height - self.chrome_height).max(0.0);
        scan(
            count,
            viewport.width,
            height,
            self.gap,
            self.upper_bound,
            self.lower_bound_for(viewport.width),
        )
    }
}

/// Largest cell size in `[lower, 120]` whose wrapped grid fits `height`.
///
/// Falls back to the lower bound when nothing fits; the grid then scrolls.
pub fn fit_size(count: usize, viewport_width: f64, viewport_height: f64, gap: f64) -> u32 {
    let config = FitConfig::default();
    scan(
        count,
        viewport_width,
        viewport_height,
        gap,
        config.upper_bound,
        config.lower_bound_for(viewport_width),
    )
}

fn scan(count: usize, width: f64, height: f64, gap: f64, upper: u32, lower: u32) -> u32 {
    for size in (lower..=upper).rev() {
        let Some(metrics) = GridMetrics::compute(count, width, size, gap) else {
            continue;
        };
        if metrics.content_height <= height {
            return size;
        }
    }
    lower
}

/// Shape of a wrapped grid at a given cell size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub columns: usize,
    pub rows: usize,
    /// Total height of all rows including inner gaps.
    pub content_height: f64,
}

impl GridMetrics {
    /// Returns `None` when not even one column fits the width.
    pub fn compute(count: usize, width: f64, cell_size: u32, gap: f64) -> Option<Self> {
        let pitch = f64::from(cell_size) + gap;
        if pitch <= 0.0 {
            return None;
        }
        let columns = ((width + gap) / pitch).floor();
        if columns < 1.0 {
            return None;
        }
        let columns = columns as usize;
        let rows = count.div_ceil(columns);
        Some(Self {
            columns,
            rows,
            content_height: rows as f64 * pitch - gap,
        })
    }
}
