//! Headless layout inspection: what the gallery would render for a viewport.

use crate::error::{AppError, AppResult};
use kurbo::Size;
use lightgrid_core::{Engine, EngineConfig, GridMetrics, LayoutOutput, PhotoCollection};
use std::fmt;

/// Parse a `WIDTHxHEIGHT` viewport such as `1280x800`.
pub fn parse_viewport(text: &str) -> AppResult<Size> {
    let invalid = || AppError::InvalidViewport(text.to_string());
    let (width, height) = text
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let width: f64 = width.trim().parse().map_err(|_| invalid())?;
    let height: f64 = height.trim().parse().map_err(|_| invalid())?;
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(invalid());
    }
    Ok(Size::new(width, height))
}

/// Initial grid layout for a collection in a viewport.
#[derive(Debug, Clone)]
pub struct LayoutReport {
    pub photo_count: usize,
    pub viewport: Size,
    pub fit_size: u32,
    pub layout: LayoutOutput,
    /// `None` when no column fits the viewport width.
    pub metrics: Option<GridMetrics>,
    /// Height left for the grid below the toolbar.
    pub available_height: f64,
}

impl LayoutReport {
    /// Start an engine the same way the page does and record its layout.
    pub fn new(photos: PhotoCollection, viewport: Size, config: EngineConfig) -> Self {
        let photo_count = photos.len();
        let mut engine = Engine::new(photos, viewport, config);
        engine.start();
        let layout = engine.layout();
        let metrics = GridMetrics::compute(
            photo_count,
            viewport.width,
            layout.cell_size,
            f64::from(layout.gap),
        );
        Self {
            photo_count,
            viewport,
            fit_size: engine.fit_size(),
            layout,
            metrics,
            available_height: (viewport.height - config.fit.chrome_height).max(0.0),
        }
    }

    /// Whether the rendered grid is taller than the space below the toolbar.
    pub fn scrolls(&self) -> bool {
        self.metrics
            .is_some_and(|m| m.content_height > self.available_height)
    }
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "photos:    {}", self.photo_count)?;
        writeln!(
            f,
            "viewport:  {}x{} ({}px below toolbar)",
            self.viewport.width, self.viewport.height, self.available_height
        )?;
        writeln!(f, "fit size:  {}px", self.fit_size)?;
        writeln!(
            f,
            "cell size: {}px, gap {}px, class {}",
            self.layout.cell_size,
            self.layout.gap,
            self.layout.tier.css_class()
        )?;
        match self.metrics {
            Some(metrics) => {
                writeln!(
                    f,
                    "grid:      {} columns x {} rows, {}px tall",
                    metrics.columns, metrics.rows, metrics.content_height
                )?;
                writeln!(f, "scrolls:   {}", if self.scrolls() { "yes" } else { "no" })
            }
            None => writeln!(f, "grid:      no column fits"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightgrid_core::{Photo, SizeTier};

    fn photos(n: usize) -> PhotoCollection {
        PhotoCollection::new(
            (0..n)
                .map(|i| Photo::new(format!("p{i}"), format!("t/{i}"), format!("f/{i}")))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_viewport() {
        let size = parse_viewport("1280x800").unwrap();
        assert!((size.width - 1280.0).abs() < f64::EPSILON);
        assert!((size.height - 800.0).abs() < f64::EPSILON);
        assert!(parse_viewport(" 375X667 ").is_ok());
    }

    #[test]
    fn test_parse_viewport_rejects_garbage() {
        for bad in ["", "1280", "x800", "axb", "0x800", "-5x10", "NaNx10"] {
            assert!(
                matches!(parse_viewport(bad), Err(AppError::InvalidViewport(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_report_for_desktop() {
        let report = LayoutReport::new(photos(48), Size::new(1280.0, 800.0), EngineConfig::default());
        assert_eq!(report.fit_size, 120);
        assert_eq!(report.layout.cell_size, 120);
        assert_eq!(report.layout.gap, 6);
        assert_eq!(report.layout.tier, SizeTier::Small);

        let metrics = report.metrics.unwrap();
        assert_eq!(metrics.columns, 10);
        assert_eq!(metrics.rows, 5);
        assert!(!report.scrolls());
    }

    #[test]
    fn test_report_shows_overflow_fallback() {
        let report = LayoutReport::new(photos(1000), Size::new(400.0, 700.0), EngineConfig::default());
        assert_eq!(report.fit_size, 36);
        assert!(report.scrolls());

        let text = report.to_string();
        assert!(text.contains("class zoom-xs"));
        assert!(text.contains("scrolls:   yes"));
    }

    #[test]
    fn test_report_for_empty_collection() {
        let report = LayoutReport::new(photos(0), Size::new(1280.0, 800.0), EngineConfig::default());
        assert_eq!(report.fit_size, 120);
        assert_eq!(report.metrics.unwrap().rows, 0);
        assert!(!report.scrolls());
    }
}
