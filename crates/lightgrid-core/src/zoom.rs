//! Zoom controller: the single owner of the grid cell size.
//!
//! Every input channel (slider, step buttons, modified wheel, pinch, refit)
//! proposes a size; the controller clamps, rounds and publishes it.

use crate::input::Modifiers;
use serde::{Deserialize, Serialize};

/// Smallest allowed cell size.
pub const MIN_CELL_SIZE: u32 = 30;
/// Largest allowed cell size.
pub const MAX_CELL_SIZE: u32 = 400;
/// Cell size before the first fit is applied.
pub const DEFAULT_CELL_SIZE: u32 = 60;
/// Change per step-button activation.
pub const ZOOM_STEP: u32 = 25;
/// Wheel delta multiplier when the zoom modifier is held.
pub const WHEEL_FACTOR: f64 = 0.5;
/// Pinch distance delta multiplier.
pub const PINCH_FACTOR: f64 = 0.25;
/// Resize only snaps back to the fit when the current size is at most this far above it.
pub const REFIT_HYSTERESIS: u32 = 10;

/// Named presentation class selected from the cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeTier {
    ExtraSmall,
    Small,
    Medium,
    Large,
}

impl SizeTier {
    pub const ALL: [SizeTier; 4] = [
        SizeTier::ExtraSmall,
        SizeTier::Small,
        SizeTier::Medium,
        SizeTier::Large,
    ];

    pub fn from_cell_size(cell_size: u32) -> Self {
        match cell_size {
            0..80 => SizeTier::ExtraSmall,
            80..160 => SizeTier::Small,
            160..280 => SizeTier::Medium,
            _ => SizeTier::Large,
        }
    }

    /// Class name applied to the gallery element.
    pub fn css_class(self) -> &'static str {
        match self {
            SizeTier::ExtraSmall => "zoom-xs",
            SizeTier::Small => "zoom-sm",
            SizeTier::Medium => "zoom-md",
            SizeTier::Large => "zoom-lg",
        }
    }
}

/// Gap between grid cells for a cell size.
pub fn gap_for(cell_size: u32) -> u32 {
    match cell_size {
        0..60 => 2,
        60..120 => 3,
        120..200 => 6,
        _ => 10,
    }
}

/// Which input channel requested a zoom change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomSource {
    Slider,
    StepButton,
    Wheel,
    Pinch,
    /// Initial fit when the grid is built.
    Fit,
    /// Debounced refit after a viewport resize.
    Resize,
    /// Forced refit after an orientation change.
    Orientation,
}

/// Direction of a step-button activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepDirection {
    In,
    Out,
}

/// Zoom tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: u32,
    pub max: u32,
    pub initial: u32,
    pub step: u32,
    pub wheel_factor: f64,
    pub pinch_factor: f64,
    pub refit_hysteresis: u32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: MIN_CELL_SIZE,
            max: MAX_CELL_SIZE,
            initial: DEFAULT_CELL_SIZE,
            step: ZOOM_STEP,
            wheel_factor: WHEEL_FACTOR,
            pinch_factor: PINCH_FACTOR,
            refit_hysteresis: REFIT_HYSTERESIS,
        }
    }
}

/// Current cell size and its allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomState {
    pub cell_size: u32,
    pub min: u32,
    pub max: u32,
}

impl ZoomState {
    /// Clamp and round a requested size into range.
    pub fn clamp(&self, requested: f64) -> u32 {
        requested
            .round()
            .clamp(f64::from(self.min), f64::from(self.max)) as u32
    }
}

/// Values written to the presentation layer's layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOutput {
    pub cell_size: u32,
    pub gap: u32,
    pub tier: SizeTier,
}

impl LayoutOutput {
    pub fn for_cell_size(cell_size: u32) -> Self {
        Self {
            cell_size,
            gap: gap_for(cell_size),
            tier: SizeTier::from_cell_size(cell_size),
        }
    }
}

/// Result of applying a zoom request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomChange {
    pub layout: LayoutOutput,
    /// New slider value, unless the slider itself was the source.
    pub slider_value: Option<u32>,
}

/// Single authority over the cell size.
#[derive(Debug, Clone)]
pub struct ZoomController {
    config: ZoomConfig,
    state: ZoomState,
    /// Finger distance at the previous pinch sample.
    pinch_distance: Option<f64>,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

impl ZoomController {
    pub fn new(config: ZoomConfig) -> Self {
        let (min, max) = if config.min <= config.max {
            (config.min, config.max)
        } else {
            log::warn!("Zoom range {}..{} is inverted, swapping", config.min, config.max);
            (config.max, config.min)
        };
        Self {
            config,
            state: ZoomState {
                cell_size: config.initial.clamp(min, max),
                min,
                max,
            },
            pinch_distance: None,
        }
    }

    pub fn state(&self) -> ZoomState {
        self.state
    }

    pub fn cell_size(&self) -> u32 {
        self.state.cell_size
    }

    pub fn tier(&self) -> SizeTier {
        SizeTier::from_cell_size(self.state.cell_size)
    }

    pub fn layout(&self) -> LayoutOutput {
        LayoutOutput::for_cell_size(self.state.cell_size)
    }

    /// Clamp, round and apply a requested cell size.
    pub fn set_zoom(&mut self, requested: f64, source: ZoomSource) -> ZoomChange {
        if requested.is_finite() {
            self.state.cell_size = self.state.clamp(requested);
        } else {
            log::warn!("Ignoring non-finite zoom request from {:?}", source);
        }
        log::debug!("Zoom -> {}px via {:?}", self.state.cell_size, source);

        ZoomChange {
            layout: self.layout(),
            slider_value: (source != ZoomSource::Slider).then_some(self.state.cell_size),
        }
    }

    /// Apply one step-button activation.
    pub fn step(&mut self, direction: StepDirection) -> ZoomChange {
        let step = f64::from(self.config.step);
        let current = f64::from(self.state.cell_size);
        let target = match direction {
            StepDirection::In => current + step,
            StepDirection::Out => current - step,
        };
        self.set_zoom(target, ZoomSource::StepButton)
    }

    /// Apply a wheel tick. Only zooms while ctrl or meta is held.
    ///
    /// Returns `None` when the wheel should scroll normally.
    pub fn wheel(&mut self, delta_y: f64, modifiers: Modifiers) -> Option<ZoomChange> {
        if !(modifiers.ctrl || modifiers.meta) {
            return None;
        }
        let target = f64::from(self.state.cell_size) - delta_y * self.config.wheel_factor;
        Some(self.set_zoom(target, ZoomSource::Wheel))
    }

    /// Record the finger distance when a two-finger touch begins.
    pub fn pinch_start(&mut self, distance: f64) {
        self.pinch_distance = Some(distance);
    }

    /// Apply a two-finger move sample.
    ///
    /// The delta is taken against the previous sample, so zoom tracks continuously.
    pub fn pinch_move(&mut self, distance: f64) -> Option<ZoomChange> {
        let Some(previous) = self.pinch_distance.replace(distance) else {
            // A second finger landed mid-move; this sample becomes the baseline.
            return None;
        };
        let target = f64::from(self.state.cell_size) + (distance - previous) * self.config.pinch_factor;
        Some(self.set_zoom(target, ZoomSource::Pinch))
    }

    pub fn pinch_end(&mut self) {
        self.pinch_distance = None;
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch_distance.is_some()
    }

    /// Snap to a new fit size after a resize, unless the user zoomed well past it.
    pub fn refit_on_resize(&mut self, fit: u32) -> Option<ZoomChange> {
        if self.state.cell_size <= fit.saturating_add(self.config.refit_hysteresis) {
            Some(self.set_zoom(f64::from(fit), ZoomSource::Resize))
        } else {
            log::debug!(
                "Keeping {}px zoom, fit is {}px",
                self.state.cell_size,
                fit
            );
            None
        }
    }
}
