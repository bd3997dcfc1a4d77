//! Declarative instructions from the engine to the presentation layer.

use crate::visual::ViewerVisual;
use crate::zoom::LayoutOutput;

/// A change the shell must apply to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Write the cell size and gap parameters and select the tier class.
    Layout(LayoutOutput),
    /// Publish the slider's range.
    SliderRange { min: u32, max: u32 },
    /// Move the slider thumb.
    SliderValue(u32),
    /// Swap the viewer image and counter.
    ShowPhoto {
        /// Position in the collection.
        index: usize,
        /// Full-size image path.
        src: String,
        /// Counter text, e.g. `3 / 48`.
        counter: String,
    },
    /// Show (true) or hide (false) the viewer overlay.
    ViewerOpen(bool),
    /// Suppress (true) or restore (false) page scrolling.
    ScrollLock(bool),
    /// Move keyboard focus to the viewer's close control.
    FocusDismiss,
    /// Replace every inline viewer style with these values.
    Visual(ViewerVisual),
}
