//! Input event types for mouse/touch/wheel/keyboard.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Single-pointer event, from a mouse or a one-finger touch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    /// The platform aborted the interaction.
    Cancel,
}

/// Bit of `MouseEvent.buttons` for the primary button.
pub const PRIMARY_BUTTON: u16 = 1;

impl PointerEvent {
    /// Map a mouse move to a drag sample. Without the primary button held
    /// the drag has ended out of sight (released outside the page, or taken
    /// over by the browser), so the move aborts instead.
    pub fn mouse_move(position: Point, buttons: u16) -> Self {
        if buttons & PRIMARY_BUTTON == 0 {
            PointerEvent::Cancel
        } else {
            PointerEvent::Move { position }
        }
    }
}

/// Touch lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Touch event carrying every finger still on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub touches: Vec<Point>,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, touches: Vec<Point>) -> Self {
        Self { phase, touches }
    }

    /// Distance between the two fingers of a two-finger touch.
    pub fn pinch_distance(&self) -> Option<f64> {
        match self.touches.as_slice() {
            [a, b] => Some(a.distance(*b)),
            _ => None,
        }
    }

    /// Position of the first finger.
    pub fn primary(&self) -> Option<Point> {
        self.touches.first().copied()
    }
}

/// Wheel event over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub delta_y: f64,
    pub modifiers: Modifiers,
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Clickable regions of the open viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewerTarget {
    Backdrop,
    Image,
    Close,
    Previous,
    Next,
}

/// Everything the engine reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ThumbnailClicked(usize),
    ZoomIn,
    ZoomOut,
    /// Raw slider value; applied on the next frame.
    SliderInput(f64),
    Wheel(WheelEvent),
    /// Touches over the grid (pinch zoom).
    GridTouch(TouchEvent),
    /// Touches over the open viewer (drag and swipe).
    ViewerTouch(TouchEvent),
    /// Mouse drags over the open viewer.
    ViewerPointer(PointerEvent),
    ViewerClick(ViewerTarget),
    Key(KeyEvent),
    Resize(Size),
    OrientationChange,
    /// The viewer image finished loading, or failed to.
    ImageSettled,
}
