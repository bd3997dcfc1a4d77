//! Lightgrid Core Library
//!
//! Platform-agnostic layout, zoom and gesture engine for the Lightgrid photo
//! gallery. Nothing in this crate touches the DOM or reads a clock.

pub mod config;
pub mod effect;
pub mod engine;
pub mod fit;
pub mod gesture;
pub mod input;
pub mod photo;
pub mod schedule;
pub mod viewer;
pub mod visual;
pub mod zoom;

pub use config::{ConfigError, EngineConfig, TimingConfig};
pub use effect::Effect;
pub use engine::{Engine, Response};
pub use fit::{fit_size, FitConfig, GridMetrics};
pub use gesture::{Axis, Direction, GestureConfig, GestureState, GestureTracker, Phase, Resolution};
pub use input::{
    Event, KeyEvent, Modifiers, PointerEvent, TouchEvent, TouchPhase, ViewerTarget, WheelEvent,
    PRIMARY_BUTTON,
};
pub use photo::{GridItem, ManifestError, Photo, PhotoCollection};
pub use schedule::{Coalesced, Scheduler, Task, TaskSlot};
pub use viewer::{Viewer, ViewerState};
pub use visual::{ImageVisual, TransitionStyle, ViewerVisual};
pub use zoom::{LayoutOutput, SizeTier, ZoomController, ZoomSource, ZoomState};
