//! Lightgrid Application
//!
//! The browser shell that binds the gallery engine to the page, plus the
//! native layout inspector.

mod error;
mod shortcuts;

pub use error::{AppError, AppResult};
pub use shortcuts::{Scope, Shortcut, ShortcutRegistry};

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
mod inspect;

#[cfg(not(target_arch = "wasm32"))]
pub use inspect::{parse_viewport, LayoutReport};

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
