//! Gallery engine: routes input events to the zoom controller and the viewer.
//!
//! The engine is a plain state object. The shell feeds it [`Event`]s and the
//! current time, pumps [`Engine::on_frame`] once per animation frame with the
//! viewport measured for that frame, and applies the [`Effect`]s it drains.

use crate::config::EngineConfig;
use crate::effect::Effect;
use crate::gesture::Phase;
use crate::input::{Event, KeyEvent, PointerEvent, TouchEvent, TouchPhase};
use crate::photo::PhotoCollection;
use crate::schedule::{Coalesced, Scheduler, Task};
use crate::viewer::{Viewer, ViewerState};
use crate::zoom::{LayoutOutput, StepDirection, ZoomChange, ZoomController, ZoomSource};
use kurbo::Size;
use std::time::Duration;

/// How the shell should treat the native event after handling.
///
/// Only events whose browser default would fight the engine report
/// `consumed`: ctrl/meta wheel zoom and keys the open viewer acts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Response {
    /// Call `preventDefault` on the native event.
    pub consumed: bool,
}

impl Response {
    const CONSUMED: Response = Response { consumed: true };
    const IGNORED: Response = Response { consumed: false };
}

/// Layout and gesture engine for one gallery page.
pub struct Engine {
    config: EngineConfig,
    photos: PhotoCollection,
    viewport: Size,
    zoom: ZoomController,
    viewer: Viewer,
    /// Resize and orientation refits.
    scheduler: Scheduler,
    slider: Coalesced<f64>,
    effects: Vec<Effect>,
}

impl Engine {
    pub fn new(photos: PhotoCollection, viewport: Size, config: EngineConfig) -> Self {
        Self {
            zoom: ZoomController::new(config.zoom),
            viewer: Viewer::new(config.gesture, config.timing),
            config,
            photos,
            viewport,
            scheduler: Scheduler::new(),
            slider: Coalesced::new(),
            effects: Vec::new(),
        }
    }

    /// Publish the slider range and fit the grid to the viewport.
    pub fn start(&mut self) {
        let state = self.zoom.state();
        self.effects.push(Effect::SliderRange {
            min: state.min,
            max: state.max,
        });
        let fit = self.fit_size();
        log::info!(
            "Grid of {} photos fits at {}px in {}x{}",
            self.photos.len(),
            fit,
            self.viewport.width,
            self.viewport.height
        );
        let change = self.zoom.set_zoom(f64::from(fit), ZoomSource::Fit);
        self.push_zoom(change);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn photos(&self) -> &PhotoCollection {
        &self.photos
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn cell_size(&self) -> u32 {
        self.zoom.cell_size()
    }

    pub fn layout(&self) -> LayoutOutput {
        self.zoom.layout()
    }

    pub fn viewer_state(&self) -> ViewerState {
        self.viewer.state()
    }

    pub fn gesture_phase(&self) -> Phase {
        self.viewer.phase()
    }

    /// Fit size for the current viewport.
    pub fn fit_size(&self) -> u32 {
        self.config.fit.fit(self.photos.len(), self.viewport)
    }

    /// Earliest pending deadline, if any task is scheduled.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.scheduler.next_deadline(), self.viewer.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Take every effect produced since the last call.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    fn push_zoom(&mut self, change: ZoomChange) {
        self.effects.push(Effect::Layout(change.layout));
        if let Some(value) = change.slider_value {
            self.effects.push(Effect::SliderValue(value));
        }
    }

    /// Process one input event.
    pub fn handle(&mut self, event: Event, now: Duration) -> Response {
        match event {
            Event::ThumbnailClicked(index) => {
                let effects = self.viewer.open(&self.photos, index);
                self.effects.extend(effects);
                Response::IGNORED
            }
            Event::ZoomIn => {
                let change = self.zoom.step(StepDirection::In);
                self.push_zoom(change);
                Response::IGNORED
            }
            Event::ZoomOut => {
                let change = self.zoom.step(StepDirection::Out);
                self.push_zoom(change);
                Response::IGNORED
            }
            Event::SliderInput(value) => {
                self.slider.push(value);
                Response::IGNORED
            }
            Event::Wheel(wheel) => {
                if self.viewer.is_open() {
                    return Response::IGNORED;
                }
                match self.zoom.wheel(wheel.delta_y, wheel.modifiers) {
                    Some(change) => {
                        self.push_zoom(change);
                        Response::CONSUMED
                    }
                    None => Response::IGNORED,
                }
            }
            Event::GridTouch(touch) => self.handle_grid_touch(touch),
            Event::ViewerTouch(touch) => self.handle_viewer_touch(touch, now),
            Event::ViewerPointer(pointer) => self.handle_viewer_pointer(pointer, now),
            Event::ViewerClick(target) => {
                let effects = self.viewer.click(&self.photos, target, now);
                self.effects.extend(effects);
                Response::IGNORED
            }
            Event::Key(KeyEvent::Pressed(key)) => {
                let effects = self.viewer.handle_key(&self.photos, &key, now);
                let consumed = !effects.is_empty();
                self.effects.extend(effects);
                Response { consumed }
            }
            Event::Key(KeyEvent::Released(_)) => Response::IGNORED,
            Event::Resize(viewport) => {
                self.viewport = viewport;
                self.scheduler
                    .schedule(Task::ResizeRefit, now, self.config.timing.resize_debounce());
                Response::IGNORED
            }
            Event::OrientationChange => {
                self.scheduler.schedule(
                    Task::OrientationRefit,
                    now,
                    self.config.timing.orientation_settle(),
                );
                Response::IGNORED
            }
            Event::ImageSettled => {
                let effects = self.viewer.image_settled();
                self.effects.extend(effects);
                Response::IGNORED
            }
        }
    }

    fn handle_grid_touch(&mut self, touch: TouchEvent) -> Response {
        if self.viewer.is_open() {
            return Response::IGNORED;
        }
        match touch.phase {
            TouchPhase::Start => {
                if let Some(distance) = touch.pinch_distance() {
                    self.zoom.pinch_start(distance);
                }
            }
            TouchPhase::Move => {
                if let Some(distance) = touch.pinch_distance() {
                    if let Some(change) = self.zoom.pinch_move(distance) {
                        self.push_zoom(change);
                    }
                }
            }
            TouchPhase::End | TouchPhase::Cancel => {
                if touch.touches.len() < 2 {
                    self.zoom.pinch_end();
                }
            }
        }
        Response::IGNORED
    }

    fn handle_viewer_touch(&mut self, touch: TouchEvent, now: Duration) -> Response {
        // Only single-finger drags drive the viewer; more fingers abort.
        let pointer = match (touch.phase, touch.touches.as_slice()) {
            (TouchPhase::Start | TouchPhase::Move, [_, _, ..]) => PointerEvent::Cancel,
            (TouchPhase::Start, [position]) => PointerEvent::Down { position: *position },
            (TouchPhase::Move, [position]) => PointerEvent::Move { position: *position },
            (TouchPhase::Start | TouchPhase::Move, []) => return Response::IGNORED,
            (TouchPhase::End, touches) => PointerEvent::Up {
                position: touches.first().copied().unwrap_or_default(),
            },
            (TouchPhase::Cancel, _) => PointerEvent::Cancel,
        };
        self.handle_viewer_pointer(pointer, now)
    }

    fn handle_viewer_pointer(&mut self, pointer: PointerEvent, now: Duration) -> Response {
        let effects = match pointer {
            PointerEvent::Down { position } => self.viewer.pointer_down(position),
            PointerEvent::Move { position } => self.viewer.pointer_move(position),
            PointerEvent::Up { .. } => {
                self.viewer
                    .pointer_up(&self.photos, now, self.viewport.height)
            }
            PointerEvent::Cancel => self.viewer.pointer_cancel(),
        };
        self.effects.extend(effects);
        Response::IGNORED
    }

    /// Per-frame pump: applies the coalesced slider value and runs due tasks.
    ///
    /// `viewport` is the geometry measured this frame, so a refit that comes
    /// due reads the current window even when no resize event preceded it.
    pub fn on_frame(&mut self, now: Duration, viewport: Size) {
        self.viewport = viewport;
        if let Some(value) = self.slider.take() {
            let change = self.zoom.set_zoom(value, ZoomSource::Slider);
            self.push_zoom(change);
        }

        for task in self.scheduler.advance(now) {
            match task {
                Task::ResizeRefit => {
                    let fit = self.fit_size();
                    if let Some(change) = self.zoom.refit_on_resize(fit) {
                        self.push_zoom(change);
                    }
                }
                Task::OrientationRefit => {
                    let fit = self.fit_size();
                    let change = self.zoom.set_zoom(f64::from(fit), ZoomSource::Orientation);
                    self.push_zoom(change);
                }
                other => log::warn!("Engine ignoring viewer task {:?}", other),
            }
        }

        let effects = self.viewer.advance(&self.photos, now);
        self.effects.extend(effects);
    }
}
