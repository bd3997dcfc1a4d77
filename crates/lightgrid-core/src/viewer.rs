//! Full-screen viewer: open/close, navigation and gesture resolution.

use crate::config::TimingConfig;
use crate::effect::Effect;
use crate::gesture::{Axis, Direction, GestureConfig, GestureState, GestureTracker, Phase, Resolution};
use crate::input::ViewerTarget;
use crate::photo::PhotoCollection;
use crate::schedule::{Scheduler, Task, TaskSlot};
use crate::visual::ViewerVisual;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which photo is shown and whether the overlay is up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerState {
    pub current_index: usize,
    pub is_open: bool,
}

/// Keys the open viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKey {
    Escape,
    Previous,
    Next,
}

impl ViewerKey {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(ViewerKey::Escape),
            "ArrowLeft" => Some(ViewerKey::Previous),
            "ArrowRight" => Some(ViewerKey::Next),
            _ => None,
        }
    }
}

/// Step `index` by `step` positions, wrapping in both directions.
///
/// Returns `None` for an empty collection.
pub fn wrap_index(index: usize, step: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len = len as i64;
    Some((index as i64 + step as i64).rem_euclid(len) as usize)
}

/// Counter text shown in the viewer, e.g. `3 / 48` with thin spaces.
pub fn counter_text(index: usize, len: usize) -> String {
    format!("{}\u{2009}/\u{2009}{}", index + 1, len)
}

fn show_photo(photos: &PhotoCollection, index: usize) -> Option<Effect> {
    let photo = photos.get(index)?;
    Some(Effect::ShowPhoto {
        index,
        src: photo.full_path.clone(),
        counter: counter_text(index, photos.len()),
    })
}

/// Owner of [`ViewerState`] and the viewer's gesture.
#[derive(Debug, Clone)]
pub struct Viewer {
    state: ViewerState,
    tracker: GestureTracker,
    timing: TimingConfig,
    scheduler: Scheduler,
    /// A swapped-in photo is hidden until its image settles.
    awaiting_reveal: bool,
    /// The next click belongs to a drag that just ended.
    suppress_click: bool,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(GestureConfig::default(), TimingConfig::default())
    }
}

impl Viewer {
    pub fn new(gesture: GestureConfig, timing: TimingConfig) -> Self {
        Self {
            state: ViewerState::default(),
            tracker: GestureTracker::new(gesture),
            timing,
            scheduler: Scheduler::new(),
            awaiting_reveal: false,
            suppress_click: false,
        }
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn phase(&self) -> Phase {
        if self.state.is_open {
            self.tracker.phase()
        } else {
            Phase::Idle
        }
    }

    pub fn gesture(&self) -> Option<&GestureState> {
        self.tracker.gesture()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    fn cancel_tasks(&mut self) {
        for slot in [TaskSlot::NavigateSwap, TaskSlot::DismissClose, TaskSlot::ClearTransitions] {
            self.scheduler.cancel(slot);
        }
    }

    /// Show the photo at `index` without animation.
    pub fn open(&mut self, photos: &PhotoCollection, index: usize) -> Vec<Effect> {
        if photos.is_empty() {
            log::warn!("Ignoring open request on an empty collection");
            return Vec::new();
        }
        let index = if index < photos.len() {
            index
        } else {
            log::warn!("Open index {} out of range, showing last photo", index);
            photos.len() - 1
        };

        self.cancel_tasks();
        self.tracker.cancel();
        self.awaiting_reveal = false;
        self.suppress_click = false;
        self.state = ViewerState {
            current_index: index,
            is_open: true,
        };
        log::info!("Viewer opened at {}", index);

        let mut effects: Vec<Effect> = show_photo(photos, index).into_iter().collect();
        effects.extend([
            Effect::Visual(ViewerVisual::neutral()),
            Effect::ViewerOpen(true),
            Effect::ScrollLock(true),
            Effect::FocusDismiss,
        ]);
        effects
    }

    /// Hide the overlay. Closing a closed viewer does nothing.
    pub fn close(&mut self) -> Vec<Effect> {
        if !self.state.is_open {
            return Vec::new();
        }
        self.state.is_open = false;
        self.cancel_tasks();
        self.tracker.cancel();
        self.awaiting_reveal = false;
        self.suppress_click = false;
        log::info!("Viewer closed");

        vec![
            Effect::ViewerOpen(false),
            Effect::ScrollLock(false),
            Effect::Visual(ViewerVisual::neutral()),
        ]
    }

    /// Cross-fade to the neighbouring photo.
    ///
    /// The current image fades out immediately; the index and source change
    /// once the fade-out delay has passed. Ignored during the dismiss exit.
    pub fn navigate(&mut self, photos: &PhotoCollection, direction: Direction, now: Duration) -> Vec<Effect> {
        if !self.state.is_open
            || photos.is_empty()
            || self.scheduler.is_pending(TaskSlot::DismissClose)
        {
            return Vec::new();
        }
        let mut effects = Vec::new();

        // Finish a swap still in flight so rapid presses all count.
        if let Some(Task::NavigateSwap { direction: pending }) =
            self.scheduler.cancel(TaskSlot::NavigateSwap)
        {
            effects.extend(self.swap(photos, pending));
        }
        self.awaiting_reveal = false;

        effects.push(Effect::Visual(ViewerVisual::navigate_out(direction)));
        self.scheduler.schedule(
            Task::NavigateSwap { direction },
            now,
            self.timing.navigate_swap(),
        );
        effects
    }

    fn swap(&mut self, photos: &PhotoCollection, direction: Direction) -> Vec<Effect> {
        let Some(next) = wrap_index(self.state.current_index, direction.step(), photos.len()) else {
            return Vec::new();
        };
        self.state.current_index = next;
        self.awaiting_reveal = true;
        log::debug!("Viewer showing {}", next);
        show_photo(photos, next).into_iter().collect()
    }

    /// React to a key press. Only active while open.
    pub fn handle_key(&mut self, photos: &PhotoCollection, key: &str, now: Duration) -> Vec<Effect> {
        if !self.state.is_open {
            return Vec::new();
        }
        match ViewerKey::from_key(key) {
            Some(ViewerKey::Escape) => self.close(),
            Some(ViewerKey::Previous) => self.navigate(photos, Direction::Backward, now),
            Some(ViewerKey::Next) => self.navigate(photos, Direction::Forward, now),
            None => Vec::new(),
        }
    }

    /// React to a click on one of the overlay's regions.
    pub fn click(&mut self, photos: &PhotoCollection, target: ViewerTarget, now: Duration) -> Vec<Effect> {
        if !self.state.is_open {
            return Vec::new();
        }
        let after_drag = std::mem::take(&mut self.suppress_click);
        match target {
            ViewerTarget::Backdrop | ViewerTarget::Image if after_drag => {
                log::debug!("Click after drag ignored");
                Vec::new()
            }
            ViewerTarget::Backdrop | ViewerTarget::Image | ViewerTarget::Close => self.close(),
            ViewerTarget::Previous => self.navigate(photos, Direction::Backward, now),
            ViewerTarget::Next => self.navigate(photos, Direction::Forward, now),
        }
    }

    pub fn pointer_down(&mut self, position: Point) -> Vec<Effect> {
        if !self.state.is_open || self.scheduler.is_pending(TaskSlot::DismissClose) {
            return Vec::new();
        }
        self.scheduler.cancel(TaskSlot::ClearTransitions);
        self.suppress_click = false;
        self.tracker.begin(position);
        vec![Effect::Visual(ViewerVisual::drag_start())]
    }

    pub fn pointer_move(&mut self, position: Point) -> Vec<Effect> {
        let config = *self.tracker.config();
        match self.tracker.update(position) {
            Some(gesture) => vec![Effect::Visual(ViewerVisual::feedback(gesture, &config))],
            None => Vec::new(),
        }
    }

    /// Resolve the gesture into a dismiss, a navigation or a snap-back.
    pub fn pointer_up(&mut self, photos: &PhotoCollection, now: Duration, viewport_height: f64) -> Vec<Effect> {
        let config = *self.tracker.config();
        let Some((gesture, resolution)) = self.tracker.release() else {
            return Vec::new();
        };
        self.suppress_click = gesture.axis != Axis::None;

        match resolution {
            Resolution::Dismiss { .. } => {
                self.scheduler
                    .schedule(Task::DismissClose, now, self.timing.dismiss_close());
                vec![Effect::Visual(ViewerVisual::dismiss_exit(
                    &gesture,
                    &config,
                    viewport_height,
                ))]
            }
            Resolution::Navigate(direction) => {
                self.tracker.settle();
                self.navigate(photos, direction, now)
            }
            Resolution::SnapBack => {
                self.scheduler
                    .schedule(Task::ClearTransitions, now, self.timing.snap_back_clear());
                vec![Effect::Visual(ViewerVisual::snap_back())]
            }
        }
    }

    /// Abort the gesture and drop every transient override immediately.
    pub fn pointer_cancel(&mut self) -> Vec<Effect> {
        if !self.tracker.is_tracking() {
            return Vec::new();
        }
        self.tracker.cancel();
        self.scheduler.cancel(TaskSlot::ClearTransitions);
        log::debug!("Gesture cancelled");
        vec![Effect::Visual(ViewerVisual::neutral())]
    }

    /// The viewer image loaded or failed; reveal it if a swap hid it.
    pub fn image_settled(&mut self) -> Vec<Effect> {
        if !std::mem::take(&mut self.awaiting_reveal) || !self.state.is_open {
            return Vec::new();
        }
        if self.tracker.is_tracking() {
            // The drag already owns the image visuals.
            return Vec::new();
        }
        vec![Effect::Visual(ViewerVisual::neutral())]
    }

    /// Run every task due at `now`.
    pub fn advance(&mut self, photos: &PhotoCollection, now: Duration) -> Vec<Effect> {
        let mut effects = Vec::new();
        for task in self.scheduler.advance(now) {
            if !self.state.is_open {
                break;
            }
            match task {
                Task::NavigateSwap { direction } => effects.extend(self.swap(photos, direction)),
                Task::DismissClose => {
                    self.tracker.settle();
                    effects.extend(self.close());
                }
                Task::ClearTransitions => {
                    self.tracker.settle();
                    if !self.tracker.is_tracking() {
                        effects.push(Effect::Visual(ViewerVisual::neutral()));
                    }
                }
                Task::ResizeRefit | Task::OrientationRefit => {
                    log::warn!("Viewer ignoring foreign task {:?}", task);
                }
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::Photo;

    fn photos(n: usize) -> PhotoCollection {
        PhotoCollection::new(
            (0..n)
                .map(|i| Photo::new(format!("p{i}"), format!("thumb/{i}.webp"), format!("full/{i}.jpg")))
                .collect(),
        )
        .unwrap()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drag(viewer: &mut Viewer, to: Point) {
        viewer.pointer_down(Point::new(200.0, 300.0));
        viewer.pointer_move(Point::new(200.0 + (to.x - 200.0) / 2.0, 300.0 + (to.y - 300.0) / 2.0));
        viewer.pointer_move(to);
    }

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(4, 1, 5), Some(0));
        assert_eq!(wrap_index(0, -1, 5), Some(4));
        assert_eq!(wrap_index(0, -1, 1), Some(0));
        assert_eq!(wrap_index(0, 1, 1), Some(0));
        assert_eq!(wrap_index(2, -7, 5), Some(0));
        assert_eq!(wrap_index(0, 1, 0), None);
    }

    #[test]
    fn test_wrap_index_all_sizes() {
        for n in 1..20 {
            assert_eq!(wrap_index(n - 1, 1, n), Some(0));
            assert_eq!(wrap_index(0, -1, n), Some(n - 1));
        }
    }

    #[test]
    fn test_counter_text() {
        assert_eq!(counter_text(2, 48), "3\u{2009}/\u{2009}48");
    }

    #[test]
    fn test_open_and_close() {
        let photos = photos(3);
        let mut viewer = Viewer::default();

        let effects = viewer.open(&photos, 1);
        assert!(viewer.is_open());
        assert_eq!(viewer.current_index(), 1);
        assert!(effects.contains(&Effect::ViewerOpen(true)));
        assert!(effects.contains(&Effect::ScrollLock(true)));
        assert!(effects.contains(&Effect::FocusDismiss));
        assert!(effects.contains(&Effect::ShowPhoto {
            index: 1,
            src: "full/1.jpg".to_string(),
            counter: counter_text(1, 3),
        }));

        let effects = viewer.close();
        assert!(!viewer.is_open());
        assert!(effects.contains(&Effect::ScrollLock(false)));
        assert!(effects.contains(&Effect::Visual(ViewerVisual::neutral())));
        // Idempotent.
        assert!(viewer.close().is_empty());
    }

    #[test]
    fn test_open_clamps_index() {
        let photos = photos(3);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 10);
        assert_eq!(viewer.current_index(), 2);
    }

    #[test]
    fn test_open_empty_collection_is_noop() {
        let photos = photos(0);
        let mut viewer = Viewer::default();
        assert!(viewer.open(&photos, 0).is_empty());
        assert!(!viewer.is_open());
        assert!(viewer.navigate(&photos, Direction::Forward, ms(0)).is_empty());
    }

    #[test]
    fn test_navigate_two_phase() {
        let photos = photos(3);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 2);

        let effects = viewer.navigate(&photos, Direction::Forward, ms(0));
        assert_eq!(
            effects,
            vec![Effect::Visual(ViewerVisual::navigate_out(Direction::Forward))]
        );
        assert_eq!(viewer.current_index(), 2);

        assert!(viewer.advance(&photos, ms(149)).is_empty());
        let effects = viewer.advance(&photos, ms(150));
        assert_eq!(viewer.current_index(), 0);
        assert!(matches!(effects.as_slice(), [Effect::ShowPhoto { index: 0, .. }]));

        // Revealed once the image settles, and only once.
        assert_eq!(viewer.image_settled(), vec![Effect::Visual(ViewerVisual::neutral())]);
        assert!(viewer.image_settled().is_empty());
    }

    #[test]
    fn test_navigate_backward_wraps() {
        let photos = photos(4);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 0);
        viewer.navigate(&photos, Direction::Backward, ms(0));
        viewer.advance(&photos, ms(200));
        assert_eq!(viewer.current_index(), 3);
    }

    #[test]
    fn test_rapid_navigation_counts_every_press() {
        let photos = photos(5);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 0);

        viewer.navigate(&photos, Direction::Forward, ms(0));
        let effects = viewer.navigate(&photos, Direction::Forward, ms(50));
        assert!(matches!(effects.first(), Some(Effect::ShowPhoto { index: 1, .. })));
        viewer.advance(&photos, ms(200));
        assert_eq!(viewer.current_index(), 2);
    }

    #[test]
    fn test_keyboard() {
        let photos = photos(3);
        let mut viewer = Viewer::default();
        assert!(viewer.handle_key(&photos, "ArrowRight", ms(0)).is_empty());

        viewer.open(&photos, 0);
        viewer.handle_key(&photos, "ArrowLeft", ms(0));
        viewer.advance(&photos, ms(150));
        assert_eq!(viewer.current_index(), 2);

        viewer.handle_key(&photos, "ArrowRight", ms(200));
        viewer.advance(&photos, ms(350));
        assert_eq!(viewer.current_index(), 0);

        assert!(viewer.handle_key(&photos, "a", ms(400)).is_empty());
        viewer.handle_key(&photos, "Escape", ms(400));
        assert!(!viewer.is_open());
    }

    #[test]
    fn test_close_cancels_pending_swap() {
        let photos = photos(3);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 0);
        viewer.navigate(&photos, Direction::Forward, ms(0));
        viewer.close();
        assert!(viewer.advance(&photos, ms(500)).is_empty());
        assert_eq!(viewer.current_index(), 0);
    }

    #[test]
    fn test_vertical_drag_dismisses() {
        let photos = photos(3);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 0);

        drag(&mut viewer, Point::new(200.0, 430.0));
        assert_eq!(viewer.phase(), Phase::TrackingVertical);

        let effects = viewer.pointer_up(&photos, ms(1000), 800.0);
        assert!(matches!(effects.as_slice(), [Effect::Visual(v)] if v.backdrop_alpha == 0.0));
        assert_eq!(viewer.phase(), Phase::Resolving);
        assert!(viewer.is_open());

        assert!(viewer.advance(&photos, ms(1249)).is_empty());
        let effects = viewer.advance(&photos, ms(1250));
        assert!(effects.contains(&Effect::ViewerOpen(false)));
        assert!(!viewer.is_open());
        assert_eq!(viewer.phase(), Phase::Idle);
    }

    #[test]
    fn test_short_vertical_drag_snaps_back() {
        let photos = photos(3);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 0);

        drag(&mut viewer, Point::new(200.0, 390.0));
        let effects = viewer.pointer_up(&photos, ms(0), 800.0);
        assert_eq!(effects, vec![Effect::Visual(ViewerVisual::snap_back())]);

        let effects = viewer.advance(&photos, ms(300));
        assert_eq!(effects, vec![Effect::Visual(ViewerVisual::neutral())]);
        assert!(viewer.is_open());
        assert_eq!(viewer.phase(), Phase::Idle);
    }

    #[test]
    fn test_horizontal_swipe_navigates() {
        let photos = photos(3);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 0);

        drag(&mut viewer, Point::new(140.0, 310.0));
        let effects = viewer.pointer_up(&photos, ms(0), 800.0);
        assert_eq!(
            effects,
            vec![Effect::Visual(ViewerVisual::navigate_out(Direction::Backward))]
        );
        viewer.advance(&photos, ms(150));
        assert_eq!(viewer.current_index(), 2);
    }

    #[test]
    fn test_jitter_applies_no_feedback() {
        let photos = photos(3);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 0);
        viewer.pointer_down(Point::new(10.0, 10.0));
        assert!(viewer.pointer_move(Point::new(15.0, 13.0)).is_empty());
        assert_eq!(viewer.phase(), Phase::TrackingUndetermined);
    }

    #[test]
    fn test_cancel_resets_immediately() {
        let photos = photos(3);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 0);
        drag(&mut viewer, Point::new(200.0, 600.0));

        assert_eq!(viewer.pointer_cancel(), vec![Effect::Visual(ViewerVisual::neutral())]);
        assert_eq!(viewer.phase(), Phase::Idle);
        assert!(viewer.is_open());
        assert!(viewer.pointer_up(&photos, ms(0), 800.0).is_empty());
    }

    #[test]
    fn test_pointer_ignored_while_closed() {
        let mut viewer = Viewer::default();
        assert!(viewer.pointer_down(Point::ZERO).is_empty());
        assert!(viewer.pointer_move(Point::new(0.0, 200.0)).is_empty());
        assert_eq!(viewer.phase(), Phase::Idle);
    }

    #[test]
    fn test_click_after_drag_is_suppressed() {
        let photos = photos(3);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 0);

        drag(&mut viewer, Point::new(200.0, 350.0));
        viewer.pointer_up(&photos, ms(0), 800.0);
        assert!(viewer.click(&photos, ViewerTarget::Image, ms(10)).is_empty());
        assert!(viewer.is_open());

        // A plain tap still closes.
        viewer.pointer_down(Point::new(10.0, 10.0));
        viewer.pointer_up(&photos, ms(500), 800.0);
        viewer.click(&photos, ViewerTarget::Image, ms(510));
        assert!(!viewer.is_open());
    }

    #[test]
    fn test_buttons() {
        let photos = photos(3);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 1);

        viewer.click(&photos, ViewerTarget::Next, ms(0));
        viewer.advance(&photos, ms(150));
        assert_eq!(viewer.current_index(), 2);

        viewer.click(&photos, ViewerTarget::Previous, ms(200));
        viewer.advance(&photos, ms(350));
        assert_eq!(viewer.current_index(), 1);

        viewer.click(&photos, ViewerTarget::Close, ms(400));
        assert!(!viewer.is_open());
    }

    #[test]
    fn test_drag_during_dismiss_is_ignored() {
        let photos = photos(3);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 0);
        drag(&mut viewer, Point::new(200.0, 500.0));
        viewer.pointer_up(&photos, ms(0), 800.0);

        assert!(viewer.pointer_down(Point::ZERO).is_empty());
        viewer.advance(&photos, ms(250));
        assert!(!viewer.is_open());
    }

    #[test]
    fn test_navigation_during_dismiss_is_ignored() {
        let photos = photos(3);
        let mut viewer = Viewer::default();
        viewer.open(&photos, 1);
        drag(&mut viewer, Point::new(200.0, 430.0));
        viewer.pointer_up(&photos, ms(0), 800.0);

        assert!(viewer.handle_key(&photos, "ArrowRight", ms(50)).is_empty());
        assert!(viewer.click(&photos, ViewerTarget::Previous, ms(60)).is_empty());
        assert_eq!(viewer.current_index(), 1);

        let effects = viewer.advance(&photos, ms(250));
        assert!(effects.contains(&Effect::ViewerOpen(false)));
        assert!(!effects.iter().any(|effect| matches!(effect, Effect::ShowPhoto { .. })));
        assert_eq!(viewer.current_index(), 1);
    }
}
