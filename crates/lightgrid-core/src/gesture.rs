//! Drag gesture state machine for the full-screen viewer.
//!
//! A single touch stream is locked to one axis once it moves past a small
//! threshold. Vertical drags dismiss, horizontal drags navigate, anything
//! shorter snaps back. This module only computes state; visuals are derived
//! from it in [`crate::visual`].

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Movement needed on one axis before the gesture commits to it.
pub const LOCK_THRESHOLD: f64 = 8.0;
/// Vertical travel that turns a release into a dismiss.
pub const DISMISS_THRESHOLD: f64 = 120.0;
/// Horizontal travel that turns a release into a navigation.
pub const SWIPE_THRESHOLD: f64 = 50.0;

/// Gesture tunables, including the feedback curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub lock_threshold: f64,
    pub dismiss_threshold: f64,
    pub swipe_threshold: f64,
    /// Fraction of the raw horizontal delta applied as translation.
    pub swipe_damping: f64,
    /// Horizontal travel at which the image is fully transparent.
    pub swipe_fade_distance: f64,
    /// Vertical travel at which dismiss feedback reaches full strength.
    pub dismiss_progress_distance: f64,
    /// Scale reduction at full dismiss progress.
    pub dismiss_max_shrink: f64,
    /// Backdrop fade at full dismiss progress.
    pub dismiss_max_dim: f64,
    /// Controls fade this many times faster than the backdrop.
    pub control_fade_rate: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            lock_threshold: LOCK_THRESHOLD,
            dismiss_threshold: DISMISS_THRESHOLD,
            swipe_threshold: SWIPE_THRESHOLD,
            swipe_damping: 0.3,
            swipe_fade_distance: 800.0,
            dismiss_progress_distance: 400.0,
            dismiss_max_shrink: 0.15,
            dismiss_max_dim: 0.8,
            control_fade_rate: 2.0,
        }
    }
}

/// Axis a gesture is locked to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Navigation direction through the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Backward,
    Forward,
}

impl Direction {
    pub fn step(self) -> isize {
        match self {
            Direction::Backward => -1,
            Direction::Forward => 1,
        }
    }

    /// Sign of the direction as a float, for offsets.
    pub fn sign(self) -> f64 {
        self.step() as f64
    }
}

/// Observable phase of the viewer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    TrackingUndetermined,
    TrackingHorizontal,
    TrackingVertical,
    /// Released; the release animation has not finished yet.
    Resolving,
}

/// Transient state of one continuous interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureState {
    pub start: Point,
    /// Cumulative delta from `start`.
    pub delta: Vec2,
    pub axis: Axis,
    pub active: bool,
}

impl GestureState {
    fn new(start: Point) -> Self {
        Self {
            start,
            delta: Vec2::ZERO,
            axis: Axis::None,
            active: true,
        }
    }

    pub fn dx(&self) -> f64 {
        self.delta.x
    }

    pub fn dy(&self) -> f64 {
        self.delta.y
    }
}

/// Outcome of a released gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// Fly the image off in the drag direction, then close.
    Dismiss { dy: f64 },
    /// Move to the neighbouring photo.
    Navigate(Direction),
    /// Animate everything back to neutral.
    SnapBack,
}

/// Pure state machine turning pointer samples into gesture state.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    config: GestureConfig,
    gesture: Option<GestureState>,
    resolving: bool,
}

impl GestureTracker {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            gesture: None,
            resolving: false,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn gesture(&self) -> Option<&GestureState> {
        self.gesture.as_ref()
    }

    pub fn phase(&self) -> Phase {
        match self.gesture {
            Some(GestureState { axis: Axis::None, .. }) => Phase::TrackingUndetermined,
            Some(GestureState { axis: Axis::Horizontal, .. }) => Phase::TrackingHorizontal,
            Some(GestureState { axis: Axis::Vertical, .. }) => Phase::TrackingVertical,
            None if self.resolving => Phase::Resolving,
            None => Phase::Idle,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.gesture.is_some()
    }

    /// Start tracking a new gesture. Interrupts any release still animating.
    pub fn begin(&mut self, position: Point) {
        self.resolving = false;
        self.gesture = Some(GestureState::new(position));
    }

    /// Feed a move sample.
    ///
    /// Returns the gesture once it is locked to an axis; below the lock
    /// threshold nothing is returned and no feedback should be applied.
    pub fn update(&mut self, position: Point) -> Option<&GestureState> {
        let threshold = self.config.lock_threshold;
        let gesture = self.gesture.as_mut()?;
        gesture.delta = position - gesture.start;

        if gesture.axis == Axis::None {
            if gesture.delta.x.abs() > threshold {
                gesture.axis = Axis::Horizontal;
            } else if gesture.delta.y.abs() > threshold {
                gesture.axis = Axis::Vertical;
            } else {
                return None;
            }
            log::debug!("Gesture locked to {:?}", gesture.axis);
        }
        Some(&*gesture)
    }

    /// End the gesture and decide what it meant.
    ///
    /// Returns `None` when no gesture was being tracked.
    pub fn release(&mut self) -> Option<(GestureState, Resolution)> {
        let mut gesture = self.gesture.take()?;
        gesture.active = false;
        self.resolving = true;

        let resolution = match gesture.axis {
            Axis::Vertical if gesture.delta.y.abs() > self.config.dismiss_threshold => {
                Resolution::Dismiss { dy: gesture.delta.y }
            }
            Axis::Horizontal if gesture.delta.x.abs() > self.config.swipe_threshold => {
                let direction = if gesture.delta.x > 0.0 {
                    Direction::Forward
                } else {
                    Direction::Backward
                };
                Resolution::Navigate(direction)
            }
            _ => Resolution::SnapBack,
        };
        log::debug!("Gesture resolved: {:?}", resolution);
        Some((gesture, resolution))
    }

    /// Abort the gesture. Returns whether anything was in progress.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.gesture.is_some() || self.resolving;
        self.gesture = None;
        self.resolving = false;
        was_active
    }

    /// Mark the release animation as finished.
    pub fn settle(&mut self) {
        self.resolving = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_at(x: f64, y: f64) -> GestureTracker {
        let mut tracker = GestureTracker::default();
        tracker.begin(Point::new(x, y));
        tracker
    }

    #[test]
    fn test_default_phase_is_idle() {
        let tracker = GestureTracker::default();
        assert_eq!(tracker.phase(), Phase::Idle);
    }

    #[test]
    fn test_below_threshold_stays_undetermined() {
        let mut tracker = tracker_at(100.0, 100.0);
        assert_eq!(tracker.phase(), Phase::TrackingUndetermined);
        assert!(tracker.update(Point::new(106.0, 107.0)).is_none());
        assert_eq!(tracker.phase(), Phase::TrackingUndetermined);
        // Exactly on the threshold does not lock.
        assert!(tracker.update(Point::new(108.0, 108.0)).is_none());
    }

    #[test]
    fn test_horizontal_lock() {
        let mut tracker = tracker_at(100.0, 100.0);
        let gesture = tracker.update(Point::new(110.0, 102.0)).unwrap();
        assert_eq!(gesture.axis, Axis::Horizontal);
        assert_eq!(tracker.phase(), Phase::TrackingHorizontal);
    }

    #[test]
    fn test_horizontal_checked_first() {
        let mut tracker = tracker_at(0.0, 0.0);
        let gesture = tracker.update(Point::new(9.0, 30.0)).unwrap();
        assert_eq!(gesture.axis, Axis::Horizontal);
    }

    #[test]
    fn test_axis_lock_is_sticky() {
        let mut tracker = tracker_at(0.0, 0.0);
        tracker.update(Point::new(0.0, 10.0));
        assert_eq!(tracker.phase(), Phase::TrackingVertical);

        let gesture = tracker.update(Point::new(300.0, 20.0)).unwrap();
        assert_eq!(gesture.axis, Axis::Vertical);
        assert!((gesture.dx() - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_release_dismiss() {
        let mut tracker = tracker_at(0.0, 0.0);
        tracker.update(Point::new(0.0, 130.0));
        let (_, resolution) = tracker.release().unwrap();
        assert_eq!(resolution, Resolution::Dismiss { dy: 130.0 });
        assert_eq!(tracker.phase(), Phase::Resolving);
    }

    #[test]
    fn test_release_dismiss_upwards() {
        let mut tracker = tracker_at(0.0, 500.0);
        tracker.update(Point::new(0.0, 300.0));
        let (_, resolution) = tracker.release().unwrap();
        assert_eq!(resolution, Resolution::Dismiss { dy: -200.0 });
    }

    #[test]
    fn test_release_below_dismiss_snaps_back() {
        let mut tracker = tracker_at(0.0, 0.0);
        tracker.update(Point::new(0.0, 90.0));
        let (_, resolution) = tracker.release().unwrap();
        assert_eq!(resolution, Resolution::SnapBack);
    }

    #[test]
    fn test_release_exactly_at_threshold_snaps_back() {
        let mut tracker = tracker_at(0.0, 0.0);
        tracker.update(Point::new(0.0, 120.0));
        assert_eq!(tracker.release().unwrap().1, Resolution::SnapBack);

        tracker.begin(Point::ZERO);
        tracker.update(Point::new(50.0, 0.0));
        assert_eq!(tracker.release().unwrap().1, Resolution::SnapBack);
    }

    #[test]
    fn test_release_swipe_directions() {
        let mut tracker = tracker_at(200.0, 0.0);
        tracker.update(Point::new(260.0, 0.0));
        assert_eq!(
            tracker.release().unwrap().1,
            Resolution::Navigate(Direction::Forward)
        );

        tracker.begin(Point::new(200.0, 0.0));
        tracker.update(Point::new(140.0, 0.0));
        assert_eq!(
            tracker.release().unwrap().1,
            Resolution::Navigate(Direction::Backward)
        );
    }

    #[test]
    fn test_horizontal_gesture_never_dismisses() {
        let mut tracker = tracker_at(0.0, 0.0);
        tracker.update(Point::new(20.0, 0.0));
        tracker.update(Point::new(30.0, 500.0));
        assert_eq!(tracker.release().unwrap().1, Resolution::SnapBack);
    }

    #[test]
    fn test_undetermined_release_snaps_back() {
        let mut tracker = tracker_at(0.0, 0.0);
        tracker.update(Point::new(3.0, 3.0));
        assert_eq!(tracker.release().unwrap().1, Resolution::SnapBack);
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut tracker = tracker_at(0.0, 0.0);
        tracker.update(Point::new(0.0, 200.0));
        assert!(tracker.cancel());
        assert_eq!(tracker.phase(), Phase::Idle);
        assert!(tracker.release().is_none());
        assert!(!tracker.cancel());
    }

    #[test]
    fn test_settle_after_release() {
        let mut tracker = tracker_at(0.0, 0.0);
        tracker.release();
        assert_eq!(tracker.phase(), Phase::Resolving);
        tracker.settle();
        assert_eq!(tracker.phase(), Phase::Idle);
    }

    #[test]
    fn test_update_without_gesture() {
        let mut tracker = GestureTracker::default();
        assert!(tracker.update(Point::new(50.0, 50.0)).is_none());
        assert_eq!(tracker.phase(), Phase::Idle);
    }
}
