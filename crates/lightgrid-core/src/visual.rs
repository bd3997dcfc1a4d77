//! Declarative visual properties of the viewer, derived from gesture state.
//!
//! Everything here is a pure function of engine state. The shell turns a
//! [`ViewerVisual`] into inline styles without any logic of its own.

use crate::gesture::{Axis, Direction, GestureConfig, GestureState};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Horizontal offset of the outgoing image during navigation.
pub const NAVIGATE_SLIDE: f64 = 30.0;
/// Scale of the outgoing image during navigation.
pub const NAVIGATE_SCALE: f64 = 0.96;
/// Scale the image shrinks to while flying off on dismiss.
pub const DISMISS_EXIT_SCALE: f64 = 0.8;

/// Timing function of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Easing {
    /// The CSS `ease` keyword.
    Ease,
    /// Explicit control points `(x1, y1, x2, y2)`.
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Decelerating curve used for release animations.
    pub const RELEASE: Easing = Easing::CubicBezier(0.25, 0.1, 0.25, 1.0);

    /// CSS timing function value.
    pub fn css(&self) -> String {
        match self {
            Easing::Ease => "ease".to_string(),
            Easing::CubicBezier(a, b, c, d) => format!("cubic-bezier({a}, {b}, {c}, {d})"),
        }
    }
}

/// Animated style property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Property {
    Transform,
    Opacity,
    Background,
}

impl Property {
    /// CSS property name.
    pub fn css(&self) -> &'static str {
        match self {
            Property::Transform => "transform",
            Property::Opacity => "opacity",
            Property::Background => "background",
        }
    }
}

/// One entry of a CSS `transition` list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Property being animated.
    pub property: Property,
    /// Duration in milliseconds.
    pub duration_ms: u32,
    /// Timing function.
    pub easing: Easing,
}

impl Transition {
    /// Create a transition entry.
    pub const fn new(property: Property, duration_ms: u32, easing: Easing) -> Self {
        Self {
            property,
            duration_ms,
            easing,
        }
    }

    /// Entry formatted as `property duration easing`, e.g. `opacity 0.2s ease`.
    pub fn css(&self) -> String {
        format!(
            "{} {}s {}",
            self.property.css(),
            f64::from(self.duration_ms) / 1000.0,
            self.easing.css()
        )
    }
}

/// How an element's property changes should animate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum TransitionStyle {
    /// No inline override; the stylesheet decides.
    #[default]
    Inherit,
    /// Changes apply instantly (direct manipulation).
    Disabled,
    /// Animate the listed properties.
    Animate(Vec<Transition>),
}

impl TransitionStyle {
    /// Inline `transition` value. Empty means "remove the override".
    pub fn css(&self) -> String {
        match self {
            TransitionStyle::Inherit => String::new(),
            TransitionStyle::Disabled => "none".to_string(),
            TransitionStyle::Animate(transitions) => transitions
                .iter()
                .map(Transition::css)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Longest duration among the transitions.
    pub fn duration_ms(&self) -> u32 {
        match self {
            TransitionStyle::Animate(transitions) => {
                transitions.iter().map(|t| t.duration_ms).max().unwrap_or(0)
            }
            _ => 0,
        }
    }

    fn release_image() -> Self {
        TransitionStyle::Animate(vec![
            Transition::new(Property::Transform, 300, Easing::RELEASE),
            Transition::new(Property::Opacity, 200, Easing::Ease),
        ])
    }

    fn single(property: Property, duration_ms: u32) -> Self {
        TransitionStyle::Animate(vec![Transition::new(property, duration_ms, Easing::Ease)])
    }
}

/// Transform and opacity of the displayed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVisual {
    /// Offset from the resting position in px.
    pub translate: Vec2,
    /// Uniform scale, 1.0 at rest.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// How changes to the values above animate.
    pub transition: TransitionStyle,
}

impl Default for ImageVisual {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
            opacity: 1.0,
            transition: TransitionStyle::Inherit,
        }
    }
}

impl ImageVisual {
    /// Inline `transform` value.
    pub fn transform_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate.x, self.translate.y, self.scale
        )
    }

    /// Identity transform at full opacity.
    pub fn is_identity(&self) -> bool {
        self.translate == Vec2::ZERO && self.scale == 1.0 && self.opacity == 1.0
    }
}

/// Complete visual state of the open viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerVisual {
    /// The displayed photo.
    pub image: ImageVisual,
    /// Alpha of the black backdrop tint.
    pub backdrop_alpha: f64,
    /// How backdrop changes animate.
    pub backdrop_transition: TransitionStyle,
    /// Opacity of the counter and the close/prev/next buttons.
    pub controls_opacity: f64,
    /// How control opacity changes animate.
    pub controls_transition: TransitionStyle,
}

impl Default for ViewerVisual {
    fn default() -> Self {
        Self::neutral()
    }
}

impl ViewerVisual {
    /// No overrides at all.
    pub fn neutral() -> Self {
        Self {
            image: ImageVisual::default(),
            backdrop_alpha: 1.0,
            backdrop_transition: TransitionStyle::Inherit,
            controls_opacity: 1.0,
            controls_transition: TransitionStyle::Inherit,
        }
    }

    /// Whether every override is absent.
    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }

    /// Direct manipulation begins: image changes must not animate.
    pub fn drag_start() -> Self {
        let mut visual = Self::neutral();
        visual.image.transition = TransitionStyle::Disabled;
        visual
    }

    /// Continuous feedback for a locked gesture.
    pub fn feedback(gesture: &GestureState, config: &GestureConfig) -> Self {
        let mut visual = Self::drag_start();
        match gesture.axis {
            Axis::None => {}
            Axis::Horizontal => {
                visual.image.translate = Vec2::new(gesture.dx() * config.swipe_damping, 0.0);
                visual.image.opacity =
                    (1.0 - gesture.dx().abs() / config.swipe_fade_distance).clamp(0.0, 1.0);
            }
            Axis::Vertical => {
                let progress = dismiss_progress(gesture, config);
                visual.image.translate = Vec2::new(0.0, gesture.dy());
                visual.image.scale = 1.0 - progress * config.dismiss_max_shrink;
                visual.backdrop_alpha = 1.0 - progress * config.dismiss_max_dim;
                visual.controls_opacity = controls_opacity(progress, config);
            }
        }
        visual
    }

    /// Exit animation after a dismiss: the image flies off in the drag direction.
    pub fn dismiss_exit(gesture: &GestureState, config: &GestureConfig, viewport_height: f64) -> Self {
        let direction = if gesture.dy() > 0.0 { 1.0 } else { -1.0 };
        Self {
            image: ImageVisual {
                translate: Vec2::new(0.0, direction * viewport_height),
                scale: DISMISS_EXIT_SCALE,
                opacity: 0.0,
                transition: TransitionStyle::release_image(),
            },
            backdrop_alpha: 0.0,
            backdrop_transition: TransitionStyle::single(Property::Background, 250),
            controls_opacity: controls_opacity(dismiss_progress(gesture, config), config),
            controls_transition: TransitionStyle::Inherit,
        }
    }

    /// Animate every property back to neutral.
    pub fn snap_back() -> Self {
        Self {
            image: ImageVisual {
                transition: TransitionStyle::release_image(),
                ..ImageVisual::default()
            },
            backdrop_alpha: 1.0,
            backdrop_transition: TransitionStyle::single(Property::Background, 200),
            controls_opacity: 1.0,
            controls_transition: TransitionStyle::single(Property::Opacity, 200),
        }
    }

    /// First phase of a navigation: the image fades out against the travel direction.
    pub fn navigate_out(direction: Direction) -> Self {
        let mut visual = Self::neutral();
        visual.image.translate = Vec2::new(direction.sign() * -NAVIGATE_SLIDE, 0.0);
        visual.image.scale = NAVIGATE_SCALE;
        visual.image.opacity = 0.0;
        visual
    }

    /// Inline backdrop value. Empty means "remove the override".
    pub fn backdrop_css(&self) -> String {
        if self.backdrop_alpha == 1.0 {
            String::new()
        } else {
            format!("rgba(0, 0, 0, {})", self.backdrop_alpha)
        }
    }
}

fn dismiss_progress(gesture: &GestureState, config: &GestureConfig) -> f64 {
    (gesture.dy().abs() / config.dismiss_progress_distance).min(1.0)
}

fn controls_opacity(progress: f64, config: &GestureConfig) -> f64 {
    (1.0 - progress * config.control_fade_rate).max(0.0)
}
