//! End-to-end sessions driven through the public engine API.

use kurbo::{Point, Size};
use lightgrid_core::{
    Effect, Engine, EngineConfig, Event, KeyEvent, Phase, PhotoCollection, SizeTier, TouchEvent,
    TouchPhase, ViewerTarget, ViewerVisual,
};
use std::time::Duration;

const MANIFEST: &str = r#"[
    { "id": "a", "thumb": "photos/thumb/a.webp", "full": "photos/full/a.jpg" },
    { "id": "b", "thumb": "photos/thumb/b.webp", "full": "photos/full/b.jpg" },
    { "id": "c", "thumb": "photos/thumb/c.webp", "full": "photos/full/c.jpg" },
    { "id": "d", "thumb": "photos/thumb/d.webp", "full": "photos/full/d.jpg" }
]"#;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn started() -> Engine {
    let photos = PhotoCollection::from_json(MANIFEST).unwrap();
    let mut engine = Engine::new(photos, Size::new(1200.0, 800.0), EngineConfig::default());
    engine.start();
    engine.drain_effects();
    engine
}

fn touch(engine: &mut Engine, phase: TouchPhase, at: Option<(f64, f64)>, now: u64) {
    let touches = at.map(|(x, y)| vec![Point::new(x, y)]).unwrap_or_default();
    engine.handle(Event::ViewerTouch(TouchEvent::new(phase, touches)), ms(now));
}

fn vertical_drag(engine: &mut Engine, dy: f64, now: u64) {
    touch(engine, TouchPhase::Start, Some((300.0, 300.0)), now);
    touch(engine, TouchPhase::Move, Some((300.0, 300.0 + dy / 3.0)), now + 16);
    touch(engine, TouchPhase::Move, Some((300.0, 300.0 + dy)), now + 32);
    touch(engine, TouchPhase::End, None, now + 48);
}

#[test]
fn test_drag_down_past_threshold_closes() {
    let mut engine = started();
    engine.handle(Event::ThumbnailClicked(1), ms(0));
    engine.drain_effects();

    vertical_drag(&mut engine, 130.0, 100);
    assert_eq!(engine.gesture_phase(), Phase::Resolving);
    assert!(engine.viewer_state().is_open);

    engine.on_frame(ms(148 + 250), engine.viewport());
    assert!(!engine.viewer_state().is_open);
    let effects = engine.drain_effects();
    assert!(effects.contains(&Effect::ViewerOpen(false)));
    assert!(effects.contains(&Effect::ScrollLock(false)));
}

#[test]
fn test_short_drag_snaps_back_and_stays_open() {
    let mut engine = started();
    engine.handle(Event::ThumbnailClicked(1), ms(0));
    engine.drain_effects();

    vertical_drag(&mut engine, 90.0, 100);
    let effects = engine.drain_effects();
    assert_eq!(effects.last(), Some(&Effect::Visual(ViewerVisual::snap_back())));

    engine.on_frame(ms(148 + 300), engine.viewport());
    assert!(engine.viewer_state().is_open);
    assert_eq!(engine.gesture_phase(), Phase::Idle);
    assert_eq!(
        engine.drain_effects(),
        vec![Effect::Visual(ViewerVisual::neutral())]
    );
}

#[test]
fn test_feedback_only_after_axis_lock() {
    let mut engine = started();
    engine.handle(Event::ThumbnailClicked(0), ms(0));
    touch(&mut engine, TouchPhase::Start, Some((100.0, 100.0)), 10);
    engine.drain_effects();

    touch(&mut engine, TouchPhase::Move, Some((104.0, 105.0)), 20);
    assert!(engine.drain_effects().is_empty());

    touch(&mut engine, TouchPhase::Move, Some((100.0, 160.0)), 30);
    let effects = engine.drain_effects();
    let Some(Effect::Visual(visual)) = effects.last() else {
        panic!("expected visual feedback, got {effects:?}");
    };
    assert!((visual.image.translate.y - 60.0).abs() < 1e-9);
    assert!(visual.backdrop_alpha < 1.0);

    // Sticky: a large horizontal move keeps vertical feedback.
    touch(&mut engine, TouchPhase::Move, Some((400.0, 170.0)), 40);
    assert_eq!(engine.gesture_phase(), Phase::TrackingVertical);
}

#[test]
fn test_swipe_walks_the_collection_with_wraparound() {
    let mut engine = started();
    engine.handle(Event::ThumbnailClicked(3), ms(0));

    let mut now = 100;
    for expected in [0usize, 1] {
        touch(&mut engine, TouchPhase::Start, Some((300.0, 300.0)), now);
        touch(&mut engine, TouchPhase::Move, Some((330.0, 302.0)), now + 16);
        touch(&mut engine, TouchPhase::Move, Some((380.0, 302.0)), now + 32);
        touch(&mut engine, TouchPhase::End, None, now + 48);
        engine.on_frame(ms(now + 48 + 150), engine.viewport());
        engine.handle(Event::ImageSettled, ms(now + 250));
        assert_eq!(engine.viewer_state().current_index, expected);
        now += 1000;
    }

    engine.handle(Event::ViewerClick(ViewerTarget::Previous), ms(now));
    engine.on_frame(ms(now + 150), engine.viewport());
    assert_eq!(engine.viewer_state().current_index, 0);
}

#[test]
fn test_touch_cancel_restores_neutral() {
    let mut engine = started();
    engine.handle(Event::ThumbnailClicked(0), ms(0));
    touch(&mut engine, TouchPhase::Start, Some((100.0, 100.0)), 10);
    touch(&mut engine, TouchPhase::Move, Some((100.0, 400.0)), 20);
    engine.drain_effects();

    touch(&mut engine, TouchPhase::Cancel, None, 30);
    assert_eq!(
        engine.drain_effects(),
        vec![Effect::Visual(ViewerVisual::neutral())]
    );
    assert!(engine.viewer_state().is_open);
    assert_eq!(engine.gesture_phase(), Phase::Idle);
}

#[test]
fn test_zoom_in_twice_from_sixty() {
    let photos = PhotoCollection::from_json(MANIFEST).unwrap();
    let mut engine = Engine::new(photos, Size::new(1200.0, 800.0), EngineConfig::default());
    assert_eq!(engine.cell_size(), 60);
    assert_eq!(engine.layout().tier, SizeTier::ExtraSmall);

    engine.handle(Event::ZoomIn, ms(0));
    engine.handle(Event::ZoomIn, ms(0));
    assert_eq!(engine.cell_size(), 110);
    assert_eq!(engine.layout().tier, SizeTier::Small);
    assert_eq!(engine.layout().gap, 3);
}

#[test]
fn test_keyboard_only_while_open() {
    let mut engine = started();
    let response = engine.handle(Event::Key(KeyEvent::Pressed("ArrowRight".into())), ms(0));
    assert!(!response.consumed);
    assert!(engine.drain_effects().is_empty());

    engine.handle(Event::ThumbnailClicked(0), ms(0));
    engine.handle(Event::Key(KeyEvent::Pressed("ArrowLeft".into())), ms(10));
    engine.on_frame(ms(160), engine.viewport());
    assert_eq!(engine.viewer_state().current_index, 3);
}
