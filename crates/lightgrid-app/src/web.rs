//! WebAssembly entry point: binds the gallery engine to the page.

use crate::dom::Mount;
use crate::error::{AppError, AppResult};
use kurbo::{Point, Size};
use lightgrid_core::{
    Engine, EngineConfig, Event, KeyEvent, Modifiers, PhotoCollection, PointerEvent, Response,
    TouchEvent, TouchPhase, ViewerTarget, WheelEvent,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AddEventListenerOptions, Document, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, TouchList, Window,
};
use web_time::Instant;

const MANIFEST_URL: &str = "./photos/manifest.json";
/// Optional `<script type="application/json">` holding an engine config.
const CONFIG_ELEMENT_ID: &str = "lightgrid-config";
const VISIBLE_CLASS: &str = "visible";

/// Engine plus the page it drives.
struct Shell {
    engine: RefCell<Engine>,
    mount: Mount,
    clock: Instant,
}

impl Shell {
    fn now(&self) -> Duration {
        self.clock.elapsed()
    }

    fn dispatch(&self, event: Event) -> Response {
        let response = self.engine.borrow_mut().handle(event, self.now());
        self.flush();
        response
    }

    fn frame(&self, viewport: Size) {
        self.engine.borrow_mut().on_frame(self.now(), viewport);
        self.flush();
    }

    fn flush(&self) {
        let effects = self.engine.borrow_mut().drain_effects();
        for effect in &effects {
            if let Err(e) = self.mount.apply(effect) {
                log::warn!("Failed to apply {:?}: {}", effect, e);
            }
        }
    }

    fn is_target(event: &web_sys::Event, element: &HtmlElement) -> bool {
        event.target().is_some_and(|target| {
            let target: &JsValue = target.as_ref();
            let element: &JsValue = element.as_ref();
            target == element
        })
    }
}

fn listen<F>(target: &EventTarget, kind: &str, passive: bool, handler: F) -> AppResult<()>
where
    F: FnMut(web_sys::Event) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        kind,
        closure.as_ref().unchecked_ref(),
        &options,
    )?;
    closure.forget();
    Ok(())
}

fn viewport_size(window: &Window) -> Size {
    let dimension = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or_default()
    };
    Size::new(dimension(window.inner_width()), dimension(window.inner_height()))
}

fn touch_points(list: &TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|touch| Point::new(f64::from(touch.client_x()), f64::from(touch.client_y())))
        .collect()
}

fn touch_event(event: &web_sys::Event) -> Option<TouchEvent> {
    let event = event.dyn_ref::<web_sys::TouchEvent>()?;
    let phase = match event.type_().as_str() {
        "touchstart" => TouchPhase::Start,
        "touchmove" => TouchPhase::Move,
        "touchend" => TouchPhase::End,
        "touchcancel" => TouchPhase::Cancel,
        _ => return None,
    };
    Some(TouchEvent::new(phase, touch_points(&event.touches())))
}

async fn fetch_manifest(window: &Window, url: &str) -> AppResult<PhotoCollection> {
    let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(AppError::Fetch {
            url: url.to_string(),
            status: response.status(),
        });
    }
    let text = JsFuture::from(response.text()?).await?;
    let text = text
        .as_string()
        .ok_or_else(|| AppError::Js("manifest body is not text".into()))?;
    Ok(PhotoCollection::from_json(&text)?)
}

fn page_config(document: &Document) -> EngineConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return EngineConfig::default();
    };
    match EngineConfig::from_json(&text) {
        Ok(config) => {
            log::info!("Using engine config from #{}", CONFIG_ELEMENT_ID);
            config
        }
        Err(e) => {
            log::warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, e);
            EngineConfig::default()
        }
    }
}

/// Add the reveal class to thumbnails as they scroll into view.
fn observe_reveal(cells: &[HtmlElement]) -> AppResult<()> {
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if entry.is_intersecting() {
                    let target = entry.target();
                    let _ = target.class_list().add_1(VISIBLE_CLASS);
                    observer.unobserve(&target);
                }
            }
        },
    );
    let options = IntersectionObserverInit::new();
    options.set_root_margin("50px");
    options.set_threshold(&JsValue::from_f64(0.01));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();

    for cell in cells {
        observer.observe(cell);
    }
    Ok(())
}

fn bind_grid(shell: &Rc<Shell>, cells: &[HtmlElement]) -> AppResult<()> {
    let mount = &shell.mount;

    let s = shell.clone();
    listen(&mount.slider, "input", true, move |_| {
        let value = s.mount.slider.value_as_number();
        s.dispatch(Event::SliderInput(value));
    })?;

    let s = shell.clone();
    listen(&mount.zoom_in, "click", true, move |_| {
        s.dispatch(Event::ZoomIn);
    })?;
    let s = shell.clone();
    listen(&mount.zoom_out, "click", true, move |_| {
        s.dispatch(Event::ZoomOut);
    })?;

    // Not passive: a modified wheel must not zoom the whole page.
    let s = shell.clone();
    listen(&mount.gallery, "wheel", false, move |event| {
        let Some(wheel) = event.dyn_ref::<web_sys::WheelEvent>() else {
            return;
        };
        let modifiers = Modifiers {
            shift: wheel.shift_key(),
            ctrl: wheel.ctrl_key(),
            alt: wheel.alt_key(),
            meta: wheel.meta_key(),
        };
        let response = s.dispatch(Event::Wheel(WheelEvent {
            delta_y: wheel.delta_y(),
            modifiers,
        }));
        if response.consumed {
            event.prevent_default();
        }
    })?;

    for kind in ["touchstart", "touchmove", "touchend", "touchcancel"] {
        let s = shell.clone();
        listen(&mount.gallery, kind, true, move |event| {
            if let Some(touch) = touch_event(&event) {
                s.dispatch(Event::GridTouch(touch));
            }
        })?;
    }

    for (index, cell) in cells.iter().enumerate() {
        let s = shell.clone();
        listen(cell, "click", true, move |_| {
            s.dispatch(Event::ThumbnailClicked(index));
        })?;
    }
    Ok(())
}

fn bind_viewer(shell: &Rc<Shell>, document: &Document) -> AppResult<()> {
    let mount = &shell.mount;

    for kind in ["touchstart", "touchmove", "touchend", "touchcancel"] {
        let s = shell.clone();
        listen(&mount.lightbox, kind, true, move |event| {
            if let Some(touch) = touch_event(&event) {
                s.dispatch(Event::ViewerTouch(touch));
            }
        })?;
    }

    // Mouse drags run the same gesture machine as a single finger. Not
    // passive: the browser's own image drag would swallow the moves.
    let s = shell.clone();
    listen(&mount.lightbox, "mousedown", false, move |event| {
        let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() else {
            return;
        };
        let on_image = Shell::is_target(&event, &s.mount.image);
        if mouse.button() != 0 || !(on_image || Shell::is_target(&event, &s.mount.lightbox)) {
            return;
        }
        let position = Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
        event.prevent_default();
        s.dispatch(Event::ViewerPointer(PointerEvent::Down { position }));
    })?;
    for kind in ["mousemove", "mouseup"] {
        let s = shell.clone();
        listen(&mount.lightbox, kind, true, move |event| {
            let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() else {
                return;
            };
            let position = Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
            let pointer = if event.type_() == "mouseup" {
                PointerEvent::Up { position }
            } else {
                PointerEvent::mouse_move(position, mouse.buttons())
            };
            s.dispatch(Event::ViewerPointer(pointer));
        })?;
    }
    let s = shell.clone();
    listen(&mount.lightbox, "mouseleave", true, move |_| {
        s.dispatch(Event::ViewerPointer(PointerEvent::Cancel));
    })?;

    let s = shell.clone();
    listen(&mount.lightbox, "click", true, move |event| {
        let target = if Shell::is_target(&event, &s.mount.lightbox) {
            ViewerTarget::Backdrop
        } else if Shell::is_target(&event, &s.mount.image) {
            ViewerTarget::Image
        } else {
            return;
        };
        s.dispatch(Event::ViewerClick(target));
    })?;

    for (button, target) in [
        (&mount.close, ViewerTarget::Close),
        (&mount.prev, ViewerTarget::Previous),
        (&mount.next, ViewerTarget::Next),
    ] {
        let s = shell.clone();
        listen(button, "click", true, move |event| {
            event.stop_propagation();
            s.dispatch(Event::ViewerClick(target));
        })?;
    }

    for kind in ["load", "error"] {
        let s = shell.clone();
        listen(&mount.image, kind, true, move |_| {
            s.dispatch(Event::ImageSettled);
        })?;
    }

    let s = shell.clone();
    listen(document, "keydown", false, move |event| {
        let Some(key) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
            return;
        };
        if s.dispatch(Event::Key(KeyEvent::Pressed(key.key()))).consumed {
            event.prevent_default();
        }
    })?;
    Ok(())
}

fn bind_window(shell: &Rc<Shell>, window: &Window) -> AppResult<()> {
    let s = shell.clone();
    listen(window, "resize", true, move |_| {
        if let Some(window) = web_sys::window() {
            s.dispatch(Event::Resize(viewport_size(&window)));
        }
    })?;

    let screen = window.screen()?;
    if js_sys::Reflect::has(&screen, &JsValue::from_str("orientation"))? {
        let s = shell.clone();
        listen(&screen.orientation(), "change", true, move |_| {
            s.dispatch(Event::OrientationChange);
        })?;
    } else {
        log::info!("Screen orientation events unavailable");
    }
    Ok(())
}

fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> AppResult<()> {
    let window = web_sys::window().ok_or(AppError::NoWindow)?;
    window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    Ok(())
}

/// Pump the engine once per animation frame for the lifetime of the page.
fn start_frame_loop(shell: Rc<Shell>) -> AppResult<()> {
    let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = callback.clone();
    *callback.borrow_mut() = Some(Closure::new(move |_timestamp: f64| {
        if let Some(window) = web_sys::window() {
            shell.frame(viewport_size(&window));
        }
        if let Some(callback) = next.borrow().as_ref() {
            if let Err(e) = request_frame(callback) {
                log::error!("Frame loop stopped: {}", e);
            }
        }
    }));
    if let Some(callback) = callback.borrow().as_ref() {
        request_frame(callback)?;
    }
    Ok(())
}

async fn start() -> AppResult<()> {
    let window = web_sys::window().ok_or(AppError::NoWindow)?;
    let document = window.document().ok_or(AppError::NoWindow)?;
    let mount = Mount::find(&document)?;

    let photos = fetch_manifest(&window, MANIFEST_URL).await?;
    let config = page_config(&document);
    let cells = mount.build_grid(&document, &photos)?;
    observe_reveal(&cells)?;

    let shell = Rc::new(Shell {
        engine: RefCell::new(Engine::new(photos, viewport_size(&window), config)),
        mount,
        clock: Instant::now(),
    });
    shell.engine.borrow_mut().start();
    shell.flush();

    bind_grid(&shell, &cells)?;
    bind_viewer(&shell, &document)?;
    bind_window(&shell, &window)?;
    start_frame_loop(shell)
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(log::Level::Info).expect("Failed to initialize logger");

    log::info!("Starting Lightgrid (WASM)");

    if let Err(e) = start().await {
        log::error!("Lightgrid failed to start: {}", e);
    }
}
