//! Page elements and how engine effects are written to them.

use crate::error::{AppError, AppResult};
use lightgrid_core::{Effect, LayoutOutput, PhotoCollection, SizeTier, TransitionStyle, ViewerVisual};
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, HtmlElement, HtmlImageElement, HtmlInputElement};

pub const GALLERY_ID: &str = "gallery";
pub const SLIDER_ID: &str = "zoom-slider";
pub const ZOOM_IN_ID: &str = "zoom-in";
pub const ZOOM_OUT_ID: &str = "zoom-out";
pub const LIGHTBOX_ID: &str = "lightbox";
pub const IMAGE_ID: &str = "lightbox-img";
pub const COUNTER_ID: &str = "lightbox-counter";
pub const CLOSE_ID: &str = "lightbox-close";
pub const PREV_ID: &str = "lightbox-prev";
pub const NEXT_ID: &str = "lightbox-next";

const ACTIVE_CLASS: &str = "active";
const NO_SCROLL_CLASS: &str = "no-scroll";
const ITEM_CLASS: &str = "gallery-item";

/// Every element the shell writes to, resolved once at startup.
pub struct Mount {
    pub root: HtmlElement,
    pub body: HtmlElement,
    pub gallery: HtmlElement,
    pub slider: HtmlInputElement,
    pub zoom_in: HtmlElement,
    pub zoom_out: HtmlElement,
    pub lightbox: HtmlElement,
    pub image: HtmlImageElement,
    pub counter: HtmlElement,
    pub close: HtmlElement,
    pub prev: HtmlElement,
    pub next: HtmlElement,
}

fn by_id<T: JsCast>(document: &Document, id: &str) -> AppResult<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| AppError::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| AppError::WrongElement(id.to_string()))
}

/// Set an inline style property; an empty value removes the override.
fn set_style(style: &CssStyleDeclaration, property: &str, value: &str) -> AppResult<()> {
    if value.is_empty() {
        style.remove_property(property)?;
    } else {
        style.set_property(property, value)?;
    }
    Ok(())
}

fn opacity_css(opacity: f64) -> String {
    if opacity == 1.0 {
        String::new()
    } else {
        opacity.to_string()
    }
}

impl Mount {
    pub fn find(document: &Document) -> AppResult<Self> {
        let root = document
            .document_element()
            .ok_or_else(|| AppError::MissingElement("html".into()))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| AppError::WrongElement("html".into()))?;
        let body = document
            .body()
            .ok_or_else(|| AppError::MissingElement("body".into()))?;

        let image: HtmlImageElement = by_id(document, IMAGE_ID)?;
        image.set_draggable(false);

        Ok(Self {
            root,
            body,
            image,
            gallery: by_id(document, GALLERY_ID)?,
            slider: by_id(document, SLIDER_ID)?,
            zoom_in: by_id(document, ZOOM_IN_ID)?,
            zoom_out: by_id(document, ZOOM_OUT_ID)?,
            lightbox: by_id(document, LIGHTBOX_ID)?,
            counter: by_id(document, COUNTER_ID)?,
            close: by_id(document, CLOSE_ID)?,
            prev: by_id(document, PREV_ID)?,
            next: by_id(document, NEXT_ID)?,
        })
    }

    /// Append one thumbnail per photo and return the cells in order.
    pub fn build_grid(&self, document: &Document, photos: &PhotoCollection) -> AppResult<Vec<HtmlElement>> {
        let fragment = document.create_document_fragment();
        let mut cells = Vec::with_capacity(photos.len());

        for item in photos.grid_items() {
            let cell: HtmlElement = document.create_element("div")?.unchecked_into();
            cell.set_class_name(ITEM_CLASS);
            cell.set_attribute("role", "listitem")?;
            cell.style()
                .set_property("animation-delay", &format!("{}ms", item.reveal_delay_ms))?;

            let img: HtmlImageElement = document.create_element("img")?.unchecked_into();
            img.set_src(&item.photo.thumb_path);
            img.set_alt(&item.alt_text());
            img.set_attribute("loading", if item.eager { "eager" } else { "lazy" })?;
            img.set_attribute("decoding", "async")?;

            cell.append_child(&img)?;
            fragment.append_child(&cell)?;
            cells.push(cell);
        }

        self.gallery.append_child(&fragment)?;
        log::info!("Built grid with {} thumbnails", cells.len());
        Ok(cells)
    }

    pub fn apply(&self, effect: &Effect) -> AppResult<()> {
        match effect {
            Effect::Layout(layout) => self.apply_layout(layout),
            Effect::SliderRange { min, max } => {
                self.slider.set_min(&min.to_string());
                self.slider.set_max(&max.to_string());
                Ok(())
            }
            Effect::SliderValue(value) => {
                self.slider.set_value(&value.to_string());
                Ok(())
            }
            Effect::ShowPhoto { src, counter, .. } => {
                self.image.set_src(src);
                self.counter.set_text_content(Some(counter.as_str()));
                Ok(())
            }
            Effect::ViewerOpen(open) => {
                self.lightbox
                    .class_list()
                    .toggle_with_force(ACTIVE_CLASS, *open)?;
                Ok(())
            }
            Effect::ScrollLock(locked) => {
                self.body
                    .class_list()
                    .toggle_with_force(NO_SCROLL_CLASS, *locked)?;
                Ok(())
            }
            Effect::FocusDismiss => Ok(self.close.focus()?),
            Effect::Visual(visual) => self.apply_visual(visual),
        }
    }

    fn apply_layout(&self, layout: &LayoutOutput) -> AppResult<()> {
        let style = self.root.style();
        style.set_property("--cell-size", &format!("{}px", layout.cell_size))?;
        style.set_property("--grid-gap", &format!("{}px", layout.gap))?;

        let classes = self.gallery.class_list();
        for tier in SizeTier::ALL {
            if tier != layout.tier {
                classes.remove_1(tier.css_class())?;
            }
        }
        classes.add_1(layout.tier.css_class())?;
        Ok(())
    }

    fn apply_visual(&self, visual: &ViewerVisual) -> AppResult<()> {
        // Transitions first so the property changes below pick them up.
        let image = self.image.style();
        set_style(&image, "transition", &visual.image.transition.css())?;
        let transform = if visual.image.translate.hypot() == 0.0 && visual.image.scale == 1.0 {
            String::new()
        } else {
            visual.image.transform_css()
        };
        set_style(&image, "transform", &transform)?;
        set_style(&image, "opacity", &opacity_css(visual.image.opacity))?;

        let backdrop = self.lightbox.style();
        set_style(&backdrop, "transition", &visual.backdrop_transition.css())?;
        set_style(&backdrop, "background", &visual.backdrop_css())?;

        self.apply_controls(visual.controls_opacity, &visual.controls_transition)
    }

    fn apply_controls(&self, opacity: f64, transition: &TransitionStyle) -> AppResult<()> {
        let transition = transition.css();
        let opacity = opacity_css(opacity);
        for control in [&self.counter, &self.close, &self.prev, &self.next] {
            let style = control.style();
            set_style(&style, "transition", &transition)?;
            set_style(&style, "opacity", &opacity)?;
        }
        Ok(())
    }
}
