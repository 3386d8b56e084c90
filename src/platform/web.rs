//! Browser platform: requestAnimationFrame, image elements, 2D overlay

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Window};

use crate::images::{ImageCache, ImageLoadError, ImageLoader, LoadEvent};
use crate::renderer::WheelFrame;
use crate::wheel::FrameScheduler;

/// Frame callback shared between the scheduler and the host
pub type FrameCallback = Rc<Closure<dyn FnMut(f64)>>;

/// requestAnimationFrame-backed scheduler
pub struct RafScheduler {
    window: Window,
    callback: FrameCallback,
    /// Pending request id, cleared when the frame fires
    handle: Option<i32>,
}

impl RafScheduler {
    pub fn new(window: Window, callback: FrameCallback) -> Self {
        Self {
            window,
            callback,
            handle: None,
        }
    }

    /// Call at the start of the frame callback so the next request goes out
    pub fn frame_fired(&mut self) {
        self.handle = None;
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) {
        if self.handle.is_some() {
            return;
        }
        let callback: &Closure<dyn FnMut(f64)> = &self.callback;
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
    }
}

/// Loads icons through `<img>` elements; completions are queued until
/// polled and `on_ready` is called so the host can redraw.
pub struct WebImageLoader {
    ready: Rc<RefCell<Vec<LoadEvent<HtmlImageElement>>>>,
    on_ready: Rc<dyn Fn()>,
}

impl WebImageLoader {
    pub fn new(on_ready: Rc<dyn Fn()>) -> Self {
        Self {
            ready: Rc::new(RefCell::new(Vec::new())),
            on_ready,
        }
    }
}

impl ImageLoader for WebImageLoader {
    type Image = HtmlImageElement;

    fn request(&mut self, label: &str, path: &str) {
        let img = match HtmlImageElement::new() {
            Ok(img) => img,
            Err(e) => {
                log::warn!("Cannot create image element: {:?}", e);
                return;
            }
        };

        let src = format!("/{}", path.trim_start_matches('/'));

        {
            let ready = self.ready.clone();
            let on_ready = self.on_ready.clone();
            let label = label.to_string();
            let loaded = img.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                ready.borrow_mut().push(LoadEvent::Loaded {
                    label: label.clone(),
                    image: loaded.clone(),
                });
                on_ready();
            });
            img.set_onload(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        {
            let ready = self.ready.clone();
            let label = label.to_string();
            let src = src.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                ready.borrow_mut().push(LoadEvent::Failed {
                    label: label.clone(),
                    error: ImageLoadError::Unavailable(src.clone()),
                });
            });
            img.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        img.set_src(&src);
    }

    fn poll(&mut self) -> Vec<LoadEvent<HtmlImageElement>> {
        std::mem::take(&mut *self.ready.borrow_mut())
    }
}

/// Canvas 2D layer drawn over the GPU canvas for text and icons
pub struct LabelOverlay {
    ctx: CanvasRenderingContext2d,
}

impl LabelOverlay {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    pub fn draw(
        &self,
        frame: &WheelFrame,
        icons: &ImageCache<HtmlImageElement>,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let size = frame.size as f64;
        ctx.clear_rect(0.0, 0.0, size, size);

        let (cx, cy) = (frame.center.x as f64, frame.center.y as f64);

        for icon in &frame.icons {
            let Some(img) = icons.get(&icon.label) else {
                continue;
            };
            let side = icon.size as f64;
            ctx.save();
            ctx.translate(cx, cy)?;
            ctx.rotate(icon.angle as f64)?;
            ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                icon.x as f64,
                -side / 2.0,
                side,
                side,
            )?;
            ctx.restore();
        }

        for label in &frame.labels {
            ctx.save();
            ctx.translate(cx, cy)?;
            ctx.rotate(label.angle as f64)?;
            ctx.set_text_align("right");
            ctx.set_text_baseline("middle");
            ctx.set_fill_style_str(&css_color(label.color));
            ctx.set_shadow_color("rgba(0, 0, 0, 0.3)");
            ctx.set_shadow_blur(4.0);
            ctx.set_font(&label.css_font());
            ctx.fill_text(&label.text, label.anchor_x as f64, 0.0)?;
            ctx.restore();
        }

        Ok(())
    }
}

/// Float RGBA to a CSS `rgba()` string
fn css_color(color: [f32; 4]) -> String {
    let [r, g, b, _] = crate::renderer::vertex::to_rgba8(color);
    format!("rgba({}, {}, {}, {})", r, g, b, color[3])
}
