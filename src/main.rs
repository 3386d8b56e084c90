//! Spin Wheel entry point
//!
//! Browser: wires the spin controller to requestAnimationFrame, the WebGPU
//! pipeline and a Canvas 2D label overlay.
//! Native: runs a headless spin on simulated frames and reports the winner.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlImageElement};

    use spin_wheel::platform::web::{LabelOverlay, RafScheduler, WebImageLoader};
    use spin_wheel::renderer::{WheelPipeline, draw_wheel};
    use spin_wheel::{ImageCache, SpinController, SpinRequest, WheelSettings, WinnerHistory};

    /// Page state holding the wheel and its collaborators
    struct App {
        items: Vec<String>,
        forced: Option<String>,
        settings: WheelSettings,
        controller: SpinController<RafScheduler>,
        pipeline: Option<WheelPipeline>,
        overlay: Option<LabelOverlay>,
        icons: ImageCache<HtmlImageElement>,
        loader: WebImageLoader,
        history: WinnerHistory,
    }

    impl App {
        /// Draw the wheel at the controller's current rotation
        fn redraw(&mut self) {
            let frame = draw_wheel(
                &self.items,
                self.controller.rotation(),
                self.settings.size,
                &self.icons,
            );

            if let Some(ref mut pipeline) = self.pipeline {
                match pipeline.render(&frame) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        pipeline.resize(pipeline.size.0, pipeline.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
            if let Some(ref overlay) = self.overlay {
                if let Err(e) = overlay.draw(&frame, &self.icons) {
                    log::warn!("Overlay error: {:?}", e);
                }
            }
        }

        fn on_frame(&mut self, time: f64) {
            self.controller.scheduler_mut().frame_fired();
            let outcome = self.controller.on_frame(time);
            if outcome.redraw {
                self.redraw();
            }
            if let Some(winner) = outcome.winner {
                // Release the external flag so the next rising edge spins again
                self.controller.set_spinning(false, &self.items, None);
                self.history.record(&winner, js_sys::Date::now());
                self.history.save();
                show_winner(&winner.label, self.history.len());
            }
            update_button(self.controller.can_spin(&self.items));
        }

        fn spin(&mut self) {
            let now = web_sys::window()
                .and_then(|w| w.performance())
                .map(|p| p.now())
                .unwrap_or(0.0);
            let request = self
                .controller
                .request_spin(&self.items, self.forced.as_deref(), now);
            if request == SpinRequest::Started {
                hide_winner();
            }
            update_button(self.controller.can_spin(&self.items));
        }

        /// Fold finished icon loads into the cache and redraw if any landed
        fn refresh_icons(&mut self) {
            let events = self.loader.poll();
            if self.icons.apply(events) {
                self.redraw();
            }
        }
    }

    fn show_winner(label: &str, total: usize) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("winner-name") {
            el.set_text_content(Some(label));
        }
        if let Some(el) = document.get_element_by_id("winner-count") {
            el.set_text_content(Some(&total.to_string()));
        }
        if let Some(el) = document.get_element_by_id("winner") {
            let _ = el.set_attribute("class", "");
        }
    }

    fn hide_winner() {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("winner"))
        {
            let _ = el.set_attribute("class", "hidden");
        }
    }

    fn update_button(enabled: bool) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("spin"))
        {
            if let Ok(button) = el.dyn_into::<web_sys::HtmlButtonElement>() {
                button.set_disabled(!enabled);
                button.set_text_content(Some(if enabled { "Spin" } else { "Spinning..." }));
            }
        }
    }

    /// Comma separated, trimmed, empties dropped
    fn parse_items(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Spin Wheel starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        // Write back the validated settings
        let settings = WheelSettings::load().validated();
        settings.save();

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("wheel")
            .expect("no wheel canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(settings.size);
        canvas.set_height(settings.size);

        let items = parse_items(&canvas.get_attribute("data-items").unwrap_or_default());
        let forced = canvas
            .get_attribute("data-forced")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let autospin = canvas.has_attribute("data-autospin");

        // Frame callback resolves the app lazily; the app owns the scheduler
        let slot: Rc<RefCell<Weak<RefCell<App>>>> = Rc::new(RefCell::new(Weak::new()));
        let frame_slot = slot.clone();
        let callback = Rc::new(Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            if let Some(app) = frame_slot.borrow().upgrade() {
                app.borrow_mut().on_frame(time);
            }
        }));
        let scheduler = RafScheduler::new(window.clone(), callback);

        let icon_slot = slot.clone();
        let loader = WebImageLoader::new(Rc::new(move || {
            if let Some(app) = icon_slot.borrow().upgrade() {
                app.borrow_mut().refresh_icons();
            }
        }));

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            controller: SpinController::new(&settings, scheduler, seed),
            items,
            forced,
            settings,
            pipeline: None,
            overlay: None,
            icons: ImageCache::new(),
            loader,
            history: WinnerHistory::load(),
        }));
        *slot.borrow_mut() = Rc::downgrade(&app);

        // Label overlay
        if let Some(el) = document.get_element_by_id("labels") {
            if let Ok(overlay_canvas) = el.dyn_into::<HtmlCanvasElement>() {
                let size = app.borrow().settings.size;
                overlay_canvas.set_width(size);
                overlay_canvas.set_height(size);
                match LabelOverlay::new(&overlay_canvas) {
                    Ok(overlay) => app.borrow_mut().overlay = Some(overlay),
                    Err(e) => log::warn!("No label overlay: {:?}", e),
                }
            }
        }

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        let size = app.borrow().settings.size;
                        match WheelPipeline::new(surface, &adapter, size, size).await {
                            Ok(pipeline) => app.borrow_mut().pipeline = Some(pipeline),
                            Err(e) => log::error!("{}", e),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        {
            let mut a = app.borrow_mut();
            let App {
                items,
                icons,
                loader,
                settings,
                ..
            } = &mut *a;
            icons.preload(items.as_slice(), loader, settings);
            a.redraw();
            let can_spin = a.controller.can_spin(&a.items);
            update_button(can_spin);
        }

        setup_spin_button(app.clone());
        setup_clear_button(app.clone());
        setup_keyboard(app.clone());

        if autospin {
            let mut a = app.borrow_mut();
            let App {
                controller,
                items,
                forced,
                ..
            } = &mut *a;
            controller.set_spinning(true, items.as_slice(), forced.as_deref());
        }

        log::info!("Spin Wheel ready");
    }

    fn setup_spin_button(app: Rc<RefCell<App>>) {
        let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("spin"))
        else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            app.borrow_mut().spin();
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_clear_button(app: Rc<RefCell<App>>) {
        let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("clear-history"))
        else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut a = app.borrow_mut();
            a.history.clear();
            a.history.save();
            hide_winner();
            log::info!("Winner history cleared");
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if event.code() == "Space" {
                event.prevent_default();
                app.borrow_mut().spin();
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web_app::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;
    use spin_wheel::images::{FsImageLoader, ImageLoader};
    use spin_wheel::renderer::{colors, draw_wheel, raster};
    use spin_wheel::wheel::ManualScheduler;
    use spin_wheel::{ImageCache, SpinController, WheelSettings, WinnerHistory};

    /// Simulated display refresh (ms)
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Spin a wheel headlessly and print the winners
    #[derive(Parser, Debug)]
    #[command(name = "spin-wheel", version, about = "Randomized selection wheel")]
    pub struct Args {
        /// Wheel item labels, in sector order
        pub items: Vec<String>,

        /// Land on the first item with this label
        #[arg(long = "force", value_name = "LABEL")]
        pub forced: Option<String>,

        /// RNG seed (random when omitted)
        #[arg(long)]
        pub seed: Option<u64>,

        /// Number of consecutive spins
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pub spins: u32,

        /// Write a PNG of the final wheel
        #[arg(long, value_name = "PATH")]
        pub snapshot: Option<PathBuf>,

        /// JSON settings file
        #[arg(long, value_name = "PATH")]
        pub settings: Option<PathBuf>,

        /// Directory holding the reward icon folder
        #[arg(long, value_name = "DIR", default_value = ".")]
        pub assets: PathBuf,
    }

    impl Args {
        /// Trimmed labels with empties dropped
        pub fn labels(&self) -> Vec<String> {
            self.items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        }
    }

    /// Wall-clock milliseconds since the Unix epoch
    fn unix_ms() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or_default()
    }

    pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
        let items = args.labels();
        let settings = match &args.settings {
            Some(path) => WheelSettings::load_from(path)?,
            None => WheelSettings::load(),
        };
        let seed = args.seed.unwrap_or_else(rand::random);
        log::info!("Seed: {}", seed);

        let mut controller = SpinController::new(&settings, ManualScheduler::new(), seed);
        let mut loader = FsImageLoader::new(args.assets.clone());
        let mut icons = ImageCache::new();
        icons.preload(&items, &mut loader, &settings);

        let mut history = WinnerHistory::new();
        let mut now = 0.0;

        for _ in 0..args.spins {
            let request = controller.request_spin(&items, args.forced.as_deref(), now);
            log::info!("Spin request: {:?}", request);

            while controller.scheduler_mut().take_pending() {
                now += FRAME_MS;
                icons.apply(loader.poll());
                if let Some(winner) = controller.on_frame(now).winner {
                    history.record(&winner, unix_ms());
                }
            }
        }

        if history.is_empty() {
            println!("No winner (empty item list)");
        }
        for (i, entry) in history.entries.iter().enumerate().rev() {
            let ordinal = history.ordinal(i).unwrap_or_default();
            let forced = if entry.forced { " (forced)" } else { "" };
            println!("#{ordinal}: {}{forced}", entry.label);
        }

        if let Some(path) = &args.snapshot {
            // Late icons still make it into the snapshot
            icons.apply(loader.poll());
            let frame = draw_wheel(&items, controller.rotation(), settings.size, &icons);
            let mut img = raster::rasterize(&frame, colors::BACKGROUND);
            raster::draw_icons(&mut img, &frame, &icons);
            img.save(path)?;
            log::info!("Snapshot written to {}", path.display());
        }

        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Spin Wheel (native) starting...");

    let args = <native::Args as clap::Parser>::parse();
    if let Err(e) = native::run(args) {
        log::error!("{}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
