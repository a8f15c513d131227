// site_engine: Rust/WASM engine for the studio site.
// All page logic lives here; the JS applier executes the returned plans and
// owns the actual DOM, GSAP, and sessionStorage handles.

mod content;
mod error;
mod markdown;
mod menu;
mod populate;
mod projects;
mod scroll;
mod sync;
mod transition;
mod typewriter;
mod types;

use std::rc::Rc;

use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

pub use content::{fetch_json, parse_frontmatter_markdown, ContentFetcher, JsFetcher};
pub use error::EngineError;
pub use markdown::markdown_to_html;
pub use menu::{MenuController, MenuPlan, MenuToggle};
pub use populate::build_page;
pub use projects::ProjectsStore;
pub use scroll::{
    count_up, ease, hero_entrance, lerp, parallax_offset, Ease, NavbarScroll, NavbarUpdate,
    TweenKind, TweenStep,
};
pub use sync::{JoinGate, JoinSignal};
pub use transition::{TimelineItem, TransitionCoordinator, TransitionPlan, TransitionStep};
pub use typewriter::{Typewriter, TypewriterFrame};
pub use types::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    fn console_log(s: &str);
    #[wasm_bindgen(js_namespace = console, js_name = warn)]
    fn console_warn(s: &str);
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    fn console_error(s: &str);
}

/// Routes the `log` facade to the browser console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let line = format!("{}", record.args());
        match record.level() {
            log::Level::Error => console_error(&line),
            log::Level::Warn => console_warn(&line),
            _ => console_log(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Initialize the panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Shared state behind the async entry points: async methods hand an owned
/// clone of this into their futures so the engine handle itself stays free.
struct EngineInner {
    config: EngineConfig,
    fetcher: Rc<JsFetcher>,
    store: ProjectsStore<JsFetcher>,
}

/// Main engine interface exposed to JavaScript, one instance per page session.
/// Batch interface: requests and plans cross the boundary as JSON strings.
#[wasm_bindgen]
pub struct SiteEngine {
    inner: Rc<EngineInner>,
    coordinator: TransitionCoordinator,
    menu: MenuController,
    navbar: NavbarScroll,
    join_gate: JoinGate,
}

#[wasm_bindgen]
impl SiteEngine {
    /// `fetch` is `(path: string) => Promise<string>`, resolving with the
    /// response body on 2xx and rejecting otherwise.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, fetch: js_sys::Function) -> Result<SiteEngine, JsValue> {
        let config: EngineConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;

        let fetcher = Rc::new(JsFetcher::new(fetch));
        let store = ProjectsStore::new(fetcher.clone(), config.content.clone());
        let coordinator = TransitionCoordinator::new(config.transition);

        Ok(SiteEngine {
            inner: Rc::new(EngineInner {
                config,
                fetcher,
                store,
            }),
            coordinator,
            menu: MenuController::new(),
            navbar: NavbarScroll::default(),
            join_gate: JoinGate::new(),
        })
    }

    /// Populate one page. Resolves with a `PageLoadResult` JSON string: patch
    /// sets in apply order, each with its completion event.
    pub fn load_page(&self, request_json: &str) -> Result<js_sys::Promise, JsValue> {
        let request: PageRequest = serde_json::from_str(request_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid request: {}", e)))?;
        let inner = self.inner.clone();
        Ok(future_to_promise(async move {
            let result = build_page(
                &request,
                &inner.store,
                inner.fetcher.as_ref(),
                &inner.config,
            )
            .await;
            to_js(&result).map(|s| JsValue::from_str(&s))
        }))
    }

    /// Inject the shared loader/navbar/footer partials. `current_page` is the
    /// last path segment of the URL ("" at the site root).
    pub fn load_components(&self, current_page: &str, navbar_light: bool) -> js_sys::Promise {
        let inner = self.inner.clone();
        let current_page = current_page.to_string();
        future_to_promise(async move {
            let set = populate::components(inner.fetcher.as_ref(), &current_page, navbar_light).await;
            to_js(&set).map(|s| JsValue::from_str(&s))
        })
    }

    /// Plan the entry animation for this page load.
    pub fn entry_plan(&mut self, flag_was_set: bool, overlay_present: bool) -> Result<String, JsValue> {
        to_js(&self.coordinator.entry_plan(flag_was_set, overlay_present))
    }

    /// Notify the engine that the entry timeline has fully completed.
    pub fn entry_complete(&mut self) {
        self.coordinator.entry_complete();
    }

    /// Plan the exit animation toward `href`. Returns null while an exit is
    /// already in flight.
    pub fn begin_exit(&mut self, href: &str, overlay_present: bool) -> Result<JsValue, JsValue> {
        match self.coordinator.begin_exit(href, overlay_present) {
            Some(plan) => to_js(&plan).map(|s| JsValue::from_str(&s)),
            None => Ok(JsValue::NULL),
        }
    }

    /// Declarative hero entrance, to run from the entry plan's ready callback.
    pub fn hero_entrance_plan(&self) -> Result<String, JsValue> {
        to_js(&hero_entrance())
    }

    /// Toggle the mobile menu. `{"action":"open","plan":...}` or `{"action":"close"}`.
    pub fn toggle_menu(&mut self) -> Result<String, JsValue> {
        let value = match self.menu.toggle() {
            MenuToggle::Open(plan) => json!({ "action": "open", "plan": plan }),
            MenuToggle::Close => json!({ "action": "close" }),
        };
        to_js(&value)
    }

    /// Whether a tapped menu link should close the menu before navigating.
    pub fn menu_link_tapped(&self, link_is_active: bool) -> bool {
        self.menu.should_close_on_link(link_is_active)
    }

    pub fn menu_is_open(&self) -> bool {
        self.menu.is_open()
    }

    /// One scroll sample. `direction` is 1 down, -1 up, 0 idle; `hero_height`
    /// is negative when the page has no hero to measure against.
    pub fn navbar_scroll(
        &mut self,
        scroll_y: f64,
        direction: i32,
        viewport_width: f64,
        hero_height: f64,
    ) -> Result<String, JsValue> {
        let hero = if hero_height < 0.0 {
            None
        } else {
            Some(hero_height as f32)
        };
        to_js(&self.navbar.on_scroll(scroll_y as f32, direction, viewport_width as f32, hero))
    }

    /// Record that the entry animation finished. True when the item reveal
    /// should start now.
    pub fn loader_complete(&mut self) -> bool {
        self.join_gate.signal(JoinSignal::LoaderComplete)
    }

    /// Record that the page content has been populated. True when the item
    /// reveal should start now.
    pub fn content_loaded(&mut self) -> bool {
        self.join_gate.signal(JoinSignal::ContentLoaded)
    }

    /// Separator parallax yPercent for a scrub progress in 0..1.
    pub fn parallax(&self, progress: f64) -> f64 {
        parallax_offset(progress as f32) as f64
    }

    /// Numbers-section count-up value at a given animation progress.
    pub fn count_up_value(&self, target: f64, progress: f64) -> f64 {
        count_up(target as i64, progress as f32) as f64
    }
}

/// Typewriter machine exposed to the about page's rAF loop.
#[wasm_bindgen]
pub struct WasmTypewriter {
    inner: Typewriter,
}

#[wasm_bindgen]
impl WasmTypewriter {
    /// `words_json` is a JSON string array; `timings_json` may be `{}` for the
    /// defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(words_json: &str, timings_json: &str) -> Result<WasmTypewriter, JsValue> {
        let words: Vec<String> = serde_json::from_str(words_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid words: {}", e)))?;
        let timings: TypewriterTimings = serde_json::from_str(timings_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid timings: {}", e)))?;
        Ok(WasmTypewriter {
            inner: Typewriter::new(words, timings),
        })
    }

    /// Swap in CMS-loaded words; ignored once the cycle has started.
    pub fn set_words(&mut self, words_json: &str) -> Result<(), JsValue> {
        let words: Vec<String> = serde_json::from_str(words_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid words: {}", e)))?;
        self.inner.set_words(words);
        Ok(())
    }

    pub fn start(&mut self, now_ms: f64) {
        self.inner.start(now_ms as u64);
    }

    /// Display state at `now_ms` as a `TypewriterFrame` JSON string.
    pub fn frame(&mut self, now_ms: f64) -> Result<String, JsValue> {
        to_js(&self.inner.frame(now_ms as u64))
    }
}
