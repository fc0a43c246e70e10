//! Browser runtime
//!
//! `FruitCatch` is the application context handed to the page script. It owns
//! the engine, the requestAnimationFrame loop, the countdown interval and the
//! window listeners. Everything runs on the main thread; shared state sits in
//! `Rc<RefCell<..>>` and scheduler closures hold only weak references.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, EventTarget, HtmlCanvasElement, KeyboardEvent, Window};

use crate::consts::TIMER_INTERVAL_MS;
use crate::engine::GameEngine;
use crate::input::GestureCommand;
use crate::renderer::{CanvasPainter, build_frame};
use crate::settings::Settings;
use crate::sim::{GamePhase, suggest_command};
use crate::Viewport;

/// A notification waiting to be delivered to JS
#[derive(Debug, Clone, Copy)]
enum Notice {
    Score(u32),
    Time(u32),
    GameOver(u32),
}

/// Page-supplied callbacks
#[derive(Default, Clone)]
struct JsCallbacks {
    on_score_update: Option<js_sys::Function>,
    on_time_update: Option<js_sys::Function>,
    on_game_over: Option<js_sys::Function>,
}

impl JsCallbacks {
    fn deliver(&self, notices: Vec<Notice>) {
        for notice in notices {
            let (callback, value) = match notice {
                Notice::Score(v) => (&self.on_score_update, v),
                Notice::Time(v) => (&self.on_time_update, v),
                Notice::GameOver(v) => (&self.on_game_over, v),
            };
            if let Some(f) = callback {
                if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from(value)) {
                    log::warn!("Callback for {:?} threw: {:?}", notice, e);
                }
            }
        }
    }
}

struct Runtime {
    window: Window,
    canvas: HtmlCanvasElement,
    painter: CanvasPainter,
    engine: GameEngine,
    settings: Settings,
    idle_mode: bool,
    animation_id: Option<i32>,
    interval_id: Option<i32>,
}

impl Runtime {
    /// Size the canvas to its container and relayout the basket
    fn fit_to_parent(&mut self) {
        let (w, h) = match self.canvas.parent_element() {
            Some(parent) => (parent.client_width(), parent.client_height()),
            None => (self.canvas.client_width(), self.canvas.client_height()),
        };
        let (w, h) = (w.max(0), h.max(0));
        self.canvas.set_width(w as u32);
        self.canvas.set_height(h as u32);
        self.engine.resize(Viewport::new(w as f32, h as f32));
    }

    fn paint(&self) {
        self.painter
            .paint(&build_frame(self.engine.state(), &self.settings));
    }

    /// Returns whether another frame should be scheduled
    fn on_frame(&mut self, now: f64) -> bool {
        if self.idle_mode {
            if let Some(cmd) = suggest_command(self.engine.state()) {
                self.engine.input(cmd);
            }
        }
        self.engine.frame(now);
        self.paint();
        self.release_timer_if_done();
        self.engine.wants_frames()
    }

    fn on_timer(&mut self) {
        self.engine.timer_tick();
        self.release_timer_if_done();
    }

    /// Switch the autopilot and remember the choice for the next visit
    fn set_idle_mode(&mut self, enabled: bool) {
        self.idle_mode = enabled;
        self.settings.idle_mode = enabled;
        self.settings.save();
        log::info!("Idle mode: {}", enabled);
    }

    fn release_timer_if_done(&mut self) {
        if !self.engine.wants_timer() {
            if let Some(id) = self.interval_id.take() {
                self.window.clear_interval_with_handle(id);
            }
        }
    }

    fn cancel_schedulers(&mut self) {
        if let Some(id) = self.animation_id.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
        if let Some(id) = self.interval_id.take() {
            self.window.clear_interval_with_handle(id);
        }
    }
}

struct Shared {
    runtime: RefCell<Runtime>,
    pending: Rc<RefCell<Vec<Notice>>>,
    callbacks: RefCell<JsCallbacks>,
    frame_cb: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    timer_cb: RefCell<Option<Closure<dyn FnMut()>>>,
}

/// Deliver queued notifications. Must be called with the runtime unborrowed
/// so callbacks can call back into the app.
fn flush(shared: &Shared) {
    let notices = std::mem::take(&mut *shared.pending.borrow_mut());
    if notices.is_empty() {
        return;
    }
    let callbacks = shared.callbacks.borrow().clone();
    callbacks.deliver(notices);
}

fn schedule_frame(shared: &Shared) {
    let frame_cb = shared.frame_cb.borrow();
    let Some(cb) = frame_cb.as_ref() else {
        return;
    };
    let mut rt = shared.runtime.borrow_mut();
    if rt.animation_id.is_some() || !rt.engine.wants_frames() {
        return;
    }
    match rt.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
        Ok(id) => rt.animation_id = Some(id),
        Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
    }
}

fn start_timer(shared: &Shared) {
    let timer_cb = shared.timer_cb.borrow();
    let Some(cb) = timer_cb.as_ref() else {
        return;
    };
    let mut rt = shared.runtime.borrow_mut();
    if let Some(id) = rt.interval_id.take() {
        rt.window.clear_interval_with_handle(id);
    }
    match rt.window.set_interval_with_callback_and_timeout_and_arguments_0(
        cb.as_ref().unchecked_ref(),
        TIMER_INTERVAL_MS as i32,
    ) {
        Ok(id) => rt.interval_id = Some(id),
        Err(e) => log::error!("setInterval failed: {:?}", e),
    }
}

fn start_round(shared: &Shared) {
    {
        let mut rt = shared.runtime.borrow_mut();
        rt.cancel_schedulers();
        rt.engine.start();
    }
    flush(shared);
    schedule_frame(shared);
    start_timer(shared);
}

fn stop_round(shared: &Shared) {
    {
        let mut rt = shared.runtime.borrow_mut();
        rt.engine.stop();
        rt.cancel_schedulers();
    }
    flush(shared);
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        log::debug!("Logger already initialized: {}", e);
    }
}

type Listener = (EventTarget, &'static str, Closure<dyn FnMut(web_sys::Event)>);

/// The game as seen from the page
#[wasm_bindgen]
pub struct FruitCatch {
    shared: Rc<Shared>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl FruitCatch {
    /// Attach to the canvas with the given element id
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<FruitCatch, JsValue> {
        init_logging();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{}", canvas_id)))?
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("#{} is not a canvas", canvas_id)))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("unexpected context type"))?;

        let settings = Settings::load();
        let seed = super::clock_seed();
        let viewport = Viewport::new(canvas.width() as f32, canvas.height() as f32);
        let mut engine = GameEngine::new(seed, viewport, settings.tuning.clone());

        let pending = Rc::new(RefCell::new(Vec::new()));
        let q = pending.clone();
        engine.set_on_score_update(move |s| q.borrow_mut().push(Notice::Score(s)));
        let q = pending.clone();
        engine.set_on_time_update(move |t| q.borrow_mut().push(Notice::Time(t)));
        let q = pending.clone();
        engine.set_on_game_over(move |s| q.borrow_mut().push(Notice::GameOver(s)));

        let runtime = Runtime {
            window,
            canvas,
            painter: CanvasPainter::new(ctx),
            engine,
            idle_mode: settings.idle_mode,
            settings,
            animation_id: None,
            interval_id: None,
        };

        let shared = Rc::new(Shared {
            runtime: RefCell::new(runtime),
            pending,
            callbacks: RefCell::new(JsCallbacks::default()),
            frame_cb: RefCell::new(None),
            timer_cb: RefCell::new(None),
        });

        let weak = Rc::downgrade(&shared);
        *shared.frame_cb.borrow_mut() = Some(Closure::new(move |now: f64| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let again = {
                let mut rt = shared.runtime.borrow_mut();
                rt.animation_id = None;
                rt.on_frame(now)
            };
            flush(&shared);
            if again {
                schedule_frame(&shared);
            }
        }));

        let weak = Rc::downgrade(&shared);
        *shared.timer_cb.borrow_mut() = Some(Closure::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            shared.runtime.borrow_mut().on_timer();
            flush(&shared);
        }));

        log::info!("Fruit Catch ready (seed {})", seed);

        Ok(FruitCatch {
            shared,
            listeners: Vec::new(),
        })
    }

    /// Size the canvas, hook resize and keyboard, and paint an idle frame
    pub fn init(&mut self) -> Result<(), JsValue> {
        if !self.listeners.is_empty() {
            return Ok(());
        }

        let window = self.shared.runtime.borrow().window.clone();
        {
            let mut rt = self.shared.runtime.borrow_mut();
            rt.fit_to_parent();
            rt.paint();
        }

        let weak = Rc::downgrade(&self.shared);
        let on_resize = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(shared) = weak.upgrade() {
                let mut rt = shared.runtime.borrow_mut();
                rt.fit_to_parent();
                rt.paint();
            }
        });
        self.listen(&window, "resize", on_resize)?;

        let weak = Rc::downgrade(&self.shared);
        let on_key = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let (Some(shared), Some(key)) = (weak.upgrade(), event.dyn_ref::<KeyboardEvent>())
            else {
                return;
            };
            handle_key(&shared, &key.code());
        });
        self.listen(&window, "keydown", on_key)?;

        log::info!("Initialized");
        Ok(())
    }

    pub fn start(&self) {
        start_round(&self.shared);
    }

    pub fn stop(&self) {
        stop_round(&self.shared);
    }

    pub fn restart(&self) {
        stop_round(&self.shared);
        start_round(&self.shared);
    }

    /// Apply "Left", "Center" or "Right"; anything else is ignored
    pub fn input_command(&self, command: &str) -> bool {
        self.shared
            .runtime
            .borrow_mut()
            .engine
            .input_command(command)
    }

    /// Apply a raw class label from the pose model
    pub fn input_pose_label(&self, label: &str) -> bool {
        match GestureCommand::from_pose_label(label) {
            Some(cmd) => self.shared.runtime.borrow_mut().engine.input(cmd),
            None => {
                log::debug!("Unmapped pose label {:?}", label);
                false
            }
        }
    }

    pub fn set_on_score_update(&self, f: js_sys::Function) {
        self.shared.callbacks.borrow_mut().on_score_update = Some(f);
    }

    pub fn set_on_time_update(&self, f: js_sys::Function) {
        self.shared.callbacks.borrow_mut().on_time_update = Some(f);
    }

    pub fn set_on_game_over(&self, f: js_sys::Function) {
        self.shared.callbacks.borrow_mut().on_game_over = Some(f);
    }

    pub fn set_idle_mode(&self, enabled: bool) {
        self.shared.runtime.borrow_mut().set_idle_mode(enabled);
    }

    pub fn idle_mode(&self) -> bool {
        self.shared.runtime.borrow().idle_mode
    }

    /// 0 = ready, 1 = playing, 2 = game over
    pub fn state(&self) -> u8 {
        match self.shared.runtime.borrow().engine.phase() {
            GamePhase::Ready => 0,
            GamePhase::Playing => 1,
            GamePhase::GameOver => 2,
        }
    }

    pub fn score(&self) -> u32 {
        self.shared.runtime.borrow().engine.score()
    }

    pub fn level(&self) -> u32 {
        self.shared.runtime.borrow().engine.level()
    }

    pub fn time_left(&self) -> u32 {
        self.shared.runtime.borrow().engine.time_left()
    }

    /// Stop the game and detach every listener
    pub fn dispose(&mut self) {
        self.teardown();
    }
}

impl FruitCatch {
    fn listen(
        &mut self,
        target: &Window,
        kind: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    ) -> Result<(), JsValue> {
        let target = EventTarget::from(target.clone());
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        self.listeners.push((target, kind, closure));
        Ok(())
    }

    fn teardown(&mut self) {
        stop_round(&self.shared);
        for (target, kind, closure) in self.listeners.drain(..) {
            if let Err(e) =
                target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            {
                log::warn!("Failed to remove {} listener: {:?}", kind, e);
            }
        }
    }
}

impl Drop for FruitCatch {
    fn drop(&mut self) {
        self.teardown();
        self.shared.frame_cb.borrow_mut().take();
        self.shared.timer_cb.borrow_mut().take();
    }
}

fn handle_key(shared: &Rc<Shared>, code: &str) {
    match code {
        "Space" | "Enter" => {
            let over = shared.runtime.borrow().engine.phase() == GamePhase::GameOver;
            if over {
                stop_round(shared);
                start_round(shared);
            }
        }
        "KeyI" => {
            let mut rt = shared.runtime.borrow_mut();
            let enabled = !rt.idle_mode;
            rt.set_idle_mode(enabled);
        }
        _ => {}
    }
}
