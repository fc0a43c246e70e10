//! Round lifecycle and notifications
//!
//! `GameEngine` owns the simulation state and forwards its events to
//! consumer callbacks. The browser calls `frame` and `timer_tick` from its
//! own schedulers; tests and the native demo use `step` instead.

use crate::consts::TIMER_INTERVAL_MS;
use crate::input::GestureCommand;
use crate::sim::{self, GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;
use crate::Viewport;

/// Notification callback taking a score or a number of seconds
pub type Listener = Box<dyn FnMut(u32)>;

/// Consumer-supplied notification callbacks
#[derive(Default)]
pub struct Listeners {
    pub on_score_update: Option<Listener>,
    pub on_time_update: Option<Listener>,
    pub on_game_over: Option<Listener>,
}

pub struct GameEngine {
    state: GameState,
    listeners: Listeners,
    /// Virtual clock for `step`
    clock_ms: f64,
    /// Time accumulated toward the next countdown tick in `step`
    timer_accum_ms: f64,
}

impl GameEngine {
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        Self {
            state: GameState::new(seed, viewport, tuning),
            listeners: Listeners::default(),
            clock_ms: 0.0,
            timer_accum_ms: 0.0,
        }
    }

    pub fn set_on_score_update(&mut self, f: impl FnMut(u32) + 'static) {
        self.listeners.on_score_update = Some(Box::new(f));
    }

    pub fn set_on_time_update(&mut self, f: impl FnMut(u32) + 'static) {
        self.listeners.on_time_update = Some(Box::new(f));
    }

    pub fn set_on_game_over(&mut self, f: impl FnMut(u32) + 'static) {
        self.listeners.on_game_over = Some(Box::new(f));
    }

    /// Begin a fresh round
    pub fn start(&mut self) {
        self.state.start_round();
        self.timer_accum_ms = 0.0;
        log::info!(
            "Round started ({}s, seed {})",
            self.state.time_left,
            self.state.seed
        );
        self.dispatch();
    }

    /// Return to Ready; the frame loop and countdown should be cancelled by the caller
    pub fn stop(&mut self) {
        if self.state.phase != GamePhase::Ready {
            log::info!("Stopped with score {}", self.state.score);
        }
        self.state.stop_round();
        self.dispatch();
    }

    pub fn restart(&mut self) {
        self.stop();
        self.start();
    }

    /// Apply a command by name. Unknown names and calls outside a round are ignored.
    pub fn input_command(&mut self, command: &str) -> bool {
        match GestureCommand::parse(command) {
            Some(cmd) => self.input(cmd),
            None => {
                log::debug!("Ignoring unknown command {:?}", command);
                false
            }
        }
    }

    pub fn input(&mut self, command: GestureCommand) -> bool {
        let applied = sim::apply_command(&mut self.state, command);
        if !applied {
            log::debug!("Ignoring {} while {:?}", command, self.state.phase);
        }
        applied
    }

    /// Run one animation frame at timestamp `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        sim::frame(&mut self.state, now_ms);
        self.dispatch();
    }

    /// Run one countdown tick
    pub fn timer_tick(&mut self) {
        sim::countdown(&mut self.state);
        self.dispatch();
    }

    /// Advance both schedulers by `elapsed_ms` on the engine's virtual clock
    pub fn step(&mut self, elapsed_ms: f64) {
        self.clock_ms += elapsed_ms;
        self.frame(self.clock_ms);

        if self.state.phase == GamePhase::Playing {
            self.timer_accum_ms += elapsed_ms;
            while self.timer_accum_ms >= TIMER_INTERVAL_MS
                && self.state.phase == GamePhase::Playing
            {
                self.timer_accum_ms -= TIMER_INTERVAL_MS;
                self.timer_tick();
            }
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        log::debug!("Resized to {}x{}", viewport.width, viewport.height);
        self.state.resize(viewport);
    }

    /// Whether the frame loop should schedule another frame
    pub fn wants_frames(&self) -> bool {
        self.state.phase != GamePhase::Ready
    }

    /// Whether the countdown interval should keep running
    pub fn wants_timer(&self) -> bool {
        self.state.phase == GamePhase::Playing
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn time_left(&self) -> u32 {
        self.state.time_left
    }

    fn dispatch(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::ScoreChanged { score } => {
                    if let Some(f) = self.listeners.on_score_update.as_mut() {
                        f(score);
                    }
                }
                GameEvent::TimeChanged { seconds_left } => {
                    if let Some(f) = self.listeners.on_time_update.as_mut() {
                        f(seconds_left);
                    }
                }
                GameEvent::GameOver { final_score } => {
                    log::info!("Game over, final score {}", final_score);
                    if let Some(f) = self.listeners.on_game_over.as_mut() {
                        f(final_score);
                    }
                }
                GameEvent::LevelUp { .. } => {}
            }
        }
    }
}
