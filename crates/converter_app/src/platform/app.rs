use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use converter_core::{update, AppState, AppViewModel, Msg};
use converter_engine::{EngineHandle, ServiceSettings, StateDir};
use engine_logging::{engine_error, engine_trace};
use url::Url;

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::persistence;
use super::timers::Clock;

/// How long one pump waits for a ticker message before polling the engine again.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Slack on top of the request timeout before a wait is abandoned.
const REPLY_GRACE: Duration = Duration::from_secs(2);

/// Owns the core state and feeds it messages from the tickers and the engine.
pub struct Session {
    state: AppState,
    service_base: Url,
    effects: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    clock: Clock,
    /// Longest a single `run_until` may wait for the engine.
    wait_limit: Duration,
}

impl Session {
    pub fn start(config: &AppConfig) -> Result<Self> {
        let settings = ServiceSettings {
            request_timeout: config.request_timeout,
            ..ServiceSettings::new(config.service_base.clone())
        };
        let engine = EngineHandle::new(settings).context("cannot start the network runtime")?;
        Ok(Self::with_engine(config, engine))
    }

    pub fn with_engine(config: &AppConfig, engine: EngineHandle) -> Self {
        let clock = Clock::start();
        let (msg_tx, msg_rx) = mpsc::channel();
        let effects =
            EffectRunner::with_engine(engine, StateDir::new(&config.state_dir), clock, msg_tx);

        Self {
            state: AppState::new(config.service_base.clone()),
            service_base: config.service_base.clone(),
            effects,
            msg_rx,
            clock,
            wait_limit: config.request_timeout + REPLY_GRACE,
        }
    }

    /// Loads the local history and preference slots.
    pub fn restore(&mut self) {
        let records = persistence::load_history(self.effects.slots());
        let preferences = persistence::load_preferences(self.effects.slots());
        self.dispatch(Msg::RestoreHistory(records));
        self.dispatch(Msg::RestorePreferences(preferences));
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Applies one message and runs its effects. Returns whether the view changed.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        engine_trace!("dispatch {:?}", msg);
        let placeholder = AppState::new(self.service_base.clone());
        let state = std::mem::replace(&mut self.state, placeholder);
        let (mut state, effects) = update(state, msg);
        self.effects.run(effects);
        let dirty = state.consume_dirty();
        self.state = state;
        dirty
    }

    /// Pumps messages until `done` holds for the current view, calling
    /// `on_change` after every batch that changed it.
    ///
    /// Gives up once the engine has been silent past the request timeout,
    /// which only happens when its worker is gone.
    pub fn run_until(
        &mut self,
        mut done: impl FnMut(&AppViewModel) -> bool,
        mut on_change: impl FnMut(&AppViewModel),
    ) -> Result<AppViewModel> {
        let deadline = Instant::now() + self.wait_limit;
        let mut view = self.view();
        loop {
            if done(&view) {
                return Ok(view);
            }
            if Instant::now() >= deadline {
                engine_error!("No engine reply within {:?}", self.wait_limit);
                bail!(
                    "no reply from the conversion engine within {:?}",
                    self.wait_limit
                );
            }
            if self.pump() {
                view = self.view();
                on_change(&view);
            }
        }
    }

    fn pump(&mut self) -> bool {
        let mut dirty = false;
        while let Some(msg) = self.effects.next_engine_msg() {
            dirty |= self.dispatch(msg);
        }
        if let Ok(msg) = self.msg_rx.recv_timeout(POLL_INTERVAL) {
            dirty |= self.dispatch(msg);
            while let Ok(msg) = self.msg_rx.try_recv() {
                dirty |= self.dispatch(msg);
            }
        }
        dirty
    }
}
