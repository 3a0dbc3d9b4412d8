#![allow(dead_code)]

use std::sync::Once;

use converter_core::{update, AppState, Effect, FileHandle, Msg};
use url::Url;

pub const SERVICE_BASE: &str = "http://172.30.94.131:8000";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

pub fn new_state() -> AppState {
    AppState::new(Url::parse(SERVICE_BASE).unwrap())
}

pub fn file(name: &str) -> FileHandle {
    FileHandle::new(name, format!("/tmp/uploads/{name}"))
}

/// Applies messages in order, collecting every effect.
pub fn apply(state: AppState, msgs: impl IntoIterator<Item = Msg>) -> (AppState, Vec<Effect>) {
    msgs.into_iter()
        .fold((state, Vec::new()), |(state, mut all), msg| {
            let (state, effects) = update(state, msg);
            all.extend(effects);
            (state, all)
        })
}

pub fn upload_generation(effects: &[Effect]) -> Option<u64> {
    effects.iter().find_map(|effect| match effect {
        Effect::Upload { generation, .. } => Some(*generation),
        _ => None,
    })
}

pub fn upload_count(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::Upload { .. }))
        .count()
}
