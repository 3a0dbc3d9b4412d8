use crate::{AppState, Effect, HistoryCache, Msg, PreviewSource};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        // Both entry points reset first; both are ignored while a job is in flight.
        Msg::FileChosen { file, at_ms } | Msg::FileDropped { file, at_ms } => {
            if state.upload.is_busy() {
                return (state, Vec::new());
            }
            let effects = state.upload.accept(file, at_ms);
            state.mark_dirty();
            effects
        }
        Msg::RetryClicked { at_ms } => {
            let effects = state.upload.retry(at_ms);
            if !effects.is_empty() {
                state.mark_dirty();
            }
            effects
        }
        Msg::ProgressTick { generation } => {
            if state.upload.progress_tick(generation) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ClockTick { generation, now_ms } => {
            if state.upload.clock_tick(generation, now_ms) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::UploadFinished {
            generation,
            outcome,
            completed_at,
            at_ms,
        } => match state.upload.finish(generation, outcome, completed_at, at_ms) {
            Some((mut effects, record)) => {
                if let Some(record) = record {
                    state.history.append(record);
                    effects.push(persist_history(&state.history));
                }
                state.mark_dirty();
                effects
            }
            None => Vec::new(),
        },
        Msg::PreviewFileRequested { file } => {
            state.mark_dirty();
            vec![state.preview.request(PreviewSource::File(file))]
        }
        Msg::PreviewSelectedClicked => {
            let file = match state.upload.file() {
                Some(file) if !state.upload.is_busy() => file.clone(),
                _ => return (state, Vec::new()),
            };
            state.mark_dirty();
            vec![state.preview.request(PreviewSource::File(file))]
        }
        Msg::PreviewHistoryRequested { id } => {
            state.mark_dirty();
            vec![state.preview.request(PreviewSource::History(id))]
        }
        Msg::PreviewFinished {
            request_id,
            outcome,
        } => {
            if state.preview.resolve(request_id, outcome) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SheetSelected(index) => {
            if state.preview.select_sheet(index) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PreviewClosed => {
            if state.preview.close() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RemoteHistoryRequested => {
            if state.remote.loading {
                return (state, Vec::new());
            }
            state.remote.loading = true;
            state.mark_dirty();
            vec![Effect::LoadRemoteHistory]
        }
        Msg::RemoteHistoryLoaded(entries) => {
            state.remote.loading = false;
            // A failed load keeps whatever was shown before.
            if let Some(entries) = entries {
                state.remote.entries = entries;
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::SearchChanged(term) => {
            if state.remote.search_term != term {
                state.remote.search_term = term;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SortOrderChanged(order) => {
            if state.remote.sort_order != order {
                state.remote.sort_order = order;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RestoreHistory(records) => {
            state.history = HistoryCache::restore(records);
            state.mark_dirty();
            Vec::new()
        }
        Msg::RestorePreferences(preferences) => {
            state.preferences = preferences;
            state.mark_dirty();
            Vec::new()
        }
        Msg::DarkModeToggled => {
            state.preferences.dark_mode = !state.preferences.dark_mode;
            state.mark_dirty();
            vec![Effect::PersistPreferences(state.preferences)]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn persist_history(history: &HistoryCache) -> Effect {
    Effect::PersistHistory(history.records().to_vec())
}
