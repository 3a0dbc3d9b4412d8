use std::sync::mpsc;

use chrono::Local;
use converter_core::{
    Effect, Msg, PreviewOutcome, PreviewSource, RemoteHistoryEntry, Sheet, UploadOutcome,
};
use converter_engine::{
    EngineEvent, EngineHandle, FailureKind, HistoryReply, PreviewReply, StateDir, UploadReply,
};
use engine_logging::{engine_debug, engine_info, engine_warn};

use super::persistence;
use super::timers::{Clock, Timers};

/// Display format for the completion time stored in local history.
const COMPLETED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Executes core effects against the engine, the tickers and the state slots.
pub struct EffectRunner {
    engine: EngineHandle,
    timers: Timers,
    slots: StateDir,
    clock: Clock,
}

impl EffectRunner {
    pub fn with_engine(
        engine: EngineHandle,
        slots: StateDir,
        clock: Clock,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Self {
        Self {
            engine,
            timers: Timers::new(clock, msg_tx),
            slots,
            clock,
        }
    }

    pub fn slots(&self) -> &StateDir {
        &self.slots
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartTimers { generation } => self.timers.start(generation),
                Effect::StopTimers { generation } => self.timers.stop(generation),
                Effect::Upload { generation, file } => {
                    engine_info!(
                        "Upload generation={} file={} path={:?}",
                        generation,
                        file.name,
                        file.path
                    );
                    self.engine.upload(generation, file.path, file.name);
                }
                Effect::FetchPreview { request_id, source } => match source {
                    PreviewSource::File(file) => {
                        engine_info!("Preview request={} file={}", request_id, file.name);
                        self.engine.preview_file(request_id, file.path, file.name);
                    }
                    PreviewSource::History(id) => {
                        engine_info!("Preview request={} history id={}", request_id, id);
                        self.engine.preview_history(request_id, id);
                    }
                },
                Effect::LoadRemoteHistory => {
                    engine_debug!("Loading service history");
                    self.engine.load_history();
                }
                Effect::PersistHistory(records) => {
                    persistence::save_history(&self.slots, &records);
                }
                Effect::PersistPreferences(preferences) => {
                    persistence::save_preferences(&self.slots, preferences);
                }
            }
        }
    }

    /// Next engine result, already translated into a core message.
    pub fn next_engine_msg(&self) -> Option<Msg> {
        self.engine
            .try_recv()
            .map(|event| map_event(event, self.clock.now_ms()))
    }
}

fn map_event(event: EngineEvent, now_ms: u64) -> Msg {
    match event {
        EngineEvent::UploadCompleted { generation, result } => {
            let outcome = match result {
                Ok(UploadReply::Converted { download_path }) => {
                    UploadOutcome::Converted { download_path }
                }
                Ok(UploadReply::Rejected { status, message }) => {
                    engine_warn!(
                        "Upload {} rejected with status {}: {}",
                        generation,
                        status,
                        message.as_deref().unwrap_or("<no detail>")
                    );
                    UploadOutcome::Rejected {
                        status,
                        detail: message,
                    }
                }
                Err(err) if err.kind == FailureKind::Io => {
                    engine_warn!("Upload {} could not read its file: {}", generation, err);
                    UploadOutcome::Unreadable {
                        reason: err.to_string(),
                    }
                }
                Err(err) => {
                    engine_warn!("Upload {} failed: {}", generation, err);
                    UploadOutcome::Unreachable {
                        reason: err.to_string(),
                    }
                }
            };
            Msg::UploadFinished {
                generation,
                outcome,
                completed_at: Local::now().format(COMPLETED_AT_FORMAT).to_string(),
                at_ms: now_ms,
            }
        }
        EngineEvent::PreviewCompleted { request_id, result } => {
            let outcome = match result {
                Ok(PreviewReply::Sheets(sheets)) => PreviewOutcome::Loaded(
                    sheets
                        .into_iter()
                        .map(|sheet| Sheet {
                            name: sheet.name,
                            columns: sheet.columns,
                            rows: sheet.rows,
                        })
                        .collect(),
                ),
                Ok(PreviewReply::Rejected { status }) => {
                    engine_warn!("Preview {} rejected with status {}", request_id, status);
                    PreviewOutcome::Unavailable {
                        reason: format!("service status {status}"),
                    }
                }
                Err(err) => {
                    engine_warn!("Preview {} failed: {}", request_id, err);
                    PreviewOutcome::Unavailable {
                        reason: err.to_string(),
                    }
                }
            };
            Msg::PreviewFinished {
                request_id,
                outcome,
            }
        }
        EngineEvent::HistoryLoaded { result } => match result {
            Ok(HistoryReply::Entries(rows)) => Msg::RemoteHistoryLoaded(Some(
                rows.into_iter()
                    .map(|row| RemoteHistoryEntry {
                        id: row.id,
                        excel_file: row.excel_file,
                        timestamp: row.timestamp,
                        system: row.system,
                    })
                    .collect(),
            )),
            Ok(HistoryReply::Rejected { status }) => {
                engine_warn!("History load rejected with status {}", status);
                Msg::RemoteHistoryLoaded(None)
            }
            Err(err) => {
                engine_warn!("History load failed: {}", err);
                Msg::RemoteHistoryLoaded(None)
            }
        },
    }
}
