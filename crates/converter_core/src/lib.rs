//! Converter core: pure state machine for the upload/convert workflow,
//! local run history, service history view and spreadsheet preview.
mod effect;
mod history;
mod msg;
mod preview;
mod state;
mod timers;
mod update;
mod upload;
mod view_model;

pub use effect::Effect;
pub use history::{
    history_view, parse_timestamp_ms, HistoryCache, HistoryRecord, RemoteHistoryEntry, SortOrder,
    HISTORY_CAPACITY,
};
pub use msg::Msg;
pub use preview::{PreviewOutcome, PreviewPanel, PreviewSlot, PreviewSource, Sheet};
pub use state::{
    resolve_service_url, AppState, FileHandle, Generation, Preferences, RemoteHistory, RequestId,
};
pub use timers::{
    ElapsedClock, ProgressSimulator, ELAPSED_SAMPLE_INTERVAL, PROGRESS_CEILING, PROGRESS_COMPLETE,
    PROGRESS_TICK_INTERVAL,
};
pub use update::update;
pub use upload::{
    JobStatus, UploadFailure, UploadOrchestrator, UploadOutcome, CANNOT_CONNECT_MESSAGE,
    INVALID_FILE_MESSAGE, PROCESSING_MESSAGE, REQUIRED_EXTENSION, SUCCESS_MESSAGE,
    TEMPLATE_MISMATCH_MESSAGE, UNREADABLE_FILE_MESSAGE,
};
pub use view_model::{AppViewModel, Banner, PreviewView, RemoteHistoryRow};
