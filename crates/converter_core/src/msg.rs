use crate::{
    FileHandle, Generation, HistoryRecord, Preferences, PreviewOutcome, RemoteHistoryEntry,
    RequestId, SortOrder, UploadOutcome,
};

/// Timestamps (`at_ms`, `now_ms`) are milliseconds on the app's monotonic clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a file with the chooser.
    FileChosen { file: FileHandle, at_ms: u64 },
    /// User dropped a file on the drop zone.
    FileDropped { file: FileHandle, at_ms: u64 },
    /// User asked to replay the last file after a failure.
    RetryClicked { at_ms: u64 },
    /// Progress simulator tick.
    ProgressTick { generation: Generation },
    /// Elapsed clock sample.
    ClockTick { generation: Generation, now_ms: u64 },
    /// Engine reported the upload result.
    UploadFinished {
        generation: Generation,
        outcome: UploadOutcome,
        /// Display timestamp recorded in history on success.
        completed_at: String,
        at_ms: u64,
    },
    /// Preview an arbitrary local file.
    PreviewFileRequested { file: FileHandle },
    /// Preview the file of the current job, when one is known and idle.
    PreviewSelectedClicked,
    /// Preview a run from the service history.
    PreviewHistoryRequested { id: String },
    /// Engine reported a preview result.
    PreviewFinished {
        request_id: RequestId,
        outcome: PreviewOutcome,
    },
    SheetSelected(usize),
    PreviewClosed,
    /// Ask the service for its history list.
    RemoteHistoryRequested,
    /// `None` when the history could not be loaded.
    RemoteHistoryLoaded(Option<Vec<RemoteHistoryEntry>>),
    SearchChanged(String),
    SortOrderChanged(SortOrder),
    /// Restore the local history slot at start-up.
    RestoreHistory(Vec<HistoryRecord>),
    /// Restore display preferences at start-up.
    RestorePreferences(Preferences),
    DarkModeToggled,
    /// Fallback for placeholder wiring.
    NoOp,
}
