use crate::{FileHandle, Generation, HistoryRecord, Preferences, PreviewSource, RequestId};

/// Side effects requested by [`crate::update`]; executed by the app layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the progress and elapsed-time tickers for `generation`.
    StartTimers { generation: Generation },
    StopTimers { generation: Generation },
    /// Send the file to the conversion endpoint.
    Upload {
        generation: Generation,
        file: FileHandle,
    },
    FetchPreview {
        request_id: RequestId,
        source: PreviewSource,
    },
    LoadRemoteHistory,
    /// Write the full local history slot.
    PersistHistory(Vec<HistoryRecord>),
    PersistPreferences(Preferences),
}
