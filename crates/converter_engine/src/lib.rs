//! Converter engine: HTTP calls to the conversion service and local state IO.
mod engine;
mod persist;
mod service;
mod types;

pub use engine::EngineHandle;
pub use persist::{ensure_state_dir, PersistError, StateDir};
pub use service::{ConversionService, ReqwestService, ServiceSettings};
pub use types::{
    cell_text, EngineEvent, FailureKind, HistoryReply, HistoryRow, JobId, PreviewReply,
    PreviewSheet, ServiceError, UploadReply, SUCCESS_STATUS,
};
