use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Upload generation or preview request id, echoed back in [`EngineEvent`]s.
pub type JobId = u64;

/// Status value the service uses for a successful call.
pub const SUCCESS_STATUS: &str = "SUCCESS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UploadCompleted {
        generation: JobId,
        result: Result<UploadReply, ServiceError>,
    },
    PreviewCompleted {
        request_id: JobId,
        result: Result<PreviewReply, ServiceError>,
    },
    HistoryLoaded {
        result: Result<HistoryReply, ServiceError>,
    },
}

/// Interpreted `/upload-file` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadReply {
    /// Service-relative path of the generated JSON.
    Converted { download_path: String },
    Rejected {
        status: String,
        message: Option<String>,
    },
}

/// Interpreted `/preview-excel` or `/preview-history/{id}` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewReply {
    Sheets(Vec<PreviewSheet>),
    Rejected { status: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Interpreted `/history` envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryReply {
    Entries(Vec<HistoryRow>),
    Rejected { status: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: String,
    pub excel_file: String,
    pub timestamp: String,
    pub system: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// The local file could not be read.
    Io,
    Timeout,
    Network,
    /// The body was not the expected JSON envelope.
    InvalidResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Io => write!(f, "file read error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
        }
    }
}

// Wire envelopes, exactly as the service sends them.

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UploadEnvelope {
    pub status: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PreviewEnvelope {
    pub status: String,
    #[serde(default)]
    pub preview: Option<Vec<SheetPayload>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SheetPayload {
    pub sheet_name: String,
    #[serde(default)]
    pub columns: Vec<Value>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HistoryEnvelope {
    pub status: String,
    #[serde(default)]
    pub history: Option<Vec<HistoryPayload>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HistoryPayload {
    pub id: Value,
    pub excel_file: String,
    /// Usually text, occasionally epoch milliseconds.
    #[serde(default)]
    pub timestamp: Value,
    #[serde(default)]
    pub system: Value,
}

impl UploadEnvelope {
    pub(crate) fn interpret(self) -> Result<UploadReply, ServiceError> {
        if self.status != SUCCESS_STATUS {
            return Ok(UploadReply::Rejected {
                status: self.status,
                message: self.message,
            });
        }
        match self.download_url {
            Some(download_path) if !download_path.is_empty() => {
                Ok(UploadReply::Converted { download_path })
            }
            _ => Err(ServiceError::new(
                FailureKind::InvalidResponse,
                "SUCCESS response without download_url",
            )),
        }
    }
}

impl PreviewEnvelope {
    pub(crate) fn interpret(self) -> PreviewReply {
        if self.status != SUCCESS_STATUS {
            return PreviewReply::Rejected {
                status: self.status,
            };
        }
        let sheets = self
            .preview
            .unwrap_or_default()
            .into_iter()
            .map(|sheet| PreviewSheet {
                name: sheet.sheet_name,
                columns: sheet.columns.iter().map(cell_text).collect(),
                rows: sheet
                    .rows
                    .iter()
                    .map(|row| row.iter().map(cell_text).collect())
                    .collect(),
            })
            .collect();
        PreviewReply::Sheets(sheets)
    }
}

impl HistoryEnvelope {
    pub(crate) fn interpret(self) -> HistoryReply {
        if self.status != SUCCESS_STATUS {
            return HistoryReply::Rejected {
                status: self.status,
            };
        }
        let rows = self
            .history
            .unwrap_or_default()
            .into_iter()
            .map(|item| HistoryRow {
                id: cell_text(&item.id),
                excel_file: item.excel_file,
                timestamp: cell_text(&item.timestamp),
                system: cell_text(&item.system),
            })
            .collect();
        HistoryReply::Entries(rows)
    }
}

/// Renders a JSON scalar the way a table cell shows it.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cells_render_as_plain_text() {
        assert_eq!(cell_text(&json!("abc")), "abc");
        assert_eq!(cell_text(&json!(null)), "");
        assert_eq!(cell_text(&json!(3.5)), "3.5");
        assert_eq!(cell_text(&json!(true)), "true");
    }

    #[test]
    fn success_without_download_url_is_invalid() {
        let envelope: UploadEnvelope = serde_json::from_value(json!({"status": "SUCCESS"})).unwrap();
        let err = envelope.interpret().unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidResponse);
    }

    #[test]
    fn rejection_keeps_service_message() {
        let envelope: UploadEnvelope =
            serde_json::from_value(json!({"status": "FAILED", "message": "bad template"}))
                .unwrap();
        assert_eq!(
            envelope.interpret().unwrap(),
            UploadReply::Rejected {
                status: "FAILED".to_string(),
                message: Some("bad template".to_string()),
            }
        );
    }

    #[test]
    fn history_ids_may_be_numbers() {
        let envelope: HistoryEnvelope = serde_json::from_value(json!({
            "status": "SUCCESS",
            "history": [{"id": 12, "excel_file": "a.xlsx", "timestamp": "2024-01-01", "system": "k1"}]
        }))
        .unwrap();
        assert_eq!(
            envelope.interpret(),
            HistoryReply::Entries(vec![HistoryRow {
                id: "12".to_string(),
                excel_file: "a.xlsx".to_string(),
                timestamp: "2024-01-01".to_string(),
                system: "k1".to_string(),
            }])
        );
    }

    #[test]
    fn numeric_timestamps_keep_the_envelope() {
        let envelope: HistoryEnvelope = serde_json::from_value(json!({
            "status": "SUCCESS",
            "history": [
                {"id": "7", "excel_file": "a.xlsx", "timestamp": 1714555800000_i64, "system": "k1"},
                {"id": "8", "excel_file": "b.xlsx", "timestamp": "2024-05-02T09:30:00", "system": "k2"}
            ]
        }))
        .unwrap();
        let HistoryReply::Entries(rows) = envelope.interpret() else {
            panic!("expected entries");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp, "1714555800000");
        assert_eq!(rows[1].timestamp, "2024-05-02T09:30:00");
    }
}
