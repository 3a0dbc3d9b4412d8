use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_error, engine_info};

use crate::service::{ConversionService, ReqwestService, ServiceSettings};
use crate::{EngineEvent, JobId};

enum EngineCommand {
    Upload {
        generation: JobId,
        path: PathBuf,
        file_name: String,
    },
    PreviewFile {
        request_id: JobId,
        path: PathBuf,
        file_name: String,
    },
    PreviewHistory {
        request_id: JobId,
        id: String,
    },
    LoadHistory,
}

/// Runs service calls on a background tokio runtime.
///
/// Commands are fire-and-forget; each one produces exactly one
/// [`EngineEvent`]. Nothing is ever aborted: superseded results are still
/// delivered and left for the caller to discard.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ServiceSettings) -> io::Result<Self> {
        Self::with_service(Arc::new(ReqwestService::new(settings)))
    }

    /// Fails when the tokio runtime cannot be created.
    pub fn with_service(service: Arc<dyn ConversionService>) -> io::Result<Self> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let service = service.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(service.as_ref(), command).await;
                    let _ = event_tx.send(event);
                });
            }
            // Let in-flight requests finish so their events still arrive.
            runtime.shutdown_timeout(Duration::from_secs(1));
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn upload(&self, generation: JobId, path: impl Into<PathBuf>, file_name: impl Into<String>) {
        self.send(EngineCommand::Upload {
            generation,
            path: path.into(),
            file_name: file_name.into(),
        });
    }

    pub fn preview_file(
        &self,
        request_id: JobId,
        path: impl Into<PathBuf>,
        file_name: impl Into<String>,
    ) {
        self.send(EngineCommand::PreviewFile {
            request_id,
            path: path.into(),
            file_name: file_name.into(),
        });
    }

    pub fn preview_history(&self, request_id: JobId, id: impl Into<String>) {
        self.send(EngineCommand::PreviewHistory {
            request_id,
            id: id.into(),
        });
    }

    pub fn load_history(&self) {
        self.send(EngineCommand::LoadHistory);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_error!("Engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(service: &dyn ConversionService, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::Upload {
            generation,
            path,
            file_name,
        } => {
            engine_info!("Upload generation={} file={}", generation, file_name);
            let result = service.upload_file(&path, &file_name).await;
            EngineEvent::UploadCompleted { generation, result }
        }
        EngineCommand::PreviewFile {
            request_id,
            path,
            file_name,
        } => {
            engine_info!("Preview request={} file={}", request_id, file_name);
            let result = service.preview_file(&path, &file_name).await;
            EngineEvent::PreviewCompleted { request_id, result }
        }
        EngineCommand::PreviewHistory { request_id, id } => {
            engine_info!("Preview request={} history_id={}", request_id, id);
            let result = service.preview_history(&id).await;
            EngineEvent::PreviewCompleted { request_id, result }
        }
        EngineCommand::LoadHistory => {
            engine_info!("Load remote history");
            let result = service.history().await;
            EngineEvent::HistoryLoaded { result }
        }
    }
}
