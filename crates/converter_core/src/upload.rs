use url::Url;

use crate::timers::{ElapsedClock, ProgressSimulator};
use crate::{resolve_service_url, Effect, FileHandle, Generation, HistoryRecord};

pub const REQUIRED_EXTENSION: &str = ".xlsx";

pub const INVALID_FILE_MESSAGE: &str = "Please upload a .xlsx file";
pub const PROCESSING_MESSAGE: &str = "Processing Excel file…";
pub const SUCCESS_MESSAGE: &str = "Conversion completed successfully";
pub const TEMPLATE_MISMATCH_MESSAGE: &str = "The Excel file does not match the expected template.\n\
Please verify the file format and try again.";
pub const CANNOT_CONNECT_MESSAGE: &str = "Cannot connect to the server. Please try again later.";
pub const UNREADABLE_FILE_MESSAGE: &str = "The selected file could not be read.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Idle,
    Processing,
    Success,
    Error,
}

/// Why an upload ended in [`JobStatus::Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFailure {
    /// Wrong file type; no request was made.
    Validation,
    /// The service could not be reached or answered with something unreadable.
    Transport { reason: String },
    /// The local file could not be read; nothing reached the service.
    Unreadable { reason: String },
    /// The service answered with a non-success status. `detail` is the
    /// service's own message; it is kept for diagnostics and never shown.
    ServiceRejection { detail: Option<String> },
}

impl UploadFailure {
    pub fn user_message(&self) -> &'static str {
        match self {
            UploadFailure::Validation => INVALID_FILE_MESSAGE,
            UploadFailure::Transport { .. } => CANNOT_CONNECT_MESSAGE,
            UploadFailure::Unreadable { .. } => UNREADABLE_FILE_MESSAGE,
            UploadFailure::ServiceRejection { .. } => TEMPLATE_MISMATCH_MESSAGE,
        }
    }
}

/// What the IO layer observed for one upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// `status == "SUCCESS"`; the path is relative to the service base.
    Converted { download_path: String },
    Rejected {
        status: String,
        detail: Option<String>,
    },
    Unreachable { reason: String },
    /// The file could not be read before sending.
    Unreadable { reason: String },
}

/// Owns the single upload job: `Idle -> Processing -> {Success, Error}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOrchestrator {
    service_base: Url,
    generation: Generation,
    status: JobStatus,
    file: Option<FileHandle>,
    started_at_ms: Option<u64>,
    progress: ProgressSimulator,
    clock: ElapsedClock,
    failure: Option<UploadFailure>,
    download_url: Option<String>,
}

impl UploadOrchestrator {
    pub fn new(service_base: Url) -> Self {
        Self {
            service_base,
            generation: 0,
            status: JobStatus::Idle,
            file: None,
            started_at_ms: None,
            progress: ProgressSimulator::default(),
            clock: ElapsedClock::default(),
            failure: None,
            download_url: None,
        }
    }

    /// Accepts a newly selected or dropped file.
    ///
    /// Ignored while a job is in flight. Otherwise the previous job is reset
    /// first, then the file is validated and, if acceptable, uploaded.
    pub fn accept(&mut self, file: FileHandle, now_ms: u64) -> Vec<Effect> {
        if self.is_busy() {
            return Vec::new();
        }
        let mut effects = self.reset();

        if !file.name.ends_with(REQUIRED_EXTENSION) {
            self.status = JobStatus::Error;
            self.failure = Some(UploadFailure::Validation);
            return effects;
        }

        self.generation += 1;
        let generation = self.generation;
        self.status = JobStatus::Processing;
        self.started_at_ms = Some(now_ms);
        self.progress.start(generation);
        self.clock.start(generation, now_ms);
        self.file = Some(file.clone());

        effects.push(Effect::StartTimers { generation });
        effects.push(Effect::Upload { generation, file });
        effects
    }

    /// Replays the last accepted file. No-op without a file, while busy, or
    /// when the file itself could not be read.
    pub fn retry(&mut self, now_ms: u64) -> Vec<Effect> {
        if self.is_busy() || matches!(self.failure, Some(UploadFailure::Unreadable { .. })) {
            return Vec::new();
        }
        let Some(file) = self.file.clone() else {
            return Vec::new();
        };
        let mut effects = self.reset();
        effects.extend(self.accept(file, now_ms));
        effects
    }

    pub fn progress_tick(&mut self, generation: Generation) -> bool {
        self.status == JobStatus::Processing && self.progress.tick(generation)
    }

    pub fn clock_tick(&mut self, generation: Generation, now_ms: u64) -> bool {
        self.status == JobStatus::Processing && self.clock.sample(generation, now_ms)
    }

    /// Applies the upload result for `generation`.
    ///
    /// Returns `None` when the result belongs to a superseded job. On success
    /// the second element carries the history record to append.
    pub fn finish(
        &mut self,
        generation: Generation,
        outcome: UploadOutcome,
        completed_at: String,
        now_ms: u64,
    ) -> Option<(Vec<Effect>, Option<HistoryRecord>)> {
        if generation != self.generation || self.status != JobStatus::Processing {
            return None;
        }

        self.clock.sample(generation, now_ms);
        let effects = self.stop_timers();

        let record = match outcome {
            UploadOutcome::Converted { download_path } => {
                self.progress.complete();
                self.status = JobStatus::Success;
                let download_url = resolve_service_url(&self.service_base, &download_path);
                self.download_url = Some(download_url.clone());
                self.file.as_ref().map(|file| HistoryRecord {
                    source_file_name: file.name.clone(),
                    completed_at,
                    download_url,
                })
            }
            UploadOutcome::Rejected { detail, .. } => {
                self.fail(UploadFailure::ServiceRejection { detail });
                None
            }
            UploadOutcome::Unreachable { reason } => {
                self.fail(UploadFailure::Transport { reason });
                None
            }
            UploadOutcome::Unreadable { reason } => {
                self.fail(UploadFailure::Unreadable { reason });
                None
            }
        };
        Some((effects, record))
    }

    fn fail(&mut self, failure: UploadFailure) {
        self.progress.reset();
        self.status = JobStatus::Error;
        self.failure = Some(failure);
    }

    /// Returns the job to `Idle`, stopping any timers still running.
    fn reset(&mut self) -> Vec<Effect> {
        let effects = self.stop_timers();
        self.status = JobStatus::Idle;
        self.file = None;
        self.started_at_ms = None;
        self.progress.reset();
        self.failure = None;
        self.download_url = None;
        effects
    }

    fn stop_timers(&mut self) -> Vec<Effect> {
        let running = self
            .progress
            .running_generation()
            .or(self.clock.running_generation());
        self.progress.stop();
        self.clock.stop();
        running
            .map(|generation| vec![Effect::StopTimers { generation }])
            .unwrap_or_default()
    }

    pub fn is_busy(&self) -> bool {
        self.status == JobStatus::Processing
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn file(&self) -> Option<&FileHandle> {
        self.file.as_ref()
    }

    pub fn started_at_ms(&self) -> Option<u64> {
        self.started_at_ms
    }

    pub fn progress(&self) -> u8 {
        self.progress.percent()
    }

    pub fn elapsed_display(&self) -> String {
        self.clock.display()
    }

    pub fn failure(&self) -> Option<&UploadFailure> {
        self.failure.as_ref()
    }

    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    pub fn service_base(&self) -> &Url {
        &self.service_base
    }

    pub fn status_message(&self) -> &'static str {
        match self.status {
            JobStatus::Idle => "",
            JobStatus::Processing => PROCESSING_MESSAGE,
            JobStatus::Success => SUCCESS_MESSAGE,
            JobStatus::Error => self
                .failure
                .as_ref()
                .map(UploadFailure::user_message)
                .unwrap_or(CANNOT_CONNECT_MESSAGE),
        }
    }

    /// Retry needs a remembered file and an idle pipe. A file that could
    /// not be read is not offered again.
    pub fn can_retry(&self) -> bool {
        self.status == JobStatus::Error
            && self.file.is_some()
            && !matches!(self.failure, Some(UploadFailure::Unreadable { .. }))
    }
}
