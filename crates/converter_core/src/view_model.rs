use crate::{
    history_view, resolve_service_url, AppState, HistoryRecord, JobStatus, PreviewSlot, SortOrder,
};

/// Terminal banner shown once a job has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteHistoryRow {
    pub id: String,
    pub excel_file: String,
    pub timestamp: String,
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewView {
    #[default]
    Hidden,
    Loading,
    /// "No preview available".
    Unavailable,
    Sheet {
        tabs: Vec<String>,
        active: usize,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status: JobStatus,
    pub status_message: String,
    pub busy: bool,
    pub progress: u8,
    pub elapsed: String,
    pub banner: Option<Banner>,
    pub can_retry: bool,
    pub can_preview_selected: bool,
    pub selected_file: Option<String>,
    pub download_url: Option<String>,
    pub recent: Vec<HistoryRecord>,
    pub remote_history: Vec<RemoteHistoryRow>,
    pub history_loading: bool,
    pub search_term: String,
    pub sort_order: SortOrder,
    pub preview: PreviewView,
    pub dark_mode: bool,
}

impl AppViewModel {
    pub(crate) fn build(state: &AppState) -> Self {
        let upload = &state.upload;
        let elapsed = upload.elapsed_display();
        let banner = match upload.status() {
            JobStatus::Success => Some(Banner::Success(format!(
                "Conversion completed successfully in {elapsed}s. You can upload another file."
            ))),
            JobStatus::Error => Some(Banner::Error(upload.status_message().to_string())),
            JobStatus::Idle | JobStatus::Processing => None,
        };

        let base = upload.service_base();
        let remote_history = history_view(
            &state.remote.entries,
            &state.remote.search_term,
            state.remote.sort_order,
        )
        .into_iter()
        .map(|entry| RemoteHistoryRow {
            download_url: resolve_service_url(
                base,
                &format!("/download/system/{}", entry.system),
            ),
            id: entry.id,
            excel_file: entry.excel_file,
            timestamp: entry.timestamp,
        })
        .collect();

        Self {
            status: upload.status(),
            status_message: upload.status_message().to_string(),
            busy: upload.is_busy(),
            progress: upload.progress(),
            elapsed,
            banner,
            can_retry: upload.can_retry(),
            can_preview_selected: upload.file().is_some() && !upload.is_busy(),
            selected_file: upload.file().map(|file| file.name.clone()),
            download_url: upload.download_url().map(ToOwned::to_owned),
            recent: state.history.records().to_vec(),
            remote_history,
            history_loading: state.remote.loading,
            search_term: state.remote.search_term.clone(),
            sort_order: state.remote.sort_order,
            preview: preview_view(state),
            dark_mode: state.preferences.dark_mode,
        }
    }
}

fn preview_view(state: &AppState) -> PreviewView {
    let panel = &state.preview;
    match panel.slot() {
        PreviewSlot::Hidden => PreviewView::Hidden,
        PreviewSlot::Loading => PreviewView::Loading,
        PreviewSlot::Empty => PreviewView::Unavailable,
        PreviewSlot::Loaded(sheets) => match panel.active() {
            Some(sheet) => PreviewView::Sheet {
                tabs: sheets.iter().map(|sheet| sheet.name.clone()).collect(),
                active: panel.active_sheet(),
                columns: sheet.columns.clone(),
                rows: sheet.rows.clone(),
            },
            None => PreviewView::Unavailable,
        },
    }
}
