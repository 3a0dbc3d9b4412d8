use std::path::{Path, PathBuf};

use url::Url;

use crate::view_model::AppViewModel;
use crate::{HistoryCache, PreviewPanel, RemoteHistoryEntry, SortOrder, UploadOrchestrator};

/// Identifies one upload job; timer and network callbacks carry it.
pub type Generation = u64;
/// Identifies one preview request.
pub type RequestId = u64;

/// A file chosen by the user. `name` is what validation and history see;
/// `path` is where the engine reads the bytes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub path: PathBuf,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Uses the final path component as the display name.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(name, path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub dark_mode: bool,
}

/// Service-side history plus the inputs of its view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteHistory {
    pub(crate) entries: Vec<RemoteHistoryEntry>,
    pub(crate) loading: bool,
    pub(crate) search_term: String,
    pub(crate) sort_order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub(crate) upload: UploadOrchestrator,
    pub(crate) history: HistoryCache,
    pub(crate) remote: RemoteHistory,
    pub(crate) preview: PreviewPanel,
    pub(crate) preferences: Preferences,
    dirty: bool,
}

impl AppState {
    pub fn new(service_base: Url) -> Self {
        Self {
            upload: UploadOrchestrator::new(service_base),
            history: HistoryCache::default(),
            remote: RemoteHistory::default(),
            preview: PreviewPanel::default(),
            preferences: Preferences::default(),
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::build(self)
    }

    pub fn upload(&self) -> &UploadOrchestrator {
        &self.upload
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    pub fn preview(&self) -> &PreviewPanel {
        &self.preview
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn remote_entries(&self) -> &[RemoteHistoryEntry] {
        &self.remote.entries
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// Joins a service-relative path onto the service base.
///
/// Already-absolute URLs are returned unchanged. The base's own path is kept,
/// so a base of `http://host/api` and `/files/a.json` give
/// `http://host/api/files/a.json`.
pub fn resolve_service_url(base: &Url, path: &str) -> String {
    if let Ok(absolute) = Url::parse(path) {
        return absolute.into();
    }
    let mut joined = base.as_str().trim_end_matches('/').to_string();
    if !path.starts_with('/') {
        joined.push('/');
    }
    joined.push_str(path);
    joined
}
