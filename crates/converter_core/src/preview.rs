use crate::{Effect, FileHandle, RequestId};

/// One sheet of tabular preview data, cells already rendered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewSource {
    /// A local file not (yet) converted.
    File(FileHandle),
    /// A run recorded by the service, by its history id.
    History(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    Loaded(Vec<Sheet>),
    /// Non-success status or transport failure; shown as "no preview".
    Unavailable { reason: String },
}

/// Result slot of the preview panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewSlot {
    #[default]
    Hidden,
    Loading,
    Empty,
    Loaded(Vec<Sheet>),
}

/// Preview panel state. Only the most recently issued request may fill the
/// slot; anything older that resolves later is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewPanel {
    slot: PreviewSlot,
    active_sheet: usize,
    last_request: RequestId,
    pending: Option<RequestId>,
}

impl PreviewPanel {
    pub fn request(&mut self, source: PreviewSource) -> Effect {
        self.last_request += 1;
        self.pending = Some(self.last_request);
        self.slot = PreviewSlot::Loading;
        Effect::FetchPreview {
            request_id: self.last_request,
            source,
        }
    }

    /// Returns `false` when the result is stale and was ignored.
    pub fn resolve(&mut self, request_id: RequestId, outcome: PreviewOutcome) -> bool {
        if self.pending != Some(request_id) {
            return false;
        }
        self.pending = None;
        self.slot = match outcome {
            PreviewOutcome::Loaded(sheets) if !sheets.is_empty() => {
                self.active_sheet = 0;
                PreviewSlot::Loaded(sheets)
            }
            PreviewOutcome::Loaded(_) | PreviewOutcome::Unavailable { .. } => PreviewSlot::Empty,
        };
        true
    }

    /// Switches the displayed sheet; out-of-range indexes are ignored.
    pub fn select_sheet(&mut self, index: usize) -> bool {
        match &self.slot {
            PreviewSlot::Loaded(sheets) if index < sheets.len() && index != self.active_sheet => {
                self.active_sheet = index;
                true
            }
            _ => false,
        }
    }

    /// Hides the panel. An outstanding request will be ignored when it lands.
    pub fn close(&mut self) -> bool {
        let changed = self.slot != PreviewSlot::Hidden;
        self.slot = PreviewSlot::Hidden;
        self.pending = None;
        changed
    }

    pub fn slot(&self) -> &PreviewSlot {
        &self.slot
    }

    pub fn active_sheet(&self) -> usize {
        self.active_sheet
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn active(&self) -> Option<&Sheet> {
        match &self.slot {
            PreviewSlot::Loaded(sheets) => sheets.get(self.active_sheet),
            _ => None,
        }
    }
}
