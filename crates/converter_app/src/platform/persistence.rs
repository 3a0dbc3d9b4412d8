use converter_core::{HistoryRecord, Preferences, HISTORY_CAPACITY};
use converter_engine::StateDir;
use engine_logging::{engine_error, engine_info, engine_warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const HISTORY_SLOT: &str = "history.ron";
const PREFERENCES_SLOT: &str = "preferences.ron";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedRecord {
    source_file_name: String,
    completed_at: String,
    download_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedHistory {
    records: Vec<PersistedRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedPreferences {
    #[serde(default)]
    dark_mode: bool,
}

pub(crate) fn load_history(slots: &StateDir) -> Vec<HistoryRecord> {
    let Some(state) = load_slot::<PersistedHistory>(slots, HISTORY_SLOT) else {
        return Vec::new();
    };
    let mut records: Vec<HistoryRecord> = state
        .records
        .into_iter()
        .map(|record| HistoryRecord {
            source_file_name: record.source_file_name,
            completed_at: record.completed_at,
            download_url: record.download_url,
        })
        .collect();
    records.truncate(HISTORY_CAPACITY);
    engine_info!("Loaded {} history records", records.len());
    records
}

pub(crate) fn save_history(slots: &StateDir, records: &[HistoryRecord]) {
    let state = PersistedHistory {
        records: records
            .iter()
            .map(|record| PersistedRecord {
                source_file_name: record.source_file_name.clone(),
                completed_at: record.completed_at.clone(),
                download_url: record.download_url.clone(),
            })
            .collect(),
    };
    save_slot(slots, HISTORY_SLOT, &state);
}

pub(crate) fn load_preferences(slots: &StateDir) -> Preferences {
    load_slot::<PersistedPreferences>(slots, PREFERENCES_SLOT)
        .map(|prefs| Preferences {
            dark_mode: prefs.dark_mode,
        })
        .unwrap_or_default()
}

pub(crate) fn save_preferences(slots: &StateDir, preferences: Preferences) {
    let state = PersistedPreferences {
        dark_mode: preferences.dark_mode,
    };
    save_slot(slots, PREFERENCES_SLOT, &state);
}

/// Missing, unreadable or corrupt slots all read as `None`.
fn load_slot<T: DeserializeOwned>(slots: &StateDir, slot: &str) -> Option<T> {
    let content = match slots.read(slot) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(err) => {
            engine_warn!("Failed to read {:?}: {}", slots.slot_path(slot), err);
            return None;
        }
    };

    match ron::from_str(&content) {
        Ok(state) => Some(state),
        Err(err) => {
            engine_warn!("Failed to parse {:?}: {}", slots.slot_path(slot), err);
            None
        }
    }
}

fn save_slot<T: Serialize>(slots: &StateDir, slot: &str, state: &T) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(state, pretty) {
        Ok(text) => text,
        Err(err) => {
            engine_error!("Failed to serialize {}: {}", slot, err);
            return;
        }
    };

    if let Err(err) = slots.write(slot, &content) {
        engine_error!("Failed to write {:?}: {}", slots.slot_path(slot), err);
    }
}
