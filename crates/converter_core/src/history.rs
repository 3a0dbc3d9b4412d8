use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Number of completed runs kept locally.
pub const HISTORY_CAPACITY: usize = 5;

/// A successfully completed conversion, as remembered locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub source_file_name: String,
    pub completed_at: String,
    pub download_url: String,
}

/// Most-recent-first list of completed runs, bounded to [`HISTORY_CAPACITY`].
///
/// Records are never edited; the only removal is eviction of the oldest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryCache {
    records: Vec<HistoryRecord>,
}

impl HistoryCache {
    /// Rebuilds the cache from persisted records, dropping any overflow.
    pub fn restore(mut records: Vec<HistoryRecord>) -> Self {
        records.truncate(HISTORY_CAPACITY);
        Self { records }
    }

    pub fn append(&mut self, record: HistoryRecord) {
        self.records.insert(0, record);
        self.records.truncate(HISTORY_CAPACITY);
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One row of the service-side history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteHistoryEntry {
    pub id: String,
    pub excel_file: String,
    pub timestamp: String,
    /// Key of the generated system config, used for the download link.
    pub system: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::NewestFirst => "Newest first",
            SortOrder::OldestFirst => "Oldest first",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "desc" | "newest" => Ok(SortOrder::NewestFirst),
            "asc" | "oldest" => Ok(SortOrder::OldestFirst),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Remote history as it should be listed: entries whose file name contains
/// `search_term` (case-insensitive), ordered by timestamp.
///
/// Unparsable timestamps sort as older than any parsable one. Ties fall back
/// to the raw timestamp and then the id, so the two orders are exact reverses.
pub fn history_view(
    entries: &[RemoteHistoryEntry],
    search_term: &str,
    order: SortOrder,
) -> Vec<RemoteHistoryEntry> {
    let needle = search_term.to_lowercase();
    let mut keyed: Vec<((Option<i64>, &str, &str), &RemoteHistoryEntry)> = entries
        .iter()
        .filter(|entry| entry.excel_file.to_lowercase().contains(&needle))
        .map(|entry| {
            let key = (
                parse_timestamp_ms(&entry.timestamp),
                entry.timestamp.as_str(),
                entry.id.as_str(),
            );
            (key, entry)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match order {
        SortOrder::NewestFirst => b.cmp(a),
        SortOrder::OldestFirst => a.cmp(b),
    });

    keyed.into_iter().map(|(_, entry)| entry.clone()).collect()
}

/// Milliseconds since the epoch for the timestamp shapes the service emits.
/// Bare integers are epoch milliseconds; zone-less values are read as UTC.
pub fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return Some(millis);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.timestamp_millis());
    }
    // Offsets without a colon, e.g. `+0000`.
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(parsed.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
}
