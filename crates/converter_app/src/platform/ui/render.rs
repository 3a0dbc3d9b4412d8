use comfy_table::presets::NOTHING;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use converter_core::{AppViewModel, Banner, HistoryRecord, PreviewView, RemoteHistoryRow};
use indicatif::{ProgressBar, ProgressStyle};

use super::theme::Theme;

/// Progress bar driven by the simulated percentage and the elapsed clock.
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    pub fn new(theme: Theme) -> Self {
        let bar = ProgressBar::new(100);
        let template = format!("{{bar:40.{}}} {{pos:>3}}% {{msg}}", theme.bar);
        match ProgressStyle::with_template(&template) {
            Ok(style) => bar.set_style(style.progress_chars("=> ")),
            Err(_) => bar.set_style(ProgressStyle::default_bar()),
        }
        Self { bar }
    }

    pub fn update(&self, view: &AppViewModel) {
        if !view.busy {
            return;
        }
        self.bar.set_position(u64::from(view.progress));
        self.bar
            .set_message(format!("{} {}s", view.status_message, view.elapsed));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

pub fn banner(banner: &Banner, theme: Theme) -> Table {
    let cell = match banner {
        Banner::Success(text) => Cell::new(format!("✔ {text}")).fg(theme.success),
        Banner::Error(text) => Cell::new(format!("✖ {text}")).fg(theme.error),
    };
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.add_row(vec![cell.add_attribute(Attribute::Bold)]);
    table
}

pub fn recent_table(records: &[HistoryRecord], theme: Theme) -> Table {
    let mut table = styled_table(&["File", "Completed", "Download"], theme);
    for record in records {
        table.add_row(vec![
            Cell::new(record.source_file_name.as_str()),
            Cell::new(record.completed_at.as_str()),
            Cell::new(record.download_url.as_str()),
        ]);
    }
    table
}

pub fn remote_history_table(rows: &[RemoteHistoryRow], theme: Theme) -> Table {
    let mut table = styled_table(&["Id", "File", "Timestamp", "Download"], theme);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.id.as_str()),
            Cell::new(row.excel_file.as_str()),
            Cell::new(row.timestamp.as_str()),
            Cell::new(row.download_url.as_str()),
        ]);
    }
    table
}

/// Sheet tabs on the first line, the active sheet below. `None` while hidden.
pub fn preview(view: &PreviewView, theme: Theme) -> Option<String> {
    match view {
        PreviewView::Hidden => None,
        PreviewView::Loading => Some("Loading preview…".to_string()),
        PreviewView::Unavailable => Some("No preview available".to_string()),
        PreviewView::Sheet {
            tabs,
            active,
            columns,
            rows,
        } => {
            let tab_line = tabs
                .iter()
                .enumerate()
                .map(|(index, name)| {
                    if index == *active {
                        format!("[{index}: {name}]")
                    } else {
                        format!(" {index}: {name} ")
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");

            let headers: Vec<&str> = columns.iter().map(String::as_str).collect();
            let mut table = styled_table(&headers, theme);
            for row in rows {
                table.add_row(row.iter().map(String::as_str).collect::<Vec<_>>());
            }
            Some(format!("{tab_line}\n{table}"))
        }
    }
}

fn styled_table(headers: &[&str], theme: Theme) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|header| {
                Cell::new(*header)
                    .fg(theme.accent)
                    .add_attribute(Attribute::Bold)
            })
            .collect::<Vec<_>>(),
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ui::theme::{DARK, LIGHT};

    #[test]
    fn preview_marks_active_tab() {
        let view = PreviewView::Sheet {
            tabs: vec!["Fields".to_string(), "Codes".to_string()],
            active: 1,
            columns: vec!["Name".to_string(), "Type".to_string()],
            rows: vec![vec!["age".to_string(), "int".to_string()]],
        };
        let text = preview(&view, LIGHT).unwrap();
        let first_line = text.lines().next().unwrap();
        assert_eq!(first_line, " 0: Fields  [1: Codes]");
        assert!(text.contains("age"));
        assert!(text.contains("Type"));
    }

    #[test]
    fn preview_states_without_sheets() {
        assert_eq!(preview(&PreviewView::Hidden, DARK), None);
        assert_eq!(
            preview(&PreviewView::Unavailable, DARK).as_deref(),
            Some("No preview available")
        );
    }

    #[test]
    fn history_tables_list_every_row() {
        let rows = vec![
            RemoteHistoryRow {
                id: "7".to_string(),
                excel_file: "dict.xlsx".to_string(),
                timestamp: "2024-05-01T09:30:00".to_string(),
                download_url: "http://host/download/system/abc".to_string(),
            },
            RemoteHistoryRow {
                id: "8".to_string(),
                excel_file: "other.xlsx".to_string(),
                timestamp: "2024-05-02T09:30:00".to_string(),
                download_url: "http://host/download/system/def".to_string(),
            },
        ];
        let text = remote_history_table(&rows, DARK).to_string();
        assert!(text.contains("dict.xlsx"));
        assert!(text.contains("/download/system/def"));

        let recent = vec![HistoryRecord {
            source_file_name: "dict.xlsx".to_string(),
            completed_at: "2024-05-01 10:00:00".to_string(),
            download_url: "http://host/files/dict.json".to_string(),
        }];
        assert!(recent_table(&recent, LIGHT).to_string().contains("files/dict.json"));
    }

    #[test]
    fn banner_carries_message() {
        let text = banner(&Banner::Error("Please upload a .xlsx file".to_string()), LIGHT)
            .to_string();
        assert!(text.contains("✖ Please upload a .xlsx file"));
    }
}
