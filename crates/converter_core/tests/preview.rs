mod support;

use converter_core::{
    update, Effect, Msg, PreviewOutcome, PreviewSource, PreviewView, Sheet, UploadOutcome,
};
use pretty_assertions::assert_eq;
use support::{apply, file, init_logging, new_state};

fn sheet(name: &str, columns: &[&str], rows: &[&[&str]]) -> Sheet {
    Sheet {
        name: name.to_string(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows: rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect(),
    }
}

fn request_id(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchPreview { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("preview effect")
}

#[test]
fn preview_of_chosen_file_shows_first_sheet() {
    init_logging();
    let (state, effects) = update(
        new_state(),
        Msg::PreviewFileRequested {
            file: file("data.xlsx"),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::FetchPreview {
            request_id: 1,
            source: PreviewSource::File(file("data.xlsx")),
        }]
    );
    assert_eq!(state.view().preview, PreviewView::Loading);

    let (state, _) = update(
        state,
        Msg::PreviewFinished {
            request_id: 1,
            outcome: PreviewOutcome::Loaded(vec![sheet("Sheet1", &["A"], &[&["x"]])]),
        },
    );

    assert_eq!(
        state.view().preview,
        PreviewView::Sheet {
            tabs: vec!["Sheet1".to_string()],
            active: 0,
            columns: vec!["A".to_string()],
            rows: vec![vec!["x".to_string()]],
        }
    );
}

#[test]
fn failed_preview_is_unavailable_not_loading() {
    init_logging();
    let (state, effects) = update(
        new_state(),
        Msg::PreviewHistoryRequested {
            id: "42".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::FetchPreview {
            request_id: 1,
            source: PreviewSource::History("42".to_string()),
        }]
    );
    let (state, _) = update(
        state,
        Msg::PreviewFinished {
            request_id: 1,
            outcome: PreviewOutcome::Unavailable {
                reason: "status FAILED".to_string(),
            },
        },
    );
    assert_eq!(state.view().preview, PreviewView::Unavailable);
    assert!(!state.preview().is_loading());
}

#[test]
fn empty_sheet_list_is_unavailable() {
    init_logging();
    let (state, effects) = update(
        new_state(),
        Msg::PreviewHistoryRequested { id: "7".to_string() },
    );
    let (state, _) = update(
        state,
        Msg::PreviewFinished {
            request_id: request_id(&effects),
            outcome: PreviewOutcome::Loaded(Vec::new()),
        },
    );
    assert_eq!(state.view().preview, PreviewView::Unavailable);
}

#[test]
fn second_request_wins_regardless_of_resolution_order() {
    init_logging();
    for first_resolves_last in [false, true] {
        let (state, first) = update(
            new_state(),
            Msg::PreviewFileRequested {
                file: file("slow.xlsx"),
            },
        );
        let (state, second) = update(
            state,
            Msg::PreviewHistoryRequested { id: "9".to_string() },
        );
        let first = Msg::PreviewFinished {
            request_id: request_id(&first),
            outcome: PreviewOutcome::Loaded(vec![sheet("Old", &["A"], &[])]),
        };
        let second = Msg::PreviewFinished {
            request_id: request_id(&second),
            outcome: PreviewOutcome::Loaded(vec![sheet("New", &["B"], &[])]),
        };
        let order = if first_resolves_last {
            [second, first]
        } else {
            [first, second]
        };
        let (state, _) = apply(state, order);

        match state.view().preview {
            PreviewView::Sheet { tabs, .. } => assert_eq!(tabs, vec!["New".to_string()]),
            other => panic!("unexpected preview: {other:?}"),
        }
    }
}

#[test]
fn sheet_selection_is_local_and_bounds_checked() {
    init_logging();
    let (state, effects) = update(
        new_state(),
        Msg::PreviewFileRequested {
            file: file("data.xlsx"),
        },
    );
    let (state, _) = update(
        state,
        Msg::PreviewFinished {
            request_id: request_id(&effects),
            outcome: PreviewOutcome::Loaded(vec![
                sheet("One", &["A"], &[&["1"]]),
                sheet("Two", &["B", "C"], &[&["2", "3"]]),
            ]),
        },
    );

    let (state, effects) = update(state, Msg::SheetSelected(1));
    assert!(effects.is_empty());
    match state.view().preview {
        PreviewView::Sheet {
            active, columns, ..
        } => {
            assert_eq!(active, 1);
            assert_eq!(columns, vec!["B".to_string(), "C".to_string()]);
        }
        other => panic!("unexpected preview: {other:?}"),
    }

    let (mut state, effects) = update(state, Msg::SheetSelected(5));
    assert!(effects.is_empty());
    assert_eq!(state.preview().active_sheet(), 1);
    state.consume_dirty();
    let (mut state, _) = update(state, Msg::SheetSelected(7));
    assert!(!state.consume_dirty());
}

#[test]
fn closing_preview_discards_outstanding_result() {
    init_logging();
    let (state, effects) = update(
        new_state(),
        Msg::PreviewFileRequested {
            file: file("data.xlsx"),
        },
    );
    let (state, _) = apply(
        state,
        [
            Msg::PreviewClosed,
            Msg::PreviewFinished {
                request_id: request_id(&effects),
                outcome: PreviewOutcome::Loaded(vec![sheet("Late", &[], &[])]),
            },
        ],
    );
    assert_eq!(state.view().preview, PreviewView::Hidden);
}

#[test]
fn preview_of_selected_file_requires_idle_job() {
    init_logging();
    let (state, effects) = update(new_state(), Msg::PreviewSelectedClicked);
    assert!(effects.is_empty());

    let (state, upload) = update(
        state,
        Msg::FileChosen {
            file: file("data.xlsx"),
            at_ms: 0,
        },
    );
    assert!(!state.view().can_preview_selected);
    let (state, effects) = update(state, Msg::PreviewSelectedClicked);
    assert!(effects.is_empty());

    let generation = support::upload_generation(&upload).unwrap();
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            generation,
            outcome: UploadOutcome::Rejected {
                status: "FAILED".to_string(),
                detail: None,
            },
            completed_at: String::new(),
            at_ms: 100,
        },
    );
    assert!(state.view().can_preview_selected);
    let (_, effects) = update(state, Msg::PreviewSelectedClicked);
    assert_eq!(
        effects,
        vec![Effect::FetchPreview {
            request_id: 1,
            source: PreviewSource::File(file("data.xlsx")),
        }]
    );
}
