use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use converter_core::{AppViewModel, FileHandle, JobStatus, Msg, PreviewView, SortOrder};
use converter_engine::ensure_state_dir;
use engine_logging::{engine_info, engine_warn};

use super::app::Session;
use super::config::AppConfig;
use super::ui::render::{self, ProgressDisplay};
use super::ui::theme::Theme;
use crate::cli::{Command, ThemeChoice};

pub fn run(command: Command, config: &AppConfig) -> Result<ExitCode> {
    ensure_state_dir(&config.state_dir)
        .with_context(|| format!("cannot use state directory {:?}", config.state_dir))?;
    let mut session = Session::start(config)?;
    session.restore();

    match command {
        Command::Convert {
            file,
            retries,
            preview,
        } => convert(&mut session, file, retries, preview),
        Command::Preview {
            file,
            history,
            sheet,
        } => preview_workbook(&mut session, file, history, sheet),
        Command::History { search, order } => list_history(&mut session, search, order),
        Command::Recent => list_recent(&session),
        Command::Theme { choice } => theme(&mut session, choice),
    }
}

fn convert(
    session: &mut Session,
    file: PathBuf,
    mut retries_left: u32,
    show_preview: bool,
) -> Result<ExitCode> {
    let theme = Theme::for_mode(session.view().dark_mode);
    let handle = FileHandle::from_path(&file);
    engine_info!("Converting {:?}", file);

    let mut msg = Msg::FileChosen {
        file: handle,
        at_ms: session.now_ms(),
    };
    let view = loop {
        session.dispatch(msg);
        let progress = ProgressDisplay::new(theme);
        let view = session.run_until(|view| !view.busy, |view| progress.update(view));
        progress.finish();
        let view = view?;

        if view.status == JobStatus::Error && view.can_retry && retries_left > 0 {
            retries_left -= 1;
            engine_warn!("Conversion failed, retrying ({} left)", retries_left);
            println!("{}", view.status_message);
            println!("Retrying…");
            msg = Msg::RetryClicked {
                at_ms: session.now_ms(),
            };
            continue;
        }
        break view;
    };

    if let Some(banner) = &view.banner {
        println!("{}", render::banner(banner, theme));
    }
    if let Some(url) = &view.download_url {
        println!("Download: {url}");
    }

    if show_preview && view.can_preview_selected {
        session.dispatch(Msg::PreviewSelectedClicked);
        let view = wait_for_preview(session)?;
        print_preview(&view, theme);
    }

    Ok(if view.status == JobStatus::Success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn preview_workbook(
    session: &mut Session,
    file: Option<PathBuf>,
    history: Option<String>,
    sheet: usize,
) -> Result<ExitCode> {
    let theme = Theme::for_mode(session.view().dark_mode);
    let msg = match (file, history) {
        (_, Some(id)) => Msg::PreviewHistoryRequested { id },
        (Some(path), None) => Msg::PreviewFileRequested {
            file: FileHandle::from_path(path),
        },
        (None, None) => bail!("preview needs a file or --history <ID>"),
    };
    session.dispatch(msg);
    let mut view = wait_for_preview(session)?;

    if sheet > 0 {
        if session.dispatch(Msg::SheetSelected(sheet)) {
            view = session.view();
        } else if let PreviewView::Sheet { tabs, .. } = &view.preview {
            eprintln!(
                "Sheet {sheet} does not exist ({} available); showing sheet 0",
                tabs.len()
            );
        }
    }

    print_preview(&view, theme);
    Ok(ExitCode::SUCCESS)
}

fn list_history(session: &mut Session, search: String, order: SortOrder) -> Result<ExitCode> {
    let theme = Theme::for_mode(session.view().dark_mode);
    session.dispatch(Msg::SearchChanged(search));
    session.dispatch(Msg::SortOrderChanged(order));
    session.dispatch(Msg::RemoteHistoryRequested);
    let view = session.run_until(|view| !view.history_loading, |_| {})?;

    if view.remote_history.is_empty() {
        println!("No history available");
    } else {
        println!("{}", render::remote_history_table(&view.remote_history, theme));
        println!("Order: {}", view.sort_order.label());
    }
    Ok(ExitCode::SUCCESS)
}

fn list_recent(session: &Session) -> Result<ExitCode> {
    let view = session.view();
    if view.recent.is_empty() {
        println!("No conversions yet");
    } else {
        let theme = Theme::for_mode(view.dark_mode);
        println!("{}", render::recent_table(&view.recent, theme));
    }
    Ok(ExitCode::SUCCESS)
}

fn theme(session: &mut Session, choice: Option<ThemeChoice>) -> Result<ExitCode> {
    let dark_mode = session.view().dark_mode;
    let toggle = match choice {
        None => false,
        Some(ThemeChoice::Toggle) => true,
        Some(ThemeChoice::Dark) => !dark_mode,
        Some(ThemeChoice::Light) => dark_mode,
    };
    if toggle {
        session.dispatch(Msg::DarkModeToggled);
    }
    println!("Theme: {}", Theme::label(session.view().dark_mode));
    Ok(ExitCode::SUCCESS)
}

fn wait_for_preview(session: &mut Session) -> Result<AppViewModel> {
    session.run_until(|view| view.preview != PreviewView::Loading, |_| {})
}

fn print_preview(view: &AppViewModel, theme: Theme) {
    if let Some(text) = render::preview(&view.preview, theme) {
        println!("{text}");
    }
}
