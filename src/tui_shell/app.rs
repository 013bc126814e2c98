use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::changes::CommitPlan;
use crate::session::{Key, Outcome, Session};
use crate::settings::LoadedSettings;

mod event_loop;
mod render;
mod time_utils;

pub(super) use self::time_utils::{fmt_ts_ui, now_ts};

pub(super) fn run(opts: crate::tui::TuiRunOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }

    let settings = LoadedSettings::load(&opts.paths)?;
    let mut app = App::new(settings);

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let res = event_loop::run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::tui_shell) enum EntryKind {
    Output,
    Error,
}

#[derive(Clone, Debug)]
pub(in crate::tui_shell) struct StatusEntry {
    pub(in crate::tui_shell) ts: String,
    pub(in crate::tui_shell) kind: EntryKind,
    pub(in crate::tui_shell) lines: Vec<String>,
}

pub(in crate::tui_shell) struct App {
    pub(in crate::tui_shell) session: Session,
    pub(in crate::tui_shell) settings: LoadedSettings,
    pub(in crate::tui_shell) last_result: Option<StatusEntry>,
    pub(in crate::tui_shell) quit: bool,
}

impl App {
    pub(in crate::tui_shell) fn new(settings: LoadedSettings) -> Self {
        let session = Session::load(&settings.sources());
        Self {
            session,
            settings,
            last_result: None,
            quit: false,
        }
    }

    pub(in crate::tui_shell) fn push_output(&mut self, lines: Vec<String>) {
        self.last_result = Some(StatusEntry {
            ts: now_ts(),
            kind: EntryKind::Output,
            lines,
        });
    }

    pub(in crate::tui_shell) fn push_error(&mut self, msg: String) {
        tracing::warn!(error = %msg, "command failed");
        self.last_result = Some(StatusEntry {
            ts: now_ts(),
            kind: EntryKind::Error,
            lines: vec![msg],
        });
    }

    pub(in crate::tui_shell) fn handle_key(&mut self, key: Key) {
        match self.session.handle_key(key) {
            Outcome::None => {}
            Outcome::Quit => self.quit = true,
            Outcome::Commit(plan) => self.commit(plan),
        }
    }

    fn commit(&mut self, plan: CommitPlan) {
        let written: Vec<PathBuf> = match self.settings.apply(&plan) {
            Ok(w) => w,
            Err(err) => {
                self.push_error(format!("commit: {:#}", err));
                return;
            }
        };

        let resolved = self.session.finish_commit(&plan);
        let mut lines = vec![format!(
            "committed: {} file(s) written, {} duplicate(s) resolved",
            written.len(),
            resolved.len()
        )];
        lines.extend(written.iter().map(|p| format!("  {}", p.display())));
        self.push_output(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Level;
    use crate::settings::SettingsPaths;

    fn write_settings(path: &std::path::Path, allow: &[&str]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let doc = serde_json::json!({ "permissions": { "allow": allow } });
        std::fs::write(path, serde_json::to_vec(&doc).unwrap()).unwrap();
    }

    fn app_in(dir: &std::path::Path) -> App {
        let paths = SettingsPaths::for_project(dir, dir.join("home/settings.json"));
        write_settings(&paths.files[Level::Local], &["Read", "Write"]);
        write_settings(&paths.files[Level::Repo], &["Write"]);
        App::new(LoadedSettings::load(&paths).unwrap())
    }

    #[test]
    fn commit_writes_files_and_rebaselines() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        assert!(app.session.has_unresolved_duplicates());

        app.handle_key(Key::Enter);
        app.handle_key(Key::Enter);
        assert!(!app.session.has_unresolved_duplicates());
        assert!(!app.session.has_pending_changes());
        let last = app.last_result.clone().unwrap();
        assert_eq!(last.kind, EntryKind::Output);
        assert!(last.lines[0].contains("1 file(s) written"));

        let local = std::fs::read_to_string(dir.path().join(".claude/settings.local.json")).unwrap();
        assert!(!local.contains("Write"));
        assert!(!dir.path().join("home/settings.json").exists());
    }

    #[test]
    fn exit_dialog_resets_but_keeps_running() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.handle_key(Key::Escape);
        app.handle_key(Key::Yes);
        assert!(!app.quit);
        assert!(app.session.modal().is_none());
        assert!(!app.session.has_pending_changes());

        app.handle_key(Key::Quit);
        assert!(app.quit);
    }
}
