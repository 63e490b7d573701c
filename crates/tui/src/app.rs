//! Dashboard state and key handling.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use profdiff_core::model::{Session, Slot};
use profdiff_core::views::{CHAR_WIDTH, ROW_HEIGHT, ViewKind, ViewState, render_view};
use profdiff_protocol::{RenderCommand, Viewport};
use tracing::{debug, warn};

/// Read `path` and load it into `slot`. A capture that fails to parse
/// leaves the slot's previous contents in place.
pub fn load_file(session: &mut Session, slot: Slot, path: &Path) -> Result<()> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    session
        .load(slot, &data, path.display().to_string())
        .with_context(|| format!("failed to load {slot} capture {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Normal,
    /// Editing the filter; `previous` is restored on Esc.
    Filter { previous: String },
}

pub struct App {
    session: Session,
    sources: [Option<PathBuf>; 2],
    state: ViewState,
    view: ViewKind,
    input: Input,
    /// First visible row.
    scroll: usize,
    page_rows: usize,
    message: Option<String>,
    dark: bool,
    quit: bool,
}

impl App {
    pub fn new(
        session: Session,
        before: Option<PathBuf>,
        after: Option<PathBuf>,
        state: ViewState,
        view: ViewKind,
        dark: bool,
    ) -> Self {
        Self {
            session,
            sources: [before, after],
            state,
            view,
            input: Input::Normal,
            scroll: 0,
            page_rows: 1,
            message: None,
            dark,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn dark(&self) -> bool {
        self.dark
    }

    pub fn tabs(&self) -> Vec<(ViewKind, bool)> {
        ViewKind::ALL.into_iter().map(|k| (k, k == self.view)).collect()
    }

    /// Viewport for a content area of `cols` x `rows` cells.
    pub fn viewport(&mut self, cols: u16, rows: u16) -> Viewport {
        self.page_rows = usize::from(rows).max(1);
        Viewport {
            x: 0.0,
            y: self.scroll as f64 * ROW_HEIGHT,
            width: f64::from(cols) * CHAR_WIDTH,
            height: f64::from(rows) * ROW_HEIGHT,
            dpr: 1.0,
        }
    }

    pub fn render(&self, viewport: &Viewport) -> Vec<RenderCommand> {
        render_view(self.view, &self.session, viewport, &self.state)
    }

    /// Clamp scrolling to what the last frame drew. Rows past the viewport
    /// are culled, so this only ever pulls the scroll back once the end of
    /// the content is on screen.
    pub fn set_content_rows(&mut self, rows: usize) {
        self.scroll = self.scroll.min(rows.saturating_sub(self.page_rows));
    }

    pub fn scroll_by(&mut self, rows: isize) {
        self.scroll = self.scroll.saturating_add_signed(rows);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }
        match self.input.clone() {
            Input::Normal => self.normal_key(key.code),
            Input::Filter { previous } => self.filter_key(key.code, previous),
        }
    }

    fn normal_key(&mut self, code: KeyCode) {
        let page = self.page_rows as isize;
        self.message = None;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                self.select(ViewKind::ALL[index]);
            }
            KeyCode::Tab => self.select(self.cycle_view(1)),
            KeyCode::BackTab => self.select(self.cycle_view(ViewKind::ALL.len() - 1)),
            KeyCode::Char('/') => {
                self.input = Input::Filter {
                    previous: self.state.query.filter.clone(),
                };
            }
            KeyCode::Char('s') => {
                self.state.query.sort = self.state.query.sort.next();
                self.message = Some(format!("sorted by {}", self.state.query.sort));
            }
            KeyCode::Char('p') => self.state.show_paths = !self.state.show_paths,
            KeyCode::Char('r') => self.reload(),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-page),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_by(page),
            KeyCode::Home => self.scroll = 0,
            _ => {}
        }
    }

    fn filter_key(&mut self, code: KeyCode, previous: String) {
        match code {
            KeyCode::Enter => self.input = Input::Normal,
            KeyCode::Esc => {
                self.state.query.filter = previous;
                self.input = Input::Normal;
            }
            KeyCode::Backspace => {
                self.state.query.filter.pop();
            }
            KeyCode::Char(c) => self.state.query.filter.push(c),
            _ => {}
        }
        self.scroll = 0;
    }

    fn cycle_view(&self, step: usize) -> ViewKind {
        let len = ViewKind::ALL.len();
        let i = ViewKind::ALL.iter().position(|k| *k == self.view).unwrap_or(0);
        ViewKind::ALL[(i + step) % len]
    }

    fn select(&mut self, view: ViewKind) {
        if view != self.view {
            debug!(%view, "switched view");
            self.view = view;
            self.scroll = 0;
        }
    }

    /// Re-read every capture from disk.
    fn reload(&mut self) {
        let mut loaded = 0;
        let mut failures = Vec::new();
        for (slot, source) in Slot::ALL.into_iter().zip(&self.sources) {
            let Some(path) = source else {
                continue;
            };
            match load_file(&mut self.session, slot, path) {
                Ok(()) => loaded += 1,
                Err(err) => {
                    warn!(error = %format!("{err:#}"), "reload failed");
                    failures.push(format!("{err:#}"));
                }
            }
        }
        self.message = Some(if failures.is_empty() {
            format!("reloaded {loaded} capture(s)")
        } else {
            failures.join("; ")
        });
    }

    pub fn status_line(&self) -> String {
        if let Input::Filter { .. } = self.input {
            return format!(
                " / {}▏  Enter apply · Esc cancel",
                self.state.query.filter
            );
        }
        let mut parts: Vec<String> = Slot::ALL
            .into_iter()
            .map(|slot| format!("{slot}: {}", self.session.status(slot)))
            .collect();
        parts.push(format!("sort: {}", self.state.query.sort));
        if !self.state.query.filter.is_empty() {
            parts.push(format!("filter: {}", self.state.query.filter));
        }
        let head = match &self.message {
            Some(message) => message.clone(),
            None => parts.join(" │ "),
        };
        format!(" {head} │ 1-5 view  / filter  s sort  p paths  r reload  q quit")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profdiff_core::compare::SortKey;

    const BEFORE: &[u8] = include_bytes!("../../core/tests/fixtures/before.json");

    fn app() -> App {
        let mut session = Session::default();
        session.load(Slot::Before, BEFORE, "before.json").unwrap();
        App::new(
            session,
            None,
            None,
            ViewState::default(),
            ViewKind::Overview,
            true,
        )
    }

    fn press(app: &mut App, keys: &str) {
        for c in keys.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn key(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn number_keys_switch_tabs() {
        let mut app = app();
        press(&mut app, "3");
        assert_eq!(app.view, ViewKind::Rerenders);
        key(&mut app, KeyCode::Tab);
        assert_eq!(app.view, ViewKind::Timeline);
        key(&mut app, KeyCode::BackTab);
        key(&mut app, KeyCode::BackTab);
        assert_eq!(app.view, ViewKind::Components);
        press(&mut app, "9");
        assert_eq!(app.view, ViewKind::Components);
    }

    #[test]
    fn filter_editing_applies_live_and_cancels() {
        let mut app = app();
        press(&mut app, "/ite");
        assert_eq!(app.state.query.filter, "ite");
        assert!(app.status_line().starts_with(" / ite"));
        key(&mut app, KeyCode::Backspace);
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.state.query.filter, "it");

        press(&mut app, "/xyz");
        key(&mut app, KeyCode::Esc);
        assert_eq!(app.state.query.filter, "it");
        assert!(!app.should_quit());
        assert!(app.status_line().contains("filter: it"));
    }

    #[test]
    fn sort_cycles_and_paths_toggle() {
        let mut app = app();
        press(&mut app, "s");
        assert_eq!(app.state.query.sort, SortKey::Duration);
        assert!(app.status_line().contains("sorted by duration"));
        press(&mut app, "sss");
        assert_eq!(app.state.query.sort, SortKey::Renders);
        press(&mut app, "p");
        assert!(app.state.show_paths);
    }

    #[test]
    fn scroll_clamps_to_content() {
        let mut app = app();
        let _ = app.viewport(80, 10);
        key(&mut app, KeyCode::PageDown);
        key(&mut app, KeyCode::PageDown);
        app.set_content_rows(15);
        assert_eq!(app.viewport(80, 10).y, 5.0 * ROW_HEIGHT);
        key(&mut app, KeyCode::Up);
        key(&mut app, KeyCode::Home);
        assert_eq!(app.viewport(80, 10).y, 0.0);
        key(&mut app, KeyCode::Up);
        assert_eq!(app.viewport(80, 10).y, 0.0);
    }

    #[test]
    fn rendered_view_follows_tab() {
        let mut app = app();
        press(&mut app, "2");
        let viewport = app.viewport(120, 40);
        let commands = app.render(&viewport);
        assert!(commands.iter().filter_map(RenderCommand::text).any(|t| t == "Mount/Update"));
    }

    #[test]
    fn reload_reports_missing_files() {
        let mut session = Session::default();
        session.load(Slot::Before, BEFORE, "before.json").unwrap();
        let mut app = App::new(
            session,
            Some(PathBuf::from("/nonexistent/before.json")),
            None,
            ViewState::default(),
            ViewKind::Overview,
            true,
        );
        press(&mut app, "r");
        assert!(app.status_line().contains("failed to read"));
        assert!(app.session.before().is_some());
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
        let mut app = self::app();
        press(&mut app, "q");
        assert!(app.should_quit());
    }
}
