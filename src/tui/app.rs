use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::io::autosave::MEMO_AUTOSAVE_KEY;
use crate::logging;
use crate::model::memo::Memo;
use crate::model::todo::{Bucket, ItemId, TodoCollection};
use crate::ops::inline_edit::InlineEdit;
use crate::ops::memo_ops::MemoSearch;
use crate::ops::todo_ops;
use crate::util::TextBuffer;

use super::input;
use super::render;
use super::scheduler::SaveScheduler;
use super::theme::Theme;

/// How long a status message stays in the status row
pub const STATUS_TTL: Duration = Duration::from_secs(1);

/// Upper bound on the event loop's idle wait
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Message shown after every to-do save, successful or not
pub const SAVED_MESSAGE: &str = "to-do saved";

/// Step used by `[` / `]`, in percent
pub const RESIZE_STEP: u16 = 5;

/// The three panes, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Memo,
    Todo,
    Chat,
}

impl Pane {
    pub const ALL: [Pane; 3] = [Pane::Memo, Pane::Todo, Pane::Chat];

    pub fn index(self) -> usize {
        match self {
            Pane::Memo => 0,
            Pane::Todo => 1,
            Pane::Chat => 2,
        }
    }

    pub fn next(self) -> Pane {
        Pane::ALL[(self.index() + 1) % 3]
    }

    pub fn prev(self) -> Pane {
        Pane::ALL[(self.index() + 2) % 3]
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Inline edit of a to-do item (`App::edit` is set)
    Edit,
    /// Carrying an item (`App::move_state` is set)
    Move,
    /// Add prompt at the top of the to-do pane
    Add,
    /// Path prompt in the status row (`App::path_prompt` is set)
    Prompt,
    /// Find bar over the memo
    Search,
}

/// A selectable row in the to-do pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoCursor {
    Header(Bucket),
    Item(ItemId),
}

/// Where a carried item came from, for Escape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveState {
    pub id: ItemId,
    pub origin: (Bucket, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Open,
    SaveAs,
}

#[derive(Debug, Clone)]
pub struct PathPrompt {
    pub kind: PromptKind,
    pub input: TextBuffer,
}

#[derive(Debug, Clone)]
pub struct AddPrompt {
    pub input: TextBuffer,
    pub target: Bucket,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub at: Instant,
}

/// Main application state
pub struct App {
    pub ctx: AppContext,
    pub collection: TodoCollection,
    pub memo: Memo,
    pub focus: Pane,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Pane proportions, adjustable at runtime
    pub sizes: [u16; 3],
    pub todo_cursor: Option<TodoCursor>,
    pub todo_scroll: usize,
    pub collapsed: HashSet<Bucket>,
    pub show_done: bool,
    pub edit: Option<InlineEdit>,
    pub move_state: Option<MoveState>,
    pub add_prompt: AddPrompt,
    pub path_prompt: Option<PathPrompt>,
    pub search: MemoSearch,
    pub memo_scroll: usize,
    /// Memo rows on screen at the last draw, for PageUp/PageDown
    pub memo_page: usize,
    pub chat_tab: usize,
    pub status: Option<StatusMessage>,
    todo_save: SaveScheduler,
    memo_save: SaveScheduler,
}

impl App {
    pub fn new(ctx: AppContext) -> Self {
        let collection = ctx.store.load().unwrap_or_default();
        let memo_text = ctx
            .autosave
            .get(MEMO_AUTOSAVE_KEY)
            .filter(|text| !text.is_empty())
            .unwrap_or_default();
        let theme = Theme::from_config(&ctx.config.ui);

        let mut app = App {
            collection,
            memo: Memo::new(memo_text),
            focus: Pane::Memo,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            sizes: ctx.config.layout.sizes,
            todo_cursor: None,
            todo_scroll: 0,
            collapsed: HashSet::new(),
            show_done: ctx.config.todo.show_done,
            edit: None,
            move_state: None,
            add_prompt: AddPrompt {
                input: TextBuffer::new(),
                target: Bucket::Immediate,
            },
            path_prompt: None,
            search: MemoSearch::new(),
            memo_scroll: 0,
            memo_page: 10,
            chat_tab: 0,
            status: None,
            todo_save: SaveScheduler::from_millis(ctx.config.todo.save_debounce_ms),
            memo_save: SaveScheduler::from_millis(ctx.config.memo.autosave_debounce_ms),
            ctx,
        };
        app.ensure_cursor(0);
        app
    }

    // -- to-do rows ------------------------------------------------------

    /// Buckets drawn in the to-do pane, in order
    pub fn visible_buckets(&self) -> Vec<Bucket> {
        Bucket::ALL
            .into_iter()
            .filter(|b| *b != Bucket::Done || self.show_done)
            .collect()
    }

    /// Selectable rows: each visible bucket's header, then its items unless
    /// the bucket is collapsed
    pub fn visible_rows(&self) -> Vec<TodoCursor> {
        let mut rows = Vec::new();
        for bucket in self.visible_buckets() {
            rows.push(TodoCursor::Header(bucket));
            if !self.collapsed.contains(&bucket) {
                rows.extend(
                    self.collection
                        .bucket(bucket)
                        .iter()
                        .map(|item| TodoCursor::Item(item.id)),
                );
            }
        }
        rows
    }

    pub fn cursor_index(&self) -> Option<usize> {
        let cursor = self.todo_cursor?;
        self.visible_rows().iter().position(|row| *row == cursor)
    }

    /// Keep the cursor on a visible row; when its row disappeared, take the
    /// row now at `fallback` (clamped).
    pub fn ensure_cursor(&mut self, fallback: usize) {
        let rows = self.visible_rows();
        if self.todo_cursor.is_some_and(|c| rows.contains(&c)) {
            return;
        }
        self.todo_cursor = rows.get(fallback.min(rows.len().saturating_sub(1))).copied();
    }

    pub fn selected_item(&self) -> Option<ItemId> {
        match self.todo_cursor {
            Some(TodoCursor::Item(id)) => Some(id),
            _ => None,
        }
    }

    /// Bucket of the selected row (header or item)
    pub fn selected_bucket(&self) -> Option<Bucket> {
        match self.todo_cursor? {
            TodoCursor::Header(bucket) => Some(bucket),
            TodoCursor::Item(id) => self.collection.locate(id).map(|(b, _)| b),
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let rows = self.visible_rows();
        if rows.is_empty() {
            return;
        }
        let current = self.cursor_index().unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(rows.len() - 1);
        self.todo_cursor = Some(rows[next]);
    }

    pub fn toggle_show_done(&mut self) {
        let idx = self.cursor_index().unwrap_or(0);
        self.show_done = !self.show_done;
        self.ensure_cursor(idx);
    }

    pub fn toggle_collapse(&mut self) {
        let Some(bucket) = self.selected_bucket() else {
            return;
        };
        if !self.collapsed.remove(&bucket) {
            self.collapsed.insert(bucket);
            self.todo_cursor = Some(TodoCursor::Header(bucket));
        }
    }

    // -- to-do transitions -------------------------------------------------

    pub fn add_from_prompt(&mut self) {
        let target = self.add_prompt.target;
        match todo_ops::add_item(&mut self.collection, self.add_prompt.input.text(), target) {
            Ok(id) => {
                self.add_prompt.input.clear();
                self.collapsed.remove(&target);
                self.todo_cursor = Some(TodoCursor::Item(id));
                self.todo_changed();
            }
            Err(e) => tracing::debug!(error = %e, "add ignored"),
        }
    }

    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_item() else {
            return;
        };
        let idx = self.cursor_index().unwrap_or(0);
        if let Ok(bucket) = todo_ops::toggle_done(&mut self.collection, id) {
            self.collapsed.remove(&bucket);
            self.ensure_cursor(idx);
            self.todo_changed();
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_item() else {
            return;
        };
        let idx = self.cursor_index().unwrap_or(0);
        if todo_ops::delete_item(&mut self.collection, id).is_ok() {
            self.ensure_cursor(idx);
            self.todo_changed();
        }
    }

    pub fn begin_edit(&mut self) {
        let Some(id) = self.selected_item() else {
            return;
        };
        if let Ok(edit) = InlineEdit::begin(&self.collection, id) {
            self.edit = Some(edit);
            self.mode = Mode::Edit;
        }
    }

    /// Leave Editing keeping the text (Enter, or focus leaving the item)
    pub fn commit_edit(&mut self) {
        if let Some(edit) = self.edit.take() {
            match edit.commit(&mut self.collection) {
                Ok(end) if end.needs_save() => self.todo_changed(),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "inline edit lost its item"),
            }
        }
        if self.mode == Mode::Edit {
            self.mode = Mode::Navigate;
        }
    }

    /// Leave Editing restoring the original text (Escape)
    pub fn cancel_edit(&mut self) {
        if let Some(edit) = self.edit.take() {
            edit.cancel(&mut self.collection);
        }
        if self.mode == Mode::Edit {
            self.mode = Mode::Navigate;
        }
    }

    pub fn begin_move(&mut self) {
        let Some(id) = self.selected_item() else {
            return;
        };
        if let Some(origin) = self.collection.locate(id) {
            self.move_state = Some(MoveState { id, origin });
            self.mode = Mode::Move;
        }
    }

    /// Carry the picked-up item one position down (or up), crossing into
    /// the neighbouring visible bucket at either end.
    pub fn move_step(&mut self, down: bool) {
        let Some(ms) = self.move_state else {
            return;
        };
        let Some((bucket, idx)) = self.collection.locate(ms.id) else {
            return;
        };
        let buckets = self.visible_buckets();
        let pos = buckets.iter().position(|b| *b == bucket);
        let len = self.collection.bucket(bucket).len();

        let target = if down {
            if idx + 1 < len {
                Some((bucket, idx + 1))
            } else {
                pos.and_then(|p| buckets.get(p + 1)).map(|next| (*next, 0))
            }
        } else if idx > 0 {
            Some((bucket, idx - 1))
        } else {
            pos.and_then(|p| p.checked_sub(1))
                .map(|p| (buckets[p], usize::MAX))
        };

        if let Some((to, at)) = target {
            self.collapsed.remove(&to);
            let _ = todo_ops::move_item(&mut self.collection, ms.id, to, at);
        }
    }

    /// Drop the carried item where it is and save
    pub fn drop_move(&mut self) {
        if self.move_state.take().is_some() {
            self.todo_changed();
        }
        self.mode = Mode::Navigate;
    }

    /// Put the carried item back where it was picked up; nothing is saved
    pub fn cancel_move(&mut self) {
        if let Some(ms) = self.move_state.take() {
            let (bucket, idx) = ms.origin;
            let _ = todo_ops::move_item(&mut self.collection, ms.id, bucket, idx);
        }
        if self.mode == Mode::Move {
            self.mode = Mode::Navigate;
        }
    }

    /// Close whatever to-do interaction is open, as if focus left the list
    pub fn blur_todo(&mut self) {
        match self.mode {
            Mode::Edit => self.commit_edit(),
            Mode::Move => self.cancel_move(),
            Mode::Add => self.mode = Mode::Navigate,
            _ => {}
        }
    }

    // -- panes -------------------------------------------------------------

    pub fn cycle_focus(&mut self, forward: bool) {
        self.blur_todo();
        if matches!(self.mode, Mode::Search | Mode::Prompt) {
            self.path_prompt = None;
            self.mode = Mode::Navigate;
        }
        self.focus = if forward {
            self.focus.next()
        } else {
            self.focus.prev()
        };
    }

    /// Grow (positive) or shrink the focused pane's share
    pub fn resize_focused(&mut self, grow: bool) {
        let size = &mut self.sizes[self.focus.index()];
        *size = if grow {
            (*size + RESIZE_STEP).min(90)
        } else {
            size.saturating_sub(RESIZE_STEP).max(RESIZE_STEP)
        };
    }

    pub fn selected_chat_url(&self) -> Option<&str> {
        self.ctx
            .config
            .chat
            .tabs
            .get(self.chat_tab)
            .map(|tab| tab.url.as_str())
    }

    // -- memo --------------------------------------------------------------

    pub fn open_search(&mut self) {
        self.blur_todo();
        self.focus = Pane::Memo;
        self.mode = Mode::Search;
        self.refresh_search();
    }

    /// Recompute matches and put the memo cursor on the active one
    pub fn refresh_search(&mut self) {
        let from = self.memo.buffer.cursor();
        self.search.refresh(self.memo.buffer.text(), from);
        if let Some(m) = self.search.active_match() {
            self.memo.buffer.set_cursor(m.start);
        }
    }

    pub fn open_prompt(&mut self, kind: PromptKind) {
        self.blur_todo();
        let initial = match (kind, &self.memo.path) {
            (PromptKind::SaveAs, Some(path)) => path.display().to_string(),
            _ => String::new(),
        };
        self.path_prompt = Some(PathPrompt {
            kind,
            input: TextBuffer::from_text(initial),
        });
        self.mode = Mode::Prompt;
    }

    /// Start an empty, unnamed memo
    pub fn new_memo(&mut self) {
        self.blur_todo();
        self.memo.replace(String::new(), None);
        self.memo_scroll = 0;
        self.memo_changed();
        self.set_status("new memo");
    }

    // -- persistence ---------------------------------------------------------

    pub fn todo_changed(&mut self) {
        self.todo_save.mark(Instant::now());
    }

    pub fn memo_changed(&mut self) {
        self.memo_save.mark(Instant::now());
    }

    /// Write whichever channel is due. `force` writes everything pending.
    /// The to-do channel waits while an item is being carried, so a
    /// half-finished move never reaches disk.
    pub fn flush_saves(&mut self, now: Instant, force: bool) {
        if self.move_state.is_none() && self.todo_save.take(now, force) {
            self.ctx.store.save(&self.collection);
            self.set_status(SAVED_MESSAGE);
        }
        if self.memo_save.take(now, force)
            && let Err(e) = self.ctx.autosave.set(MEMO_AUTOSAVE_KEY, self.memo.text())
        {
            warn!(error = %e, "memo autosave failed");
        }
    }

    /// How long the event loop may sleep before a save is due
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        let todo = self
            .move_state
            .is_none()
            .then(|| self.todo_save.remaining(now))
            .flatten();
        [todo, self.memo_save.remaining(now)]
            .into_iter()
            .flatten()
            .min()
    }

    // -- status ------------------------------------------------------------

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            at: Instant::now(),
        });
    }

    pub fn status_text(&self, now: Instant) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|s| now.saturating_duration_since(s.at) < STATUS_TTL)
            .map(|s| s.text.as_str())
    }

    /// Commit any open edit, put back a carried item and stop the loop
    pub fn quit(&mut self) {
        self.blur_todo();
        self.should_quit = true;
    }
}

/// Run the TUI application
pub fn run(data_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = AppContext::open(data_dir)?;
    logging::init_tui(&ctx.paths);
    info!(data_dir = %ctx.paths.data_dir().display(), "starting");

    let mut app = App::new(ctx);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal before a panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Pending saves are written whatever the loop returned
    app.blur_todo();
    app.flush_saves(Instant::now(), true);
    info!("exiting");

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        let timeout = app
            .next_deadline(Instant::now())
            .map_or(POLL_INTERVAL, |d| d.min(POLL_INTERVAL));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }
        app.flush_saves(Instant::now(), false);

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::todo_store::TodoFile;
    use crate::tui::render::test_helpers::*;
    use std::fs;

    #[test]
    fn starts_from_saved_files() {
        let (tmp, app) = app_with_files(
            r#"{"immediate": ["call mom"], "backlog": ["paint"], "done": ["taxes"]}"#,
            Some(r##"{"autoSaveContent": "# Plan"}"##),
        );
        assert_eq!(app.collection.texts(Bucket::Backlog), vec!["paint"]);
        assert!(app.collection.at(Bucket::Done, 0).unwrap().done);
        assert_eq!(app.memo.text(), "# Plan");
        assert_eq!(app.todo_cursor, Some(TodoCursor::Header(Bucket::Immediate)));
        drop(tmp);
    }

    #[test]
    fn malformed_todo_file_starts_empty() {
        let (tmp, app) = app_with_files("{not json", None);
        assert!(app.collection.is_empty());
        assert_eq!(app.memo.text(), "");
        // the broken file is untouched until the next mutation
        assert_eq!(
            fs::read_to_string(tmp.path().join("todo.json")).unwrap(),
            "{not json"
        );
    }

    #[test]
    fn rows_follow_collapse_and_done_visibility() {
        let (_tmp, mut app) = app_with_todos(&["a"], &["b"], &["c"]);
        assert_eq!(app.visible_rows().len(), 6);
        app.todo_cursor = Some(TodoCursor::Header(Bucket::Backlog));
        app.toggle_collapse();
        assert_eq!(app.visible_rows().len(), 5);
        app.toggle_show_done();
        assert_eq!(app.visible_buckets(), vec![Bucket::Immediate, Bucket::Backlog]);
        assert_eq!(app.visible_rows().len(), 3);
    }

    #[test]
    fn zero_debounce_saves_on_flush() {
        let (tmp, mut app) = app_with_todos(&["a"], &[], &[]);
        app.move_cursor(1);
        app.toggle_selected();
        app.flush_saves(Instant::now(), false);
        let saved: TodoFile =
            serde_json::from_str(&fs::read_to_string(tmp.path().join("todo.json")).unwrap())
                .unwrap();
        assert_eq!(saved.done, vec!["a"]);
        assert_eq!(app.status_text(Instant::now()), Some(SAVED_MESSAGE));
    }

    #[test]
    fn debounced_save_waits_while_an_item_is_carried() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(
            tmp.path().join("todo.json"),
            r#"{"immediate": ["x", "a", "b"], "backlog": [], "done": []}"#,
        )
        .unwrap();
        let mut config = crate::model::config::AppConfig::default();
        config.todo.save_debounce_ms = 30;
        let mut app = app_in(&tmp, config);
        app.focus = Pane::Todo;
        let item = |app: &App, idx| app.collection.at(Bucket::Immediate, idx).unwrap().id;

        app.todo_cursor = Some(TodoCursor::Item(item(&app, 0)));
        app.delete_selected();
        app.todo_cursor = Some(TodoCursor::Item(item(&app, 0)));
        app.begin_move();
        app.move_step(true);
        app.move_step(true);
        assert_eq!(app.collection.texts(Bucket::Backlog), vec!["a"]);

        // the delete is overdue, but nothing is written mid-carry
        let later = Instant::now() + Duration::from_millis(100);
        assert_eq!(app.next_deadline(later), None);
        app.flush_saves(later, false);
        assert_eq!(saved_todos(&tmp).immediate, vec!["x", "a", "b"]);

        app.cancel_move();
        app.flush_saves(later, false);
        let saved = saved_todos(&tmp);
        assert_eq!(saved, TodoFile::from_collection(&app.collection));
        assert_eq!(saved.immediate, vec!["a", "b"]);
        assert!(saved.backlog.is_empty());
    }

    #[test]
    fn quitting_mid_carry_saves_the_restored_list() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("todo.json"), r#"{"immediate": ["a", "b"]}"#).unwrap();
        let mut config = crate::model::config::AppConfig::default();
        config.todo.save_debounce_ms = 60_000;
        let mut app = app_in(&tmp, config);
        app.focus = Pane::Todo;
        app.move_cursor(1);
        app.delete_selected();
        app.begin_move();
        app.move_step(false);
        app.quit();
        app.flush_saves(Instant::now(), true);
        assert_eq!(saved_todos(&tmp).immediate, vec!["b"]);
    }

    #[test]
    fn status_expires() {
        let (_tmp, mut app) = app_with_todos(&[], &[], &[]);
        app.set_status("hello");
        let later = Instant::now() + STATUS_TTL + Duration::from_millis(1);
        assert_eq!(app.status_text(later), None);
    }

    #[test]
    fn resize_is_bounded() {
        let (_tmp, mut app) = app_with_todos(&[], &[], &[]);
        app.focus = Pane::Chat;
        for _ in 0..30 {
            app.resize_focused(true);
        }
        assert_eq!(app.sizes[2], 90);
        for _ in 0..30 {
            app.resize_focused(false);
        }
        assert_eq!(app.sizes[2], RESIZE_STEP);
    }

    #[test]
    fn pane_cycle_wraps() {
        assert_eq!(Pane::Chat.next(), Pane::Memo);
        assert_eq!(Pane::Memo.prev(), Pane::Chat);
    }
}
