use crate::config::Config;
use crate::document::{Document, Position};
use crate::keys::{self, ctrl, ByteSource, Key};
use crate::render::{self, StatusMessage};
use crate::search::{self, Direction, SearchState};
use crate::syntax::{self, LanguageProfile};
use crate::terminal::{self, TerminalGuard, TerminalInput};
use crate::viewport::{self, Movement, Viewport};
use anyhow::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

const CTRL_C: u8 = ctrl(b'c');
const CTRL_F: u8 = ctrl(b'f');
const CTRL_H: u8 = ctrl(b'h');
const CTRL_Q: u8 = ctrl(b'q');
const CTRL_S: u8 = ctrl(b's');

// Rows taken by the status and message bars.
const BAR_ROWS: usize = 2;

pub fn run_app(path: Option<PathBuf>, config: Config) -> Result<()> {
    // Load before raw mode so a fatal open error prints on a sane terminal.
    let doc = match &path {
        Some(path) => Some(Document::load(path)?),
        None => None,
    };

    let input = TerminalInput::new(config.escape_timeout())?;
    let size = terminal::window_size()?;
    let _guard = TerminalGuard::enter()?;

    let mut editor = Editor::new(input, io::stdout(), config, size);
    if let (Some(path), Some(doc)) = (path, doc) {
        editor.open(path, doc);
    }
    editor.run()
}

#[derive(Debug, Clone, Default)]
pub struct FileInfo {
    pub path: Option<PathBuf>,
    pub file_type: Option<String>,
    pub loaded: bool,
}

impl FileInfo {
    pub fn set_path(&mut self, path: PathBuf) {
        self.file_type = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());
        self.path = Some(path);
    }

    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "[No Name]".to_string(), |path| path.display().to_string())
    }

    pub fn language(&self) -> Option<&'static LanguageProfile> {
        self.file_type.as_deref().and_then(syntax::profile_for)
    }
}

/// Everything one editing session mutates.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub doc: Document,
    pub cursor: Position,
    pub viewport: Viewport,
    pub quit_times: u8,
    pub file: FileInfo,
    pub status: StatusMessage,
    pub search: SearchState,
}

impl EditorState {
    /// `screen_rows` includes the two bar rows.
    pub fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            doc: Document::new(),
            cursor: Position::default(),
            viewport: Viewport::new(screen_rows.saturating_sub(BAR_ROWS), screen_cols),
            quit_times: Config::default().quit_times,
            file: FileInfo::default(),
            status: StatusMessage::default(),
            search: SearchState::default(),
        }
    }

    /// Never loaded and never edited.
    pub fn is_pristine(&self) -> bool {
        !self.file.loaded && !self.doc.is_dirty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

type PromptCallback<I, W> = fn(&mut Editor<I, W>, &str, Key);

pub struct Editor<I, W> {
    pub state: EditorState,
    input: I,
    out: W,
    config: Config,
}

impl<I: ByteSource, W: Write> Editor<I, W> {
    pub fn new(input: I, out: W, config: Config, (rows, cols): (usize, usize)) -> Self {
        let mut state = EditorState::new(rows, cols);
        state.quit_times = config.quit_times;
        state.status.set("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find");
        Self {
            state,
            input,
            out,
            config,
        }
    }

    pub fn open(&mut self, path: PathBuf, doc: Document) {
        info!(path = %path.display(), rows = doc.len(), "opened file");
        self.state.doc = doc;
        self.state.cursor = Position::default();
        self.state.file.set_path(path);
        self.state.file.loaded = true;
        self.state.quit_times = self.config.quit_times;
        if let Some(profile) = self.state.file.language() {
            debug!(language = profile.name, "syntax profile selected");
        }
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            self.refresh_screen().context("Failed to draw frame")?;
            let key = self.read_key().context("Failed to read input")?;
            if self.process_key(key)? == Flow::Quit {
                break;
            }
        }
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        self.out.flush()?;
        info!("quit");
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        keys::read_key(&mut self.input)
    }

    pub fn refresh_screen(&mut self) -> io::Result<()> {
        self.state.viewport.scroll(self.state.cursor);
        debug_assert!(self.state.viewport.contains(self.state.cursor));
        let mut frame = Vec::new();
        render::draw_frame(
            &mut frame,
            &self.state,
            Instant::now(),
            self.config.message_timeout(),
        )?;
        self.out.write_all(&frame)?;
        self.out.flush()
    }

    pub fn process_key(&mut self, key: Key) -> io::Result<Flow> {
        let state = &mut self.state;
        match key {
            Key::Control(CTRL_Q) => return Ok(self.request_quit()),
            Key::Control(CTRL_S) => self.save()?,
            Key::Control(CTRL_F) => self.find()?,
            Key::Enter => state.doc.split_line_at_cursor(&mut state.cursor),
            Key::ArrowUp => self.move_cursor(Movement::Up),
            Key::ArrowDown => self.move_cursor(Movement::Down),
            Key::ArrowLeft => self.move_cursor(Movement::Left),
            Key::ArrowRight => self.move_cursor(Movement::Right),
            Key::PageUp => self.move_cursor(Movement::PageUp),
            Key::PageDown => self.move_cursor(Movement::PageDown),
            Key::Home => self.move_cursor(Movement::Home),
            Key::End => self.move_cursor(Movement::End),
            Key::Backspace | Key::Control(CTRL_H) => {
                state.doc.delete_char_before_cursor(&mut state.cursor);
            }
            Key::Delete => state.doc.delete_char_under_cursor(&mut state.cursor),
            Key::Tab => {
                for _ in 0..self.config.tab_stop {
                    state.doc.insert_char_at_cursor(&mut state.cursor, ' ');
                }
            }
            Key::Printable(ch) => state.doc.insert_char_at_cursor(&mut state.cursor, ch),
            // Ctrl-L, Escape and unbound control keys do nothing.
            Key::Escape | Key::Control(_) => {}
        }
        Ok(Flow::Continue)
    }

    fn move_cursor(&mut self, movement: Movement) {
        let state = &mut self.state;
        viewport::move_cursor(&mut state.cursor, movement, &state.doc, &state.viewport);
    }

    fn request_quit(&mut self) -> Flow {
        let state = &mut self.state;
        if state.doc.is_dirty() && state.quit_times > 0 {
            state.status.set(format!(
                "WARNING: File has unsaved changes. Press Ctrl-Q {} more time(s) to quit",
                state.quit_times
            ));
            state.quit_times -= 1;
            return Flow::Continue;
        }
        Flow::Quit
    }

    fn save(&mut self) -> io::Result<()> {
        let path = match self.state.file.path.clone() {
            Some(path) => path,
            None => match self.prompt("Save as", "(Ctrl-C to cancel)", None)? {
                Some(name) => PathBuf::from(name),
                None => {
                    self.state.status.set("Save aborted");
                    return Ok(());
                }
            },
        };

        match self.state.doc.save(&path) {
            Ok(bytes) => {
                info!(path = %path.display(), bytes, "saved file");
                let state = &mut self.state;
                state.file.set_path(path);
                state.file.loaded = true;
                state.quit_times = self.config.quit_times;
                state.status.set(format!("{bytes} bytes written to disk"));
            }
            Err(err) => {
                warn!(error = %err, "save failed");
                self.state.status.set(format!("Can't save! {err}"));
            }
        }
        Ok(())
    }

    fn find(&mut self) -> io::Result<()> {
        let saved_cursor = self.state.cursor;
        let saved_viewport = self.state.viewport;
        let query = self.prompt("Search", "(Use ESC/Arrows/Enter)", Some(Self::on_search_key))?;
        if query.is_none() {
            self.state.cursor = saved_cursor;
            self.state.viewport = saved_viewport;
        }
        Ok(())
    }

    fn on_search_key(&mut self, query: &str, key: Key) {
        let state = &mut self.state;
        match key {
            Key::Enter | Key::Escape | Key::Control(CTRL_C) => {
                state.search.reset();
                return;
            }
            Key::ArrowRight | Key::ArrowDown => state.search.direction = Direction::Forward,
            Key::ArrowLeft | Key::ArrowUp => state.search.direction = Direction::Backward,
            _ => state.search.reset(),
        }

        let case_sensitive = self.config.search_case_sensitive;
        if let Some(pos) = state.search.find_next(&state.doc, query, case_sensitive) {
            debug!(query, row = pos.row, col = pos.col, "search match");
            state.cursor = pos;
            search::reveal(&mut state.viewport, pos);
        }
    }

    /// Edits a one-line answer in the message bar. Enter returns it (only when
    /// non-empty); Escape or Ctrl-C returns `None`. `callback` sees every key.
    fn prompt(
        &mut self,
        label: &str,
        hint: &str,
        callback: Option<PromptCallback<I, W>>,
    ) -> io::Result<Option<String>> {
        let mut answer = String::new();
        loop {
            self.state.status.set(format!("{label}: {answer} {hint}"));
            self.refresh_screen()?;
            let key = self.read_key()?;
            match key {
                Key::Backspace | Key::Control(CTRL_H) => {
                    answer.pop();
                }
                Key::Escape | Key::Control(CTRL_C) => {
                    self.state.status.clear();
                    if let Some(callback) = callback {
                        callback(self, &answer, key);
                    }
                    return Ok(None);
                }
                Key::Enter if !answer.is_empty() => {
                    self.state.status.clear();
                    if let Some(callback) = callback {
                        callback(self, &answer, key);
                    }
                    return Ok(Some(answer));
                }
                Key::Printable(ch) => answer.push(ch),
                _ => {}
            }
            if let Some(callback) = callback {
                callback(self, &answer, key);
            }
        }
    }
}
