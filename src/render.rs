use crate::app::EditorState;
use crate::syntax::{self, Span};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate};
use std::borrow::Cow;
use std::io::{self, Write};
use std::time::{Duration, Instant};

const WELCOME: &str = concat!("quill editor -- version ", env!("CARGO_PKG_VERSION"));
const NAME_WIDTH: usize = 20;

/// Transient message-bar text. Expiry is checked when a frame is drawn.
#[derive(Debug, Clone, Default)]
pub struct StatusMessage {
    text: String,
    set_at: Option<Instant>,
}

impl StatusMessage {
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.set_at = Some(Instant::now());
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.set_at = None;
    }

    pub fn visible(&self, now: Instant, timeout: Duration) -> Option<&str> {
        let set_at = self.set_at?;
        if self.text.is_empty() || now.saturating_duration_since(set_at) >= timeout {
            return None;
        }
        Some(&self.text)
    }
}

/// Queues one complete frame. Callers flush `out` in a single write so the
/// hidden-cursor repaint reaches the terminal at once.
pub fn draw_frame<W: Write>(
    out: &mut W,
    state: &EditorState,
    now: Instant,
    message_timeout: Duration,
) -> io::Result<()> {
    queue!(out, BeginSynchronizedUpdate, Hide, MoveTo(0, 0))?;
    draw_rows(out, state)?;
    draw_status_bar(out, state)?;
    draw_message_bar(out, state, now, message_timeout)?;

    let viewport = &state.viewport;
    let row = state.cursor.row.saturating_sub(viewport.row_offset);
    let col = state.cursor.col.saturating_sub(viewport.col_offset);
    queue!(out, MoveTo(to_cell(col), to_cell(row)), Show, EndSynchronizedUpdate)?;
    Ok(())
}

fn draw_rows<W: Write>(out: &mut W, state: &EditorState) -> io::Result<()> {
    let viewport = &state.viewport;
    let profile = state.file.language();
    let welcome_row = viewport.rows / 3;

    for y in 0..viewport.rows {
        let file_row = y + viewport.row_offset;
        if let Some(row) = state.doc.row(file_row) {
            let visible = row.slice(viewport.col_offset, viewport.cols);
            for span in syntax::highlight(visible, profile) {
                draw_span(out, span)?;
            }
        } else if y == welcome_row && state.is_pristine() {
            queue!(out, Print(centered(WELCOME, viewport.cols)))?;
        }
        queue!(out, Clear(ClearType::UntilNewLine), Print("\r\n"))?;
    }
    Ok(())
}

fn draw_span<W: Write>(out: &mut W, span: Span<'_>) -> io::Result<()> {
    let text = printable(span.text);
    match span.highlight.color() {
        Some(color) => queue!(
            out,
            SetForegroundColor(color),
            Print(text),
            SetForegroundColor(Color::Reset)
        ),
        None => queue!(out, Print(text)),
    }
}

fn draw_status_bar<W: Write>(out: &mut W, state: &EditorState) -> io::Result<()> {
    let name: String = state.file.display_name().chars().take(NAME_WIDTH).collect();
    let modified = if state.doc.is_dirty() { "(modified)" } else { "" };
    let left = format!("{name} - {} lines {modified}", state.doc.len());
    let right = format!("{}/{}", state.cursor.row + 1, state.doc.len());
    queue!(
        out,
        SetAttribute(Attribute::Reverse),
        Print(status_line(&left, &right, state.viewport.cols)),
        SetAttribute(Attribute::Reset),
        Print("\r\n")
    )
}

fn draw_message_bar<W: Write>(
    out: &mut W,
    state: &EditorState,
    now: Instant,
    timeout: Duration,
) -> io::Result<()> {
    queue!(out, Clear(ClearType::UntilNewLine))?;
    if let Some(message) = state.status.visible(now, timeout) {
        let shown: String = message.chars().take(state.viewport.cols).collect();
        queue!(out, Print(printable(&shown).into_owned()))?;
    }
    Ok(())
}

/// `left` and `right` separated by spaces, exactly `width` characters long.
fn status_line(left: &str, right: &str, width: usize) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = width.saturating_sub(used);
    let mut line: String = format!("{left}{}{right}", " ".repeat(gap))
        .chars()
        .take(width)
        .collect();
    let len = line.chars().count();
    line.extend(std::iter::repeat_n(' ', width - len));
    line
}

fn centered(text: &str, width: usize) -> String {
    let shown: String = text.chars().take(width).collect();
    let pad = (width - shown.chars().count()) / 2;
    format!("{}{shown}", " ".repeat(pad))
}

// One column must stay one cell: tabs become a space, other controls a '?'.
fn printable(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|ch| match ch {
                '\t' => ' ',
                c if c.is_control() => '?',
                c => c,
            })
            .collect(),
    )
}

fn to_cell(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
