use std::fs::{self, OpenOptions};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("error opening {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error writing to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Logical cursor location: `col` counts characters, `row` indexes the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub col: usize,
    pub row: usize,
}

impl Position {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// One line of text without its newline. Columns are character indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    text: String,
}

impl Row {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn chars(&self) -> Vec<char> {
        self.text.chars().collect()
    }

    /// Characters `[start, start + width)`, cut short at the end of the row.
    pub fn slice(&self, start: usize, width: usize) -> &str {
        let from = self.byte_offset(start);
        let to = self.byte_offset(start.saturating_add(width));
        &self.text[from..to]
    }

    fn byte_offset(&self, col: usize) -> usize {
        self.text
            .char_indices()
            .nth(col)
            .map_or(self.text.len(), |(idx, _)| idx)
    }

    fn insert(&mut self, col: usize, ch: char) {
        let at = self.byte_offset(col);
        self.text.insert(at, ch);
    }

    fn remove(&mut self, col: usize) -> char {
        let at = self.byte_offset(col);
        self.text.remove(at)
    }

    fn split_off(&mut self, col: usize) -> Row {
        let at = self.byte_offset(col);
        Row::new(self.text.split_off(at))
    }

    fn append(&mut self, other: &Row) {
        self.text.push_str(&other.text);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    rows: Vec<Row>,
    dirty: bool,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits on `\n` only; a trailing newline yields a trailing empty row.
    pub fn from_text(text: &str) -> Self {
        Self {
            rows: text.split('\n').map(Row::new).collect(),
            dirty: false,
        }
    }

    /// Opens `path` for reading, creating it empty when it does not exist.
    pub fn load(path: &Path) -> Result<Self, FileError> {
        let open_err = |source| FileError::Open {
            path: path.to_path_buf(),
            source,
        };
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)
            .map_err(open_err)?;
        let mut text = String::new();
        file.read_to_string(&mut text).map_err(open_err)?;
        Ok(Self::from_text(&text))
    }

    /// Overwrites `path` with the rows joined by `\n` and returns the byte count.
    /// The dirty flag is only cleared when the write succeeds.
    pub fn save(&mut self, path: &Path) -> Result<usize, FileError> {
        let text = self.to_text();
        fs::write(path, &text).map_err(|source| FileError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        self.dirty = false;
        Ok(text.len())
    }

    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(Row::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    /// Length of row `at`, or 0 for the end-of-buffer row.
    pub fn row_len(&self, at: usize) -> usize {
        self.rows.get(at).map_or(0, Row::len)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn insert_char(&mut self, row: usize, col: usize, ch: char) {
        let Some(line) = self.rows.get_mut(row) else {
            return;
        };
        let col = col.min(line.len());
        line.insert(col, ch);
        self.dirty = true;
    }

    pub fn delete_char(&mut self, row: usize, col: usize) {
        let Some(line) = self.rows.get_mut(row) else {
            return;
        };
        if col >= line.len() {
            return;
        }
        line.remove(col);
        self.dirty = true;
    }

    pub fn insert_row(&mut self, at: usize, text: impl Into<String>) {
        let at = at.min(self.rows.len());
        self.rows.insert(at, Row::new(text));
        self.dirty = true;
    }

    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.dirty = true;
    }

    pub fn insert_char_at_cursor(&mut self, cursor: &mut Position, ch: char) {
        if cursor.row == self.rows.len() {
            self.insert_row(cursor.row, "");
        }
        self.insert_char(cursor.row, cursor.col, ch);
        cursor.col += 1;
    }

    /// Backspace: deletes left of the cursor, joining onto the previous row at column 0.
    pub fn delete_char_before_cursor(&mut self, cursor: &mut Position) {
        if cursor.row >= self.rows.len() {
            return;
        }
        if cursor.col == 0 && cursor.row == 0 {
            return;
        }
        if cursor.col > 0 {
            self.delete_char(cursor.row, cursor.col - 1);
            cursor.col -= 1;
            return;
        }

        let current = self.rows[cursor.row].clone();
        let previous = &mut self.rows[cursor.row - 1];
        cursor.col = previous.len();
        previous.append(&current);
        self.delete_row(cursor.row);
        cursor.row -= 1;
    }

    /// Delete key: removes the character under the cursor, or pulls the next
    /// row up when the cursor sits at the end of its row.
    pub fn delete_char_under_cursor(&mut self, cursor: &mut Position) {
        let len = self.row_len(cursor.row);
        if cursor.row >= self.rows.len() {
            return;
        }
        if cursor.col < len {
            self.delete_char(cursor.row, cursor.col);
            return;
        }
        if cursor.row + 1 < self.rows.len() {
            let next = self.rows[cursor.row + 1].clone();
            self.rows[cursor.row].append(&next);
            self.delete_row(cursor.row + 1);
            cursor.col = len;
        }
    }

    /// Enter: splits the row at the cursor and moves to the start of the new row.
    pub fn split_line_at_cursor(&mut self, cursor: &mut Position) {
        if cursor.col == 0 || cursor.row >= self.rows.len() {
            self.insert_row(cursor.row, "");
        } else {
            let tail = self.rows[cursor.row].split_off(cursor.col);
            self.rows.insert(cursor.row + 1, tail);
            self.dirty = true;
        }
        cursor.col = 0;
        cursor.row += 1;
    }
}
