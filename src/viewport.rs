use crate::document::{Document, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

/// The visible window onto the document, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub row_offset: usize,
    pub col_offset: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Viewport {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Slides the window by the smallest amount that keeps `cursor` visible.
    pub fn scroll(&mut self, cursor: Position) {
        if cursor.row < self.row_offset {
            self.row_offset = cursor.row;
        }
        if cursor.row >= self.row_offset + self.rows {
            self.row_offset = cursor.row + 1 - self.rows;
        }
        if cursor.col < self.col_offset {
            self.col_offset = cursor.col;
        }
        if cursor.col >= self.col_offset + self.cols {
            self.col_offset = cursor.col + 1 - self.cols;
        }
    }

    pub fn contains(&self, cursor: Position) -> bool {
        (self.row_offset..self.row_offset + self.rows).contains(&cursor.row)
            && (self.col_offset..self.col_offset + self.cols).contains(&cursor.col)
    }
}

pub fn move_cursor(cursor: &mut Position, movement: Movement, doc: &Document, viewport: &Viewport) {
    match movement {
        Movement::PageUp => {
            cursor.row = viewport.row_offset;
            for _ in 0..viewport.rows {
                step(cursor, Movement::Up, doc);
            }
        }
        Movement::PageDown => {
            for _ in 0..viewport.rows {
                step(cursor, Movement::Down, doc);
            }
        }
        other => step(cursor, other, doc),
    }
}

fn step(cursor: &mut Position, movement: Movement, doc: &Document) {
    match movement {
        Movement::Up => {
            cursor.row = cursor.row.saturating_sub(1);
        }
        Movement::Down => {
            if cursor.row + 1 < doc.len() {
                cursor.row += 1;
            }
        }
        Movement::Left => {
            if cursor.col > 0 {
                cursor.col -= 1;
            } else if cursor.row > 0 {
                cursor.row -= 1;
                cursor.col = doc.row_len(cursor.row);
            }
        }
        Movement::Right => {
            if let Some(row) = doc.row(cursor.row) {
                if cursor.col < row.len() {
                    cursor.col += 1;
                } else if cursor.row + 1 < doc.len() {
                    cursor.row += 1;
                    cursor.col = 0;
                }
            }
        }
        Movement::Home => cursor.col = 0,
        Movement::End => cursor.col = doc.row_len(cursor.row),
        Movement::PageUp | Movement::PageDown => {}
    }
    cursor.col = cursor.col.min(doc.row_len(cursor.row));
}

#[cfg(test)]
mod tests {
    use super::{move_cursor, Movement, Viewport};
    use crate::document::{Document, Position};

    const ALL_MOVES: [Movement; 8] = [
        Movement::Up,
        Movement::Down,
        Movement::Left,
        Movement::Right,
        Movement::Home,
        Movement::End,
        Movement::PageUp,
        Movement::PageDown,
    ];

    fn doc(rows: &[&str]) -> Document {
        Document::from_text(&rows.join("\n"))
    }

    fn moved(doc: &Document, start: Position, movement: Movement) -> Position {
        let mut cursor = start;
        move_cursor(&mut cursor, movement, doc, &Viewport::new(3, 10));
        cursor
    }

    #[test]
    fn vertical_moves_clamp_column_to_landing_row() {
        let d = doc(&["a long row", "ab", "abcdef"]);
        assert_eq!(moved(&d, Position::new(8, 0), Movement::Down), Position::new(2, 1));
        assert_eq!(moved(&d, Position::new(5, 2), Movement::Up), Position::new(2, 1));
    }

    #[test]
    fn vertical_moves_stop_at_buffer_edges() {
        let d = doc(&["one", "two"]);
        assert_eq!(moved(&d, Position::new(1, 0), Movement::Up), Position::new(1, 0));
        assert_eq!(moved(&d, Position::new(1, 1), Movement::Down), Position::new(1, 1));
    }

    #[test]
    fn horizontal_moves_wrap_between_rows() {
        let d = doc(&["abc", "de"]);
        assert_eq!(moved(&d, Position::new(0, 1), Movement::Left), Position::new(3, 0));
        assert_eq!(moved(&d, Position::new(3, 0), Movement::Right), Position::new(0, 1));
        assert_eq!(moved(&d, Position::new(2, 1), Movement::Right), Position::new(2, 1));
        assert_eq!(moved(&d, Position::new(0, 0), Movement::Left), Position::new(0, 0));
    }

    #[test]
    fn home_and_end_jump_within_row() {
        let d = doc(&["hello"]);
        assert_eq!(moved(&d, Position::new(3, 0), Movement::Home), Position::new(0, 0));
        assert_eq!(moved(&d, Position::new(1, 0), Movement::End), Position::new(5, 0));
    }

    #[test]
    fn page_up_snaps_to_top_of_page_first() {
        let d = doc(&["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]);
        let mut viewport = Viewport::new(3, 10);
        viewport.row_offset = 6;
        let mut cursor = Position::new(0, 8);
        move_cursor(&mut cursor, Movement::PageUp, &d, &viewport);
        assert_eq!(cursor, Position::new(0, 3));

        move_cursor(&mut cursor, Movement::PageDown, &d, &viewport);
        assert_eq!(cursor, Position::new(0, 6));
    }

    #[test]
    fn column_never_exceeds_row_length_after_any_move() {
        let d = doc(&["abcdef", "", "abc", "abcdefghij", "x"]);
        for row in 0..d.len() {
            for col in 0..=d.row_len(row) {
                for movement in ALL_MOVES {
                    let cursor = moved(&d, Position::new(col, row), movement);
                    assert!(cursor.row < d.len());
                    assert!(cursor.col <= d.row_len(cursor.row), "{movement:?} from ({col},{row})");
                }
            }
        }
    }

    #[test]
    fn scroll_keeps_cursor_inside_with_minimal_slide() {
        let mut viewport = Viewport::new(5, 10);
        viewport.scroll(Position::new(0, 7));
        assert_eq!((viewport.row_offset, viewport.col_offset), (3, 0));
        viewport.scroll(Position::new(12, 7));
        assert_eq!((viewport.row_offset, viewport.col_offset), (3, 3));
        viewport.scroll(Position::new(4, 4));
        assert_eq!((viewport.row_offset, viewport.col_offset), (3, 3));
        viewport.scroll(Position::new(1, 1));
        assert_eq!((viewport.row_offset, viewport.col_offset), (1, 1));
    }

    #[test]
    fn viewport_contains_cursor_after_every_move() {
        let rows: Vec<String> = (0..40).map(|n| "x".repeat(n)).collect();
        let d = Document::from_text(&rows.join("\n"));
        let mut viewport = Viewport::new(4, 8);
        let mut cursor = Position::default();
        let script = [
            Movement::PageDown,
            Movement::End,
            Movement::PageDown,
            Movement::Left,
            Movement::PageUp,
            Movement::End,
            Movement::Right,
            Movement::Down,
            Movement::Home,
            Movement::PageUp,
        ];
        for movement in script {
            move_cursor(&mut cursor, movement, &d, &viewport);
            viewport.scroll(cursor);
            assert!(viewport.contains(cursor), "{movement:?} left {cursor:?} outside {viewport:?}");
        }
    }
}
