use crate::document::{Document, Position};
use crate::viewport::Viewport;

// A match closer than this to the right edge scrolls the view onto it.
const EDGE_MARGIN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Where the last match was and which way the next scan goes.
/// `col == None` is the "no anchor" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchState {
    pub row: usize,
    pub col: Option<usize>,
    pub direction: Direction,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            row: 0,
            col: None,
            direction: Direction::Forward,
        }
    }
}

impl SearchState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_fresh(&self) -> bool {
        self.row == 0 && self.col.is_none()
    }

    /// Scans from the last match in the current direction, wrapping around the
    /// buffer. Visits at most `len + 1` rows so the anchor row is re-read once
    /// with a fresh anchor. On a miss the state is left as it was.
    pub fn find_next(&mut self, doc: &Document, query: &str, case_sensitive: bool) -> Option<Position> {
        if query.is_empty() || doc.len() == 0 {
            return None;
        }
        if self.is_fresh() {
            self.direction = Direction::Forward;
        }

        let needle: Vec<char> = query.chars().collect();
        let total = doc.len();
        let mut current = self.row.min(total - 1);
        let mut anchor = self.col;

        // len + 1 rows, not len - 1: a lone match must be able to wrap onto itself.
        for _ in 0..=total {
            let haystack = doc.row(current).map(|row| row.chars()).unwrap_or_default();
            let hit = match self.direction {
                Direction::Forward => {
                    let from = anchor.map_or(0, |col| col + 1);
                    find_from(&haystack, &needle, from, case_sensitive)
                }
                Direction::Backward => {
                    let before = anchor.unwrap_or(haystack.len());
                    rfind_before(&haystack, &needle, before, case_sensitive)
                }
            };
            if let Some(col) = hit {
                self.row = current;
                self.col = Some(col);
                return Some(Position::new(col, current));
            }

            current = match self.direction {
                Direction::Forward if current + 1 == total => 0,
                Direction::Forward => current + 1,
                Direction::Backward if current == 0 => total - 1,
                Direction::Backward => current - 1,
            };
            anchor = None;
        }
        None
    }
}

/// Scrolls so that a match at `pos` is visible: the match row goes to the top,
/// and the columns jump when the match sits near or past the right edge.
pub fn reveal(viewport: &mut Viewport, pos: Position) {
    if pos.col.saturating_sub(viewport.col_offset) > viewport.cols.saturating_sub(EDGE_MARGIN) {
        viewport.col_offset = pos.col;
    }
    viewport.row_offset = pos.row;
}

fn chars_match(a: char, b: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.eq_ignore_ascii_case(&b)
    }
}

fn matches_at(haystack: &[char], needle: &[char], at: usize, case_sensitive: bool) -> bool {
    haystack[at..at + needle.len()]
        .iter()
        .zip(needle)
        .all(|(a, b)| chars_match(*a, *b, case_sensitive))
}

fn find_from(haystack: &[char], needle: &[char], from: usize, case_sensitive: bool) -> Option<usize> {
    let last_start = haystack.len().checked_sub(needle.len())?;
    (from..=last_start).find(|&at| matches_at(haystack, needle, at, case_sensitive))
}

// The whole match must end at or before `before`.
fn rfind_before(haystack: &[char], needle: &[char], before: usize, case_sensitive: bool) -> Option<usize> {
    let end = before.min(haystack.len());
    let last_start = end.checked_sub(needle.len())?;
    (0..=last_start)
        .rev()
        .find(|&at| matches_at(haystack, needle, at, case_sensitive))
}

#[cfg(test)]
mod tests {
    use super::{reveal, Direction, SearchState};
    use crate::document::{Document, Position};
    use crate::viewport::Viewport;

    fn doc(rows: &[&str]) -> Document {
        Document::from_text(&rows.join("\n"))
    }

    #[test]
    fn first_forward_scan_finds_leftmost_match() {
        let d = doc(&["hello world", "goodbye"]);
        let mut state = SearchState::default();
        assert_eq!(state.find_next(&d, "lo", false), Some(Position::new(3, 0)));
        assert_eq!(state.row, 0);
        assert_eq!(state.col, Some(3));
    }

    #[test]
    fn lone_match_wraps_onto_itself_in_both_directions() {
        let d = doc(&["hello world", "goodbye"]);
        let mut state = SearchState::default();
        state.find_next(&d, "lo", false);
        assert_eq!(state.find_next(&d, "lo", false), Some(Position::new(3, 0)));
        state.direction = Direction::Backward;
        assert_eq!(state.find_next(&d, "lo", false), Some(Position::new(3, 0)));
    }

    #[test]
    fn forward_wraps_and_backward_returns_to_previous() {
        let d = doc(&["hello world", "lo and behold", "yellow"]);
        let mut state = SearchState::default();
        assert_eq!(state.find_next(&d, "lo", false), Some(Position::new(3, 0)));
        assert_eq!(state.find_next(&d, "lo", false), Some(Position::new(0, 1)));
        assert_eq!(state.find_next(&d, "lo", false), Some(Position::new(3, 2)));
        assert_eq!(state.find_next(&d, "lo", false), Some(Position::new(3, 0)));

        state.direction = Direction::Backward;
        assert_eq!(state.find_next(&d, "lo", false), Some(Position::new(3, 2)));
        assert_eq!(state.find_next(&d, "lo", false), Some(Position::new(0, 1)));
    }

    #[test]
    fn several_matches_on_one_row() {
        let d = doc(&["abcabcabc"]);
        let mut state = SearchState::default();
        assert_eq!(state.find_next(&d, "abc", false), Some(Position::new(0, 0)));
        assert_eq!(state.find_next(&d, "abc", false), Some(Position::new(3, 0)));
        assert_eq!(state.find_next(&d, "abc", false), Some(Position::new(6, 0)));
        state.direction = Direction::Backward;
        assert_eq!(state.find_next(&d, "abc", false), Some(Position::new(3, 0)));
    }

    #[test]
    fn case_folding_is_optional() {
        let d = doc(&["Hello"]);
        let mut state = SearchState::default();
        assert_eq!(state.find_next(&d, "hELLO", false), Some(Position::new(0, 0)));
        state.reset();
        assert_eq!(state.find_next(&d, "hELLO", true), None);
    }

    #[test]
    fn fresh_state_forces_forward() {
        let d = doc(&["one", "two"]);
        let mut state = SearchState {
            direction: Direction::Backward,
            ..SearchState::default()
        };
        assert_eq!(state.find_next(&d, "two", false), Some(Position::new(0, 1)));
        assert_eq!(state.direction, Direction::Forward);
    }

    #[test]
    fn miss_terminates_and_keeps_state() {
        let d = doc(&["alpha", "beta", "gamma"]);
        let mut state = SearchState::default();
        state.find_next(&d, "beta", false);
        let before = state;
        assert_eq!(state.find_next(&d, "zeta", false), None);
        assert_eq!(state, before);
        assert_eq!(SearchState::default().find_next(&Document::new(), "a", false), None);
        assert_eq!(state.find_next(&d, "", false), None);
    }

    #[test]
    fn reveal_scrolls_to_match() {
        let mut viewport = Viewport::new(10, 20);
        reveal(&mut viewport, Position::new(4, 30));
        assert_eq!((viewport.row_offset, viewport.col_offset), (30, 0));
        reveal(&mut viewport, Position::new(17, 31));
        assert_eq!((viewport.row_offset, viewport.col_offset), (31, 17));
    }
}
