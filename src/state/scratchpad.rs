/// Text scratchpad state
///
/// Owns the editor buffer and everything derived from it: line/word/character
/// statistics, the 1-based caret line, and the gutter display toggles.
/// Statistics are recomputed after every buffer mutation.
use std::sync::Arc;

use iced::widget::text_editor::{self, Action, Edit};

/// Derived statistics for the text buffer
///
/// All three counters are pure functions of the buffer contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    /// Newline-separated line count (0 for an empty buffer)
    pub lines: usize,
    /// Whitespace-delimited token count of the trimmed text
    pub words: usize,
    /// Unicode scalar count
    pub characters: usize,
}

impl TextStats {
    /// Compute statistics for the given buffer contents
    ///
    /// An empty buffer reports zero across the board so that clearing the
    /// scratchpad visibly resets every counter. Any non-empty buffer counts
    /// lines as split-on-newline segments, so `"a\nb"` is two lines and a
    /// trailing newline opens a new (empty) line.
    pub fn of(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }

        Self {
            lines: text.split('\n').count(),
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
        }
    }
}

/// Label for one gutter cell
///
/// In relative mode the caret line keeps its absolute number and every other
/// line shows its distance from the caret.
///
/// # Arguments
/// * `line` - 1-based line number of the cell
/// * `current` - 1-based caret line
/// * `relative` - whether relative numbering is active
pub fn gutter_label(line: usize, current: usize, relative: bool) -> usize {
    if relative && line != current {
        line.abs_diff(current)
    } else {
        line
    }
}

/// State for the text scratchpad tool
pub struct ScratchpadState {
    /// The editor buffer
    pub content: text_editor::Content,
    /// Whether the line-number gutter is shown
    pub show_line_numbers: bool,
    /// Relative gutter numbering (distance from the caret line)
    pub relative_line_numbers: bool,
    /// Soft-wrap long lines instead of extending them horizontally
    pub word_wrap: bool,
    /// 1-based caret line, kept in sync with the editor cursor
    pub current_line: usize,
    /// Statistics for the current buffer contents
    pub stats: TextStats,
}

impl Default for ScratchpadState {
    fn default() -> Self {
        Self {
            content: text_editor::Content::new(),
            show_line_numbers: true,
            relative_line_numbers: false,
            word_wrap: false,
            current_line: 1,
            stats: TextStats::default(),
        }
    }
}

impl ScratchpadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current buffer contents
    pub fn text(&self) -> String {
        self.content.text()
    }

    /// Apply an editor action and refresh everything derived from the buffer
    pub fn apply(&mut self, action: Action) {
        self.content.perform(action);
        self.refresh();
    }

    /// Insert clipboard text at the caret
    pub fn insert_clipboard(&mut self, text: String) {
        self.content.perform(Action::Edit(Edit::Paste(Arc::new(text))));
        self.refresh();
    }

    /// Reset the buffer and all derived state
    pub fn clear(&mut self) {
        self.content = text_editor::Content::new();
        self.current_line = 1;
        self.stats = TextStats::default();
    }

    /// Recompute statistics and the caret line from the editor state
    fn refresh(&mut self) {
        self.stats = TextStats::of(&self.text());

        let (line, _column) = self.content.cursor_position();
        self.current_line = line + 1;
    }

    /// Number of gutter rows to render (at least one, for the empty buffer)
    pub fn gutter_rows(&self) -> usize {
        self.stats.lines.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_empty() {
        let stats = TextStats::of("");
        assert_eq!(stats, TextStats::default());
        assert_eq!(stats.lines, 0);
        assert_eq!(stats.words, 0);
        assert_eq!(stats.characters, 0);
    }

    #[test]
    fn test_stats_single_line() {
        let stats = TextStats::of("hello world");
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.words, 2);
        assert_eq!(stats.characters, 11);
    }

    #[test]
    fn test_stats_multi_newline() {
        let stats = TextStats::of("one\ntwo\n\nthree");
        assert_eq!(stats.lines, 4);
        assert_eq!(stats.words, 3);
        assert_eq!(stats.characters, 14);
    }

    #[test]
    fn test_stats_trailing_newline_opens_a_line() {
        let stats = TextStats::of("one\n");
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.words, 1);
    }

    #[test]
    fn test_stats_whitespace_only_has_no_words() {
        let stats = TextStats::of("  \t  ");
        assert_eq!(stats.lines, 1);
        assert_eq!(stats.words, 0);
        assert_eq!(stats.characters, 5);
    }

    #[test]
    fn test_stats_counts_unicode_scalars() {
        let stats = TextStats::of("héllo");
        assert_eq!(stats.characters, 5);
    }

    #[test]
    fn test_gutter_absolute() {
        assert_eq!(gutter_label(3, 7, false), 3);
        assert_eq!(gutter_label(7, 7, false), 7);
    }

    #[test]
    fn test_gutter_relative() {
        // The caret line keeps its absolute number
        assert_eq!(gutter_label(7, 7, true), 7);
        assert_eq!(gutter_label(4, 7, true), 3);
        assert_eq!(gutter_label(10, 7, true), 3);
    }

    #[test]
    fn test_paste_then_copy_round_trip() {
        let mut state = ScratchpadState::new();
        state.insert_clipboard("alpha\nbeta".to_string());

        assert_eq!(state.text(), "alpha\nbeta");
        assert_eq!(state.stats.lines, 2);
        assert_eq!(state.stats.words, 2);
        // Paste leaves the caret at the end of the inserted text
        assert_eq!(state.current_line, 2);
    }

    #[test]
    fn test_clear_resets_derived_state() {
        let mut state = ScratchpadState::new();
        state.insert_clipboard("some\ntext here".to_string());
        assert_ne!(state.stats, TextStats::default());

        state.clear();

        assert_eq!(state.text(), "");
        assert_eq!(state.stats, TextStats::default());
        assert_eq!(state.current_line, 1);
        assert_eq!(state.gutter_rows(), 1);
    }
}
