//! Terminal-side state that is not part of the browsing model.

use ratatui::widgets::TableState;

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Search text input mode.
    Search,
}

/// Card selection and search input.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct ShellState {
    /// Card table selection.
    pub table_state: TableState,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Search input buffer.
    pub search: String,
    card_count: usize,
}

impl ShellState {
    /// Creates an empty shell state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            search: String::new(),
            card_count: 0,
        }
    }

    /// Rebuilds the selection for a freshly applied grid.
    pub fn reset_selection(&mut self, card_count: usize) {
        self.card_count = card_count;
        self.table_state = TableState::default();
        if card_count > 0 {
            self.table_state.select(Some(0));
        }
    }

    /// Returns the selected card index.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.table_state
            .selected()
            .filter(|&idx| idx < self.card_count)
    }

    /// Moves the selection up.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_up(&mut self) {
        if let Some(current) = self.selected()
            && current > 0
        {
            self.table_state.select(Some(current - 1));
        }
    }

    /// Moves the selection down.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        if let Some(current) = self.selected()
            && current + 1 < self.card_count
        {
            self.table_state.select(Some(current + 1));
        }
    }

    /// Enters search mode with an empty buffer.
    pub fn start_search(&mut self) {
        self.search.clear();
        self.input_mode = InputMode::Search;
    }

    /// Leaves search mode and discards the buffer.
    pub fn cancel_search(&mut self) {
        self.search.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Leaves search mode and returns the submitted text.
    pub fn submit_search(&mut self) -> String {
        self.input_mode = InputMode::Normal;
        std::mem::take(&mut self.search)
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_selection() {
        // Arrange
        let mut shell = ShellState::new();

        // Act & Assert
        shell.reset_selection(3);
        assert_eq!(shell.selected(), Some(0));
        shell.reset_selection(0);
        assert_eq!(shell.selected(), None);
    }

    #[test]
    fn test_move_down_and_up_stay_in_range() {
        // Arrange
        let mut shell = ShellState::new();
        shell.reset_selection(2);

        // Act & Assert
        shell.move_down();
        assert_eq!(shell.selected(), Some(1));
        shell.move_down();
        assert_eq!(shell.selected(), Some(1));
        shell.move_up();
        shell.move_up();
        assert_eq!(shell.selected(), Some(0));
    }

    #[test]
    fn test_search_submit_and_cancel() {
        // Arrange
        let mut shell = ShellState::new();

        // Act
        shell.start_search();
        shell.search.push_str("matrix");
        let submitted = shell.submit_search();

        // Assert
        assert_eq!(submitted, "matrix");
        assert_eq!(shell.input_mode, InputMode::Normal);
        assert!(shell.search.is_empty());

        shell.start_search();
        shell.search.push('x');
        shell.cancel_search();
        assert!(shell.search.is_empty());
        assert_eq!(shell.input_mode, InputMode::Normal);
    }
}
