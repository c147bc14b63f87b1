//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen layout: one column per pane and a bottom status bar.
pub struct AppLayout {
    pub pane_areas: Vec<Rect>,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect, panes: usize) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // panes (take all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let count = panes.max(1) as u32;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
            .split(rows[0]);

        Self {
            pane_areas: columns.iter().take(panes).copied().collect(),
            status_area: rows[1],
        }
    }
}
