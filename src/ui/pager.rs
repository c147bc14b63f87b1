//! Widget that renders one [`Pane`] at its current scroll offset.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::app::state::Pane;
use crate::core::geometry::Axis;

use super::theme::Theme;

/// The pager widget, created fresh each frame.
pub struct PagerWidget<'a> {
    pane: &'a Pane,
    focused: bool,
}

impl<'a> PagerWidget<'a> {
    pub fn new(pane: &'a Pane) -> Self {
        Self {
            pane,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn title(&self) -> Line<'a> {
        let pct = (self.pane.viewport.fraction(Axis::Y) * 100.0).round() as u32;
        let position = format!(" {pct}% ");
        let position = if self.pane.is_animating() {
            Span::styled(position, Theme::animating_style())
        } else {
            Span::raw(position)
        };
        Line::from(vec![
            Span::styled(format!(" {} ", self.pane.document.name), Theme::title_style()),
            position,
        ])
    }

    /// Visible slice of one line, starting at `first_col`.
    fn visible_text(line: &str, first_col: usize, width: usize) -> String {
        line.chars().skip(first_col).take(width).collect()
    }
}

impl Widget for PagerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_style(Theme::border_style(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        let first_row = self.pane.first_row();
        let first_col = self.pane.first_col();
        let width = inner.width as usize;

        for (i, line_idx) in (first_row..self.pane.document.height())
            .take(inner.height as usize)
            .enumerate()
        {
            let text = Self::visible_text(&self.pane.document.lines[line_idx], first_col, width);
            let y = inner.y + i as u16;
            let style = if self.pane.selected_line == Some(line_idx) {
                let style = Theme::selected_line_style();
                buf.set_style(Rect::new(inner.x, y, inner.width, 1), style);
                style
            } else {
                Theme::text_style()
            };
            buf.set_stringn(inner.x, y, &text, width, style);
        }
    }
}
