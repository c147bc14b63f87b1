//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{
    animator::AnimatorState,
    document::Document,
    drag::DragScroll,
    frame::FrameQueue,
    geometry::Vec2,
    target::{ScrollTarget, Viewport},
    wheel::WheelScroll,
};

/// One scrollable pane: a document, its viewport and the two impulse
/// sources that drive it.  Each pane animates independently.
pub struct Pane {
    pub document: Document,
    pub viewport: Viewport,
    pub drag: DragScroll,
    pub wheel: WheelScroll,
    /// Outer area including the border.  Set on every layout pass.
    pub area: Rect,
    /// Line chosen by the last delivered click.
    pub selected_line: Option<usize>,
    cell: Vec2,
}

impl Pane {
    pub fn new(document: Document, config: &AppConfig) -> Self {
        let cell = Vec2::new(config.cell_width_px, config.cell_height_px);
        let content = Vec2::new(
            document.width() as f64 * cell.x,
            document.height() as f64 * cell.y,
        );
        Self {
            document,
            viewport: Viewport::new(content, Vec2::ZERO),
            drag: DragScroll::new(config.drag),
            wheel: WheelScroll::new(config.wheel),
            area: Rect::default(),
            selected_line: None,
            cell,
        }
    }

    /// Area inside the border.
    pub fn content_area(&self) -> Rect {
        Rect {
            x: self.area.x.saturating_add(1),
            y: self.area.y.saturating_add(1),
            width: self.area.width.saturating_sub(2),
            height: self.area.height.saturating_sub(2),
        }
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
        let inner = self.content_area();
        self.viewport.set_visible(Vec2::new(
            inner.width as f64 * self.cell.x,
            inner.height as f64 * self.cell.y,
        ));
    }

    /// First visible document line.
    pub fn first_row(&self) -> usize {
        (self.viewport.scroll_offset().y / self.cell.y).floor() as usize
    }

    /// First visible document column.
    pub fn first_col(&self) -> usize {
        (self.viewport.scroll_offset().x / self.cell.x).floor() as usize
    }

    /// Document line under a terminal row, if any.
    pub fn line_at_row(&self, row: u16) -> Option<usize> {
        let inner = self.content_area();
        if row < inner.y || row >= inner.y.saturating_add(inner.height) {
            return None;
        }
        let line = self.first_row() + (row - inner.y) as usize;
        (line < self.document.height()).then_some(line)
    }

    /// Convert a terminal cell to pointer pixels.
    pub fn cell_to_px(&self, column: u16, row: u16) -> Vec2 {
        Vec2::new(column as f64 * self.cell.x, row as f64 * self.cell.y)
    }

    /// `true` while either impulse source has a frame in flight.
    pub fn is_animating(&self) -> bool {
        self.drag.animator().state() == AnimatorState::Animating
            || self.wheel.animator().state() == AnimatorState::Animating
    }
}

/// Top-level application state.
pub struct AppState {
    pub panes: Vec<Pane>,
    /// Pane receiving keyboard scrolling.
    pub focus: usize,
    /// Pane that received the current button press, until release.
    pub pressed_pane: Option<usize>,
    /// Shared animation-frame scheduler for every pane.
    pub frames: FrameQueue,
    pub config: AppConfig,
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(documents: Vec<Document>, config: AppConfig) -> Self {
        let panes = documents
            .into_iter()
            .map(|doc| Pane::new(doc, &config))
            .collect();
        Self {
            panes,
            focus: 0,
            pressed_pane: None,
            frames: FrameQueue::new(),
            config,
            should_quit: false,
            status_message: None,
        }
    }

    /// Index of the pane containing a terminal cell.
    pub fn pane_at(&self, column: u16, row: u16) -> Option<usize> {
        self.panes.iter().position(|p| point_in_rect(p.area, column, row))
    }
}

pub fn point_in_rect(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x
        && x < rect.x.saturating_add(rect.width)
        && y >= rect.y
        && y < rect.y.saturating_add(rect.height)
}
