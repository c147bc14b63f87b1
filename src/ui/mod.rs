//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer reads pane scroll offsets and turns them into terminal cells.
//! No scroll state is mutated here.

pub mod layout;
pub mod pager;
pub mod theme;
