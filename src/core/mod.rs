//! Core scrolling model: targets, frame scheduling, momentum physics and
//! the drag/wheel impulse sources.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Hosts
//! plug in through [`target::ScrollTarget`] and [`frame::FrameScheduler`].

pub mod animator;
pub mod document;
pub mod drag;
pub mod frame;
pub mod geometry;
pub mod target;
pub mod wheel;
