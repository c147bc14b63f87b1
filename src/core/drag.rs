//! Drag-to-scroll with release momentum.
//!
//! While the button is held the content follows the pointer directly
//! (scaled by `multiplier`).  On release, the pointer's last instantaneous
//! velocity seeds an [`Animator`] so the content keeps coasting.  A gesture
//! that travelled past `threshold_px` counts as a drag: it gets momentum and
//! swallows the click that the host fires right after the release.

use std::time::Instant;

use super::animator::{Animator, MomentumConfig, TickOutcome};
use super::frame::{Frame, FrameScheduler};
use super::geometry::Vec2;
use super::target::ScrollTarget;

/// Tuning for drag gestures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// Pointer travel (px, per axis) before a press becomes a drag.
    pub threshold_px: f64,
    /// Scroll pixels per pointer pixel during direct manipulation.
    pub multiplier: f64,
    pub momentum: MomentumConfig,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            threshold_px: 20.0,
            multiplier: 2.0,
            momentum: MomentumConfig::drag(),
        }
    }
}

/// What the host should do with a click event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDisposition {
    Deliver,
    /// The click ended a drag; swallow it.
    Suppress,
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    start: Vec2,
    start_offset: Vec2,
    last: Vec2,
    last_time: Instant,
    /// Pointer velocity in px/ms between the two most recent moves at least
    /// a millisecond apart.
    velocity: Vec2,
    did_drag: bool,
}

/// Drag-to-scroll impulse source for one scroll target.
#[derive(Debug, Clone)]
pub struct DragScroll {
    config: DragConfig,
    gesture: Option<Gesture>,
    suppress_click: bool,
    animator: Animator,
}

impl DragScroll {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            gesture: None,
            suppress_click: false,
            animator: Animator::new(config.momentum),
        }
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Start a gesture.  Any momentum still running from a previous release
    /// is cancelled so the two never stack.
    pub fn pointer_down<T, S>(&mut self, pos: Vec2, time: Instant, target: &T, scheduler: &mut S)
    where
        T: ScrollTarget + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        self.animator.cancel(scheduler);
        self.suppress_click = false;
        self.gesture = Some(Gesture {
            start: pos,
            start_offset: target.scroll_offset(),
            last: pos,
            last_time: time,
            velocity: Vec2::ZERO,
            did_drag: false,
        });
    }

    /// Follow the pointer.  Ignored when no gesture is active.
    pub fn pointer_move<T>(&mut self, pos: Vec2, time: Instant, target: &mut T)
    where
        T: ScrollTarget + ?Sized,
    {
        let Some(g) = self.gesture.as_mut() else {
            return;
        };

        let travelled = pos - g.start;
        if !g.did_drag
            && (travelled.x.abs() > self.config.threshold_px
                || travelled.y.abs() > self.config.threshold_px)
        {
            g.did_drag = true;
            tracing::debug!(x = travelled.x, y = travelled.y, "drag threshold crossed");
        }

        // Whole milliseconds: reports batched into one terminal read land
        // microseconds apart and would otherwise read as a huge speed.
        let elapsed_ms = time.saturating_duration_since(g.last_time).as_millis() as f64;
        if elapsed_ms > 0.0 {
            let step = pos - g.last;
            g.velocity = Vec2::new(step.x / elapsed_ms, step.y / elapsed_ms);
        }
        g.last = pos;
        g.last_time = time;

        target.set_scroll_offset(g.start_offset - travelled * self.config.multiplier);
    }

    /// End the gesture (button released).  A real drag hands its last
    /// pointer velocity to the animator and arms click suppression.
    pub fn pointer_up<S>(&mut self, scheduler: &mut S)
    where
        S: FrameScheduler + ?Sized,
    {
        let Some(g) = self.gesture.take() else {
            return;
        };
        if !g.did_drag {
            return;
        }
        self.suppress_click = true;
        // Content moves against the pointer, so momentum does too.
        self.animator.set_velocity(-g.velocity, scheduler);
        tracing::debug!(
            vx = g.velocity.x,
            vy = g.velocity.y,
            max_ticks = self.config.momentum.tick_bound(g.velocity.x.abs().max(g.velocity.y.abs())),
            "drag released"
        );
    }

    /// The pointer left the host surface mid-gesture; treated as a release.
    pub fn pointer_leave<S>(&mut self, scheduler: &mut S)
    where
        S: FrameScheduler + ?Sized,
    {
        self.pointer_up(scheduler);
    }

    /// Decide the fate of a click.  Suppresses exactly one click per drag.
    pub fn click(&mut self) -> ClickDisposition {
        if std::mem::take(&mut self.suppress_click) {
            ClickDisposition::Suppress
        } else {
            ClickDisposition::Deliver
        }
    }

    pub fn tick<T, S>(&mut self, frame: &Frame, target: &mut T, scheduler: &mut S) -> TickOutcome
    where
        T: ScrollTarget + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        self.animator.tick(frame, target, scheduler)
    }

    pub fn cancel<S>(&mut self, scheduler: &mut S)
    where
        S: FrameScheduler + ?Sized,
    {
        self.animator.cancel(scheduler);
    }
}
