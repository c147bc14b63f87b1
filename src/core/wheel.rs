//! Wheel-driven physics scrolling.
//!
//! Every wheel event is normalised to pixels and turned into an impulse
//! that is *added* to the running velocity, so a burst of notches speeds the
//! glide up instead of restarting it.

use super::animator::{Animator, MomentumConfig, TickOutcome};
use super::frame::{Frame, FrameScheduler};
use super::geometry::{Axis, Vec2};
use super::target::ScrollTarget;

/// Fixed divisor that keeps `impulse_strength` in a comfortable range.
const IMPULSE_DIVISOR: f64 = 40.0;

/// Unit of a wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// One wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelDelta {
    pub x: f64,
    pub y: f64,
    pub mode: DeltaMode,
}

impl WheelDelta {
    pub fn lines(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            mode: DeltaMode::Line,
        }
    }

    pub fn pages(y: f64) -> Self {
        Self {
            x: 0.0,
            y,
            mode: DeltaMode::Page,
        }
    }
}

/// Tuning for wheel scrolling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelConfig {
    /// Pixel height of one "line" delta.
    pub pixels_per_line: f64,
    /// Fraction of the viewport one "page" delta scrolls.
    pub page_fraction: f64,
    /// Velocity added per normalised pixel is `impulse_strength / 40`.
    pub impulse_strength: f64,
    /// Animate horizontal deltas too; when off they pass through to the host.
    pub horizontal: bool,
    pub momentum: MomentumConfig,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            pixels_per_line: 18.0,
            page_fraction: 0.9,
            impulse_strength: 5.0,
            horizontal: false,
            momentum: MomentumConfig::wheel(),
        }
    }
}

impl WheelConfig {
    /// Convert one axis of a delta to pixels.  `viewport_extent` is the
    /// viewport size along that axis (used by page mode).
    pub fn normalize(&self, delta: f64, mode: DeltaMode, viewport_extent: f64) -> f64 {
        match mode {
            DeltaMode::Pixel => delta,
            DeltaMode::Line => delta * self.pixels_per_line,
            DeltaMode::Page => delta * viewport_extent * self.page_fraction,
        }
    }

    pub fn impulse_scale(&self) -> f64 {
        self.impulse_strength / IMPULSE_DIVISOR
    }
}

/// Whether the wheel handler took the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelOutcome {
    Consumed,
    /// Not animated; the host should scroll natively.
    Passthrough,
}

/// Wheel impulse source for one scroll target.
#[derive(Debug, Clone)]
pub struct WheelScroll {
    config: WheelConfig,
    animator: Animator,
}

impl WheelScroll {
    pub fn new(config: WheelConfig) -> Self {
        Self {
            config,
            animator: Animator::new(config.momentum),
        }
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Feed one wheel event.  `visible` is the viewport size, for page deltas.
    pub fn handle<S>(&mut self, delta: WheelDelta, visible: Vec2, scheduler: &mut S) -> WheelOutcome
    where
        S: FrameScheduler + ?Sized,
    {
        if delta.x != 0.0 && !self.config.horizontal {
            return WheelOutcome::Passthrough;
        }

        let scale = self.config.impulse_scale();
        for axis in Axis::BOTH {
            let raw = match axis {
                Axis::X => delta.x,
                Axis::Y => delta.y,
            };
            if raw == 0.0 {
                continue;
            }
            let px = self.config.normalize(raw, delta.mode, visible[axis]);
            self.animator.apply_impulse(axis, px * scale, scheduler);
        }
        WheelOutcome::Consumed
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::animator::AnimatorState;
    use crate::core::frame::FrameQueue;
    use crate::core::target::Viewport;
    use std::time::Instant;

    const VISIBLE: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn normalizes_each_delta_mode() {
        let cfg = WheelConfig::default();
        assert_eq!(cfg.normalize(3.0, DeltaMode::Pixel, 600.0), 3.0);
        assert_eq!(cfg.normalize(3.0, DeltaMode::Line, 600.0), 54.0);
        assert_eq!(cfg.normalize(1.0, DeltaMode::Page, 600.0), 540.0);
    }

    #[test]
    fn line_delta_scales_by_pixels_per_line_before_impulse() {
        let mut frames = FrameQueue::new();
        let mut wheel = WheelScroll::new(WheelConfig::default());

        let out = wheel.handle(WheelDelta::lines(0.0, 2.0), VISIBLE, &mut frames);
        assert_eq!(out, WheelOutcome::Consumed);
        // 2 lines * 18 px * 5/40
        assert!((wheel.animator().velocity().y - 4.5).abs() < 1e-9);
    }

    #[test]
    fn page_delta_uses_ninety_percent_of_viewport() {
        let mut frames = FrameQueue::new();
        let mut wheel = WheelScroll::new(WheelConfig::default());

        wheel.handle(WheelDelta::pages(-1.0), VISIBLE, &mut frames);
        assert!((wheel.animator().velocity().y + 540.0 * 0.125).abs() < 1e-9);
    }

    #[test]
    fn successive_notches_accumulate() {
        let mut frames = FrameQueue::new();
        let mut wheel = WheelScroll::new(WheelConfig::default());
        let notch = WheelDelta {
            x: 0.0,
            y: 100.0,
            mode: DeltaMode::Pixel,
        };

        wheel.handle(notch, VISIBLE, &mut frames);
        wheel.handle(notch, VISIBLE, &mut frames);
        assert!((wheel.animator().velocity().y - 25.0).abs() < 1e-9);
        // Still a single frame in flight.
        assert_eq!(frames.take_due(Instant::now()).len(), 1);
    }

    #[test]
    fn horizontal_passes_through_by_default() {
        let mut frames = FrameQueue::new();
        let mut wheel = WheelScroll::new(WheelConfig::default());

        let out = wheel.handle(WheelDelta::lines(1.0, 0.0), VISIBLE, &mut frames);
        assert_eq!(out, WheelOutcome::Passthrough);
        assert_eq!(wheel.animator().state(), AnimatorState::Idle);
        assert!(!frames.has_pending());
    }

    #[test]
    fn horizontal_animates_when_enabled() {
        let mut frames = FrameQueue::new();
        let mut wheel = WheelScroll::new(WheelConfig {
            horizontal: true,
            ..WheelConfig::default()
        });

        let out = wheel.handle(WheelDelta::lines(-1.0, 0.0), VISIBLE, &mut frames);
        assert_eq!(out, WheelOutcome::Consumed);
        assert!(wheel.animator().velocity().x < 0.0);
        assert_eq!(wheel.animator().velocity().y, 0.0);
    }

    #[test]
    fn glide_moves_target_and_settles() {
        let mut frames = FrameQueue::new();
        let mut target = Viewport::new(Vec2::new(800.0, 10_000.0), VISIBLE);
        let mut wheel = WheelScroll::new(WheelConfig::default());

        wheel.handle(WheelDelta::lines(0.0, 3.0), VISIBLE, &mut frames);
        while frames.has_pending() {
            for frame in frames.take_due(Instant::now()) {
                wheel.tick(&frame, &mut target, &mut frames);
            }
        }

        let y = target.scroll_offset().y;
        // v0 = 6.75; the coast is bounded by v0 * d / (1 - d).
        assert!(y > 0.0 && y < 6.75 * 19.0, "settled at {y}");
        assert_eq!(wheel.animator().state(), AnimatorState::Idle);
    }
}
