//! Velocity-integrating scroll animator.
//!
//! Each frame the velocity is damped, integrated into the target's offset,
//! clamped to the scrollable range, and the loop either reschedules itself
//! or settles.  Impulse sources (drag release, wheel notches) only ever touch
//! the velocity; the animator owns the single frame request that moves the
//! target.

use std::time::Instant;

use crate::error::ConfigError;

use super::frame::{Frame, FrameHandle, FrameScheduler};
use super::geometry::{Axis, Vec2};
use super::target::ScrollTarget;

// ───────────────────────────────────────── config ────────────

/// Accepted damping range.  Outside it the glide is either instant or
/// effectively endless.
pub const DAMPING_RANGE: std::ops::RangeInclusive<f64> = 0.01..=0.999;

/// Smallest accepted stop threshold.
pub const MIN_STOP_THRESHOLD: f64 = 1e-6;

/// Physics tuning for one animator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumConfig {
    /// Per-tick multiplicative decay, in (0, 1).  Lower = stops faster.
    pub damping: f64,
    /// Distance moved per unit of velocity per tick.
    pub distance_scale: f64,
    /// Speed under which the animation is considered finished.
    pub stop_threshold: f64,
}

impl MomentumConfig {
    /// Release momentum after a drag.  Velocity is in pointer px/ms, so the
    /// distance scale converts it back to pixels per frame.
    pub const fn drag() -> Self {
        Self {
            damping: 0.85,
            distance_scale: 50.0,
            stop_threshold: 0.02,
        }
    }

    /// Wheel glide.  Velocity is already in pixels per frame.
    pub const fn wheel() -> Self {
        Self {
            damping: 0.95,
            distance_scale: 1.0,
            stop_threshold: 0.5,
        }
    }

    /// Reject values that would stop the loop from terminating or moving.
    pub fn validate(&self, prefix: &'static str) -> Result<(), ConfigError> {
        if !DAMPING_RANGE.contains(&self.damping) {
            return Err(ConfigError::OutOfRange {
                key: prefix_key(prefix, "damping"),
                value: self.damping,
                expected: "0.01 <= damping <= 0.999",
            });
        }
        if !(self.distance_scale.is_finite() && self.distance_scale > 0.0) {
            return Err(ConfigError::OutOfRange {
                key: prefix_key(prefix, "distance_scale"),
                value: self.distance_scale,
                expected: "a positive number",
            });
        }
        if !(self.stop_threshold.is_finite() && self.stop_threshold >= MIN_STOP_THRESHOLD) {
            return Err(ConfigError::OutOfRange {
                key: prefix_key(prefix, "stop_threshold"),
                value: self.stop_threshold,
                expected: "a number >= 1e-6",
            });
        }
        Ok(())
    }

    /// Upper bound on the number of ticks the animator runs after the last
    /// impulse, starting from `initial_speed` (the largest axis speed).
    pub fn tick_bound(&self, initial_speed: f64) -> u64 {
        let v0 = initial_speed.abs();
        if v0 * self.damping < self.stop_threshold {
            return 1;
        }
        let n = (self.stop_threshold / v0).ln() / self.damping.ln();
        n.floor() as u64 + 2
    }
}

fn prefix_key(prefix: &'static str, field: &'static str) -> &'static str {
    match (prefix, field) {
        ("drag", "damping") => "drag_damping",
        ("drag", "distance_scale") => "drag_momentum_scale",
        ("drag", "stop_threshold") => "drag_stop_threshold",
        ("wheel", "damping") => "wheel_damping",
        ("wheel", "distance_scale") => "wheel_distance_scale",
        ("wheel", "stop_threshold") => "wheel_stop_threshold",
        (_, field) => field,
    }
}

// ───────────────────────────────────────── animator ──────────

/// Whether a frame is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Idle,
    Animating,
}

/// Result of handling one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The frame was not this animator's pending frame; nothing happened.
    Stale,
    /// The target moved and the next frame is scheduled.
    Continue,
    /// Velocity decayed (or was absorbed by a boundary); the loop stopped.
    Settled,
}

/// Momentum animator for a single scroll target.
#[derive(Debug, Clone)]
pub struct Animator {
    config: MomentumConfig,
    velocity: Vec2,
    pending: Option<FrameHandle>,
    /// Ticks run since the loop last started from idle.
    ticks: u64,
    last_frame: Option<Instant>,
}

impl Animator {
    /// Out-of-range tuning is pulled into the bounds `validate` accepts, so
    /// a validated config runs unchanged.
    pub fn new(config: MomentumConfig) -> Self {
        Self {
            config: MomentumConfig {
                damping: config
                    .damping
                    .clamp(*DAMPING_RANGE.start(), *DAMPING_RANGE.end()),
                distance_scale: config.distance_scale,
                stop_threshold: config.stop_threshold.max(MIN_STOP_THRESHOLD),
            },
            velocity: Vec2::ZERO,
            pending: None,
            ticks: 0,
            last_frame: None,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn state(&self) -> AnimatorState {
        if self.pending.is_some() {
            AnimatorState::Animating
        } else {
            AnimatorState::Idle
        }
    }

    /// Add `amount` to the velocity on `axis`, starting the loop if idle.
    pub fn apply_impulse<S>(&mut self, axis: Axis, amount: f64, scheduler: &mut S)
    where
        S: FrameScheduler + ?Sized,
    {
        self.velocity[axis] += amount;
        self.ensure_scheduled(scheduler);
    }

    /// Replace the velocity outright.  A zero velocity leaves (or puts) the
    /// animator idle.
    pub fn set_velocity<S>(&mut self, velocity: Vec2, scheduler: &mut S)
    where
        S: FrameScheduler + ?Sized,
    {
        if velocity.is_zero() {
            self.cancel(scheduler);
            return;
        }
        self.velocity = velocity;
        self.ensure_scheduled(scheduler);
    }

    /// Drop any pending frame and zero the velocity.
    pub fn cancel<S>(&mut self, scheduler: &mut S)
    where
        S: FrameScheduler + ?Sized,
    {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
            tracing::debug!(ticks = self.ticks, "momentum cancelled");
        }
        self.velocity = Vec2::ZERO;
        self.last_frame = None;
    }

    /// Advance one frame.
    pub fn tick<T, S>(&mut self, frame: &Frame, target: &mut T, scheduler: &mut S) -> TickOutcome
    where
        T: ScrollTarget + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        if self.pending != Some(frame.handle) {
            return TickOutcome::Stale;
        }
        self.pending = None;
        self.ticks += 1;
        if let Some(prev) = self.last_frame.replace(frame.timestamp) {
            tracing::trace!(
                dt_ms = frame.timestamp.saturating_duration_since(prev).as_secs_f64() * 1e3,
                "momentum frame"
            );
        }

        self.velocity = self.velocity * self.config.damping;

        let current = target.scroll_offset();
        let max = target.max_scroll().max_zero();
        let proposed = current + self.velocity * self.config.distance_scale;

        let mut next = proposed;
        for axis in Axis::BOTH {
            next[axis] = proposed[axis].clamp(0.0, max[axis]);
            let correction = next[axis] - proposed[axis];
            let v = self.velocity[axis];
            // The clamp pushed back against the direction of travel: the
            // wall absorbs whatever energy is left on this axis.
            if (correction < 0.0 && v > 0.0) || (correction > 0.0 && v < 0.0) {
                self.velocity[axis] = 0.0;
            }
        }
        target.set_scroll_offset(next);

        let threshold = self.config.stop_threshold;
        if self.velocity.x.abs() < threshold && self.velocity.y.abs() < threshold {
            tracing::debug!(ticks = self.ticks, x = next.x, y = next.y, "momentum settled");
            self.velocity = Vec2::ZERO;
            self.last_frame = None;
            return TickOutcome::Settled;
        }

        self.pending = Some(scheduler.request_frame());
        TickOutcome::Continue
    }

    fn ensure_scheduled<S>(&mut self, scheduler: &mut S)
    where
        S: FrameScheduler + ?Sized,
    {
        if self.pending.is_none() {
            self.ticks = 0;
            self.pending = Some(scheduler.request_frame());
        }
    }
}
