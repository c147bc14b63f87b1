//! Animation-frame scheduling.
//!
//! Mirrors the host's "call me on the next display refresh" primitive: a
//! caller requests a frame, gets back a handle, and may cancel it before it
//! fires.  The [`FrameQueue`] is drained once per refresh by the event loop.

use std::time::Instant;

/// Identifies one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// One firing of a requested frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub handle: FrameHandle,
    pub timestamp: Instant,
}

/// Host primitive for recurring per-refresh callbacks.
pub trait FrameScheduler {
    /// Request a callback on the next refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a previously requested callback.  Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Frame scheduler driven by the application's refresh interval.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while at least one frame is waiting to fire.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Remove and return every frame due at this refresh, in request order.
    ///
    /// Frames requested while the returned batch is being processed land on
    /// the next refresh.
    pub fn take_due(&mut self, now: Instant) -> Vec<Frame> {
        self.pending
            .drain(..)
            .map(|handle| Frame {
                handle,
                timestamp: now,
            })
            .collect()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique() {
        let mut q = FrameQueue::new();
        let a = q.request_frame();
        let b = q.request_frame();
        assert_ne!(a, b);
        let due: Vec<_> = q.take_due(Instant::now()).into_iter().map(|f| f.handle).collect();
        assert_eq!(due, vec![a, b]);
    }

    #[test]
    fn cancelled_frames_do_not_fire() {
        let mut q = FrameQueue::new();
        let a = q.request_frame();
        let b = q.request_frame();
        q.cancel_frame(a);

        let due: Vec<_> = q.take_due(Instant::now()).into_iter().map(|f| f.handle).collect();
        assert_eq!(due, vec![b]);
        assert!(!q.has_pending());
    }

    #[test]
    fn frames_requested_after_drain_wait_for_next_refresh() {
        let mut q = FrameQueue::new();
        q.request_frame();
        let due = q.take_due(Instant::now());
        assert_eq!(due.len(), 1);

        assert!(!q.has_pending());
        let next = q.request_frame();
        assert_eq!(q.take_due(Instant::now())[0].handle, next);
    }
}
