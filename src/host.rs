// host.rs - Display frames backed by egui repaints

use std::time::Instant;

use grid_display::{FrameHandle, FrameHost};

/// Hands out at most one live frame request at a time. A request asks egui
/// for a repaint; the next `update` collects it with [`RepaintHost::take_due`].
pub struct RepaintHost {
    ctx: Option<egui::Context>,
    started: Instant,
    next: u64,
    pending: Option<FrameHandle>,
}

impl RepaintHost {
    pub fn new() -> Self {
        Self {
            ctx: None,
            started: Instant::now(),
            next: 0,
            pending: None,
        }
    }

    /// Wire up the egui context once the window exists.
    pub fn attach(&mut self, ctx: egui::Context) {
        if self.pending.is_some() {
            ctx.request_repaint();
        }
        self.ctx = Some(ctx);
    }

    /// The request made during the previous frame, if it was not cancelled.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl Default for RepaintHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameHost for RepaintHost {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        if let Some(ctx) = &self.ctx {
            ctx.request_repaint();
        }
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}
