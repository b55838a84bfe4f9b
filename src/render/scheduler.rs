//! Frame scheduling and the self-resubmitting render task.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle of one pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

pub trait FrameScheduler {
    /// Run `callback` with the frame timestamp (ms) before the next repaint.
    /// `None` if the host refused the request.
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<FrameHandle>;
    fn cancel_frame(&self, handle: FrameHandle);
}

struct LoopState {
    cancelled: Cell<bool>,
    pending: Cell<Option<FrameHandle>>,
    frames: Cell<u64>,
}

/// A continuous per-frame task.
///
/// Each frame runs the draw callback and then submits the next frame. The
/// cancellation flag is checked before every draw and every re-submission.
pub struct RenderLoop {
    state: Rc<LoopState>,
    scheduler: Rc<dyn FrameScheduler>,
}

type FrameFn = Rc<RefCell<dyn FnMut(f64)>>;

impl RenderLoop {
    pub fn start(scheduler: Rc<dyn FrameScheduler>, draw: impl FnMut(f64) + 'static) -> Self {
        let state = Rc::new(LoopState {
            cancelled: Cell::new(false),
            pending: Cell::new(None),
            frames: Cell::new(0),
        });
        let draw: FrameFn = Rc::new(RefCell::new(draw));
        submit(scheduler.clone(), state.clone(), draw);
        RenderLoop { state, scheduler }
    }

    /// Stop the loop. Only the first call cancels the pending frame.
    pub fn cancel(&self) {
        if self.state.cancelled.replace(true) {
            return;
        }
        if let Some(handle) = self.state.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        !self.state.cancelled.get() && self.state.pending.get().is_some()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.state.frames.get()
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn submit(scheduler: Rc<dyn FrameScheduler>, state: Rc<LoopState>, draw: FrameFn) {
    if state.cancelled.get() {
        return;
    }
    let next_scheduler = scheduler.clone();
    let frame_state = state.clone();
    let handle = scheduler.request_frame(Box::new(move |timestamp| {
        frame_state.pending.set(None);
        if frame_state.cancelled.get() {
            return;
        }
        (&mut *draw.borrow_mut())(timestamp);
        frame_state.frames.set(frame_state.frames.get() + 1);
        submit(next_scheduler, frame_state, draw);
    }));
    if handle.is_none() {
        log::warn!("Frame request refused; render loop stopped");
    }
    state.pending.set(handle);
}
