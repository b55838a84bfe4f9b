//! Window events and animation frames.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Window};

use crate::graph::{GestureEvent, GestureTarget};
use crate::render::{FrameHandle, FrameScheduler, ListenerId, Viewport};

use super::describe;

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global `window` exists"))
}

/// Gesture and resize listeners on `window`.
pub struct WindowEvents {
    window: Window,
    next_id: Cell<u32>,
    resize: RefCell<HashMap<ListenerId, Closure<dyn Fn()>>>,
}

impl WindowEvents {
    pub fn new() -> Result<Self, JsValue> {
        Ok(WindowEvents {
            window: window()?,
            next_id: Cell::new(0),
            resize: RefCell::new(HashMap::new()),
        })
    }
}

impl GestureTarget for WindowEvents {
    fn listen_once(&self, event: GestureEvent, callback: Box<dyn FnOnce()>) {
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        let listener = Closure::once_into_js(move || callback());
        if let Err(e) = self
            .window
            .add_event_listener_with_callback_and_add_event_listener_options(
                event.event_type(),
                listener.unchecked_ref(),
                &options,
            )
        {
            log::warn!("Could not listen for {}: {}", event.event_type(), describe(&e));
        }
    }
}

impl Viewport for WindowEvents {
    fn add_resize_listener(&self, listener: Rc<dyn Fn()>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let closure = Closure::<dyn Fn()>::new(move || listener());
        if let Err(e) = self
            .window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        {
            log::warn!("Could not listen for resize: {}", describe(&e));
        }
        self.resize.borrow_mut().insert(id, closure);
        id
    }

    fn remove_resize_listener(&self, id: ListenerId) {
        let Some(closure) = self.resize.borrow_mut().remove(&id) else {
            return;
        };
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        {
            log::warn!("Could not remove resize listener: {}", describe(&e));
        }
    }
}

impl Drop for WindowEvents {
    fn drop(&mut self) {
        let ids: Vec<ListenerId> = self.resize.borrow().keys().copied().collect();
        for id in ids {
            self.remove_resize_listener(id);
        }
    }
}

/// `requestAnimationFrame` scheduling.
pub struct AnimationFrames {
    window: Window,
}

impl AnimationFrames {
    pub fn new() -> Result<Self, JsValue> {
        Ok(AnimationFrames { window: window()? })
    }
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<FrameHandle> {
        // A cancelled frame never runs, so its closure is never freed: one
        // small leak per teardown.
        let frame = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        match self.window.request_animation_frame(frame.unchecked_ref()) {
            Ok(id) => Some(FrameHandle(id)),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {}", describe(&e));
                None
            }
        }
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame failed: {}", describe(&e));
        }
    }
}
