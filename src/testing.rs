//! In-memory stand-ins for the host platform, used by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use crate::error::{GraphError, PlaybackError};
use crate::graph::{AudioBackend, AudioGraph, ContextState, ElementKey, GestureEvent, GestureTarget};
use crate::playback::MediaPlayer;
use crate::render::{
    Bar, BarFill, DrawSurface, FrameHandle, FrameScheduler, ListenerId, Viewport,
};

// ── Audio ───────────────────────────────────────────────────

#[derive(Debug)]
pub struct MockElement {
    key: ElementKey,
    src: RefCell<String>,
}

impl MockElement {
    pub fn new(key: u64, src: &str) -> Rc<MockElement> {
        Rc::new(MockElement {
            key: ElementKey(key),
            src: RefCell::new(src.to_string()),
        })
    }

    pub fn set_src(&self, src: &str) {
        *self.src.borrow_mut() = src.to_string();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MockNode(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateSource(ElementKey),
    CreateAnalyser { fft_size: u32, smoothing: f64 },
    ConnectDestination(MockNode),
    Connect { source: MockNode, analyser: MockNode },
    Disconnect { source: MockNode, analyser: MockNode },
    Resume,
}

pub struct MockBackend {
    state: Cell<ContextState>,
    calls: RefCell<Vec<Call>>,
    next_node: Cell<u32>,
    sourced: RefCell<HashSet<ElementKey>>,
    links: RefCell<HashSet<(MockNode, MockNode)>>,
    reject_connects: Cell<bool>,
    spectrum: RefCell<Vec<u8>>,
}

impl MockBackend {
    pub fn new() -> Self {
        MockBackend {
            state: Cell::new(ContextState::Suspended),
            calls: RefCell::new(Vec::new()),
            next_node: Cell::new(1),
            sourced: RefCell::new(HashSet::new()),
            links: RefCell::new(HashSet::new()),
            reject_connects: Cell::new(false),
            spectrum: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn set_state(&self, state: ContextState) {
        self.state.set(state);
    }

    pub fn reject_connects(&self, reject: bool) {
        self.reject_connects.set(reject);
    }

    pub fn set_spectrum(&self, bins: Vec<u8>) {
        *self.spectrum.borrow_mut() = bins;
    }

    fn node(&self) -> MockNode {
        let id = self.next_node.get();
        self.next_node.set(id + 1);
        MockNode(id)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl AudioBackend for MockBackend {
    type Element = Rc<MockElement>;
    type Source = MockNode;
    type Analyser = MockNode;

    fn element_key(&self, element: &Rc<MockElement>) -> ElementKey {
        element.key
    }

    fn state(&self) -> ContextState {
        self.state.get()
    }

    fn resume(&self) {
        self.record(Call::Resume);
        self.state.set(ContextState::Running);
    }

    fn create_media_source(&self, element: &Rc<MockElement>) -> Result<MockNode, GraphError> {
        if !self.sourced.borrow_mut().insert(element.key) {
            return Err(GraphError::DuplicateSource { key: element.key });
        }
        self.record(Call::CreateSource(element.key));
        Ok(self.node())
    }

    fn create_analyser(&self, fft_size: u32, smoothing: f64) -> Result<MockNode, GraphError> {
        self.record(Call::CreateAnalyser { fft_size, smoothing });
        Ok(self.node())
    }

    fn connect_destination(&self, analyser: &MockNode) -> Result<(), GraphError> {
        self.record(Call::ConnectDestination(*analyser));
        Ok(())
    }

    fn connect(&self, source: &MockNode, analyser: &MockNode) -> Result<(), GraphError> {
        self.record(Call::Connect {
            source: *source,
            analyser: *analyser,
        });
        if self.reject_connects.get() || !self.links.borrow_mut().insert((*source, *analyser)) {
            return Err(GraphError::DuplicateConnection {
                reason: format!("{source:?} -> {analyser:?}"),
            });
        }
        Ok(())
    }

    fn disconnect(&self, source: &MockNode, analyser: &MockNode) -> Result<(), GraphError> {
        self.record(Call::Disconnect {
            source: *source,
            analyser: *analyser,
        });
        if !self.links.borrow_mut().remove(&(*source, *analyser)) {
            return Err(GraphError::Disconnect {
                reason: "not connected".to_string(),
            });
        }
        Ok(())
    }

    fn frequency_bin_count(&self, _analyser: &MockNode) -> usize {
        self.calls
            .borrow()
            .iter()
            .find_map(|c| match c {
                Call::CreateAnalyser { fft_size, .. } => Some((*fft_size / 2) as usize),
                _ => None,
            })
            .unwrap_or(0)
    }

    fn byte_frequency_data(&self, _analyser: &MockNode, out: &mut [u8]) {
        let spectrum = self.spectrum.borrow();
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = spectrum.get(i).copied().unwrap_or(0);
        }
    }
}

/// A graph over a fresh [`MockBackend`], plus a count of context builds.
pub fn mock_graph() -> (Rc<AudioGraph<MockBackend>>, Rc<Cell<u32>>) {
    let builds = Rc::new(Cell::new(0));
    let counter = builds.clone();
    let graph = AudioGraph::new(move || {
        counter.set(counter.get() + 1);
        Ok(MockBackend::new())
    });
    (Rc::new(graph), builds)
}

// ── Events ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MockGestures {
    listeners: RefCell<Vec<(GestureEvent, Box<dyn FnOnce()>)>>,
}

impl MockGestures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Dispatch `event`, consuming every listener registered for it.
    pub fn fire(&self, event: GestureEvent) {
        let (hit, rest): (Vec<_>, Vec<_>) = self
            .listeners
            .take()
            .into_iter()
            .partition(|(e, _)| *e == event);
        *self.listeners.borrow_mut() = rest;
        for (_, callback) in hit {
            callback();
        }
    }
}

impl GestureTarget for MockGestures {
    fn listen_once(&self, event: GestureEvent, callback: Box<dyn FnOnce()>) {
        self.listeners.borrow_mut().push((event, callback));
    }
}

#[derive(Default)]
pub struct MockViewport {
    next_id: Cell<u32>,
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn()>)>>,
}

impl MockViewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn resize(&self) {
        let listeners: Vec<Rc<dyn Fn()>> =
            self.listeners.borrow().iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            listener();
        }
    }
}

impl Viewport for MockViewport {
    fn add_resize_listener(&self, listener: Rc<dyn Fn()>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_resize_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(l, _)| *l != id);
    }
}

// ── Frames ──────────────────────────────────────────────────

pub struct MockScheduler {
    refuse: bool,
    next_handle: Cell<i32>,
    queue: RefCell<Vec<(FrameHandle, Box<dyn FnOnce(f64)>)>>,
    cancelled: RefCell<Vec<FrameHandle>>,
}

impl MockScheduler {
    pub fn new() -> Self {
        MockScheduler {
            refuse: false,
            next_handle: Cell::new(1),
            queue: RefCell::new(Vec::new()),
            cancelled: RefCell::new(Vec::new()),
        }
    }

    pub fn refusing() -> Self {
        MockScheduler {
            refuse: true,
            ..Self::new()
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn cancelled(&self) -> Vec<FrameHandle> {
        self.cancelled.borrow().clone()
    }

    /// Run every callback queued before this frame.
    pub fn run_frame(&self, timestamp: f64) {
        let due = self.queue.take();
        for (_, callback) in due {
            callback(timestamp);
        }
    }
}

impl FrameScheduler for MockScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Option<FrameHandle> {
        if self.refuse {
            return None;
        }
        let handle = FrameHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        self.queue.borrow_mut().push((handle, callback));
        Some(handle)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.queue.borrow_mut().retain(|(h, _)| *h != handle);
        self.cancelled.borrow_mut().push(handle);
    }
}

// ── Surface ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Clear { width: f64, height: f64 },
    Fill(BarFill),
    Rect(Bar),
}

pub struct MockSurface {
    css: Cell<(f64, f64)>,
    dpr: Cell<f64>,
    backing: Cell<(u32, u32)>,
    scale: Cell<f64>,
    ops: RefCell<Vec<SurfaceOp>>,
}

impl MockSurface {
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        MockSurface {
            css: Cell::new((width, height)),
            dpr: Cell::new(dpr),
            backing: Cell::new((0, 0)),
            scale: Cell::new(1.0),
            ops: RefCell::new(Vec::new()),
        }
    }

    pub fn set_css_size(&self, width: f64, height: f64) {
        self.css.set((width, height));
    }

    pub fn set_dpr(&self, dpr: f64) {
        self.dpr.set(dpr);
    }

    pub fn backing_size(&self) -> (u32, u32) {
        self.backing.get()
    }

    pub fn scale(&self) -> f64 {
        self.scale.get()
    }

    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.ops.borrow().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
    }
}

impl DrawSurface for MockSurface {
    fn css_size(&self) -> (f64, f64) {
        self.css.get()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr.get()
    }

    fn set_backing_size(&self, width: u32, height: u32) {
        self.backing.set((width, height));
    }

    fn set_scale(&self, scale: f64) {
        self.scale.set(scale);
    }

    fn clear(&self, width: f64, height: f64) {
        self.ops.borrow_mut().push(SurfaceOp::Clear { width, height });
    }

    fn set_fill(&self, fill: &BarFill) {
        self.ops.borrow_mut().push(SurfaceOp::Fill(fill.clone()));
    }

    fn fill_rect(&self, bar: &Bar) {
        self.ops.borrow_mut().push(SurfaceOp::Rect(*bar));
    }
}

// ── Playback ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCall {
    SetSource(String),
    Play,
    Pause,
}

#[derive(Default)]
pub struct MockPlayer {
    calls: RefCell<Vec<PlayerCall>>,
    block_autoplay: Cell<bool>,
}

impl MockPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_autoplay(&self, block: bool) {
        self.block_autoplay.set(block);
    }

    pub fn calls(&self) -> Vec<PlayerCall> {
        self.calls.borrow().clone()
    }

    pub fn plays(&self) -> usize {
        self.calls.borrow().iter().filter(|c| **c == PlayerCall::Play).count()
    }
}

impl MediaPlayer for MockPlayer {
    fn set_source(&self, url: &str) {
        self.calls.borrow_mut().push(PlayerCall::SetSource(url.to_string()));
    }

    fn play(&self) -> Result<(), PlaybackError> {
        self.calls.borrow_mut().push(PlayerCall::Play);
        if self.block_autoplay.get() {
            return Err(PlaybackError::AutoplayRejected {
                reason: "NotAllowedError".to_string(),
            });
        }
        Ok(())
    }

    fn pause(&self) {
        self.calls.borrow_mut().push(PlayerCall::Pause);
    }
}
