//! Audio Graph Manager — one shared context, one source per media element.
//!
//! The graph is an explicit object handed to every visualizer that needs it
//! (usually behind an `Rc`). The context is built lazily by the factory
//! supplied at construction, the first time anything asks for it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::GraphError;

use super::backend::{AudioBackend, ContextState, ElementKey, GestureEvent, GestureTarget};

type ContextFactory<B> = Box<dyn Fn() -> Result<B, GraphError>>;

pub struct AudioGraph<B: AudioBackend> {
    factory: ContextFactory<B>,
    context: RefCell<Option<Rc<B>>>,
    sources: RefCell<HashMap<ElementKey, B::Source>>,
    /// Set while a group of gesture listeners is registered and unfired.
    unlock_armed: Rc<Cell<bool>>,
}

impl<B: AudioBackend + 'static> AudioGraph<B> {
    pub fn new(factory: impl Fn() -> Result<B, GraphError> + 'static) -> Self {
        AudioGraph {
            factory: Box::new(factory),
            context: RefCell::new(None),
            sources: RefCell::new(HashMap::new()),
            unlock_armed: Rc::new(Cell::new(false)),
        }
    }

    /// The shared context, constructed on first call.
    ///
    /// A failed construction is returned and not cached.
    pub fn context(&self) -> Result<Rc<B>, GraphError> {
        if let Some(ctx) = self.context.borrow().as_ref() {
            return Ok(ctx.clone());
        }
        let ctx = Rc::new((self.factory)()?);
        log::info!("Audio context created ({:?})", ctx.state());
        *self.context.borrow_mut() = Some(ctx.clone());
        Ok(ctx)
    }

    pub fn has_context(&self) -> bool {
        self.context.borrow().is_some()
    }

    /// The source node bound to `element`, created only if none exists yet.
    pub fn source_for(&self, element: &B::Element) -> Result<B::Source, GraphError> {
        let ctx = self.context()?;
        let key = ctx.element_key(element);
        if let Some(source) = self.sources.borrow().get(&key) {
            return Ok(source.clone());
        }
        let source = ctx.create_media_source(element)?;
        log::debug!("Media source created for element {key}");
        self.sources.borrow_mut().insert(key, source.clone());
        Ok(source)
    }

    /// Lookup without creation.
    pub fn registered_source(&self, key: ElementKey) -> Option<B::Source> {
        self.sources.borrow().get(&key).cloned()
    }

    /// Forget the source for an element the host has destroyed.
    ///
    /// Without this the registry keeps one entry per element ever wired.
    /// Never call it for an element that is still alive: its source cannot
    /// be created a second time.
    pub fn release(&self, key: ElementKey) -> Option<B::Source> {
        let removed = self.sources.borrow_mut().remove(&key);
        if removed.is_some() {
            log::debug!("Media source released for element {key}");
        }
        removed
    }

    pub fn source_count(&self) -> usize {
        self.sources.borrow().len()
    }

    /// Resume the context on the first pointer, key or touch gesture.
    ///
    /// While one group of listeners is still waiting, further calls register
    /// nothing. The first listener to fire disarms the group; the others
    /// stay registered but find nothing left to do.
    pub fn resume_on_gesture(&self, target: &dyn GestureTarget) -> Result<(), GraphError> {
        let ctx = self.context()?;
        if self.unlock_armed.replace(true) {
            return Ok(());
        }
        for event in GestureEvent::ALL {
            let ctx = Rc::downgrade(&ctx);
            let armed = self.unlock_armed.clone();
            target.listen_once(
                event,
                Box::new(move || {
                    if !armed.replace(false) {
                        return;
                    }
                    let Some(ctx) = ctx.upgrade() else { return };
                    if ctx.state() == ContextState::Suspended {
                        log::debug!("Resuming audio context on {}", event.event_type());
                        ctx.resume();
                    }
                }),
            );
        }
        Ok(())
    }
}
