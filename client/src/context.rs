//! Waveform engine context.
//!
//! SYSTEM CONTEXT
//! ==============
//! Whoever owns the waveform instance (a player component, a page) provides
//! an `EngineContext` and fills it once the engine is initialized. `<Marker/>`
//! units read it reactively: an empty context defers marker creation, and
//! setting it later lets pending units create their markers.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::rc::Rc;

use leptos::prelude::*;
use markers::engine::MarkerEngine;

/// Reactive slot holding the live engine, if any.
///
/// The engine is `!Send`, so the slot uses local storage; the handle itself
/// is `Copy` and can go into Leptos context.
pub struct EngineContext<E: 'static>(RwSignal<Option<Rc<E>>, LocalStorage>);

impl<E: 'static> Clone for EngineContext<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: 'static> Copy for EngineContext<E> {}

impl<E: MarkerEngine> EngineContext<E> {
    #[must_use]
    pub fn new() -> Self {
        Self(RwSignal::new_local(None))
    }

    /// Publish a live engine to every unit reading this context.
    pub fn set(&self, engine: Rc<E>) {
        self.0.set(Some(engine));
    }

    /// Withdraw the engine, e.g. while the host tears its instance down.
    pub fn clear(&self) {
        self.0.set(None);
    }

    /// The live engine, tracked.
    pub fn get(&self) -> Option<Rc<E>> {
        self.0.get()
    }

    /// The live engine, untracked.
    pub fn get_untracked(&self) -> Option<Rc<E>> {
        self.0.get_untracked()
    }
}

impl<E: MarkerEngine> Default for EngineContext<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Create an empty engine context and provide it to descendants.
pub fn provide_engine_context<E: MarkerEngine>() -> EngineContext<E> {
    let context = EngineContext::new();
    provide_context(context);
    context
}

/// The nearest engine context for `E`, if an ancestor provided one.
pub fn use_engine_context<E: MarkerEngine>() -> Option<EngineContext<E>> {
    use_context::<EngineContext<E>>()
}
