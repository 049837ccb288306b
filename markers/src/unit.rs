//! One declarative unit, driven by the host's render and unmount hooks.
//!
//! `MarkerUnit` sequences the lifecycle controller and the event bridge so
//! that, within a single `render` call, the engine record exists before any
//! subscription or position update is attempted. `unmount` detaches every
//! listener and then removes the record, synchronously. Dropping the unit
//! performs the same teardown if the host never called `unmount`.

#[cfg(test)]
#[path = "unit_test.rs"]
mod unit_test;

use std::rc::Rc;

use crate::bridge::EventBridge;
use crate::engine::{EngineHandler, MarkerEngine};
use crate::error::MarkerError;
use crate::lifecycle::MarkerIdentity;
use crate::marker::{EngineMarker, MarkerEventKind, MarkerSpec};

/// Optional per-unit event callbacks.
pub struct MarkerCallbacks<E: MarkerEngine> {
    pub on_click: Option<EngineHandler<E>>,
    pub on_drag: Option<EngineHandler<E>>,
    pub on_drop: Option<EngineHandler<E>>,
}

impl<E: MarkerEngine> Default for MarkerCallbacks<E> {
    fn default() -> Self {
        Self { on_click: None, on_drag: None, on_drop: None }
    }
}

impl<E: MarkerEngine> Clone for MarkerCallbacks<E> {
    fn clone(&self) -> Self {
        Self { on_click: self.on_click.clone(), on_drag: self.on_drag.clone(), on_drop: self.on_drop.clone() }
    }
}

impl<E: MarkerEngine> MarkerCallbacks<E> {
    #[must_use]
    pub fn get(&self, kind: MarkerEventKind) -> Option<&EngineHandler<E>> {
        match kind {
            MarkerEventKind::Click => self.on_click.as_ref(),
            MarkerEventKind::Drag => self.on_drag.as_ref(),
            MarkerEventKind::Drop => self.on_drop.as_ref(),
        }
    }
}

/// What a `render` call did to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No engine yet; creation will happen on a later render.
    Deferred,
    /// The engine record was created on this render.
    Created,
    /// The record's position was updated.
    Moved,
    /// Nothing positional changed.
    Unchanged,
    /// The unit has been unmounted; the call was ignored.
    Unmounted,
}

/// A unit's engine-facing state.
pub struct MarkerUnit<E: MarkerEngine> {
    owner: Option<Rc<E>>,
    identity: MarkerIdentity<E::Element>,
    bridge: EventBridge<E>,
    unmounted: bool,
}

impl<E: MarkerEngine> Default for MarkerUnit<E> {
    fn default() -> Self {
        Self { owner: None, identity: MarkerIdentity::new(), bridge: EventBridge::new(), unmounted: false }
    }
}

impl<E: MarkerEngine> MarkerUnit<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the engine record this unit owns.
    #[must_use]
    pub fn record(&self) -> Option<EngineMarker<E::Element>> {
        self.identity.owned()
    }

    #[must_use]
    pub fn is_subscribed(&self, kind: MarkerEventKind) -> bool {
        self.bridge.is_subscribed(kind)
    }

    #[must_use]
    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    /// Apply one render of the unit.
    ///
    /// `engine` is the live context, or `None` while no engine is available.
    /// Order within the call: create, then sync subscriptions, then push the
    /// position. Position updates go only to the engine that holds the record.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::UnsupportedUpdate`] if a write-once field of
    /// `spec` differs from the spec the record was created with. Creation,
    /// subscriptions and the position update have still been applied.
    pub fn render(
        &mut self,
        engine: Option<&Rc<E>>,
        spec: &MarkerSpec,
        callbacks: &MarkerCallbacks<E>,
    ) -> Result<RenderOutcome, MarkerError> {
        if self.unmounted {
            return Ok(RenderOutcome::Unmounted);
        }

        let created = self.identity.ensure_created(engine.map(Rc::as_ref), spec);
        if created {
            self.owner = engine.cloned();
        }

        for kind in MarkerEventKind::ALL {
            self.bridge.sync(kind, engine, callbacks.get(kind), self.identity.owned_cell());
        }

        let live_owner = engine.filter(|live| self.owner.as_ref().is_some_and(|owner| Rc::ptr_eq(owner, live)));
        let moved = self.identity.reconcile(live_owner.map(Rc::as_ref), spec)?;

        Ok(if created {
            RenderOutcome::Created
        } else if moved {
            RenderOutcome::Moved
        } else if self.identity.is_created() {
            RenderOutcome::Unchanged
        } else {
            RenderOutcome::Deferred
        })
    }

    /// Detach every listener, then remove the owned record. Runs once.
    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        self.unmounted = true;
        self.bridge.detach_all();
        self.identity.ensure_removed(self.owner.as_deref());
        self.owner = None;
    }
}

impl<E: MarkerEngine> Drop for MarkerUnit<E> {
    fn drop(&mut self) {
        self.unmount();
    }
}
