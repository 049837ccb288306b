//! Per-unit view of the engine's global marker events.
//!
//! The engine delivers every `marker-click`, `marker-drag` and `marker-drop`
//! to every listener. `EventBridge` installs at most one listener per kind
//! for its unit and wraps the unit's callback in a filter that drops events
//! for any record other than the one the unit owns.
//!
//! Each kind is an independent two-state machine:
//!
//! ```text
//!   Unsubscribed ──(callback + live engine)──▶ Subscribed
//!   Subscribed   ──(callback gone | engine gone | detach)──▶ Unsubscribed
//! ```
//!
//! A change of engine, callback reference, or owned element while
//! subscribed tears the old listener down before installing the new one.
//! Dropping the bridge detaches every kind.

#[cfg(test)]
#[path = "bridge_test.rs"]
mod bridge_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::engine::{EngineHandler, MarkerEngine};
use crate::identity::{OwnedMarker, owns};
use crate::marker::{EngineMarker, MarkerEventKind};

enum Slot<E: MarkerEngine> {
    Unsubscribed,
    Subscribed {
        engine: Rc<E>,
        listener: E::Listener,
        callback: EngineHandler<E>,
        bound: Option<E::Element>,
    },
}

/// Filtered subscriptions for one unit.
pub struct EventBridge<E: MarkerEngine> {
    slots: [Slot<E>; 3],
}

impl<E: MarkerEngine> Default for EventBridge<E> {
    fn default() -> Self {
        Self { slots: [Slot::Unsubscribed, Slot::Unsubscribed, Slot::Unsubscribed] }
    }
}

impl<E: MarkerEngine> EventBridge<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_subscribed(&self, kind: MarkerEventKind) -> bool {
        matches!(self.slots[kind.index()], Slot::Subscribed { .. })
    }

    /// Bring the `kind` subscription in line with `engine` and `callback`.
    ///
    /// Returns `true` if a listener was installed or removed.
    pub fn sync(
        &mut self,
        kind: MarkerEventKind,
        engine: Option<&Rc<E>>,
        callback: Option<&EngineHandler<E>>,
        owned: &OwnedMarker<E::Element>,
    ) -> bool {
        let bound = owned.borrow().as_ref().map(|m| m.element.clone());
        let (Some(engine), Some(callback)) = (engine, callback) else {
            return self.release(kind);
        };

        if let Slot::Subscribed { engine: current_engine, callback: current, bound: current_bound, .. } =
            &self.slots[kind.index()]
        {
            if Rc::ptr_eq(current_engine, engine) && Rc::ptr_eq(current, callback) && *current_bound == bound {
                return false;
            }
        }

        self.release(kind);
        let listener = engine.subscribe(kind, filtered::<E>(Rc::downgrade(owned), Rc::clone(callback)));
        self.slots[kind.index()] = Slot::Subscribed {
            engine: Rc::clone(engine),
            listener,
            callback: Rc::clone(callback),
            bound,
        };
        true
    }

    /// Unsubscribe every kind.
    pub fn detach_all(&mut self) {
        for kind in MarkerEventKind::ALL {
            self.release(kind);
        }
    }

    fn release(&mut self, kind: MarkerEventKind) -> bool {
        match std::mem::replace(&mut self.slots[kind.index()], Slot::Unsubscribed) {
            Slot::Subscribed { engine, listener, .. } => {
                engine.unsubscribe(kind, listener);
                true
            }
            Slot::Unsubscribed => false,
        }
    }
}

impl<E: MarkerEngine> Drop for EventBridge<E> {
    fn drop(&mut self) {
        self.detach_all();
    }
}

/// Wrap `callback` so it only sees events for the record held in `owned`.
///
/// Holds the owned cell weakly; once the unit is gone the handler is inert.
fn filtered<E: MarkerEngine>(
    owned: Weak<RefCell<Option<EngineMarker<E::Element>>>>,
    callback: EngineHandler<E>,
) -> EngineHandler<E> {
    Rc::new(move |marker: &EngineMarker<E::Element>, event: &E::Event| {
        let Some(owned) = owned.upgrade() else {
            return;
        };
        if owns(&owned, marker) {
            callback(marker, event);
        }
    })
}
