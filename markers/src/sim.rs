//! Headless in-memory engine.
//!
//! Behaves like the browser engine at the [`MarkerEngine`] boundary: records
//! live in an ordered list without keys, element handles are fresh per
//! record, removal is by index, and events are broadcast to every listener
//! of a kind. Call counters let callers observe exactly what reached the
//! engine.

#[cfg(test)]
#[path = "sim_test.rs"]
mod sim_test;

use std::cell::{Cell, RefCell};

use uuid::Uuid;

use crate::engine::{EngineHandler, MarkerEngine};
use crate::identity::position_of;
use crate::marker::{EngineMarker, MarkerEventKind, MarkerSpec};

/// Visual handle of a simulated record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Uuid);

impl ElementId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Raw event payload delivered with simulated marker events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimEvent {
    /// Pointer position on the timeline, in seconds.
    pub time: f64,
}

/// Token for a simulated subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Counts of boundary calls made against a [`SimEngine`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    pub created: usize,
    pub removed: usize,
    pub position_updates: usize,
    pub subscribed: usize,
    pub unsubscribed: usize,
}

struct Listener {
    id: ListenerId,
    kind: MarkerEventKind,
    handler: EngineHandler<SimEngine>,
}

/// In-memory marker engine.
#[derive(Default)]
pub struct SimEngine {
    markers: RefCell<Vec<EngineMarker<ElementId>>>,
    colors: RefCell<Vec<(ElementId, String)>>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
    stats: Cell<SimStats>,
}

impl SimEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stats(&self) -> SimStats {
        self.stats.get()
    }

    /// Number of live records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.borrow().is_empty()
    }

    /// Element handles in engine order.
    #[must_use]
    pub fn elements(&self) -> Vec<ElementId> {
        self.markers.borrow().iter().map(|m| m.element).collect()
    }

    /// Current time of the record with `element`, if it is still live.
    #[must_use]
    pub fn time_of(&self, element: &ElementId) -> Option<f64> {
        let markers = self.markers.borrow();
        position_of(&markers, element).map(|i| markers[i].time)
    }

    /// Color the record with `element` was created with.
    #[must_use]
    pub fn color_of(&self, element: &ElementId) -> Option<String> {
        self.colors
            .borrow()
            .iter()
            .find(|(e, _)| e == element)
            .map(|(_, color)| color.clone())
    }

    /// Number of live listeners for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: MarkerEventKind) -> usize {
        self.listeners.borrow().iter().filter(|l| l.kind == kind).count()
    }

    /// Move the record with `element` the way a user drag does: inside the
    /// engine, without a boundary call. Returns `false` if the record is gone.
    pub fn drag_to(&self, element: &ElementId, time: f64) -> bool {
        let mut markers = self.markers.borrow_mut();
        match position_of(&markers, element) {
            Some(i) => {
                markers[i].time = time;
                true
            }
            None => false,
        }
    }

    /// Broadcast an event of `kind` for the record with `element` to every
    /// listener of that kind. Returns the number of handlers invoked; zero if
    /// the record is not live.
    ///
    /// No internal borrow is held while handlers run, so handlers may call
    /// back into the engine.
    pub fn emit(&self, kind: MarkerEventKind, element: &ElementId, event: &SimEvent) -> usize {
        let record = {
            let markers = self.markers.borrow();
            match position_of(&markers, element) {
                Some(i) => markers[i].clone(),
                None => return 0,
            }
        };
        let handlers: Vec<EngineHandler<Self>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.handler.clone())
            .collect();
        for handler in &handlers {
            handler(&record, event);
        }
        handlers.len()
    }

    fn bump(&self, f: impl FnOnce(&mut SimStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

impl MarkerEngine for SimEngine {
    type Element = ElementId;
    type Event = SimEvent;
    type Listener = ListenerId;

    fn add_marker(&self, spec: &MarkerSpec) -> EngineMarker<ElementId> {
        let record = EngineMarker {
            element: ElementId::fresh(),
            time: spec.time,
            draggable: spec.draggable,
            label: spec.label.clone(),
        };
        self.markers.borrow_mut().push(record.clone());
        self.colors.borrow_mut().push((record.element, spec.resolved_color()));
        self.bump(|s| s.created += 1);
        record
    }

    fn markers(&self) -> Vec<EngineMarker<ElementId>> {
        self.markers.borrow().clone()
    }

    fn remove_marker(&self, index: usize) {
        let removed = {
            let mut markers = self.markers.borrow_mut();
            if index >= markers.len() {
                return;
            }
            markers.remove(index)
        };
        self.colors.borrow_mut().retain(|(e, _)| *e != removed.element);
        self.bump(|s| s.removed += 1);
    }

    fn update_marker_position(&self, marker: &EngineMarker<ElementId>, time: f64) {
        let mut markers = self.markers.borrow_mut();
        if let Some(i) = position_of(&markers, &marker.element) {
            markers[i].time = time;
            drop(markers);
            self.bump(|s| s.position_updates += 1);
        }
    }

    fn subscribe(&self, kind: MarkerEventKind, handler: EngineHandler<Self>) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push(Listener { id, kind, handler });
        self.bump(|s| s.subscribed += 1);
        id
    }

    fn unsubscribe(&self, kind: MarkerEventKind, listener: ListenerId) {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| !(l.id == listener && l.kind == kind));
        let removed = before != listeners.len();
        drop(listeners);
        if removed {
            self.bump(|s| s.unsubscribed += 1);
        }
    }
}
