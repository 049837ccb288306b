//! Boundary to the external waveform engine.
//!
//! The engine is an imperative object owned elsewhere and shared by every
//! mounted unit. All methods take `&self`: implementations wrap a browser
//! object or interior-mutable state, and callers never hold one exclusively.
//! Events are broadcast, so every handler sees every marker's events.

use std::rc::Rc;

use crate::marker::{EngineMarker, MarkerEventKind, MarkerSpec};

/// Listener invoked with the record an event concerns and the raw engine event.
pub type MarkerHandler<El, Ev> = Rc<dyn Fn(&EngineMarker<El>, &Ev)>;

/// Handler type for a given engine.
pub type EngineHandler<E> = MarkerHandler<<E as MarkerEngine>::Element, <E as MarkerEngine>::Event>;

/// What a unit needs from a waveform engine's marker support.
pub trait MarkerEngine: 'static {
    /// Opaque visual handle of a record. Equality is handle identity.
    type Element: Clone + PartialEq + 'static;
    /// Raw event payload delivered next to the record.
    type Event: 'static;
    /// Token returned by [`subscribe`](Self::subscribe) and consumed by
    /// [`unsubscribe`](Self::unsubscribe).
    type Listener;

    /// Create a record from `spec`. The record becomes visible immediately.
    fn add_marker(&self, spec: &MarkerSpec) -> EngineMarker<Self::Element>;

    /// Snapshot of the live collection, in engine order.
    fn markers(&self) -> Vec<EngineMarker<Self::Element>>;

    /// Remove the record at `index` in the live collection.
    fn remove_marker(&self, index: usize);

    /// Move the record whose element is `marker.element` to `time`.
    ///
    /// The only post-creation mutation the engine supports.
    fn update_marker_position(&self, marker: &EngineMarker<Self::Element>, time: f64);

    /// Register `handler` for every event of `kind`, for all markers.
    fn subscribe(&self, kind: MarkerEventKind, handler: EngineHandler<Self>) -> Self::Listener;

    /// Remove a listener previously returned by [`subscribe`](Self::subscribe).
    fn unsubscribe(&self, kind: MarkerEventKind, listener: Self::Listener);
}
