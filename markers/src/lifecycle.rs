//! Identity and lifecycle of a unit's engine record.
//!
//! A `MarkerIdentity` ties one declarative unit to at most one engine record:
//!
//! - creation happens exactly once, on the first call that sees a live engine;
//!   calls before that are deferred, calls after are no-ops
//! - only `time` is pushed after creation, and only when it differs from the
//!   engine's live record
//! - removal resolves the record's index by element at teardown time, since
//!   other markers may have shifted it
//!
//! Every operation is safe to repeat; the host may run effects more than once.

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod lifecycle_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::MarkerEngine;
use crate::error::MarkerError;
use crate::identity::{OwnedMarker, position_of, same_time};
use crate::marker::{EngineMarker, MarkerSpec};

/// Per-unit identity: the one-shot creation flag and the owned record.
pub struct MarkerIdentity<El> {
    created: bool,
    owned: OwnedMarker<El>,
    created_with: Option<MarkerSpec>,
}

impl<El> Default for MarkerIdentity<El> {
    fn default() -> Self {
        Self { created: false, owned: Rc::new(RefCell::new(None)), created_with: None }
    }
}

impl<El: Clone + PartialEq> MarkerIdentity<El> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether creation has happened. Never resets.
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Snapshot of the owned record, if any.
    #[must_use]
    pub fn owned(&self) -> Option<EngineMarker<El>> {
        self.owned.borrow().clone()
    }

    /// Shared cell holding the owned record, for event filtering.
    #[must_use]
    pub fn owned_cell(&self) -> &OwnedMarker<El> {
        &self.owned
    }

    /// Create the engine record from `spec` if that has not happened yet.
    ///
    /// Returns `true` only on the call that performed creation. With no
    /// engine the call is deferred and a later call will create.
    pub fn ensure_created<E>(&mut self, engine: Option<&E>, spec: &MarkerSpec) -> bool
    where
        E: MarkerEngine<Element = El>,
    {
        if self.created {
            return false;
        }
        let Some(engine) = engine else {
            return false;
        };

        self.created = true;
        let record = engine.add_marker(spec);
        *self.owned.borrow_mut() = Some(record);
        self.created_with = Some(spec.clone());
        true
    }

    /// Move the owned record to `time`.
    ///
    /// Returns `true` if a mutation was issued. Nothing is issued when no
    /// record is owned, no engine is available, or `time` equals the record's
    /// current time. The current time is the engine's live time for the
    /// record, which changes on user drags; the owned snapshot is used only
    /// when the record is not listed.
    pub fn update_position<E>(&mut self, engine: Option<&E>, time: f64) -> bool
    where
        E: MarkerEngine<Element = El>,
    {
        let Some(engine) = engine else {
            return false;
        };
        let Some(record) = self.owned() else {
            return false;
        };

        let live = engine.markers();
        let current = position_of(&live, &record.element)
            .and_then(|i| live.get(i))
            .map_or(record.time, |m| m.time);
        if same_time(current, time) {
            self.set_known_time(time);
            return false;
        }

        engine.update_marker_position(&EngineMarker { time, ..record }, time);
        self.set_known_time(time);
        true
    }

    fn set_known_time(&self, time: f64) {
        if let Some(record) = self.owned.borrow_mut().as_mut() {
            record.time = time;
        }
    }

    /// Render-time reconciliation against the spec used at creation.
    ///
    /// A changed `time` is pushed through [`update_position`](Self::update_position).
    /// A changed write-once field is not applied and is reported as
    /// [`MarkerError::UnsupportedUpdate`]; the position update for the same
    /// render still happens.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::UnsupportedUpdate`] naming the first write-once
    /// field that differs from the creation spec.
    pub fn reconcile<E>(&mut self, engine: Option<&E>, spec: &MarkerSpec) -> Result<bool, MarkerError>
    where
        E: MarkerEngine<Element = El>,
    {
        let rejected = self.created_with.as_ref().and_then(|initial| initial.write_once_change(spec));
        let moved = self.update_position(engine, spec.time);
        match rejected {
            Some(field) => Err(MarkerError::UnsupportedUpdate { field }),
            None => Ok(moved),
        }
    }

    /// Remove the owned record from the engine.
    ///
    /// Returns `true` if a removal was issued. With no engine this is a no-op
    /// and the record stays owned. If the record is already gone from the
    /// engine the ownership is dropped without a removal call.
    pub fn ensure_removed<E>(&mut self, engine: Option<&E>) -> bool
    where
        E: MarkerEngine<Element = El>,
    {
        let Some(engine) = engine else {
            return false;
        };
        let Some(record) = self.owned.borrow_mut().take() else {
            return false;
        };

        match position_of(&engine.markers(), &record.element) {
            Some(index) => {
                engine.remove_marker(index);
                true
            }
            None => false,
        }
    }
}
