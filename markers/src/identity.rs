//! Element-handle identity.
//!
//! The engine's list has no keys and shifts as other markers come and go, so
//! neither index nor spec content identifies a record. These helpers compare
//! by element handle only.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::marker::EngineMarker;

/// The record a unit owns, shared between its lifecycle controller and the
/// handlers its event bridge installs.
pub type OwnedMarker<El> = Rc<RefCell<Option<EngineMarker<El>>>>;

/// Whether two snapshots refer to the same engine record.
#[must_use]
pub fn same_element<El: PartialEq>(a: &EngineMarker<El>, b: &EngineMarker<El>) -> bool {
    a.element == b.element
}

/// Current index of the record with `element` in `markers`.
#[must_use]
pub fn position_of<El: PartialEq>(markers: &[EngineMarker<El>], element: &El) -> Option<usize> {
    markers.iter().position(|m| m.element == *element)
}

/// Whether `candidate` is the record held in `owned`.
///
/// False when nothing is owned yet, or when the cell is mid-update.
#[must_use]
pub fn owns<El: PartialEq>(owned: &RefCell<Option<EngineMarker<El>>>, candidate: &EngineMarker<El>) -> bool {
    owned
        .try_borrow()
        .is_ok_and(|slot| slot.as_ref().is_some_and(|m| same_element(m, candidate)))
}

/// Timestamp equality used to suppress no-op position updates.
///
/// Exact comparison; two NaNs count as equal so a NaN time does not churn.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn same_time(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}
