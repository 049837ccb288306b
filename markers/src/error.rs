//! Error type for marker reconciliation.

/// Errors surfaced by the markers crate.
///
/// Missing engine context and identity misses are not errors: those paths
/// degrade to no-ops.
#[derive(Debug, thiserror::Error)]
pub enum MarkerError {
    /// A write-once marker attribute changed after the engine record was created.
    #[error("marker field `{field}` cannot change after creation; only `time` is updatable")]
    UnsupportedUpdate { field: &'static str },
}
