//! Shared constants for the markers crate.

// ── Defaults ────────────────────────────────────────────────────

/// Fill color the engine applies when a marker spec carries none.
pub const DEFAULT_MARKER_COLOR: &str = "#d8d8d8";

// ── Event names ─────────────────────────────────────────────────

/// Engine event fired when a marker is clicked.
pub const EVENT_MARKER_CLICK: &str = "marker-click";

/// Engine event fired repeatedly while a draggable marker moves.
pub const EVENT_MARKER_DRAG: &str = "marker-drag";

/// Engine event fired once when a dragged marker is released.
pub const EVENT_MARKER_DROP: &str = "marker-drop";
