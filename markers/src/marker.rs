//! Marker data model: what the host asks for and what the engine hands back.
//!
//! `MarkerSpec` is supplied by the declarative parent on every render. Only
//! its `time` is observed after creation; every other field is consumed once
//! when the engine record is built. `EngineMarker` is a snapshot of a record
//! that lives inside the engine. Its `element` handle is the only identity the
//! engine offers, so all matching goes through it.

#[cfg(test)]
#[path = "marker_test.rs"]
mod marker_test;

use crate::color::resolve_marker_color;
use crate::consts::{EVENT_MARKER_CLICK, EVENT_MARKER_DRAG, EVENT_MARKER_DROP};

/// Which edge of the waveform the marker's label sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkerPosition {
    Top,
    #[default]
    Bottom,
}

/// Parameters for one marker, as provided by the declarative parent.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    /// Timestamp in seconds. The only field that may change after creation.
    pub time: f64,
    /// Optional text rendered next to the marker.
    pub label: Option<String>,
    /// CSS color. Absent means the engine default.
    pub color: Option<String>,
    /// Label placement.
    pub position: MarkerPosition,
    /// Whether the engine lets the user drag the marker.
    pub draggable: bool,
    /// Suppress the browser context menu on the marker element.
    pub prevent_context_menu: bool,
}

impl Default for MarkerSpec {
    fn default() -> Self {
        Self {
            time: 0.0,
            label: None,
            color: None,
            position: MarkerPosition::Bottom,
            draggable: false,
            prevent_context_menu: false,
        }
    }
}

impl MarkerSpec {
    /// A spec at `time` with every other field defaulted.
    #[must_use]
    pub fn at(time: f64) -> Self {
        Self { time, ..Self::default() }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: MarkerPosition) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    /// The color the engine record is created with, normalized.
    #[must_use]
    pub fn resolved_color(&self) -> String {
        resolve_marker_color(self.color.as_deref())
    }

    /// Name of the first write-once field that differs between `self` (the
    /// spec used at creation) and `next`, if any. `time` is never reported.
    #[must_use]
    pub fn write_once_change(&self, next: &Self) -> Option<&'static str> {
        if self.label != next.label {
            Some("label")
        } else if self.resolved_color() != next.resolved_color() {
            Some("color")
        } else if self.position != next.position {
            Some("position")
        } else if self.draggable != next.draggable {
            Some("draggable")
        } else if self.prevent_context_menu != next.prevent_context_menu {
            Some("preventContextMenu")
        } else {
            None
        }
    }
}

/// Snapshot of a record owned by the engine.
///
/// `element` is the engine's opaque visual handle. It is unique and stable for
/// the lifetime of the record and is the only field usable as identity.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineMarker<El> {
    pub element: El,
    pub time: f64,
    pub draggable: bool,
    pub label: Option<String>,
}

/// The three marker events the engine broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerEventKind {
    Click,
    Drag,
    Drop,
}

impl MarkerEventKind {
    pub const ALL: [Self; 3] = [Self::Click, Self::Drag, Self::Drop];

    /// Engine-side event name.
    #[must_use]
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Click => EVENT_MARKER_CLICK,
            Self::Drag => EVENT_MARKER_DRAG,
            Self::Drop => EVENT_MARKER_DROP,
        }
    }

    /// Dense index for per-kind tables.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Click => 0,
            Self::Drag => 1,
            Self::Drop => 2,
        }
    }
}
