//! Marker reconciliation core for waveform engines.
//!
//! This crate keeps one declarative unit (a component instance on the host
//! side) mapped to exactly one marker inside an imperative waveform engine.
//! The engine owns its marker list, exposes no keys, supports no general
//! update, and broadcasts every marker event to every listener. Everything
//! here is plain Rust so it can be tested natively; the browser binding lives
//! in the host crate and only implements [`engine::MarkerEngine`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Engine boundary trait and handler types |
//! | [`marker`] | Marker spec, engine record snapshot, event kinds |
//! | [`identity`] | Element-handle comparisons shared by lifecycle and events |
//! | [`lifecycle`] | One-shot creation, position updates, teardown removal |
//! | [`bridge`] | Filter-then-forward adapter over the global event stream |
//! | [`unit`] | Per-unit facade driving lifecycle and bridge from render/unmount |
//! | [`sim`] | Headless in-memory engine |
//! | [`color`] | Marker color normalization |
//! | [`error`] | Error type |
//! | [`consts`] | Engine defaults and event names |

pub mod bridge;
pub mod color;
pub mod consts;
pub mod engine;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod marker;
pub mod sim;
pub mod unit;
