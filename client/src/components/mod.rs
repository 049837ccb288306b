//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components here bridge declarative Leptos state into imperative engines
//! read from context. They render no DOM of their own.

pub mod marker;
