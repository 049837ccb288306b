//! # marker-client
//!
//! Leptos integration for waveform markers. A `<Marker/>` component is one
//! declarative unit: it renders nothing of its own and keeps exactly one
//! marker alive inside the waveform engine found in context, via the
//! `markers` crate. With the `hydrate` feature the crate also binds the
//! wavesurfer.js markers plugin as that engine.

pub mod components;
pub mod context;
#[cfg(feature = "hydrate")]
pub mod wavesurfer;

/// Route `log` records to the browser console and install the panic hook.
///
/// Call once from the hydrate entry point before mounting.
#[cfg(feature = "hydrate")]
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(level) {
        log::debug!("console logger already installed: {err}");
    }
}
