//! Declarative marker unit.
//!
//! ARCHITECTURE
//! ============
//! `<Marker/>` renders nothing. It owns a `markers::unit::MarkerUnit` and
//! drives it from one effect that tracks the engine context and `time`, so
//! creation, subscription sync and position updates happen in that order on
//! every run. Teardown is tied to the component's owner: `on_cleanup` runs
//! the unmount, and dropping the stored unit repeats it as a no-op.
//!
//! Only `time` is reactive. The remaining props are read once when the
//! engine record is created; the engine has no update path for them.

#[cfg(test)]
#[path = "marker_test.rs"]
mod marker_test;

use leptos::prelude::*;
use markers::engine::{EngineHandler, MarkerEngine};
use markers::error::MarkerError;
use markers::marker::{MarkerPosition, MarkerSpec};
use markers::unit::{MarkerCallbacks, MarkerUnit, RenderOutcome};

use crate::context::{EngineContext, use_engine_context};

/// One marker on the waveform in context.
#[component]
pub fn Marker<E: MarkerEngine>(
    /// Marker timestamp in seconds.
    #[prop(into)]
    time: Signal<f64>,
    #[prop(optional, into)] label: Option<String>,
    #[prop(optional, into)] color: Option<String>,
    #[prop(optional)] position: MarkerPosition,
    #[prop(optional)] draggable: bool,
    #[prop(optional)] prevent_context_menu: bool,
    #[prop(optional)] on_click: Option<EngineHandler<E>>,
    #[prop(optional)] on_drag: Option<EngineHandler<E>>,
    #[prop(optional)] on_drop: Option<EngineHandler<E>>,
) -> impl IntoView {
    let context = use_engine_context::<E>();
    if context.is_none() {
        log::warn!("<Marker/> mounted without an engine context; it will never create a marker");
    }

    let base = MarkerSpec { time: 0.0, label, color, position, draggable, prevent_context_menu };
    let callbacks: MarkerCallbacks<E> = MarkerCallbacks { on_click, on_drag, on_drop };
    let unit = mount_unit::<E>();

    Effect::new(move || {
        render_unit(unit, context, &spec_at(&base, time.get()), &callbacks);
    });
}

/// Store a fresh unit with the current owner and unmount it on cleanup.
fn mount_unit<E: MarkerEngine>() -> StoredValue<MarkerUnit<E>, LocalStorage> {
    let unit = StoredValue::new_local(MarkerUnit::<E>::new());
    on_cleanup(move || {
        if unit.try_update_value(MarkerUnit::unmount).is_none() {
            log::debug!("marker unit already disposed at cleanup");
        }
    });
    unit
}

/// One effect run: render the unit against whatever engine the context holds.
fn render_unit<E: MarkerEngine>(
    unit: StoredValue<MarkerUnit<E>, LocalStorage>,
    context: Option<EngineContext<E>>,
    spec: &MarkerSpec,
    callbacks: &MarkerCallbacks<E>,
) {
    let engine = context.and_then(|c| c.get());
    unit.update_value(|unit| {
        let result = unit.render(engine.as_ref(), spec, callbacks);
        log_render(spec.time, &result);
    });
}

/// The spec for one render: the creation-time props at `time`.
fn spec_at(base: &MarkerSpec, time: f64) -> MarkerSpec {
    MarkerSpec { time, ..base.clone() }
}

/// Log line for a render result, if it is worth one.
fn render_message(time: f64, result: &Result<RenderOutcome, MarkerError>) -> Option<(log::Level, String)> {
    match result {
        Ok(RenderOutcome::Created) => Some((log::Level::Debug, format!("marker created at {time}s"))),
        Ok(RenderOutcome::Deferred) => {
            Some((log::Level::Debug, format!("marker at {time}s waiting for a waveform engine")))
        }
        Ok(RenderOutcome::Moved | RenderOutcome::Unchanged | RenderOutcome::Unmounted) => None,
        Err(err) => Some((log::Level::Warn, err.to_string())),
    }
}

fn log_render(time: f64, result: &Result<RenderOutcome, MarkerError>) {
    if let Some((level, message)) = render_message(time, result) {
        log::log!(level, "{message}");
    }
}
