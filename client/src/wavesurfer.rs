//! wavesurfer.js markers plugin as a `MarkerEngine`.
//!
//! Binds the parts of the wavesurfer instance a marker unit needs:
//! `addMarker`, the plugin's `markers` array, `markers.remove(index)`,
//! `markers._updateMarkerPosition(marker)` and `on`/`un` for the three
//! `marker-*` events. The plugin offers no public update call; the private
//! position mutator is the only way to move a marker without re-creating it.
//!
//! Records are identified by their `el` property (the marker's DOM node),
//! compared with `Object.is`.

use js_sys::{Array, Function, Object, Reflect};
use markers::engine::{EngineHandler, MarkerEngine};
use markers::marker::{EngineMarker, MarkerEventKind, MarkerPosition, MarkerSpec};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::context::EngineContext;

#[wasm_bindgen]
extern "C" {
    /// A wavesurfer.js instance with the markers plugin registered.
    #[derive(Clone, Debug)]
    pub type WaveSurfer;

    #[wasm_bindgen(method, js_name = addMarker)]
    fn add_marker(this: &WaveSurfer, params: &JsValue) -> JsValue;

    #[wasm_bindgen(method, getter)]
    fn markers(this: &WaveSurfer) -> MarkersPlugin;

    #[wasm_bindgen(method)]
    fn on(this: &WaveSurfer, event: &str, handler: &Function);

    #[wasm_bindgen(method)]
    fn un(this: &WaveSurfer, event: &str, handler: &Function);

    type MarkersPlugin;

    #[wasm_bindgen(method, getter = markers)]
    fn list(this: &MarkersPlugin) -> Array;

    #[wasm_bindgen(method)]
    fn remove(this: &MarkersPlugin, index: u32);

    #[wasm_bindgen(method, js_name = _updateMarkerPosition)]
    fn update_marker_position(this: &MarkersPlugin, marker: &JsValue);
}

/// Context type for units bound to wavesurfer.
pub type WaveSurferContext = EngineContext<WaveSurferEngine>;

/// Errors from adopting a JS value as a wavesurfer engine.
#[derive(Debug, thiserror::Error)]
pub enum WaveSurferError {
    /// The value has no `addMarker` method.
    #[error("wavesurfer instance has no markers plugin registered")]
    MissingMarkersPlugin,
}

/// A marker's DOM node, compared by JS identity.
#[derive(Clone, Debug)]
pub struct MarkerElement(JsValue);

impl PartialEq for MarkerElement {
    fn eq(&self, other: &Self) -> bool {
        Object::is(&self.0, &other.0)
    }
}

/// Live subscription; keeps the JS closure alive until unsubscribed.
pub struct WaveListener {
    closure: Closure<dyn FnMut(JsValue, JsValue)>,
}

/// `MarkerEngine` over a wavesurfer instance.
pub struct WaveSurferEngine {
    ws: WaveSurfer,
}

impl WaveSurferEngine {
    #[must_use]
    pub fn new(ws: WaveSurfer) -> Self {
        Self { ws }
    }

    /// Adopt a JS value handed over by the page as the wavesurfer instance.
    ///
    /// # Errors
    ///
    /// Returns [`WaveSurferError::MissingMarkersPlugin`] if the value does not
    /// expose `addMarker`.
    pub fn from_js(value: JsValue) -> Result<Self, WaveSurferError> {
        let has_markers = Reflect::get(&value, &JsValue::from_str("addMarker")).is_ok_and(|f| f.is_function());
        if !has_markers {
            return Err(WaveSurferError::MissingMarkersPlugin);
        }
        Ok(Self::new(value.unchecked_into()))
    }

    fn live_marker(&self, element: &MarkerElement) -> Option<JsValue> {
        self.ws
            .markers()
            .list()
            .iter()
            .find(|raw| MarkerElement(read(raw, "el")) == *element)
    }
}

impl MarkerEngine for WaveSurferEngine {
    type Element = MarkerElement;
    type Event = JsValue;
    type Listener = WaveListener;

    fn add_marker(&self, spec: &MarkerSpec) -> EngineMarker<MarkerElement> {
        let raw = self.ws.add_marker(&marker_params(spec));
        record_from_js(&raw, spec.time)
    }

    fn markers(&self) -> Vec<EngineMarker<MarkerElement>> {
        self.ws
            .markers()
            .list()
            .iter()
            .map(|raw| record_from_js(&raw, f64::NAN))
            .collect()
    }

    fn remove_marker(&self, index: usize) {
        match u32::try_from(index) {
            Ok(index) => self.ws.markers().remove(index),
            Err(err) => log::warn!("marker index {index} out of range: {err}"),
        }
    }

    fn update_marker_position(&self, marker: &EngineMarker<MarkerElement>, time: f64) {
        let Some(live) = self.live_marker(&marker.element) else {
            log::debug!("marker to move is no longer on the waveform");
            return;
        };
        let moved = Object::assign(&Object::new(), live.unchecked_ref());
        set(&moved, "time", &JsValue::from_f64(time));
        self.ws.markers().update_marker_position(&moved);
    }

    fn subscribe(&self, kind: MarkerEventKind, handler: EngineHandler<Self>) -> WaveListener {
        let closure = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |raw: JsValue, event: JsValue| {
            handler(&record_from_js(&raw, f64::NAN), &event);
        });
        self.ws.on(kind.event_name(), closure.as_ref().unchecked_ref());
        WaveListener { closure }
    }

    fn unsubscribe(&self, kind: MarkerEventKind, listener: WaveListener) {
        self.ws.un(kind.event_name(), listener.closure.as_ref().unchecked_ref());
    }
}

/// `MarkerParams` object for `addMarker`.
fn marker_params(spec: &MarkerSpec) -> JsValue {
    let params = Object::new();
    set(&params, "time", &JsValue::from_f64(spec.time));
    if let Some(label) = &spec.label {
        set(&params, "label", &JsValue::from_str(label));
    }
    set(&params, "color", &JsValue::from_str(&spec.resolved_color()));
    let position = match spec.position {
        MarkerPosition::Top => "top",
        MarkerPosition::Bottom => "bottom",
    };
    set(&params, "position", &JsValue::from_str(position));
    set(&params, "draggable", &JsValue::from_bool(spec.draggable));
    set(&params, "preventContextMenu", &JsValue::from_bool(spec.prevent_context_menu));
    params.into()
}

/// Snapshot a plugin marker object. `fallback_time` fills a missing `time`.
fn record_from_js(raw: &JsValue, fallback_time: f64) -> EngineMarker<MarkerElement> {
    EngineMarker {
        element: MarkerElement(read(raw, "el")),
        time: read(raw, "time").as_f64().unwrap_or(fallback_time),
        draggable: read(raw, "draggable").as_bool().unwrap_or(false),
        label: read(raw, "label").as_string(),
    }
}

fn read(target: &JsValue, key: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn set(target: &Object, key: &str, value: &JsValue) {
    if let Err(err) = Reflect::set(target, &JsValue::from_str(key), value) {
        log::warn!("failed to set marker field `{key}`: {err:?}");
    }
}
