//! Browser bindings: lets the page re-center its map with the same
//! gazetteer the rest of Voyage uses.

use wasm_bindgen::prelude::*;
use voyage_core::gazetteer::{self, DEFAULT_CENTER};
use voyage_core::map::{DEFAULT_ZOOM, LANGUAGE};

/// Returns the version of the voyage-wasm package.
#[wasm_bindgen]
pub fn version() -> String {
    voyage_core::version().to_string()
}

/// `[longitude, latitude]` of the first known place in `text`, or `undefined`.
#[wasm_bindgen(js_name = locate)]
pub fn locate(text: &str) -> Option<Vec<f64>> {
    gazetteer::locate(text).map(|entry| {
        vec![entry.coordinates.longitude, entry.coordinates.latitude]
    })
}

/// Initial map center as `[longitude, latitude]`.
#[wasm_bindgen(js_name = defaultCenter)]
pub fn default_center() -> Vec<f64> {
    vec![DEFAULT_CENTER.longitude, DEFAULT_CENTER.latitude]
}

#[wasm_bindgen(js_name = defaultZoom)]
pub fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}

#[wasm_bindgen(js_name = mapLanguage)]
pub fn map_language() -> String {
    LANGUAGE.to_string()
}
