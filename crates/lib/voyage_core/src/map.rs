//! Map widget lifecycle.
//!
//! The widget script loads asynchronously and reports a [`LoadStatus`]. The
//! widget instance is built once, when the script is ready and a publishable
//! key is configured, then re-used: later center changes only move its camera.
//! Without a key the map stays uninitialized and the absence is logged once.

use serde::Serialize;
use tracing::{debug, error};

use crate::gazetteer::Coordinates;

/// Environment variable holding the publishable map-service key.
pub const MAP_KEY_VAR: &str = "AZURE_MAPS_KEY";

/// Initial zoom level of the widget.
pub const DEFAULT_ZOOM: u8 = 12;

/// Display language passed to the widget.
pub const LANGUAGE: &str = "fr-FR";

/// Load state of the external widget script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Ready,
    Error,
}

/// Where a widget control is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    TopRight,
}

/// Options the widget instance is constructed with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    pub subscription_key: String,
    pub center: Coordinates,
    pub zoom: u8,
    pub language: &'static str,
    pub zoom_control: ControlPosition,
}

/// A constructed widget instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapInstance {
    pub options: MapOptions,
    /// Current camera center.
    pub camera: Coordinates,
}

/// Outcome of one [`MapView::sync`] pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    /// Nothing rendered (script not ready, or no key).
    Uninitialized,
    /// The instance was constructed at this center.
    Created(Coordinates),
    /// The existing instance's camera moved (or stayed) at this center.
    Recentered(Coordinates),
}

/// Owns the widget instance across renders.
#[derive(Debug, Default)]
pub struct MapView {
    key: Option<String>,
    instance: Option<MapInstance>,
    reported_missing_key: bool,
}

impl MapView {
    pub fn new(key: Option<String>) -> Self {
        Self {
            key: key.filter(|k| !k.is_empty()),
            instance: None,
            reported_missing_key: false,
        }
    }

    /// Reads the key from [`MAP_KEY_VAR`].
    pub fn from_env() -> Self {
        Self::new(std::env::var(MAP_KEY_VAR).ok())
    }

    pub fn instance(&self) -> Option<&MapInstance> {
        self.instance.as_ref()
    }

    /// Apply one render pass for the given script status and center.
    pub fn sync(&mut self, status: LoadStatus, center: Coordinates) -> SyncOutcome {
        if status != LoadStatus::Ready {
            return SyncOutcome::Uninitialized;
        }

        if let Some(instance) = self.instance.as_mut() {
            instance.camera = center;
            debug!(?center, "map recentered");
            return SyncOutcome::Recentered(center);
        }

        let Some(key) = self.key.clone() else {
            if !self.reported_missing_key {
                error!("map key is missing ({MAP_KEY_VAR}), map disabled");
                self.reported_missing_key = true;
            }
            return SyncOutcome::Uninitialized;
        };

        self.instance = Some(MapInstance {
            options: MapOptions {
                subscription_key: key,
                center,
                zoom: DEFAULT_ZOOM,
                language: LANGUAGE,
                zoom_control: ControlPosition::TopRight,
            },
            camera: center,
        });
        debug!(?center, "map created");
        SyncOutcome::Created(center)
    }
}
