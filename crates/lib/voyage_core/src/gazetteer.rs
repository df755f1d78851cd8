//! Fixed place-name table used to re-center the map.
//!
//! Matching is plain substring containment on the lowercased text, not word
//! matching: "tunisien" still matches `tunisie`. The first entry of
//! [`ENTRIES`] found in the text wins, so the table order is significant.

use serde::Serialize;

/// A `(longitude, latitude)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// A named place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Entry {
    /// Lowercase name searched for in user text.
    pub name: &'static str,
    pub coordinates: Coordinates,
}

/// Known places, in lookup order.
pub const ENTRIES: [Entry; 6] = [
    Entry {
        name: "paris",
        coordinates: Coordinates::new(2.3522, 48.8566),
    },
    Entry {
        name: "londres",
        coordinates: Coordinates::new(-0.1278, 51.5074),
    },
    Entry {
        name: "new york",
        coordinates: Coordinates::new(-74.006, 40.7128),
    },
    Entry {
        name: "tokyo",
        coordinates: Coordinates::new(139.6917, 35.6895),
    },
    Entry {
        name: "rome",
        coordinates: Coordinates::new(12.4964, 41.9028),
    },
    Entry {
        name: "tunisie",
        coordinates: Coordinates::new(9.5375, 33.8869),
    },
];

/// Map center before any place has been mentioned (Paris).
pub const DEFAULT_CENTER: Coordinates = ENTRIES[0].coordinates;

/// Find the first known place mentioned anywhere in `text`.
pub fn locate(text: &str) -> Option<&'static Entry> {
    let lowered = text.to_lowercase();
    ENTRIES.iter().find(|entry| lowered.contains(entry.name))
}
