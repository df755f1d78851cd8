//! # voyage_core
//!
//! Core domain logic for Voyage: the chat relay pipeline, the conversation
//! session, the gazetteer used for map hinting, and the map view lifecycle.

pub mod gazetteer;
pub mod map;
pub mod message;
#[cfg(feature = "runtime")]
pub mod relay;
#[cfg(feature = "runtime")]
pub mod session;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
