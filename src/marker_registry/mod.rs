//! MarkerRegistry Module
//!
//! ## Overview
//!
//! Owns the in-memory camera list and the map markers bound to it, and
//! answers the dashboard's filter / search / export operations. The whole
//! set is rebuilt from the camera data source on each refresh; there is no
//! incremental diffing and no persistence.
//!
//! ## Module layout
//!
//! - `types`: camera record, marker entry, filter mode, opacity constants
//! - `service`: the registry itself
//!
//! ## Visibility model
//!
//! ```text
//! filter  -> opacity 1.0 / 0.0, owns renderer attachment
//! search  -> opacity 1.0 / 0.2, never touches attachment
//! ```
//!
//! Opacity is last-writer-wins between the two; `filter all` restores the
//! fully visible set.

pub mod service;
pub mod types;

// Re-exports
pub use service::MarkerRegistry;
pub use types::*;
