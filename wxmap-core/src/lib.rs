//! Core of the weather region map.
//!
//! - `viewport` / `geom`: screen ↔ world transform and polygon utilities
//! - `drawing`: the polygon digitizing state machine
//! - `region` / `classify`: drawn regions and their time-indexed colors
//! - `series` / `cache`: hourly samples per region
//! - `timeline`, `notify`, `stats`, `export`: dashboard collaborators
//! - `render`: pure frame construction for the map canvas

pub mod cache;
pub mod classify;
pub mod config;
pub mod drawing;
pub mod error;
pub mod export;
pub mod geom;
pub mod notify;
pub mod region;
pub mod render;
pub mod series;
pub mod stats;
pub mod timeline;
pub mod viewport;

pub use error::{DashboardError, Result};
