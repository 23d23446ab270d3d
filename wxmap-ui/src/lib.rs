//! Shared Dioxus components, canvas painter and JS bridge for the weather
//! region map.
//!
//! This crate provides:
//! - `js_bridge`: browser helpers reached via `js_sys::eval()` and `web_sys`
//! - `canvas`: replays a `wxmap_core::render::Frame` onto an HTML canvas
//! - `state`: Reactive AppState with Dioxus Signals
//! - `components`: RSX components (map, timeline, sidebar, panels)

pub mod canvas;
pub mod components;
pub mod js_bridge;
pub mod state;
