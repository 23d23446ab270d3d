//! Collapsible side panel: drawing controls, data source, rules, time range
//! and the region list.

use super::{DataSourceSelector, DateRangePicker, RegionList, RulesEditor, MAP_CANVAS_ID};
use crate::js_bridge;
use crate::state::AppState;
use dioxus::prelude::*;
use wxmap_core::geom::{MAX_VERTICES, MIN_VERTICES};

#[component]
fn DrawingControls() -> Element {
    let mut state = use_context::<AppState>();
    let drawing = state.drawing.read().clone();
    let placed = drawing.points().len();

    if !drawing.is_drawing() {
        return rsx! {
            button {
                style: "width: 100%; padding: 8px;",
                onclick: move |_| {
                    state.drawing.write().start();
                    state.hovered.set(None);
                    js_bridge::focus_element(MAP_CANVAS_ID);
                },
                "Draw Region"
            }
        };
    }

    rsx! {
        div {
            style: "padding: 8px; background: #eff6ff; border-radius: 6px; font-size: 12px;",
            p { style: "margin: 0 0 4px 0;", "Click on the map to place points ({MIN_VERTICES}-{MAX_VERTICES})." }
            p { style: "margin: 0 0 4px 0;", "Click the first point or double-click to finish. Esc cancels." }
            strong { "{placed} point(s) placed" }
            div {
                style: "display: flex; gap: 6px; margin-top: 6px;",
                button {
                    disabled: !drawing.can_complete(),
                    onclick: move |_| state.complete_drawing(),
                    "Complete"
                }
                button {
                    onclick: move |_| {
                        state.drawing.write().cancel();
                    },
                    "Cancel"
                }
            }
        }
    }
}

#[component]
pub fn Sidebar() -> Element {
    let state = use_context::<AppState>();
    if (state.sidebar_collapsed)() {
        return rsx! {};
    }

    rsx! {
        div {
            style: "width: 300px; flex-shrink: 0; overflow-y: auto; padding: 12px; border-right: 1px solid #e5e7eb; display: flex; flex-direction: column; gap: 12px;",
            DrawingControls {}
            DataSourceSelector {}
            RulesEditor {}
            DateRangePicker {}
            h3 { style: "margin: 0; font-size: 14px;", "Regions" }
            RegionList {}
        }
    }
}
