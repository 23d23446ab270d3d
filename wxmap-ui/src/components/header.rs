//! Title bar with region count, loading badge and global actions.

use super::LoadingSpinner;
use crate::js_bridge;
use crate::state::AppState;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct HeaderProps {
    /// Dashboard title
    pub title: String,
    #[props(default = String::new())]
    pub subtitle: String,
}

#[component]
pub fn Header(props: HeaderProps) -> Element {
    let mut state = use_context::<AppState>();
    let region_count = state.regions.read().len();
    let loading = (state.loading)();
    let dark = state.theme.read().is_dark();
    let fullscreen = (state.fullscreen)();

    rsx! {
        div {
            style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 16px; border-bottom: 1px solid #e5e7eb;",
            div {
                style: "display: flex; align-items: center; gap: 12px;",
                button {
                    title: "Toggle sidebar",
                    onclick: move |_| state.sidebar_collapsed.toggle(),
                    "☰"
                }
                div {
                    h1 { style: "margin: 0; font-size: 18px;", "{props.title}" }
                    if !props.subtitle.is_empty() {
                        p { style: "margin: 0; font-size: 12px; color: #6b7280;", "{props.subtitle}" }
                    }
                }
                span {
                    style: "font-size: 12px; padding: 2px 8px; background: #f3f4f6; border-radius: 9999px;",
                    "{region_count} region(s)"
                }
                if loading {
                    LoadingSpinner {}
                }
            }
            div {
                style: "display: flex; gap: 8px;",
                button {
                    disabled: region_count == 0,
                    onclick: move |_| state.export(),
                    "Export"
                }
                button {
                    title: "Toggle theme",
                    onclick: move |_| {
                        let next = state.theme.read().toggled();
                        state.theme.set(next);
                    },
                    if dark { "☀" } else { "☾" }
                }
                button {
                    title: "Toggle fullscreen",
                    onclick: move |_| state.fullscreen.set(js_bridge::toggle_fullscreen(fullscreen)),
                    if fullscreen { "Exit Fullscreen" } else { "Fullscreen" }
                }
            }
        }
    }
}
