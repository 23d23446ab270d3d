//! Toast stack in the corner of the window.

use crate::state::AppState;
use dioxus::prelude::*;
use wxmap_core::notify::NotificationKind;

fn accent(kind: NotificationKind) -> (&'static str, &'static str) {
    match kind {
        NotificationKind::Success => ("#ECFDF5", "#10b981"),
        NotificationKind::Error => ("#FFEBEE", "#C62828"),
        NotificationKind::Warning => ("#FFFBEB", "#f59e0b"),
        NotificationKind::Info => ("#EFF6FF", "#3b82f6"),
    }
}

#[component]
pub fn NotificationList() -> Element {
    let mut state = use_context::<AppState>();
    let items = state.notifications.read().as_slice().to_vec();

    rsx! {
        div {
            style: "position: fixed; top: 16px; right: 16px; z-index: 50; display: flex; flex-direction: column; gap: 8px; width: 300px;",
            for item in items {
                div {
                    key: "{item.id}",
                    class: format!("notification notification-{}", item.kind.as_str()),
                    style: {
                        let (bg, border) = accent(item.kind);
                        format!("padding: 10px 12px; background: {bg}; border-left: 4px solid {border}; border-radius: 4px; box-shadow: 0 2px 6px rgba(0,0,0,0.15);")
                    },
                    div {
                        style: "display: flex; justify-content: space-between;",
                        strong { "{item.title}" }
                        button {
                            style: "border: none; background: none; cursor: pointer;",
                            onclick: move |_| {
                                state.notifications.write().dismiss(item.id);
                            },
                            "✕"
                        }
                    }
                    div { style: "font-size: 13px;", "{item.message}" }
                }
            }
        }
    }
}
