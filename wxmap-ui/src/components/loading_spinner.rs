//! Loading indicator.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct LoadingSpinnerProps {
    #[props(default = "Loading weather data...".to_string())]
    pub message: String,
}

/// Small inline badge shown while a sample refresh is in flight.
#[component]
pub fn LoadingSpinner(props: LoadingSpinnerProps) -> Element {
    rsx! {
        span {
            style: "display: inline-flex; align-items: center; gap: 6px; padding: 2px 8px; font-size: 12px; color: #1d4ed8; background: #dbeafe; border-radius: 9999px;",
            span {
                style: "width: 8px; height: 8px; border-radius: 50%; background: #3b82f6;",
            }
            "{props.message}"
        }
    }
}
