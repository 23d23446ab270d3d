//! Dropdown selector for the data source assigned to new regions.

use crate::state::AppState;
use dioxus::prelude::*;

/// Data source dropdown selector.
/// Reads the catalog from AppState and updates selected_source on change.
#[component]
pub fn DataSourceSelector() -> Element {
    let mut state = use_context::<AppState>();
    let sources = state.sources.read().clone();
    let selected = (state.selected_source)();

    let on_change = move |evt: Event<FormData>| {
        state.selected_source.set(evt.value());
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "data-source-select",
                style: "font-weight: bold; margin-right: 8px;",
                "Data Source: "
            }
            select {
                id: "data-source-select",
                onchange: on_change,
                for source in sources.iter() {
                    option {
                        value: "{source.id}",
                        selected: source.id == selected,
                        "{source.display_name}"
                    }
                }
            }
        }
    }
}
