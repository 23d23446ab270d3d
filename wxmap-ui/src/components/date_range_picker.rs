//! Date range picker with start and end datetime inputs.

use crate::state::AppState;
use dioxus::prelude::*;
use wxmap_core::notify::NotificationKind;
use wxmap_core::series::TimeRange;
use wxmap_utils::dates::{format_datetime_local, parse_datetime};

/// Start/end pickers for the playback range. An unparseable or inverted
/// range is reported and the current range is kept.
#[component]
pub fn DateRangePicker() -> Element {
    let state = use_context::<AppState>();
    let range = state.playback.read().range();
    let start = format_datetime_local(&range.start);
    let end = format_datetime_local(&range.end);

    let apply = move |start: Option<String>, end: Option<String>| {
        let current = state.playback.read().range();
        let parse = |value: Option<String>, fallback| match value {
            Some(v) => parse_datetime(&v),
            None => Ok(fallback),
        };
        let range = parse(start, current.start).and_then(|s| {
            let e = parse(end, current.end)?;
            Ok(TimeRange::try_new(s, e)?)
        });
        match range {
            Ok(range) if range != current => state.set_time_range(range),
            Ok(_) => {}
            Err(e) => state.notify(NotificationKind::Warning, "Invalid Time Range", &e.to_string()),
        }
    };

    rsx! {
        div {
            style: "margin: 8px 0; display: flex; gap: 12px; align-items: center; flex-wrap: wrap;",
            label {
                style: "font-weight: bold;",
                "From: "
                input {
                    r#type: "datetime-local",
                    value: "{start}",
                    onchange: move |evt: Event<FormData>| apply(Some(evt.value()), None),
                }
            }
            label {
                style: "font-weight: bold;",
                "To: "
                input {
                    r#type: "datetime-local",
                    value: "{end}",
                    onchange: move |evt: Event<FormData>| apply(None, Some(evt.value())),
                }
            }
        }
    }
}
