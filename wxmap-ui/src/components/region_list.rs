//! List of drawn regions with their current value and color.

use crate::state::AppState;
use dioxus::prelude::*;
use wxmap_core::classify::{find_source, region_color, sample_at};
use wxmap_core::region::RegionId;
use wxmap_core::series::field_unit;

/// One row as displayed.
#[derive(Clone, PartialEq)]
struct RegionRow {
    id: RegionId,
    label: String,
    vertex_count: usize,
    source_id: String,
    color: String,
    reading: Option<String>,
}

#[component]
pub fn RegionList() -> Element {
    let state = use_context::<AppState>();

    let rows: Vec<RegionRow> = {
        let regions = state.regions.read();
        let sources = state.sources.read();
        let samples = state.samples.read();
        let playback = state.playback.read();
        let (start, now) = (playback.range().start, playback.current());
        regions
            .iter()
            .map(|region| {
                let series = samples.get(region.id());
                let reading = find_source(&sources, region.data_source_id()).and_then(|source| {
                    let value = sample_at(source, series, start, now)?;
                    Some(format!(
                        "{:.1}{}",
                        value,
                        field_unit(&source.sample_field_key)
                    ))
                });
                RegionRow {
                    id: region.id().clone(),
                    label: region.label(),
                    vertex_count: region.vertices().len(),
                    source_id: region.data_source_id().to_string(),
                    color: region_color(region, &sources, series, start, now).to_string(),
                    reading,
                }
            })
            .collect()
    };
    let sources = state.sources.read().clone();

    if rows.is_empty() {
        return rsx! {
            div {
                style: "padding: 12px; font-size: 13px; color: #6b7280; text-align: center;",
                "No regions yet. Start drawing to add one."
            }
        };
    }

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 6px;",
            for row in rows {
                div {
                    key: "{row.id}",
                    style: "display: flex; align-items: center; gap: 6px; padding: 6px; border: 1px solid #e5e7eb; border-radius: 6px;",
                    span {
                        style: "width: 12px; height: 12px; border-radius: 2px; background: {row.color};",
                    }
                    div {
                        style: "flex: 1; font-size: 13px;",
                        div { "{row.label}" }
                        div {
                            style: "font-size: 11px; color: #6b7280;",
                            "{row.vertex_count} points"
                            if let Some(reading) = row.reading.clone() {
                                " · {reading}"
                            } else {
                                " · loading"
                            }
                        }
                    }
                    select {
                        onchange: {
                            let id = row.id.clone();
                            move |evt: Event<FormData>| state.reassign_region(&id, &evt.value())
                        },
                        for source in sources.iter() {
                            option {
                                value: "{source.id}",
                                selected: source.id == row.source_id,
                                "{source.display_name}"
                            }
                        }
                    }
                    button {
                        title: "Delete region",
                        onclick: {
                            let id = row.id.clone();
                            move |_| state.delete_region(&id)
                        },
                        "✕"
                    }
                }
            }
        }
    }
}
