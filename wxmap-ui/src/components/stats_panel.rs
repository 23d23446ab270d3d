//! Summary cards: region count, current time and per-source averages.

use crate::state::AppState;
use dioxus::prelude::*;
use wxmap_core::stats::source_stats;
use wxmap_utils::dates::format_clock;

#[derive(Props, Clone, PartialEq)]
struct StatCardProps {
    title: String,
    value: String,
    #[props(default = String::new())]
    detail: String,
}

#[component]
fn StatCard(props: StatCardProps) -> Element {
    rsx! {
        div {
            style: "flex: 1; min-width: 140px; padding: 10px 12px; border: 1px solid #e5e7eb; border-radius: 8px;",
            div { style: "font-size: 12px; color: #6b7280;", "{props.title}" }
            div { style: "font-size: 18px; font-weight: bold;", "{props.value}" }
            if !props.detail.is_empty() {
                div { style: "font-size: 11px; color: #9ca3af;", "{props.detail}" }
            }
        }
    }
}

#[component]
pub fn StatsPanel() -> Element {
    let state = use_context::<AppState>();
    let region_count = state.regions.read().len();
    let current = state.playback.read().current();
    let clock = format_clock(&current);
    let hint = if region_count == 0 {
        "Draw a region to begin".to_string()
    } else {
        String::new()
    };
    let cards: Vec<(String, String, String, String)> = source_stats(
        &state.regions.read(),
        &state.samples.read(),
        &state.sources.read(),
        current,
    )
    .into_iter()
    .map(|stat| {
        let value = match stat.average {
            Some(avg) => format!("{:.1}{}", avg, stat.unit),
            None => "--".to_string(),
        };
        (
            stat.source_id,
            format!("Avg {}", stat.display_name),
            value,
            format!("{} region(s)", stat.contributing),
        )
    })
    .collect();

    rsx! {
        div {
            style: "display: flex; gap: 8px; flex-wrap: wrap; padding: 8px 16px;",
            StatCard { title: "Regions", value: "{region_count}", detail: hint }
            StatCard { title: "Current Time", value: clock }
            for (id, title, value, detail) in cards {
                StatCard { key: "{id}", title, value, detail }
            }
        }
    }
}
