//! Weather Region Map
//!
//! Users draw polygons on a pannable, zoomable map, bind each to a weather
//! parameter with color rules, and scrub or play through an hourly timeline
//! while the regions recolor from synthetic weather samples.
//!
//! Data flow:
//! 1. Drawing a region or changing the time range bumps the refresh key.
//! 2. The refresh effect fetches samples for every region's centroid and
//!    stores them under a new cache generation.
//! 3. The map repaints from the regions, cache and playback clock; the
//!    timeline task advances the clock while playing.

use dioxus::prelude::*;
use wxmap_ui::components::{
    Header, MapView, NotificationList, Sidebar, StatsPanel, TimelineSlider,
};
use wxmap_ui::state::AppState;
use wxmap_weather::fetch_targets;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("wxmap-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let state = use_context_provider(AppState::new);

    // Region centroids and the range are the only inputs to a refresh.
    // Data source changes and clock ticks reuse the cached samples.
    let refresh_key = use_memo(move || {
        (
            fetch_targets(&state.regions.read()),
            state.playback.read().range(),
        )
    });

    use_effect(move || {
        let (targets, range) = refresh_key();
        log::info!(
            "refreshing samples for {} region(s) from {} to {}",
            targets.len(),
            range.start,
            range.end
        );
        state.refresh_samples();
    });

    let (top, bottom) = state.theme.read().background();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; height: 100vh; font-family: system-ui, sans-serif;",
            Header {
                title: "Weather Region Map",
                subtitle: "Draw regions, assign data sources, play through time",
            }
            div {
                style: "display: flex; flex: 1; min-height: 0;",
                Sidebar {}
                div {
                    style: "flex: 1; display: flex; flex-direction: column; min-width: 0;",
                    StatsPanel {}
                    div {
                        style: "flex: 1; min-height: 0; background: linear-gradient(to bottom, {top}, {bottom});",
                        MapView {}
                    }
                    TimelineSlider {}
                }
            }
            NotificationList {}
        }
    }
}
