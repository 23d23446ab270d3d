//! Timeline slider, playback controls and the playback timer.

use crate::js_bridge;
use crate::state::AppState;
use dioxus::core::Task;
use dioxus::prelude::*;
use wxmap_core::timeline::{PlaybackSpeed, TickOutcome};
use wxmap_utils::dates::{format_clock, format_day};

/// Runs a repeating tick task while playback is on. The task is cancelled
/// when playback pauses, the speed changes, or the component unmounts.
fn use_playback_timer(state: AppState) {
    let mut playback = state.playback;
    let mut timer = use_signal(|| None::<Task>);
    let playing = use_memo(move || playback.read().is_playing());
    let interval = use_memo(move || playback.read().interval());

    use_effect(move || {
        let playing = playing();
        let interval = interval();
        if let Some(task) = timer.write().take() {
            task.cancel();
        }
        if !playing {
            return;
        }
        let task = spawn(async move {
            loop {
                js_bridge::sleep_ms(interval.as_millis() as u64).await;
                if let TickOutcome::Finished(_) = playback.write().tick() {
                    break;
                }
            }
        });
        timer.set(Some(task));
    });

    use_drop(move || {
        if let Some(task) = timer.write().take() {
            task.cancel();
        }
    });
}

#[component]
pub fn TimelineSlider() -> Element {
    let mut state = use_context::<AppState>();
    use_playback_timer(state);

    let playback = state.playback.read().clone();
    let total = playback.total_hours();
    let hour = playback.current_hour();
    let progress = playback.progress();
    let progress_label = format!("{:.1}", progress);
    let range = playback.range();
    let playing = playback.is_playing();
    let speed = playback.speed();
    let clock = format_clock(&playback.current());
    let day = format_day(&playback.current());
    let hour_label = hour + 1;
    let last_hour = total.saturating_sub(1);
    let start_label = format_clock(&range.start);
    let end_label = format_clock(&range.end);

    let on_slide = move |evt: Event<FormData>| {
        if let Ok(h) = evt.value().parse::<usize>() {
            state.playback.write().seek_hour(h);
        }
    };

    rsx! {
        div {
            style: "padding: 16px; display: flex; flex-direction: column; gap: 12px;",
            div {
                style: "text-align: center;",
                div {
                    style: "font-size: 22px; font-weight: bold;",
                    "{clock}"
                }
                div {
                    style: "font-size: 12px; color: #6b7280;",
                    "{day} · Hour {hour_label} of {total} · {progress_label}% Complete"
                }
            }
            div {
                style: "height: 6px; background: #e5e7eb; border-radius: 3px; overflow: hidden;",
                div {
                    style: "height: 100%; width: {progress}%; background: linear-gradient(to right, #3b82f6, #8b5cf6);",
                }
            }
            div {
                style: "display: flex; justify-content: space-between; font-size: 12px; color: #6b7280;",
                span { "{start_label}" }
                span { "{end_label}" }
            }
            input {
                r#type: "range",
                min: "0",
                max: "{last_hour}",
                step: "1",
                value: "{hour}",
                oninput: on_slide,
            }
            div {
                style: "display: flex; justify-content: center; gap: 8px; align-items: center;",
                button {
                    disabled: playback.at_start(),
                    onclick: move |_| state.playback.write().skip_to_start(),
                    "⏮"
                }
                button {
                    onclick: move |_| {
                        state.playback.write().toggle();
                    },
                    if playing { "⏸" } else { "▶" }
                }
                button {
                    disabled: playback.at_end(),
                    onclick: move |_| state.playback.write().skip_to_end(),
                    "⏭"
                }
                span { style: "margin-left: 12px; font-size: 12px;", "Speed:" }
                for (s, label) in PlaybackSpeed::ALL.into_iter().map(|s| (s, s.label())) {
                    button {
                        key: "{label}",
                        style: if s == speed { "font-weight: bold;" } else { "" },
                        onclick: move |_| state.playback.write().set_speed(s),
                        "{label}"
                    }
                }
            }
        }
    }
}
