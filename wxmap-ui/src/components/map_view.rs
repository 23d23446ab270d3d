//! The map canvas: pointer handling for drawing, hover, pan and zoom, and
//! the paint effect.

use crate::canvas;
use crate::js_bridge::KeyListener;
use crate::state::AppState;
use dioxus::prelude::*;
use log::warn;
use std::rc::Rc;
use wxmap_core::drawing::ClickOutcome;
use wxmap_core::geom::{CanvasSize, ScreenPoint};
use wxmap_core::render::{render, FrameGate, Scene};

/// DOM id of the map canvas.
pub const MAP_CANVAS_ID: &str = "wxmap-canvas";

fn screen_point(evt: &Event<MouseData>) -> ScreenPoint {
    let p = evt.element_coordinates();
    ScreenPoint::new(p.x, p.y)
}

fn cancels_drawing(key: &str) -> bool {
    key == "Escape"
}

#[component]
pub fn MapView() -> Element {
    let mut state = use_context::<AppState>();
    let mut canvas_size = state.canvas_size;
    let mut pointer = use_signal(|| None::<ScreenPoint>);
    let mut drag_from = use_signal(|| None::<ScreenPoint>);
    let mut gate = use_signal(FrameGate::new);

    // Escape cancels a drawing session wherever focus is. The listener lives
    // as long as the map.
    use_hook(move || {
        Rc::new(KeyListener::install(move |key| {
            if cancels_drawing(key) && state.drawing.write().cancel() {
                pointer.set(None);
            }
        }))
    });

    // Repaint whenever anything the frame depends on changes.
    use_effect(move || {
        let viewport = state.viewport.read();
        let regions = state.regions.read();
        let sources = state.sources.read();
        let samples = state.samples.read();
        let playback = state.playback.read();
        let drawing = state.drawing.read();
        let hovered = state.hovered.read();
        let pointer = pointer.read();
        let scene = Scene {
            canvas: canvas_size(),
            viewport: &viewport,
            regions: &regions,
            sources: &sources,
            samples: &samples,
            range_start: playback.range().start,
            current_time: playback.current(),
            drawing: drawing.points(),
            pointer: if drawing.is_drawing() { *pointer } else { None },
            hovered: hovered.as_ref(),
            theme: (state.theme)(),
        };
        let frame = render(&scene);
        if frame.is_empty() || !gate.write().admit(&frame) {
            return;
        }
        if let Err(e) = canvas::paint(MAP_CANVAS_ID, &frame) {
            warn!("canvas paint failed: {:?}", e);
            gate.write().invalidate();
        }
    });

    let on_mouse_down = move |evt: Event<MouseData>| {
        if evt.trigger_button() != Some(dioxus::html::input_data::MouseButton::Primary) {
            return;
        }
        let point = screen_point(&evt);
        let size = canvas_size();

        if state.drawing.read().is_drawing() {
            let viewport = *state.viewport.read();
            let source = state.selected_source.read().clone();
            let outcome = state.drawing.write().click(point, &viewport, size, &source);
            match outcome {
                Ok(ClickOutcome::Completed(region)) => state.add_region(region),
                Ok(_) => {}
                Err(e) => state.drawing_refused(&e),
            }
            return;
        }

        let world = state.viewport.read().to_world(point, size);
        let hit = state.regions.read().hit_test(world).map(|r| r.id().clone());
        match hit {
            Some(id) => state.confirm_delete(&id),
            None => drag_from.set(Some(point)),
        }
    };

    let on_mouse_move = move |evt: Event<MouseData>| {
        let point = screen_point(&evt);
        pointer.set(Some(point));

        let last = drag_from();
        if let Some(last) = last {
            state
                .viewport
                .write()
                .pan_by_screen(point.x - last.x, point.y - last.y);
            drag_from.set(Some(point));
            return;
        }
        if state.drawing.read().is_drawing() {
            return;
        }
        let world = state.viewport.read().to_world(point, canvas_size());
        let hit = state.regions.read().hit_test(world).map(|r| r.id().clone());
        if *state.hovered.read() != hit {
            state.hovered.set(hit);
        }
    };

    let on_wheel = move |evt: Event<WheelData>| {
        evt.prevent_default();
        state.viewport.write().wheel(evt.delta().strip_units().y);
    };


    let on_resize = move |evt: Event<ResizeData>| {
        if let Ok(size) = evt.get_content_box_size() {
            canvas_size.set(CanvasSize::new(size.width, size.height));
        }
    };

    let cursor = if state.drawing.read().is_drawing() {
        "crosshair"
    } else if drag_from().is_some() {
        "grabbing"
    } else if state.hovered.read().is_some() {
        "pointer"
    } else {
        "grab"
    };
    let hovered_label = state
        .hovered
        .read()
        .as_ref()
        .and_then(|id| state.regions.read().get(id).map(|r| r.label()));

    rsx! {
        div {
            style: "position: relative; width: 100%; height: 100%;",
            onresize: on_resize,
            canvas {
                id: MAP_CANVAS_ID,
                tabindex: "0",
                style: "display: block; width: 100%; height: 100%; outline: none; cursor: {cursor};",
                onmousedown: on_mouse_down,
                onmousemove: on_mouse_move,
                onmouseup: move |_| drag_from.set(None),
                onmouseleave: move |_| {
                    drag_from.set(None);
                    pointer.set(None);
                },
                ondoubleclick: move |_| state.complete_drawing(),
                onwheel: on_wheel,
            }
            ZoomControls {}
            if let Some(label) = hovered_label {
                if !state.drawing.read().is_drawing() {
                    div {
                        style: "position: absolute; bottom: 12px; left: 12px; padding: 6px 10px; background: rgba(255,255,255,0.9); border-radius: 6px; font-size: 12px; color: #374151;",
                        strong { "{label}" }
                        div { "Click to delete" }
                    }
                }
            }
        }
    }
}

/// Zoom in / out / reset buttons over the map.
#[component]
fn ZoomControls() -> Element {
    let mut state = use_context::<AppState>();

    rsx! {
        div {
            style: "position: absolute; top: 12px; right: 12px; display: flex; flex-direction: column; gap: 4px;",
            button { onclick: move |_| state.viewport.write().zoom_in(), "+" }
            button { onclick: move |_| state.viewport.write().zoom_out(), "−" }
            button { onclick: move |_| state.viewport.write().reset(), "⟲" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_escape_cancels_drawing() {
        assert!(cancels_drawing("Escape"));
        assert!(!cancels_drawing("Enter"));
        assert!(!cancels_drawing("Esc"));
        assert!(!cancels_drawing("escape"));
    }
}
