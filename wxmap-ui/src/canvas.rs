//! Replays a [`Frame`] onto an HTML canvas.

use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wxmap_core::geom::ScreenPoint;
use wxmap_core::render::{DrawCommand, Frame, Paint, TextAlign};

const LABEL_TEXT_HEIGHT: f64 = 16.0;

fn canvas_element(id: &str) -> Option<HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()
}

/// Paint `frame` onto the canvas with DOM id `id`, resizing its backing
/// store to the frame size first.
pub fn paint(id: &str, frame: &Frame) -> Result<(), JsValue> {
    let canvas = canvas_element(id).ok_or_else(|| JsValue::from_str("canvas not found"))?;
    let (w, h) = (frame.size.width as u32, frame.size.height as u32);
    if canvas.width() != w || canvas.height() != h {
        canvas.set_width(w);
        canvas.set_height(h);
    }
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    for command in &frame.commands {
        draw(&ctx, command)?;
    }
    Ok(())
}

fn draw(ctx: &CanvasRenderingContext2d, command: &DrawCommand) -> Result<(), JsValue> {
    match command {
        DrawCommand::Clear { width, height } => ctx.clear_rect(0.0, 0.0, *width, *height),
        DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            paint,
        } => {
            set_fill(ctx, paint)?;
            ctx.fill_rect(*x, *y, *width, *height);
        }
        DrawCommand::Line {
            from,
            to,
            color,
            width,
            alpha,
            dash,
        } => {
            ctx.save();
            ctx.set_global_alpha(*alpha);
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(*width);
            set_dash(ctx, dash)?;
            ctx.begin_path();
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            ctx.stroke();
            ctx.restore();
        }
        DrawCommand::Polyline {
            points,
            color,
            width,
        } => {
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(*width);
            set_dash(ctx, &[])?;
            trace(ctx, points, false);
            ctx.stroke();
        }
        DrawCommand::FillPolygon { points, paint } => {
            set_fill(ctx, paint)?;
            trace(ctx, points, true);
            ctx.fill();
        }
        DrawCommand::StrokePolygon {
            points,
            color,
            width,
        } => {
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(*width);
            set_dash(ctx, &[])?;
            trace(ctx, points, true);
            ctx.stroke();
        }
        DrawCommand::Circle {
            center,
            radius,
            color,
            glow,
        } => {
            ctx.save();
            if let Some((shadow, blur)) = glow {
                ctx.set_shadow_color(shadow);
                ctx.set_shadow_blur(*blur);
            }
            ctx.set_fill_style_str(color);
            ctx.begin_path();
            ctx.arc(center.x, center.y, *radius, 0.0, TAU)?;
            ctx.fill();
            ctx.restore();
        }
        DrawCommand::Text {
            at,
            text,
            font_px,
            align,
            color,
        } => {
            ctx.set_font(&format!("{}px Arial", font_px));
            ctx.set_text_align(match align {
                TextAlign::Left => "left",
                TextAlign::Center => "center",
            });
            ctx.set_fill_style_str(color);
            ctx.fill_text(text, at.x, at.y)?;
        }
        DrawCommand::Label {
            at,
            text,
            font_px,
            padding,
            radius,
            background,
            border,
            color,
        } => {
            ctx.set_font(&format!("{}px Arial", font_px));
            ctx.set_text_align("center");
            let text_width = ctx.measure_text(text)?.width();
            let x = at.x - text_width / 2.0 - padding;
            let y = at.y - LABEL_TEXT_HEIGHT / 2.0 - padding;
            let w = text_width + padding * 2.0;
            let h = LABEL_TEXT_HEIGHT + padding * 2.0;

            ctx.set_fill_style_str(background);
            ctx.set_stroke_style_str(border);
            ctx.set_line_width(1.0);
            rounded_rect(ctx, x, y, w, h, *radius)?;
            ctx.fill();
            ctx.stroke();

            ctx.set_fill_style_str(color);
            ctx.fill_text(text, at.x, at.y + 3.0)?;
        }
    }
    Ok(())
}

fn set_fill(ctx: &CanvasRenderingContext2d, paint: &Paint) -> Result<(), JsValue> {
    match paint {
        Paint::Solid { color } => ctx.set_fill_style_str(color),
        Paint::LinearGradient { from, to, stops } => {
            let gradient = ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
            for stop in stops {
                gradient.add_color_stop(stop.offset as f32, &stop.color)?;
            }
            ctx.set_fill_style_canvas_gradient(&gradient);
        }
    }
    Ok(())
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: &[f64]) -> Result<(), JsValue> {
    let segments: js_sys::Array = dash.iter().map(|d| JsValue::from_f64(*d)).collect();
    ctx.set_line_dash(&segments)
}

fn trace(ctx: &CanvasRenderingContext2d, points: &[ScreenPoint], close: bool) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    if close {
        ctx.close_path();
    }
}

fn rounded_rect(
    ctx: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    r: f64,
) -> Result<(), JsValue> {
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.arc_to(x + w, y, x + w, y + h, r)?;
    ctx.arc_to(x + w, y + h, x, y + h, r)?;
    ctx.arc_to(x, y + h, x, y, r)?;
    ctx.arc_to(x, y, x + w, y, r)?;
    ctx.close_path();
    Ok(())
}
