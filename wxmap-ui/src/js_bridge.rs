//! Typed wrappers around browser APIs reached through `js_sys::eval()` and
//! `web_sys`.
//!
//! Strings handed to JS are embedded as JSON literals, so quotes and
//! newlines survive.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('wxmap JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Resolve after `ms` milliseconds.
pub async fn sleep_ms(ms: u64) {
    let timeout = ms.min(i32::MAX as u64) as i32;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Offer `json` as a file download named `file_name`.
pub fn download_json(file_name: &str, json: &str) {
    call_js(&format!(
        r#"
        var blob = new Blob([{data}], {{ type: 'application/json' }});
        var url = URL.createObjectURL(blob);
        var link = document.createElement('a');
        link.href = url;
        link.download = {name};
        link.click();
        URL.revokeObjectURL(url);
        "#,
        data = js_string(json),
        name = js_string(file_name),
    ));
}

/// Blocking yes/no prompt. Returns false when no window is available.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Enter fullscreen, or leave it if already fullscreen. Returns whether the
/// document is fullscreen afterwards.
pub fn toggle_fullscreen(currently: bool) -> bool {
    if currently {
        call_js("if (document.fullscreenElement) document.exitFullscreen();");
        false
    } else {
        call_js("document.documentElement.requestFullscreen();");
        true
    }
}

/// Give keyboard focus to the element with `id`.
pub fn focus_element(id: &str) {
    call_js(&format!(
        "var el = document.getElementById({}); if (el) el.focus();",
        js_string(id)
    ));
}

/// A `keydown` listener on the document. Removed when dropped.
pub struct KeyListener {
    callback: Closure<dyn FnMut(web_sys::KeyboardEvent)>,
}

impl KeyListener {
    /// Call `on_key` with the key name of every `keydown` on the document.
    /// Returns `None` when there is no document to listen on.
    pub fn install(mut on_key: impl FnMut(&str) + 'static) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let callback = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(
            move |evt: web_sys::KeyboardEvent| on_key(&evt.key()),
        );
        document
            .add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref())
            .ok()?;
        Some(Self { callback })
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let _ = document.remove_event_listener_with_callback(
                "keydown",
                self.callback.as_ref().unchecked_ref(),
            );
        }
    }
}
