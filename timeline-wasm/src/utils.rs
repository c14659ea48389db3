use timeline_core::{ResolverSettings, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, HtmlElement, Window};

/// Log a message to the browser console.
pub fn log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

pub fn viewport(window: &Window) -> Viewport {
    let num = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(num(window.inner_width()), num(window.inner_height()))
}

/// Resolver settings, overridden by `window.__TIMELINE_SETTINGS` when the
/// host page provides it either as a JSON string or as a plain object.
pub fn read_settings(window: &Window) -> ResolverSettings {
    let raw = match js_sys::Reflect::get(window, &JsValue::from_str("__TIMELINE_SETTINGS")) {
        Ok(v) if !v.is_undefined() && !v.is_null() => v,
        _ => return ResolverSettings::default(),
    };
    let text = match raw.as_string() {
        Some(s) => s,
        None => match js_sys::JSON::stringify(&raw).ok().and_then(|s| s.as_string()) {
            Some(s) => s,
            None => {
                log("__TIMELINE_SETTINGS is not serialisable; using defaults");
                return ResolverSettings::default();
            }
        },
    };
    match ResolverSettings::from_json(&text) {
        Ok(s) => s,
        Err(err) => {
            log(&format!("Invalid __TIMELINE_SETTINGS: {}", err));
            ResolverSettings::default()
        }
    }
}

/// Ensure the canvas backing store matches the CSS size and device pixel ratio
/// to prevent non-uniform stretching. Returns the CSS size.
pub fn sync_canvas_size(window: &Window, canvas: &HtmlCanvasElement) -> (f64, f64) {
    let dpr = window.device_pixel_ratio();
    let rect = canvas.get_bounding_client_rect();
    let (css_w, css_h) = (rect.width().max(1.0), rect.height().max(1.0));
    let target_w = (css_w * dpr).round().clamp(1.0, 10000.0) as u32;
    let target_h = (css_h * dpr).round().clamp(1.0, 10000.0) as u32;
    if canvas.width() != target_w {
        canvas.set_width(target_w);
    }
    if canvas.height() != target_h {
        canvas.set_height(target_h);
    }
    (css_w, css_h)
}

/// Element with `id`, created under `parent` as a `tag` when the host page
/// does not provide one.
pub fn ensure_element(
    document: &Document,
    parent: &web_sys::Node,
    tag: &str,
    id: &str,
) -> Result<HtmlElement, JsValue> {
    if let Some(el) = document.get_element_by_id(id) {
        return el.dyn_into::<HtmlElement>().map_err(JsValue::from);
    }
    let el = document.create_element(tag)?;
    el.set_id(id);
    parent.append_child(&el)?;
    el.dyn_into::<HtmlElement>().map_err(JsValue::from)
}

pub fn set_visible(el: &HtmlElement, visible: bool) {
    let _ = el
        .style()
        .set_property("display", if visible { "" } else { "none" });
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    percent_encoding::percent_decode_str(s)
        .decode_utf8()
        .unwrap_or_else(|_| s.into())
        .to_string()
}
