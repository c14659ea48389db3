use std::cell::RefCell;
use std::rc::Rc;

use timeline_core::LayoutPublisher;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::utils::{log, viewport};

/// Feeds window `resize` events into a [`LayoutPublisher`]. The browser
/// listener is removed when this value is dropped.
pub struct ResizeListener {
    window: Window,
    callback: Closure<dyn FnMut()>,
}

impl ResizeListener {
    pub fn attach(window: &Window, publisher: Rc<RefCell<LayoutPublisher>>) -> Result<Self, JsValue> {
        let win = window.clone();
        let callback = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let vp = viewport(&win);
            let cfg = publisher.borrow_mut().resize(vp);
            log(&format!(
                "layout {}x{}: compact={} yearWidth={} timelineY={}",
                vp.width, vp.height, cfg.compact, cfg.year_width, cfg.timeline_y
            ));
        }));
        window.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())?;
        Ok(ResizeListener {
            window: window.clone(),
            callback,
        })
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.callback.as_ref().unchecked_ref());
    }
}
