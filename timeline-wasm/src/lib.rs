use std::cell::RefCell;
use std::rc::Rc;

use timeline_core::{LayoutConfig, LayoutPublisher, SphereProjection, dataset};
use timeline_scene::chrome::{self, ViewMode};
use timeline_scene::scene::ARROW_STEP;
use timeline_scene::{
    DragScroll, OrbitCamera, Selection, SummaryPanel, build_lane_scene, build_sphere_scene,
    build_timeline_svg, is_click, needs_rotation, scroll_progress,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, KeyboardEvent,
    MouseEvent, ScrollBehavior, ScrollToOptions, WheelEvent,
};

mod canvas;
mod resize;
mod state;
mod utils;

use crate::canvas::draw_sphere;
use crate::resize::ResizeListener;
use crate::state::{RUNTIME, Runtime, SphereView, State};
use crate::utils::{ensure_element, get_query_param, log, read_settings, set_visible, viewport};

/// Smallest height the lane SVG is drawn at.
const MIN_SCENE_HEIGHT: f64 = 480.0;
const PICK_RADIUS: f64 = 14.0;
const WHEEL_ZOOM: f64 = 0.001;

const STYLE: &str = "\
body{margin:0;background:#050510;color:#e2e8f0;font-family:sans-serif;overflow:hidden}\
#tl-header{display:flex;gap:16px;align-items:center;padding:24px 32px;height:52px}\
#tl-header .mark{width:44px;height:44px;border:2px solid;border-radius:50%;display:flex;align-items:center;justify-content:center;font-weight:bold}\
#tl-header h1{margin:0;letter-spacing:.1em}\
#tl-lane{overflow-x:auto;overflow-y:hidden;cursor:grab;user-select:none}\
#tl-sphere{width:100vw;height:calc(100vh - 100px);display:block}\
#tl-progress-track{height:2px;background:rgba(255,255,255,.05)}\
#tl-progress{height:2px;width:0;background:#8b5cf6}\
#tl-controls{position:fixed;right:24px;top:32px;display:flex;gap:8px}\
#tl-controls button{background:rgba(255,255,255,.05);color:inherit;border:1px solid rgba(255,255,255,.1);border-radius:12px;padding:8px 14px;cursor:pointer}\
#tl-summary{text-align:center;padding:12px}\
#tl-summary .stats{display:flex;justify-content:center;gap:64px}\
#tl-modal{position:fixed;inset:0;z-index:200;background:rgba(5,5,16,.9);display:flex;align-items:center;justify-content:center}\
#tl-modal .modal-panel{background:#0f172a;border:1px solid rgba(255,255,255,.1);border-radius:32px;max-width:56rem;width:100%;max-height:80vh;overflow-y:auto}\
#tl-modal .modal-body{padding:40px}\
#tl-rotate{position:fixed;inset:0;z-index:1000;background:#050510;display:flex;flex-direction:column;align-items:center;justify-content:center;text-align:center;padding:32px}";

/// Fixed page elements, created on demand when the host page lacks them.
struct Shell {
    scroller: HtmlElement,
    progress: HtmlElement,
    prev: HtmlElement,
    next: HtmlElement,
    canvas: HtmlCanvasElement,
    view_toggle: HtmlElement,
    summary: HtmlElement,
    summary_toggle: HtmlElement,
    modal: HtmlElement,
    overlay: HtmlElement,
}

fn build_shell(document: &Document) -> Result<Shell, JsValue> {
    let body = document.body().ok_or("no body")?;
    let head = document.head().ok_or("no head")?;
    let style = ensure_element(document, &head, "style", "tl-style")?;
    style.set_text_content(Some(STYLE));

    let header = ensure_element(document, &body, "header", "tl-header")?;
    header.set_inner_html(&chrome::header_html());
    let controls = ensure_element(document, &body, "nav", "tl-controls")?;
    let prev = ensure_element(document, &controls, "button", "tl-prev")?;
    prev.set_text_content(Some("\u{2190}"));
    let next = ensure_element(document, &controls, "button", "tl-next")?;
    next.set_text_content(Some("\u{2192}"));
    let view_toggle = ensure_element(document, &controls, "button", "tl-view-toggle")?;
    let summary_toggle = ensure_element(document, &controls, "button", "tl-summary-toggle")?;

    let scroller = ensure_element(document, &body, "div", "tl-lane")?;
    let track = ensure_element(document, &body, "div", "tl-progress-track")?;
    let progress = ensure_element(document, &track, "div", "tl-progress")?;
    let canvas = ensure_element(document, &body, "canvas", "tl-sphere")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(JsValue::from)?;

    let summary = ensure_element(document, &body, "section", "tl-summary")?;
    summary.set_inner_html(&chrome::summary_html());

    let modal = ensure_element(document, &body, "div", "tl-modal")?;
    set_visible(&modal, false);
    let overlay = ensure_element(document, &body, "div", "tl-rotate")?;
    overlay.set_inner_html(
        "<h2>Temporal Registry Restricted</h2><p>Please rotate your device to Landscape Mode.</p>",
    );

    Ok(Shell {
        scroller,
        progress,
        prev,
        next,
        canvas,
        view_toggle,
        summary,
        summary_toggle,
        modal,
        overlay,
    })
}

fn init_context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

fn render_lane(s: &State) {
    let scene = build_lane_scene(dataset(), &s.layout);
    let height = (s.viewport.height - s.chrome_height).max(MIN_SCENE_HEIGHT);
    s.scroller.set_inner_html(&build_timeline_svg(&scene, height));
}

fn update_progress(s: &State) {
    let frac = scroll_progress(
        s.scroller.scroll_left() as f64,
        s.scroller.scroll_width() as f64,
        s.scroller.client_width() as f64,
    );
    let _ = s
        .progress
        .style()
        .set_property("width", &format!("{:.2}%", frac * 100.0));
}

fn update_summary(s: &State) {
    set_visible(&s.summary, s.summary_panel.open);
    s.summary_toggle
        .set_text_content(Some(s.summary_panel.button_label()));
}

fn apply_view(s: &State) {
    let lane = s.mode == ViewMode::Lane;
    set_visible(&s.scroller, lane);
    if let Some(track) = s.progress.parent_element()
        && let Some(track) = track.dyn_ref::<HtmlElement>()
    {
        set_visible(track, lane);
    }
    set_visible(&s.sphere.canvas, !lane);
    s.view_toggle
        .set_text_content(Some(if lane { "3D" } else { "2D" }));
}

/// Subscriber body: adopt a new layout snapshot and redraw from it.
fn on_layout(s: &mut State, cfg: LayoutConfig) {
    s.layout = cfg;
    s.viewport = viewport(&s.window);
    render_lane(s);
    set_visible(&s.overlay, needs_rotation(s.viewport));
    update_progress(s);
}

fn open_details(s: &mut State, id: &str) {
    match s.selection.open(id, dataset()) {
        Some(details) => {
            s.modal
                .set_inner_html(&format!("<div class=\"modal-panel\">{}</div>", details.to_html()));
            set_visible(&s.modal, true);
        }
        None => log(&format!("No event with id '{}'", id)),
    }
}

fn close_details(s: &mut State) {
    s.selection.close();
    set_visible(&s.modal, false);
    s.modal.set_inner_html("");
}

fn target_element(e: &web_sys::Event) -> Option<Element> {
    e.target()?.dyn_into::<Element>().ok()
}

fn canvas_coords(e: &MouseEvent, canvas: &HtmlCanvasElement) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (
        e.client_x() as f64 - rect.left(),
        e.client_y() as f64 - rect.top(),
    )
}

fn scroll_arrow(state: &Rc<RefCell<State>>, button: &HtmlElement, step: f64) {
    let st = state.clone();
    let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
        let opts = ScrollToOptions::new();
        opts.set_left(step);
        opts.set_behavior(ScrollBehavior::Smooth);
        st.borrow()
            .scroller
            .scroll_by_with_scroll_to_options(&opts);
    }));
    button.set_onclick(Some(onclick.as_ref().unchecked_ref()));
    onclick.forget();
}

fn attach_lane_ui(state: &Rc<RefCell<State>>, shell: &Shell) -> Result<(), JsValue> {
    scroll_arrow(state, &shell.prev, -ARROW_STEP);
    scroll_arrow(state, &shell.next, ARROW_STEP);

    {
        let st = state.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let left = s.scroller.scroll_left() as f64;
            let x = e.page_x() as f64;
            s.drag.begin(x, left);
            s.drag_start_x = x;
            s.drag_moved = false;
            let _ = s.scroller.style().set_property("cursor", "grabbing");
        }));
        shell
            .scroller
            .add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }
    {
        let st = state.clone();
        let mousemove = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let x = e.page_x() as f64;
            if let Some(left) = s.drag.drag_to(x) {
                e.prevent_default();
                if !is_click((s.drag_start_x, 0.0), (x, 0.0)) {
                    s.drag_moved = true;
                }
                s.scroller.set_scroll_left(left.round() as i32);
            }
        }));
        shell
            .scroller
            .add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }
    for name in ["mouseup", "mouseleave"] {
        let st = state.clone();
        let release = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            if s.drag.is_dragging() {
                s.drag.end();
                let _ = s.scroller.style().remove_property("cursor");
            }
        }));
        shell
            .scroller
            .add_event_listener_with_callback(name, release.as_ref().unchecked_ref())?;
        release.forget();
    }
    {
        let st = state.clone();
        let onscroll = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            update_progress(&st.borrow());
        }));
        shell
            .scroller
            .add_event_listener_with_callback("scroll", onscroll.as_ref().unchecked_ref())?;
        onscroll.forget();
    }
    {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            if s.drag_moved {
                s.drag_moved = false;
                return;
            }
            let id = target_element(&e)
                .and_then(|el| el.closest("[data-event-id]").ok().flatten())
                .and_then(|node| node.get_attribute("data-event-id"));
            if let Some(id) = id {
                open_details(&mut s, &id);
            }
        }));
        shell
            .scroller
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }
    Ok(())
}

fn attach_sphere_ui(state: &Rc<RefCell<State>>, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    {
        let st = state.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let p = canvas_coords(&e, &s.sphere.canvas);
            s.sphere.pointer = Some(p);
            s.sphere.press = Some(p);
            s.sphere.moved = false;
        }));
        canvas.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }
    {
        let st = state.clone();
        let mousemove = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let (x, y) = canvas_coords(&e, &s.sphere.canvas);
            let view = &mut s.sphere;
            if let Some((px, py)) = view.pointer {
                let (dx, dy) = (x - px, y - py);
                if let Some(origin) = view.press
                    && !is_click(origin, (x, y))
                {
                    view.moved = true;
                }
                view.camera.rotate_by(dx, dy);
                view.pointer = Some((x, y));
            } else {
                let rect = view.canvas.get_bounding_client_rect();
                view.hovered = view
                    .camera
                    .pick(&view.scene.nodes, x, y, rect.width(), rect.height(), PICK_RADIUS)
                    .map(|n| n.id.clone());
            }
        }));
        canvas.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }
    for name in ["mouseup", "mouseleave"] {
        let st = state.clone();
        let release = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.sphere.pointer = None;
            s.sphere.press = None;
        }));
        canvas.add_event_listener_with_callback(name, release.as_ref().unchecked_ref())?;
        release.forget();
    }
    {
        let st = state.clone();
        let onwheel = Closure::<dyn FnMut(WheelEvent)>::wrap(Box::new(move |e: WheelEvent| {
            e.prevent_default();
            let factor = (e.delta_y() * WHEEL_ZOOM).exp();
            st.borrow_mut().sphere.camera.zoom_by(factor);
        }));
        canvas.add_event_listener_with_callback("wheel", onwheel.as_ref().unchecked_ref())?;
        onwheel.forget();
    }
    {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            if s.sphere.moved {
                s.sphere.moved = false;
                return;
            }
            let (x, y) = canvas_coords(&e, &s.sphere.canvas);
            let rect = s.sphere.canvas.get_bounding_client_rect();
            let picked = s
                .sphere
                .camera
                .pick(&s.sphere.scene.nodes, x, y, rect.width(), rect.height(), PICK_RADIUS)
                .map(|n| n.id.clone());
            if let Some(id) = picked {
                open_details(&mut s, &id);
            }
        }));
        canvas.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }
    Ok(())
}

fn attach_chrome_ui(state: &Rc<RefCell<State>>, shell: &Shell) -> Result<(), JsValue> {
    {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let Some(el) = target_element(&e) else {
                return;
            };
            let backdrop = el.id() == "tl-modal";
            let close_button = el.closest("[data-action=\"close\"]").ok().flatten().is_some();
            if backdrop || close_button {
                close_details(&mut st.borrow_mut());
            }
        }));
        shell
            .modal
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }
    {
        let st = state.clone();
        let keydown = Closure::<dyn FnMut(KeyboardEvent)>::wrap(Box::new(move |e: KeyboardEvent| {
            let mut s = st.borrow_mut();
            if e.key() == "Escape" && s.selection.current().is_some() {
                close_details(&mut s);
            }
        }));
        state
            .borrow()
            .window
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }
    {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.summary_panel.toggle();
            update_summary(&s);
        }));
        shell
            .summary_toggle
            .set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.mode = s.mode.toggled();
            s.sphere.last_ts = None;
            apply_view(&s);
            log(&format!("view: {}", s.mode.as_str()));
        }));
        shell
            .view_toggle
            .set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}

fn start_animation(state: Rc<RefCell<State>>) {
    type RafClosure = Closure<dyn FnMut(f64)>;
    let f: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        {
            let mut s = state.borrow_mut();
            if s.mode == ViewMode::Sphere {
                let view = &mut s.sphere;
                let dt = view.last_ts.map(|t| (ts - t) / 1000.0).unwrap_or(0.0);
                view.last_ts = Some(ts);
                view.elapsed += dt;
                if view.pointer.is_none() {
                    view.camera.advance(dt);
                }
                if let Err(err) = draw_sphere(&s.window, &s.sphere) {
                    log(&format!("draw failed: {:?}", err));
                }
            }
        }
        if let Some(window) = web_sys::window()
            && let Some(cb) = f.borrow().as_ref()
        {
            let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(window) = web_sys::window()
        && let Some(cb) = g.borrow().as_ref()
    {
        let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    log(&format!("timeline: {} events", dataset().len()));

    let settings = read_settings(&window);
    let mode = window
        .location()
        .search()
        .ok()
        .and_then(|search| get_query_param(&search, "view"));
    let mode = ViewMode::from_query(mode.as_deref());

    let shell = build_shell(&document)?;
    let ctx = init_context(&shell.canvas)?;
    let vp = viewport(&window);
    let publisher = Rc::new(RefCell::new(LayoutPublisher::new(settings)));
    let layout = publisher.borrow_mut().resize(vp);
    let chrome_height = publisher.borrow().settings().chrome_height;

    let state = Rc::new(RefCell::new(State {
        window: window.clone(),
        scroller: shell.scroller.clone(),
        progress: shell.progress.clone(),
        modal: shell.modal.clone(),
        summary: shell.summary.clone(),
        summary_toggle: shell.summary_toggle.clone(),
        view_toggle: shell.view_toggle.clone(),
        overlay: shell.overlay.clone(),
        mode,
        layout,
        viewport: vp,
        chrome_height,
        drag: DragScroll::default(),
        drag_start_x: 0.0,
        drag_moved: false,
        selection: Selection::default(),
        summary_panel: SummaryPanel::for_width(vp.width),
        sphere: SphereView {
            canvas: shell.canvas.clone(),
            ctx,
            scene: build_sphere_scene(dataset(), &SphereProjection::default()),
            camera: OrbitCamera::default(),
            pointer: None,
            press: None,
            moved: false,
            hovered: None,
            last_ts: None,
            elapsed: 0.0,
        },
    }));

    let subscription = {
        let st = state.clone();
        publisher
            .borrow_mut()
            .subscribe(move |cfg| on_layout(&mut st.borrow_mut(), *cfg))
    };
    let resize = ResizeListener::attach(&window, publisher.clone())?;

    attach_lane_ui(&state, &shell)?;
    attach_sphere_ui(&state, &shell.canvas)?;
    attach_chrome_ui(&state, &shell)?;

    {
        let mut s = state.borrow_mut();
        on_layout(&mut s, layout);
        update_summary(&s);
        apply_view(&s);
    }
    start_animation(state.clone());

    RUNTIME.with(|rt| {
        rt.replace(Some(Runtime {
            state,
            publisher,
            subscription,
            resize: Some(resize),
        }))
    });
    Ok(())
}

/// Detach the resize listener and the layout subscription.
#[wasm_bindgen]
pub fn shutdown() {
    RUNTIME.with(|rt| {
        if let Some(mut runtime) = rt.borrow_mut().take() {
            runtime.shutdown();
            log("timeline detached");
        }
    });
}

/// Open the detail panel for `id` from host code.
#[wasm_bindgen]
pub fn show_event(id: &str) {
    RUNTIME.with(|rt| {
        if let Some(runtime) = rt.borrow().as_ref() {
            open_details(&mut runtime.state.borrow_mut(), id);
        }
    });
}

/// Current layout snapshot as JSON, or `null` before start-up.
#[wasm_bindgen]
pub fn current_layout() -> String {
    RUNTIME.with(|rt| {
        rt.borrow()
            .as_ref()
            .and_then(|runtime| serde_json::to_string(&runtime.publisher.borrow().current()).ok())
            .unwrap_or_else(|| "null".to_string())
    })
}

/// Re-read `window.__TIMELINE_SETTINGS` and republish the layout for the
/// current viewport.
#[wasm_bindgen]
pub fn reload_settings() {
    RUNTIME.with(|rt| {
        let guard = rt.borrow();
        let Some(runtime) = guard.as_ref() else {
            return;
        };
        let settings = {
            let mut s = runtime.state.borrow_mut();
            let settings = read_settings(&s.window);
            s.chrome_height = settings.chrome_height;
            settings
        };
        match runtime.publisher.borrow_mut().set_settings(settings) {
            Some(cfg) => log(&format!(
                "settings reloaded: yearWidth={} timelineY={}",
                cfg.year_width, cfg.timeline_y
            )),
            None => log("settings stored; no viewport seen yet"),
        }
    });
}
