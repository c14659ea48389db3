use std::cell::RefCell;
use std::rc::Rc;

use timeline_core::{LayoutConfig, LayoutPublisher, SubscriptionId, Viewport};
use timeline_scene::{DragScroll, OrbitCamera, Selection, SphereScene, SummaryPanel, ViewMode};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Window};

use crate::resize::ResizeListener;

/// Canvas, scene and camera of the orbital view.
pub struct SphereView {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub scene: SphereScene,
    pub camera: OrbitCamera,
    /// Last pointer position while the button is down.
    pub pointer: Option<(f64, f64)>,
    /// Where the current press started.
    pub press: Option<(f64, f64)>,
    /// Set once a press has moved far enough to count as a drag, not a click.
    pub moved: bool,
    pub hovered: Option<String>,
    pub last_ts: Option<f64>,
    pub elapsed: f64,
}

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    /// Horizontal scroller hosting the SVG.
    pub scroller: HtmlElement,
    pub progress: HtmlElement,
    pub modal: HtmlElement,
    pub summary: HtmlElement,
    pub summary_toggle: HtmlElement,
    pub view_toggle: HtmlElement,
    pub overlay: HtmlElement,
    pub mode: ViewMode,
    pub layout: LayoutConfig,
    pub viewport: Viewport,
    /// Vertical allowance for header and footer around the scroller.
    pub chrome_height: f64,
    pub drag: DragScroll,
    /// Pointer x at the start of the current drag.
    pub drag_start_x: f64,
    /// The last press panned the view; swallow the click that follows.
    pub drag_moved: bool,
    pub selection: Selection,
    pub summary_panel: SummaryPanel,
    pub sphere: SphereView,
}

/// Wiring that must outlive `start`: the publisher, its subscription and
/// the window listener feeding it.
pub struct Runtime {
    pub state: Rc<RefCell<State>>,
    pub publisher: Rc<RefCell<LayoutPublisher>>,
    pub subscription: SubscriptionId,
    pub resize: Option<ResizeListener>,
}

impl Runtime {
    /// Detach from the window and the publisher.
    pub fn shutdown(&mut self) {
        self.resize = None;
        self.publisher.borrow_mut().unsubscribe(self.subscription);
    }
}

/// Thread local storage for the single runtime instance.
thread_local! {
    pub static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}
