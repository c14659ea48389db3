use timeline_core::data::find_event;
use timeline_core::palette;
use timeline_scene::sphere::{pulse, ring_points};
use timeline_scene::tooltip_lines;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Window};

use crate::state::SphereView;
use crate::utils::sync_canvas_size;

const NODE_SIZE: f64 = 0.22;
const BEAD_SIZE: f64 = 0.04;
const RING_SEGMENTS: usize = 96;
const CORE_SCALE: f64 = 0.95;

// Non-deprecated helpers to set canvas styles via property assignment.
pub fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(color),
    );
}

pub fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(color),
    );
}

fn diamond(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64) {
    ctx.begin_path();
    ctx.move_to(x, y - r);
    ctx.line_to(x + r, y);
    ctx.line_to(x, y + r);
    ctx.line_to(x - r, y);
    ctx.close_path();
}

/// Paint one frame of the orbital view.
pub fn draw_sphere(window: &Window, view: &SphereView) -> Result<(), JsValue> {
    let (w, h) = sync_canvas_size(window, &view.canvas);
    let dpr = window.device_pixel_ratio();
    let ctx = &view.ctx;
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    set_fill_style(ctx, palette::BACKGROUND);
    ctx.fill_rect(0.0, 0.0, w, h);

    let cam = &view.camera;
    let scene = &view.scene;
    let Some(center) = cam.project(Default::default(), w, h) else {
        return Ok(());
    };

    // dark core hiding the far side a little
    ctx.begin_path();
    ctx.arc(
        center.x,
        center.y,
        scene.radius * CORE_SCALE * center.scale,
        0.0,
        std::f64::consts::TAU,
    )?;
    set_fill_style(ctx, &palette::rgba(palette::BACKGROUND, 0.3));
    ctx.fill();

    ctx.set_line_width(1.0);
    set_stroke_style(ctx, &palette::rgba("#ffffff", 0.06));
    for ring in &scene.guides {
        let pts: Vec<_> = ring_points(*ring, scene.radius, RING_SEGMENTS)
            .into_iter()
            .filter_map(|p| cam.project(p, w, h))
            .collect();
        if let Some(first) = pts.first() {
            ctx.begin_path();
            ctx.move_to(first.x, first.y);
            for p in &pts[1..] {
                ctx.line_to(p.x, p.y);
            }
            ctx.close_path();
            ctx.stroke();
        }
    }

    for strand in &scene.strands {
        for bead in &strand.beads {
            if let Some(sp) = cam.project(bead.position, w, h) {
                let alpha = if bead.bright { 0.9 } else { 0.4 };
                set_fill_style(ctx, &palette::rgba(strand.color, alpha));
                let r = (BEAD_SIZE * sp.scale).max(0.5);
                ctx.fill_rect(sp.x - r, sp.y - r, r * 2.0, r * 2.0);
            }
        }
    }

    // far nodes first so near ones overlap them
    let mut nodes: Vec<_> = scene
        .nodes
        .iter()
        .filter_map(|n| cam.project(n.position, w, h).map(|sp| (n, sp)))
        .collect();
    nodes.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));
    for (node, sp) in &nodes {
        let year = find_event(&node.id).map(|e| e.year).unwrap_or(0.0);
        let hovered = view.hovered.as_deref() == Some(node.id.as_str());
        let grow = if hovered { 1.5 } else { pulse(view.elapsed, year) };
        let behind = sp.depth > center.depth;
        ctx.set_global_alpha(if behind { 0.35 } else { 1.0 });
        set_fill_style(ctx, node.color);
        diamond(ctx, sp.x, sp.y, NODE_SIZE * grow * sp.scale);
        ctx.fill();
    }
    ctx.set_global_alpha(1.0);

    if let Some((node, sp)) = nodes
        .iter()
        .find(|(n, _)| view.hovered.as_deref() == Some(n.id.as_str()))
        && let Some(e) = find_event(&node.id)
    {
        let [date, title, location] = tooltip_lines(e);
        ctx.set_font("bold 12px monospace");
        ctx.set_text_align("center");
        set_fill_style(ctx, node.color);
        ctx.fill_text(&date, sp.x, sp.y - 50.0)?;
        set_fill_style(ctx, "#e2e8f0");
        ctx.fill_text(&title, sp.x, sp.y - 34.0)?;
        ctx.set_font("10px monospace");
        set_fill_style(ctx, &palette::rgba("#ffffff", 0.5));
        ctx.fill_text(&location, sp.x, sp.y - 18.0)?;
    }
    Ok(())
}
