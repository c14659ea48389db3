use std::fmt::Write as _;

use timeline_core::palette;

use crate::scene::{LaneScene, NodePlacement};

const NODE_HALF: f64 = 16.0;
const LABEL_GAP: f64 = 24.0;
const MARKER_BOTTOM: f64 = 64.0;
const MARKER_TICK: f64 = 40.0;

pub fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn push_node(s: &mut String, n: &NodePlacement) {
    let (c0, c1) = n.connector_span();
    if n.connector > 0.0 {
        let _ = writeln!(
            s,
            "<path class=\"connector\" d=\"M {:.2} {:.2} L {:.2} {:.2}\" stroke=\"#ffffff\" stroke-opacity=\"0.2\" stroke-width=\"1\"/>",
            c0.x, c0.y, c1.x, c1.y
        );
    }
    let _ = writeln!(
        s,
        "<g class=\"node {}\" data-event-id=\"{}\" transform=\"translate({:.2} {:.2})\" style=\"cursor:pointer\">",
        n.kind.as_str(),
        svg_escape(&n.id),
        n.at.x,
        n.at.y
    );
    let _ = writeln!(
        s,
        "<rect x=\"{h}\" y=\"{h}\" width=\"{w}\" height=\"{w}\" transform=\"rotate(45)\" fill=\"#0f172a\" stroke=\"{c}\" stroke-width=\"2\"/>",
        h = -NODE_HALF,
        w = NODE_HALF * 2.0,
        c = n.color
    );
    // date on the outer line, title next to the node
    let (date_y, title_y) = if n.above {
        (-(NODE_HALF + LABEL_GAP + 14.0), -(NODE_HALF + LABEL_GAP))
    } else {
        (NODE_HALF + LABEL_GAP + 4.0, NODE_HALF + LABEL_GAP + 18.0)
    };
    let _ = writeln!(
        s,
        "<text y=\"{:.2}\" text-anchor=\"middle\" font-family=\"monospace\" font-size=\"10\" letter-spacing=\"2\" fill=\"{}\">{}</text>",
        date_y,
        palette::GOLD,
        svg_escape(&n.date_label)
    );
    let _ = writeln!(
        s,
        "<text y=\"{:.2}\" text-anchor=\"middle\" font-size=\"11\" fill=\"#e2e8f0\" fill-opacity=\"0.8\">{}</text>",
        title_y,
        svg_escape(&n.title.to_uppercase())
    );
    s.push_str("</g>\n");
}

/// Render a flat scene as a standalone SVG document `height` pixels tall.
pub fn build_timeline_svg(scene: &LaneScene, height: f64) -> String {
    let w = scene.width.max(0.0).ceil();
    let h = height.max(0.0).ceil();
    let mut s = String::new();
    let _ = writeln!(
        s,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" fill=\"none\" font-family=\"sans-serif\">"
    );
    s.push_str("<defs><pattern id=\"grid\" width=\"60\" height=\"60\" patternUnits=\"userSpaceOnUse\"><path d=\"M 60 0 L 0 0 0 60\" fill=\"none\" stroke=\"white\" stroke-width=\"0.5\" stroke-opacity=\"0.03\"/></pattern></defs>\n");
    s.push_str("<rect width=\"100%\" height=\"100%\" fill=\"url(#grid)\"/>\n");

    for st in &scene.strands {
        let _ = writeln!(
            s,
            "<path class=\"strand\" d=\"M {:.2} {:.2} L {:.2} {:.2}\" stroke=\"{}\" stroke-width=\"0.5\" opacity=\"0.05\"/>",
            st.from.x, st.from.y, st.to.x, st.to.y, st.color
        );
    }
    for p in &scene.paths {
        let _ = writeln!(
            s,
            "<path class=\"branch\" d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" opacity=\"{}\"/>",
            p.d, p.stroke.color, p.stroke.width, p.stroke.opacity
        );
    }
    for n in &scene.nodes {
        push_node(&mut s, n);
    }

    let tick_bottom = h - MARKER_BOTTOM;
    for m in &scene.years {
        let _ = writeln!(
            s,
            "<path class=\"year-tick\" d=\"M {x:.2} {:.2} L {x:.2} {:.2}\" stroke=\"#ffffff\" stroke-opacity=\"0.05\" stroke-width=\"1\"/>",
            tick_bottom - MARKER_TICK,
            tick_bottom,
            x = m.x
        );
        let _ = writeln!(
            s,
            "<text class=\"year\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"monospace\" font-size=\"9\" fill=\"{}\" fill-opacity=\"0.2\">{}</text>",
            m.x,
            tick_bottom + 26.0,
            palette::CYAN,
            m.year
        );
    }
    s.push_str("</svg>\n");
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::build_lane_scene;
    use timeline_core::{LayoutConfig, dataset};

    fn svg() -> String {
        let scene = build_lane_scene(dataset(), &LayoutConfig::default());
        build_timeline_svg(&scene, 900.0)
    }

    #[test]
    fn document_shape() {
        let s = svg();
        assert!(s.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"4690\" height=\"900\""));
        assert!(s.trim_end().ends_with("</svg>"));
        assert_eq!(s.matches("class=\"branch\"").count(), 4);
        assert_eq!(s.matches("class=\"strand\"").count(), 10);
        assert_eq!(s.matches("class=\"year\"").count(), 13);
    }

    #[test]
    fn every_event_is_clickable() {
        let s = svg();
        for e in dataset() {
            assert!(s.contains(&format!("data-event-id=\"{}\"", e.id)));
        }
    }

    #[test]
    fn labels_are_escaped() {
        assert_eq!(svg_escape("R&D <x> \"q\""), "R&amp;D &lt;x&gt; &quot;q&quot;");
        assert!(svg().contains("ADMINISTRADOR DE SISTEMAS (PRÁCTICAS)"));
    }
}
