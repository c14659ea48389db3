use crate::model::EventType;

pub const BACKGROUND: &str = "#050510";
pub const PURPLE: &str = "#8b5cf6";
pub const BLUE: &str = "#3b82f6";
pub const CYAN: &str = "#06b6d4";
/// Golden-purple accent used for dates and highlights.
pub const GOLD: &str = "#c4b5fd";

/// Border/icon colour of a node in the flat view.
pub fn lane_color(kind: EventType) -> &'static str {
    match kind {
        EventType::Education => PURPLE,
        EventType::Cert => CYAN,
        EventType::Work | EventType::Unknown => BLUE,
    }
}

/// Emissive colour of a node or strand in the orbital view.
pub fn orbital_color(kind: EventType) -> &'static str {
    match kind {
        EventType::Education => "#d8b4fe",
        EventType::Cert => "#22d3ee",
        EventType::Work => "#60a5fa",
        EventType::Unknown => "#ffffff",
    }
}

/// Parse `#rrggbb` into components; anything else is white.
pub fn rgb(hex: &str) -> (u8, u8, u8) {
    let h = hex.trim_start_matches('#');
    if h.len() != 6 {
        return (255, 255, 255);
    }
    let c = |i: usize| {
        h.get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(255)
    };
    (c(0), c(2), c(4))
}

/// CSS `rgba()` string for `hex` at `alpha`.
pub fn rgba(hex: &str, alpha: f64) -> String {
    let (r, g, b) = rgb(hex);
    format!("rgba({},{},{},{})", r, g, b, alpha.clamp(0.0, 1.0))
}
