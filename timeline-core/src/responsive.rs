use serde::{Deserialize, Serialize};

use crate::config::{LayoutConfig, ResolverSettings};

/// Window size as reported by the host, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }
}

pub fn is_compact(vp: Viewport, settings: &ResolverSettings) -> bool {
    vp.width < settings.compact_below_width || vp.height < settings.compact_below_height
}

/// Build a full snapshot for `vp`. Year range and padding keep their
/// authored values; everything the viewport influences is recomputed.
pub fn resolve_layout(vp: Viewport, settings: &ResolverSettings) -> LayoutConfig {
    let compact = is_compact(vp, settings);
    let year_width = settings.year_width_for(vp.width);
    let available = vp.height - settings.chrome_height;
    let spread = if compact {
        available * settings.compact_spread
    } else {
        available * settings.wide_spread
    };
    let center = if compact {
        settings.header_height + available / 2.0
    } else {
        vp.height * settings.wide_center_fraction
    };
    LayoutConfig {
        year_width,
        timeline_y: center,
        edu_y: center - spread,
        cert_y: center - spread * 0.5,
        // work holds the most entries, so it sits furthest from the trunk
        work_y: center + spread * 1.5,
        compact,
        ..LayoutConfig::default()
    }
}

/// Handle returned by [`LayoutPublisher::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&LayoutConfig)>;

/// Owns the current snapshot and hands every new one to its subscribers.
///
/// Each call to [`resize`](Self::resize) replaces the snapshot wholesale, so a
/// burst of resizes is simply a sequence of complete values where the last one
/// wins.
pub struct LayoutPublisher {
    settings: ResolverSettings,
    current: LayoutConfig,
    last_viewport: Option<Viewport>,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl LayoutPublisher {
    pub fn new(settings: ResolverSettings) -> Self {
        LayoutPublisher {
            settings,
            current: LayoutConfig::default(),
            last_viewport: None,
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn current(&self) -> LayoutConfig {
        self.current
    }

    pub fn last_viewport(&self) -> Option<Viewport> {
        self.last_viewport
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Register `f`; it is called with each future snapshot until unsubscribed.
    pub fn subscribe<F>(&mut self, f: F) -> SubscriptionId
    where
        F: FnMut(&LayoutConfig) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(f)));
        id
    }

    /// Returns false if `id` was not (or no longer) registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Recompute for a new viewport and publish the result.
    pub fn resize(&mut self, vp: Viewport) -> LayoutConfig {
        let snapshot = resolve_layout(vp, &self.settings);
        self.current = snapshot;
        self.last_viewport = Some(vp);
        for (_, f) in self.listeners.iter_mut() {
            f(&snapshot);
        }
        snapshot
    }

    /// Swap resolver settings and republish for the last known viewport.
    pub fn set_settings(&mut self, settings: ResolverSettings) -> Option<LayoutConfig> {
        self.settings = settings;
        self.last_viewport.map(|vp| self.resize(vp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn settings() -> ResolverSettings {
        ResolverSettings::default()
    }

    #[test]
    fn compact_classification() {
        let s = settings();
        assert!(!is_compact(Viewport::new(1440.0, 900.0), &s));
        assert!(is_compact(Viewport::new(375.0, 700.0), &s));
        assert!(is_compact(Viewport::new(1440.0, 599.0), &s));
        assert!(!is_compact(Viewport::new(768.0, 600.0), &s));
    }

    #[test]
    fn wide_viewport_formulas() {
        let cfg = resolve_layout(Viewport::new(1440.0, 900.0), &settings());
        let spread = 700.0 * 0.22;
        let center = 900.0 * 0.35;
        assert!(!cfg.compact);
        assert_eq!(cfg.year_width, 360.0);
        assert_eq!(cfg.timeline_y, center);
        assert_eq!(cfg.edu_y, center - spread);
        assert_eq!(cfg.cert_y, center - spread * 0.5);
        assert_eq!(cfg.work_y, center + spread * 1.5);
        assert_eq!(cfg.start_year, 2014);
        assert_eq!(cfg.padding, 200.0);
    }

    #[test]
    fn compact_viewport_formulas() {
        let cfg = resolve_layout(Viewport::new(375.0, 700.0), &settings());
        assert!(cfg.compact);
        assert_eq!(cfg.year_width, 280.0);
        assert_eq!(cfg.timeline_y, 350.0);
        let spread = 500.0 * 0.35;
        assert_eq!(cfg.edu_y, 350.0 - spread);
        assert_eq!(cfg.cert_y, 350.0 - spread * 0.5);
        assert_eq!(cfg.work_y, 350.0 + spread * 1.5);
    }

    #[test]
    fn narrow_but_not_compact_uses_narrow_bucket() {
        let cfg = resolve_layout(Viewport::new(900.0, 800.0), &settings());
        assert!(!cfg.compact);
        assert_eq!(cfg.year_width, 280.0);
    }

    #[test]
    fn degenerate_viewport_does_not_fault() {
        let cfg = resolve_layout(Viewport::new(0.0, 0.0), &settings());
        assert!(cfg.compact);
        assert!(cfg.year_width > 0.0);
        assert_eq!(cfg.timeline_y, 0.0);
    }

    #[test]
    fn resolve_is_idempotent() {
        let vp = Viewport::new(1280.0, 720.0);
        assert_eq!(resolve_layout(vp, &settings()), resolve_layout(vp, &settings()));
    }

    #[test]
    fn publisher_replaces_snapshot_on_resize() {
        let mut p = LayoutPublisher::new(settings());
        assert_eq!(p.current(), LayoutConfig::default());
        let wide = p.resize(Viewport::new(1440.0, 900.0));
        assert!(!wide.compact);
        assert_eq!(wide.year_width, 360.0);
        let narrow = p.resize(Viewport::new(375.0, 700.0));
        assert!(narrow.compact);
        assert_eq!(narrow.year_width, 280.0);
        assert_eq!(p.current(), narrow);
        assert_eq!(p.last_viewport(), Some(Viewport::new(375.0, 700.0)));
    }

    #[test]
    fn subscribers_receive_each_snapshot_until_unsubscribed() {
        let seen: Rc<RefCell<Vec<LayoutConfig>>> = Rc::new(RefCell::new(Vec::new()));
        let mut p = LayoutPublisher::new(settings());
        let sink = seen.clone();
        let id = p.subscribe(move |cfg| sink.borrow_mut().push(*cfg));
        assert_eq!(p.subscriber_count(), 1);

        p.resize(Viewport::new(1440.0, 900.0));
        p.resize(Viewport::new(375.0, 700.0));
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1], p.current());

        assert!(p.unsubscribe(id));
        assert!(!p.unsubscribe(id));
        p.resize(Viewport::new(1024.0, 768.0));
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(p.subscriber_count(), 0);
    }

    #[test]
    fn new_settings_republish_last_viewport() {
        let mut p = LayoutPublisher::new(settings());
        assert!(p.set_settings(settings()).is_none());
        p.resize(Viewport::new(1440.0, 900.0));
        let tweaked = ResolverSettings {
            wide_center_fraction: 0.5,
            ..settings()
        };
        let cfg = p.set_settings(tweaked).unwrap();
        assert_eq!(cfg.timeline_y, 450.0);
        assert_eq!(p.settings().wide_center_fraction, 0.5);
    }
}
