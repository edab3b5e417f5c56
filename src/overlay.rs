//! overlay.rs — screen-space markers placed over the basemap.
//!
//! The map surface is reached only through [`MapSurface`]: attach a point,
//! reposition it for a viewport, detach it. [`OverlayLayer`] owns the
//! handles and rebuilds them whenever the point list changes.

use std::collections::HashSet;

use crate::{
    html::{css_url, escape},
    palette::audience_color,
    point::Point,
    projection::{LatLng, Viewport},
};

/// Lifecycle hooks a map surface provides for custom overlays.
pub trait MapSurface {
    type Handle;

    fn attach(&mut self, point: &Point) -> Self::Handle;
    fn reposition(&mut self, handle: &Self::Handle, viewport: &Viewport);
    fn detach(&mut self, handle: Self::Handle);
}

// ---------------------------------------------------------------------------
// Layer
// ---------------------------------------------------------------------------

pub struct OverlayLayer<S: MapSurface> {
    surface: S,
    handles: Vec<S::Handle>,
}

impl<S: MapSurface> OverlayLayer<S> {
    pub fn new(surface: S) -> Self {
        Self { surface, handles: Vec::new() }
    }

    /// Tear down every existing overlay, then attach one per point.
    pub fn sync<'a, I>(&mut self, points: I)
    where
        I: IntoIterator<Item = &'a Point>,
    {
        for h in self.handles.drain(..) {
            self.surface.detach(h);
        }
        for p in points {
            let h = self.surface.attach(p);
            self.handles.push(h);
        }
    }

    /// Re-project every overlay for the current viewport.
    pub fn redraw(&mut self, viewport: &Viewport) {
        for h in &self.handles {
            self.surface.reposition(h, viewport);
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

// ---------------------------------------------------------------------------
// HTML pane
// ---------------------------------------------------------------------------

/// A rendered marker: avatar, pulsing status dot, optional name label.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerNode {
    /// Index into the page's popup list.
    pub popup: usize,
    pub at:    LatLng,
    pub photo: String,
    pub color: &'static str,
    pub label: Option<String>,
    pub left:  f64,
    pub top:   f64,
}

impl MarkerNode {
    pub fn to_html(&self) -> String {
        let label = match &self.label {
            Some(name) => format!("<div class='cm-name'>{}</div>", escape(name)),
            None => String::new(),
        };
        format!(
            "<div class='cm-marker' data-popup='{popup}' style='left:{left:.1}px;top:{top:.1}px'>\
             <div class='cm-avatar' style=\"background-image:url('{photo}')\">\
             <span class='cm-dot' style='background:{color}'></span></div>{label}</div>",
            popup = self.popup,
            left  = self.left,
            top   = self.top,
            photo = escape(&css_url(&self.photo)),
            color = self.color,
        )
    }
}

/// Marker pane of the generated page. Handles are slot indices; a detached
/// slot holds `None` and is skipped on reposition.
#[derive(Debug, Default)]
pub struct HtmlPane {
    slots:    Vec<Option<MarkerNode>>,
    attached: usize,
}

impl HtmlPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live nodes, in attach order.
    pub fn nodes(&self) -> impl Iterator<Item = &MarkerNode> {
        self.slots.iter().flatten()
    }
}

impl MapSurface for HtmlPane {
    type Handle = usize;

    fn attach(&mut self, point: &Point) -> usize {
        let node = MarkerNode {
            popup: self.attached,
            at:    LatLng { lat: point.lat, lng: point.lng },
            photo: point.photo_or_default().to_string(),
            color: audience_color(point.publico_alvo.as_deref()),
            label: point.nome_lider.clone(),
            left:  0.0,
            top:   0.0,
        };
        self.attached += 1;
        self.slots.push(Some(node));
        self.slots.len() - 1
    }

    fn reposition(&mut self, handle: &usize, viewport: &Viewport) {
        let Some(Some(node)) = self.slots.get_mut(*handle) else { return };
        let (x, y) = viewport.to_screen(node.at);
        node.left = x;
        node.top = y;
    }

    fn detach(&mut self, handle: usize) {
        if let Some(slot) = self.slots.get_mut(handle) {
            *slot = None;
        }
        if self.slots.iter().all(Option::is_none) {
            self.slots.clear();
            self.attached = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// Shared styles
// ---------------------------------------------------------------------------

/// Pulse animation for the status dot: a scale beat plus a fading ring.
pub const PULSE_STYLE: &str = "\
@keyframes cm-pulse { 0% { transform: scale(1); } 50% { transform: scale(1.25); } 100% { transform: scale(1); } }
@keyframes cm-ring { 0% { box-shadow: 0 0 0 0 rgba(255,255,255,.7); } 100% { box-shadow: 0 0 0 10px rgba(255,255,255,0); } }
.cm-dot { animation: cm-pulse 1.6s ease-in-out infinite, cm-ring 1.6s ease-out infinite; }";

/// Page-wide style blocks, each emitted at most once.
#[derive(Debug, Default)]
pub struct StyleRegistry {
    ids:    HashSet<&'static str>,
    blocks: Vec<(&'static str, &'static str)>,
}

impl StyleRegistry {
    /// Returns false when a block with this id is already present.
    pub fn inject(&mut self, id: &'static str, css: &'static str) -> bool {
        if !self.ids.insert(id) {
            return false;
        }
        self.blocks.push((id, css));
        true
    }

    pub fn to_html(&self) -> String {
        self.blocks
            .iter()
            .map(|(id, css)| format!("<style id='{id}'>\n{css}\n</style>\n"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::CelulaRow;

    fn pt(lat: &str, lider: Option<&str>, publico: Option<&str>) -> Point {
        Point::from_row(CelulaRow {
            lat: Some(lat.into()),
            lng: Some("-56.1325".into()),
            nome_lider: lider.map(Into::into),
            publico_alvo: publico.map(Into::into),
            ..Default::default()
        })
        .unwrap()
    }

    /// Records every hook call.
    #[derive(Default)]
    struct Recorder {
        next:     usize,
        live:     Vec<usize>,
        moved:    Vec<usize>,
    }

    impl MapSurface for Recorder {
        type Handle = usize;
        fn attach(&mut self, _: &Point) -> usize {
            self.next += 1;
            self.live.push(self.next);
            self.next
        }
        fn reposition(&mut self, h: &usize, _: &Viewport) {
            self.moved.push(*h);
        }
        fn detach(&mut self, h: usize) {
            self.live.retain(|&x| x != h);
        }
    }

    #[test]
    fn sync_replaces_previous_overlays() {
        let pts = vec![pt("-15.64", None, None), pt("-15.65", None, None)];
        let mut layer = OverlayLayer::new(Recorder::default());
        layer.sync(&pts);
        assert_eq!(layer.surface().live, [1, 2]);
        layer.sync(&pts[..1]);
        assert_eq!(layer.surface().live, [3]);
        assert_eq!(layer.len(), 1);

        layer.redraw(&Viewport::default_for(100, 100));
        assert_eq!(layer.surface().moved, [3]);
    }

    #[test]
    fn html_pane_projects_and_colors() {
        let pts = vec![pt("-15.646670", Some("Ana"), Some("Kids"))];
        let mut layer = OverlayLayer::new(HtmlPane::new());
        layer.sync(&pts);
        layer.redraw(&Viewport::default_for(800, 600));

        let node = layer.surface().nodes().next().unwrap();
        assert!((node.left - 400.0).abs() < 1e-6);
        assert!((node.top - 300.0).abs() < 1e-6);
        assert_eq!(node.color, "#facc15");
        let html = node.to_html();
        assert!(html.contains("cm-name'>Ana<"));
        assert!(html.contains("left:400.0px"));
    }

    #[test]
    fn detached_slots_are_skipped() {
        let mut pane = HtmlPane::new();
        let a = pane.attach(&pt("-15.6", None, None));
        let b = pane.attach(&pt("-15.7", None, None));
        pane.detach(a);
        pane.reposition(&a, &Viewport::default_for(10, 10));
        assert_eq!(pane.nodes().count(), 1);
        pane.detach(b);
        assert_eq!(pane.nodes().count(), 0);
        // popup numbering restarts after a full teardown
        pane.attach(&pt("-15.6", None, None));
        assert_eq!(pane.nodes().next().unwrap().popup, 0);
    }

    #[test]
    fn missing_label_renders_no_name() {
        let mut pane = HtmlPane::new();
        pane.attach(&pt("-15.6", None, None));
        let html = pane.nodes().next().unwrap().to_html();
        assert!(!html.contains("cm-name"));
        assert!(html.contains("#ffffff"));
    }

    #[test]
    fn photo_url_stays_inside_css_url() {
        let mut pane = HtmlPane::new();
        let mut p = pt("-15.6", None, None);
        p.photo_url = Some("x');background:red;x:('".into());
        pane.attach(&p);
        let html = pane.nodes().next().unwrap().to_html();
        assert!(html.contains("url('x%27%29%3Bbackground:red%3Bx:%28%27')"));
        assert!(!html.contains("&#39;"));
    }

    #[test]
    fn styles_inject_once() {
        let mut reg = StyleRegistry::default();
        assert!(reg.inject("cm-pulse", PULSE_STYLE));
        assert!(!reg.inject("cm-pulse", PULSE_STYLE));
        assert_eq!(reg.to_html().matches("<style").count(), 1);
    }
}
