//! Headless test harness: a scripted viewer and an overlay driven through it.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use egui::{pos2, Pos2, Rect};
use glam::{Vec3, Vec4};
use shared::Issue;

use crate::error::OverlayError;
use crate::overlay::{AnnotationOverlay, OverlayExtension};
use crate::state::interaction::{ClickedMarker, InteractionState};
use crate::state::marker::MarkerId;
use crate::state::settings::OverlaySettings;
use crate::viewer::{
    Aabb, Camera, EventKind, ListenerId, ListenerTarget, RenderHandle, RenderObject, Rgb, Viewer,
    ViewerEvent,
};
use crate::viewport::picking::ray_boxes;
use crate::viewport::projection::screen_ray;

/// In-memory viewer. The model is a set of boxes hit-tested by ray casting.
#[derive(Debug)]
pub struct MockViewer {
    pub camera: Camera,
    pub rect: Rect,
    pub blocks: Vec<Aabb>,
    scenes: BTreeSet<String>,
    objects: HashMap<RenderHandle, (RenderObject, String)>,
    listeners: HashMap<ListenerId, (ListenerTarget, EventKind)>,
    cut_planes: Vec<Vec4>,
    next_handle: u64,
    next_listener: u64,
    /// Removals of listeners that were not registered
    pub double_detach: usize,
    /// Removals of render handles that were not registered
    pub stale_removals: usize,
    pub invalidations: usize,
}

impl MockViewer {
    /// Camera at z=10 looking down -Z at a 10x10 wall whose front face is z=0.
    /// The viewport center hits the origin.
    pub fn new() -> Self {
        Self {
            camera: Camera::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z, Vec3::Y),
            rect: Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0)),
            blocks: vec![Aabb::new(Vec3::new(-5.0, -5.0, -1.0), Vec3::new(5.0, 5.0, 0.0))],
            scenes: BTreeSet::new(),
            objects: HashMap::new(),
            listeners: HashMap::new(),
            cut_planes: Vec::new(),
            next_handle: 1,
            next_listener: 1,
            double_detach: 0,
            stale_removals: 0,
            invalidations: 0,
        }
    }

    pub fn object(&self, handle: RenderHandle) -> Option<&RenderObject> {
        self.objects.get(&handle).map(|(o, _)| o)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Render objects living in an overlay scene
    pub fn objects_in(&self, overlay: &str) -> usize {
        self.objects.values().filter(|(_, s)| s == overlay).count()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listeners_of(&self, target: ListenerTarget, kind: EventKind) -> usize {
        self.listeners
            .values()
            .filter(|(t, k)| *t == target && *k == kind)
            .count()
    }

    pub fn scenes(&self) -> Vec<String> {
        self.scenes.iter().cloned().collect()
    }

    pub fn cut_planes(&self) -> &[Vec4] {
        &self.cut_planes
    }
}

impl Default for MockViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer for MockViewer {
    fn camera(&self) -> Camera {
        self.camera
    }

    fn viewport(&self) -> Rect {
        self.rect
    }

    fn hit_test(&self, screen: Pos2) -> Option<Vec3> {
        let ray = screen_ray(screen, &self.camera, self.rect);
        ray_boxes(&ray, &self.blocks)
    }

    fn add_overlay_scene(&mut self, name: &str) {
        self.scenes.insert(name.to_string());
    }

    fn remove_overlay_scene(&mut self, name: &str) {
        self.scenes.remove(name);
    }

    fn has_overlay_scene(&self, name: &str) -> bool {
        self.scenes.contains(name)
    }

    fn add_render_object(&mut self, object: RenderObject, overlay: &str) -> RenderHandle {
        let handle = RenderHandle(self.next_handle);
        self.next_handle += 1;
        self.objects.insert(handle, (object, overlay.to_string()));
        handle
    }

    fn update_render_object(&mut self, handle: RenderHandle, object: RenderObject) {
        if let Some(entry) = self.objects.get_mut(&handle) {
            entry.0 = object;
        }
    }

    fn remove_render_object(&mut self, handle: RenderHandle) {
        if self.objects.remove(&handle).is_none() {
            self.stale_removals += 1;
        }
    }

    fn add_listener(&mut self, target: ListenerTarget, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, (target, kind));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        if self.listeners.remove(&id).is_none() {
            self.double_detach += 1;
        }
    }

    fn model_bounds(&self) -> Option<Aabb> {
        let first = self.blocks.first()?;
        Some(self.blocks.iter().fold(*first, |acc, b| {
            Aabb::new(acc.min.min(b.min), acc.max.max(b.max))
        }))
    }

    fn set_cut_planes(&mut self, planes: &[Vec4]) {
        self.cut_planes = planes.to_vec();
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }
}

/// Overlay on a [`MockViewer`] with input helpers
pub struct TestHarness {
    pub overlay: AnnotationOverlay<MockViewer>,
    clicked: Rc<RefCell<Vec<ClickedMarker>>>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_settings(OverlaySettings::default())
    }

    pub fn with_settings(settings: OverlaySettings) -> Self {
        let mut overlay = AnnotationOverlay::new(MockViewer::new(), settings);
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicked);
        overlay.on_marker_clicked(move |m| sink.borrow_mut().push(m.clone()));
        Self { overlay, clicked }
    }

    pub fn viewer(&self) -> &MockViewer {
        self.overlay.viewer()
    }

    // ── Input ─────────────────────────────────────────────────

    pub fn click(&mut self, x: f32, y: f32) {
        self.overlay.dispatch(ViewerEvent::Click(pos2(x, y)));
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.overlay.dispatch(ViewerEvent::PointerDown(pos2(x, y)));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.overlay.dispatch(ViewerEvent::PointerMove(pos2(x, y)));
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) {
        self.overlay.dispatch(ViewerEvent::PointerUp(pos2(x, y)));
    }

    /// Press at `from`, move to `to`, release
    pub fn drag(&mut self, from: Pos2, to: Pos2) {
        self.pointer_down(from.x, from.y);
        self.pointer_move(to.x, to.y);
        self.pointer_up(to.x, to.y);
    }

    /// Move the camera and notify the overlay
    pub fn set_camera(&mut self, camera: Camera) {
        self.overlay.viewer_mut().camera = camera;
        self.overlay.dispatch(ViewerEvent::CameraChanged);
    }

    // ── Commands ──────────────────────────────────────────────

    /// Add mode plus one click; returns the new pushpin id on a hit
    pub fn place_pushpin(&mut self, x: f32, y: f32) -> Option<MarkerId> {
        let before = self.overlay.registry().pushpin_ids();
        self.overlay.enable_add_mode();
        self.click(x, y);
        self.overlay
            .registry()
            .pushpin_ids()
            .into_iter()
            .find(|id| !before.contains(id))
    }

    pub fn load_issues(&mut self, issues: Vec<Issue>) -> Result<usize, OverlayError> {
        self.overlay.load_issues(issues)
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.overlay.select(id)
    }

    pub fn clear_all(&mut self) -> usize {
        self.overlay.clear_all()
    }

    pub fn teardown(&mut self) -> usize {
        self.overlay.teardown()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn state(&self) -> InteractionState {
        self.overlay.state()
    }

    pub fn clicked(&self) -> Vec<ClickedMarker> {
        self.clicked.borrow().clone()
    }

    pub fn marker_count(&self) -> usize {
        self.overlay.registry().len()
    }

    pub fn pushpin_count(&self) -> usize {
        self.overlay.registry().pushpin_count()
    }

    pub fn issue_count(&self) -> usize {
        self.overlay.registry().issue_count()
    }

    /// Colour currently shown for a marker
    pub fn color_of(&self, id: &str) -> Option<Rgb> {
        let marker = self.overlay.registry().get(id)?;
        self.viewer().object(marker.handle).map(RenderObject::color)
    }

    pub fn screen_of(&self, id: &str) -> Option<Pos2> {
        self.overlay.registry().get(id)?.screen_position()
    }

    pub fn world_of(&self, id: &str) -> Option<Vec3> {
        self.overlay.registry().get(id).map(|m| m.world_position())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
