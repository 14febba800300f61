//! egui implementation of the viewer contract for the demo app.
//!
//! The "model" is a handful of boxes drawn as wireframes. Markers are
//! painted on top of it from the render objects the overlay pushes.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use egui::{Color32, Painter, Pos2, Rect, Stroke};
use glam::{Vec3, Vec4};

use pinview_gui_lib::viewer::{
    Aabb, Camera, EventKind, ListenerId, ListenerTarget, RenderHandle, RenderObject, Rgb, Viewer,
};
use pinview_gui_lib::viewport::picking::ray_boxes;
use pinview_gui_lib::viewport::projection::{projected_radius, screen_ray, world_to_screen};

use super::orbit::OrbitCamera;

pub struct EguiHost {
    pub orbit: OrbitCamera,
    rect: Rect,
    model: Vec<Aabb>,
    scenes: BTreeSet<String>,
    objects: BTreeMap<RenderHandle, (RenderObject, String)>,
    listeners: HashMap<ListenerId, (ListenerTarget, EventKind)>,
    cut_planes: Vec<Vec4>,
    next_id: u64,
    dirty: bool,
}

/// Ground slab and two blocks
fn demo_model() -> Vec<Aabb> {
    vec![
        Aabb::new(Vec3::new(-12.0, -0.5, -12.0), Vec3::new(12.0, 0.0, 12.0)),
        Aabb::new(Vec3::new(-8.0, 0.0, -6.0), Vec3::new(0.0, 9.0, 4.0)),
        Aabb::new(Vec3::new(2.0, 0.0, -4.0), Vec3::new(9.0, 5.0, 7.0)),
    ]
}

fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

impl EguiHost {
    pub fn new() -> Self {
        Self {
            orbit: OrbitCamera::new(),
            rect: Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0)),
            model: demo_model(),
            scenes: BTreeSet::new(),
            objects: BTreeMap::new(),
            listeners: HashMap::new(),
            cut_planes: Vec::new(),
            next_id: 1,
            dirty: true,
        }
    }

    /// Returns true if the viewport moved or resized
    pub fn set_viewport(&mut self, rect: Rect) -> bool {
        if self.rect == rect {
            return false;
        }
        self.rect = rect;
        true
    }

    /// Redraw requested since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Region kept by the active cut planes
    fn kept_region(&self) -> Option<Aabb> {
        let [px, nx, py, ny, pz, nz] = self.cut_planes.as_slice() else {
            return None;
        };
        Some(Aabb::new(
            Vec3::new(nx.w, ny.w, nz.w),
            Vec3::new(-px.w, -py.w, -pz.w),
        ))
    }

    pub fn paint(&self, painter: &Painter) {
        let camera = self.camera();
        let kept = self.kept_region();
        let edge = Stroke::new(1.0, Color32::from_gray(170));

        for block in &self.model {
            let shown = match kept {
                Some(k) => {
                    let min = block.min.max(k.min);
                    let max = block.max.min(k.max);
                    if min.cmpgt(max).any() {
                        continue;
                    }
                    Aabb::new(min, max)
                }
                None => *block,
            };
            self.paint_box(painter, &camera, &shown, edge);
        }

        // Spheres live in the scene, sprites float above it
        for (object, _) in self.objects.values() {
            if let RenderObject::Sphere {
                center,
                radius,
                color: rgb,
                highlighted,
            } = *object
            {
                let (Some(screen), Some(r)) = (
                    world_to_screen(center, &camera, self.rect),
                    projected_radius(center, radius, &camera, self.rect),
                ) else {
                    continue;
                };
                painter.circle_filled(screen, r, color(rgb));
                if highlighted {
                    painter.circle_stroke(screen, r + 2.0, Stroke::new(2.0, Color32::WHITE));
                }
            }
        }
        for (object, _) in self.objects.values() {
            if let RenderObject::Sprite {
                center,
                size,
                color: rgb,
                visible: true,
            } = *object
            {
                painter.circle_filled(center, size * 0.5, color(rgb));
                painter.circle_stroke(center, size * 0.5, Stroke::new(1.0, Color32::BLACK));
            }
        }
    }

    fn paint_box(&self, painter: &Painter, camera: &Camera, b: &Aabb, stroke: Stroke) {
        let corner = |i: usize| {
            Vec3::new(
                if i & 1 == 0 { b.min.x } else { b.max.x },
                if i & 2 == 0 { b.min.y } else { b.max.y },
                if i & 4 == 0 { b.min.z } else { b.max.z },
            )
        };
        const EDGES: [(usize, usize); 12] = [
            (0, 1), (2, 3), (4, 5), (6, 7),
            (0, 2), (1, 3), (4, 6), (5, 7),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ];
        for (a, c) in EDGES {
            if let (Some(p), Some(q)) = (
                world_to_screen(corner(a), camera, self.rect),
                world_to_screen(corner(c), camera, self.rect),
            ) {
                painter.line_segment([p, q], stroke);
            }
        }
    }
}

impl Viewer for EguiHost {
    fn camera(&self) -> Camera {
        self.orbit.snapshot()
    }

    fn viewport(&self) -> Rect {
        self.rect
    }

    fn hit_test(&self, screen: Pos2) -> Option<Vec3> {
        if !self.rect.contains(screen) {
            return None;
        }
        ray_boxes(&screen_ray(screen, &self.camera(), self.rect), &self.model)
    }

    fn add_overlay_scene(&mut self, name: &str) {
        self.scenes.insert(name.to_string());
    }

    fn remove_overlay_scene(&mut self, name: &str) {
        self.scenes.remove(name);
        self.objects.retain(|_, (_, scene)| scene != name);
    }

    fn has_overlay_scene(&self, name: &str) -> bool {
        self.scenes.contains(name)
    }

    fn add_render_object(&mut self, object: RenderObject, overlay: &str) -> RenderHandle {
        let handle = RenderHandle(self.next_id);
        self.next_id += 1;
        self.objects.insert(handle, (object, overlay.to_string()));
        handle
    }

    fn update_render_object(&mut self, handle: RenderHandle, object: RenderObject) {
        if let Some(entry) = self.objects.get_mut(&handle) {
            entry.0 = object;
        }
    }

    fn remove_render_object(&mut self, handle: RenderHandle) {
        self.objects.remove(&handle);
    }

    fn add_listener(&mut self, target: ListenerTarget, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, (target, kind));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn model_bounds(&self) -> Option<Aabb> {
        let first = *self.model.first()?;
        Some(
            self.model
                .iter()
                .fold(first, |acc, b| Aabb::new(acc.min.min(b.min), acc.max.max(b.max))),
        )
    }

    fn set_cut_planes(&mut self, planes: &[Vec4]) {
        self.cut_planes = planes.to_vec();
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }
}
