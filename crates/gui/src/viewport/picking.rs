use egui::{Pos2, Rect};
use glam::Vec3;

use super::camera::Camera;
use super::projection::screen_radius_of;
use crate::state::marker::{Marker, MarkerId, MarkerKind};
use crate::state::registry::MarkerRegistry;
use crate::state::settings::OverlaySettings;

/// A ray in world space
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Nearest surface point among a set of boxes
pub fn ray_boxes(ray: &Ray, boxes: &[Aabb]) -> Option<Vec3> {
    boxes
        .iter()
        .filter_map(|b| ray_aabb(ray, b))
        .min_by(f32::total_cmp)
        .map(|t| ray.at(t))
}

/// Screen-space pick tolerance for one marker
pub fn pick_tolerance(marker: &Marker, camera: &Camera, rect: Rect, settings: &OverlaySettings) -> f32 {
    let min_px = settings.picking.min_radius_px;
    match marker.kind() {
        MarkerKind::Issue => screen_radius_of(
            marker.world_position(),
            settings.issues.world_radius,
            camera,
            rect,
            min_px,
        ),
        MarkerKind::Pushpin => screen_radius_of(
            marker.world_position(),
            settings.pushpins.world_radius,
            camera,
            rect,
            min_px,
        )
        .max(marker.placement.size * 0.5),
    }
}

/// Nearest marker whose adaptive tolerance contains the pointer.
/// Markers without a screen position (behind the camera) are skipped.
pub fn pick(
    pointer: Pos2,
    registry: &MarkerRegistry,
    camera: &Camera,
    rect: Rect,
    settings: &OverlaySettings,
) -> Option<MarkerId> {
    let mut best: Option<(&Marker, f32)> = None;

    for marker in registry.all() {
        let Some(screen) = marker.screen_position() else {
            continue;
        };
        let dist = screen.distance(pointer);
        if dist > pick_tolerance(marker, camera, rect, settings) {
            continue;
        }
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((marker, dist));
        }
    }

    best.map(|(m, _)| m.id.clone())
}
