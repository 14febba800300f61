//! Camera-synchronized marker placement.
//!
//! Pushpins keep their world anchor and only get a fresh screen position
//! and size. Issue markers are re-placed on a ring in front of the camera
//! every tick so they stay visible from any viewpoint.

use std::f32::consts::TAU;

use egui::Rect;
use glam::Vec3;

use super::camera::Camera;
use super::projection::world_to_screen;
use crate::state::marker::{Marker, MarkerStatus, Placement};
use crate::state::registry::MarkerRegistry;
use crate::state::settings::{OverlaySettings, PushpinSettings};
use crate::viewer::{RenderObject, Viewer};

/// Ring center in front of the camera
pub fn ring_center(camera: &Camera, distance: f32) -> Vec3 {
    camera.position + camera.forward() * distance
}

/// Position of marker `index` out of `count` on the issue ring
pub fn ring_position(camera: &Camera, index: usize, count: usize, distance: f32, spread: f32) -> Vec3 {
    let center = ring_center(camera, distance);
    if count == 0 {
        return center;
    }
    let angle = index as f32 / count as f32 * TAU;
    center + camera.right() * (spread * angle.cos()) + camera.up_axis() * (spread * angle.sin())
}

/// Positions for `count` issue markers, in registry order
pub fn issue_ring(camera: &Camera, count: usize, distance: f32, spread: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| ring_position(camera, i, count, distance, spread))
        .collect()
}

/// Pushpin scale: shrinks with distance, clamped to stay legible
pub fn pushpin_scale(camera_distance: f32, settings: &PushpinSettings) -> f32 {
    if camera_distance <= f32::EPSILON {
        return settings.max_scale;
    }
    (settings.ref_distance / camera_distance).clamp(settings.min_scale, settings.max_scale)
}

fn pushpin_placement(world: Vec3, camera: &Camera, rect: Rect, settings: &PushpinSettings) -> Placement {
    Placement {
        world,
        screen: world_to_screen(world, camera, rect),
        size: settings.base_size * pushpin_scale(camera.distance_to(world), settings),
    }
}

fn issue_placement(world: Vec3, camera: &Camera, rect: Rect) -> Placement {
    Placement {
        world,
        screen: world_to_screen(world, camera, rect),
        size: 0.0,
    }
}

/// Visual for a marker in its current state
pub fn render_object(marker: &Marker, settings: &OverlaySettings) -> RenderObject {
    let palette = &settings.palette;
    match &marker.status {
        MarkerStatus::Pushpin => RenderObject::Sprite {
            center: marker.placement.screen.unwrap_or(egui::Pos2::ZERO),
            size: marker.placement.size,
            color: palette.pin_color(marker.selected),
            visible: marker.placement.screen.is_some(),
        },
        MarkerStatus::Issue(status) => RenderObject::Sphere {
            center: marker.placement.world,
            radius: settings.issues.world_radius,
            color: palette.status_color(status),
            highlighted: marker.selected,
        },
    }
}

/// Recompute every marker's placement and push the visuals to the viewer.
/// Safe to call any number of times per frame; each call overwrites.
pub fn sync_all<V: Viewer>(viewer: &mut V, registry: &mut MarkerRegistry, settings: &OverlaySettings) {
    let camera = viewer.camera();
    let rect = viewer.viewport();

    let issue_ids = registry.issue_ids();
    let ring = issue_ring(
        &camera,
        issue_ids.len(),
        settings.issues.distance,
        settings.issues.spread,
    );
    for (id, world) in issue_ids.iter().zip(ring) {
        registry.set_placement(id, issue_placement(world, &camera, rect));
    }

    for id in registry.pushpin_ids() {
        if let Some(world) = registry.get(&id).map(Marker::world_position) {
            registry.set_placement(&id, pushpin_placement(world, &camera, rect, &settings.pushpins));
        }
    }

    for marker in registry.all() {
        viewer.update_render_object(marker.handle, render_object(marker, settings));
    }
    viewer.invalidate();
}

/// Re-place one marker (after a drag step or a recolour).
/// Issue markers need the whole ring, so they fall back to [`sync_all`].
pub fn sync_marker<V: Viewer>(
    viewer: &mut V,
    registry: &mut MarkerRegistry,
    settings: &OverlaySettings,
    id: &str,
) {
    let Some(marker) = registry.get(id) else {
        return;
    };
    if !marker.is_pushpin() {
        sync_all(viewer, registry, settings);
        return;
    }
    let camera = viewer.camera();
    let placement = pushpin_placement(marker.world_position(), &camera, viewer.viewport(), &settings.pushpins);
    registry.set_placement(id, placement);
    if let Some(marker) = registry.get(id) {
        viewer.update_render_object(marker.handle, render_object(marker, settings));
    }
    viewer.invalidate();
}
