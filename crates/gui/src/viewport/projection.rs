//! World ↔ screen conversions for overlay placement and pick tolerance.

use egui::{Pos2, Rect};
use glam::{Vec3, Vec4};

use super::camera::Camera;
use super::picking::Ray;

/// Project a world point into viewport pixel coordinates.
/// Returns None for points behind the camera instead of a mirrored position.
pub fn world_to_screen(point: Vec3, camera: &Camera, rect: Rect) -> Option<Pos2> {
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    let aspect = rect.width() / rect.height();
    let vp = camera.view_projection(aspect);
    let p = vp * Vec4::new(point.x, point.y, point.z, 1.0);
    if p.w <= 0.0 {
        return None;
    }
    let ndc = p.truncate() / p.w;
    let screen_x = rect.center().x + ndc.x * rect.width() * 0.5;
    let screen_y = rect.center().y - ndc.y * rect.height() * 0.5;
    Some(egui::pos2(screen_x, screen_y))
}

/// Pixel length of `world_radius` at `world_point`, measured along the camera's right axis.
pub fn projected_radius(
    world_point: Vec3,
    world_radius: f32,
    camera: &Camera,
    rect: Rect,
) -> Option<f32> {
    let center = world_to_screen(world_point, camera, rect)?;
    let edge = world_to_screen(world_point + camera.right() * world_radius, camera, rect)?;
    Some(center.distance(edge))
}

/// Perspective-aware pick radius, never smaller than `min_px`.
pub fn screen_radius_of(
    world_point: Vec3,
    world_radius: f32,
    camera: &Camera,
    rect: Rect,
    min_px: f32,
) -> f32 {
    projected_radius(world_point, world_radius, camera, rect)
        .map_or(min_px, |r| r.max(min_px))
}

/// Cast a ray from a screen position into the scene
pub fn screen_ray(screen_pos: Pos2, camera: &Camera, rect: Rect) -> Ray {
    let aspect = rect.width() / rect.height();

    // Screen → NDC
    let ndc_x = (screen_pos.x - rect.center().x) / (rect.width() * 0.5);
    let ndc_y = -(screen_pos.y - rect.center().y) / (rect.height() * 0.5);

    let vp_inv = camera.view_projection(aspect).inverse();

    let near_world = vp_inv * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
    let far_world = vp_inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

    let near = near_world.truncate() / near_world.w;
    let far = far_world.truncate() / far_world.w;

    Ray {
        origin: camera.position,
        direction: (far - near).normalize_or_zero(),
    }
}
