//! Section box around a picked point.
//!
//! The box spans the model's full X/Y extent and a slab of `range` along Z
//! centered on the picked point. The viewer receives it as six cut planes.

use glam::{Vec3, Vec4};

use crate::state::settings::SectionSettings;
use crate::viewer::{Aabb, Viewer};

/// Section box for a picked point
pub fn section_box(bounds: &Aabb, point: Vec3, range: f32) -> Aabb {
    let half = range / 2.0;
    Aabb::new(
        Vec3::new(bounds.min.x, bounds.min.y, point.z - half),
        Vec3::new(bounds.max.x, bounds.max.y, point.z + half),
    )
}

/// Six planes `n·p + d = 0` bounding the box; points on the positive side are cut
pub fn cut_planes(b: &Aabb) -> [Vec4; 6] {
    [
        Vec4::new(1.0, 0.0, 0.0, -b.max.x),
        Vec4::new(-1.0, 0.0, 0.0, b.min.x),
        Vec4::new(0.0, 1.0, 0.0, -b.max.y),
        Vec4::new(0.0, -1.0, 0.0, b.min.y),
        Vec4::new(0.0, 0.0, 1.0, -b.max.z),
        Vec4::new(0.0, 0.0, -1.0, b.min.z),
    ]
}

/// Active section, if any
#[derive(Debug, Clone, PartialEq)]
pub struct SectionState {
    point: Option<Vec3>,
    range: f32,
}

impl SectionState {
    pub fn new(range: f32) -> Self {
        let range = if range > 0.0 {
            range
        } else {
            SectionSettings::default().range
        };
        Self { point: None, range }
    }

    pub fn point(&self) -> Option<Vec3> {
        self.point
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn is_active(&self) -> bool {
        self.point.is_some()
    }

    /// Section around `point`. Needs model bounds from the viewer.
    pub fn apply<V: Viewer>(&mut self, viewer: &mut V, point: Vec3) -> bool {
        self.point = Some(point);
        self.push(viewer)
    }

    /// Change the slab height, re-applying an active section.
    /// Non-positive and NaN ranges are ignored.
    pub fn set_range<V: Viewer>(&mut self, viewer: &mut V, range: f32) -> bool {
        if range.is_nan() || range <= 0.0 {
            tracing::warn!("Ignoring section range {range}");
            return false;
        }
        self.range = range;
        if self.point.is_some() {
            self.push(viewer);
        }
        true
    }

    pub fn clear<V: Viewer>(&mut self, viewer: &mut V) {
        if self.point.take().is_some() {
            viewer.set_cut_planes(&[]);
            viewer.invalidate();
        }
    }

    fn push<V: Viewer>(&mut self, viewer: &mut V) -> bool {
        let Some(point) = self.point else {
            return false;
        };
        let Some(bounds) = viewer.model_bounds() else {
            tracing::warn!("No model bounds, section not applied");
            self.point = None;
            return false;
        };
        let planes = cut_planes(&section_box(&bounds, point, self.range));
        viewer.set_cut_planes(&planes);
        viewer.invalidate();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Aabb {
        Aabb::new(Vec3::new(-5.0, -4.0, -10.0), Vec3::new(5.0, 4.0, 10.0))
    }

    #[test]
    fn test_section_box_keeps_xy_extent() {
        let b = section_box(&bounds(), Vec3::new(1.0, 1.0, 2.0), 5.0);
        assert_eq!(b.min, Vec3::new(-5.0, -4.0, -0.5));
        assert_eq!(b.max, Vec3::new(5.0, 4.0, 4.5));
    }

    #[test]
    fn test_cut_planes_keep_inside() {
        let b = section_box(&bounds(), Vec3::ZERO, 2.0);
        let planes = cut_planes(&b);
        let inside = Vec4::new(0.0, 0.0, 0.5, 1.0);
        let above = Vec4::new(0.0, 0.0, 1.5, 1.0);
        assert!(planes.iter().all(|p| p.dot(inside) <= 0.0));
        assert!(planes.iter().any(|p| p.dot(above) > 0.0));
    }

    #[test]
    fn test_new_falls_back_to_default_range() {
        assert_eq!(SectionState::new(-3.0).range(), 5.0);
        assert_eq!(SectionState::new(2.0).range(), 2.0);
    }
}
