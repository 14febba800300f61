//! Contract the overlay consumes from the host 3D viewer.

use egui::{Pos2, Rect};
use glam::{Vec3, Vec4};

pub use crate::viewport::camera::Camera;
pub use crate::viewport::picking::Aabb;

/// RGB colour
pub type Rgb = [u8; 3];

/// Opaque handle to a render object owned by the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderHandle(pub u64);

/// Opaque handle to an event listener registered with the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// Viewer-level events (camera changes)
    Viewer,
    /// The viewport element only
    Viewport,
    /// The whole window, so drags keep tracking outside the viewport
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CameraChange,
    Click,
    PointerDown,
    PointerMove,
    PointerUp,
}

/// Event delivered by the host to a listener.
/// Pointer positions are in the same space as [`Viewer::viewport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    CameraChanged,
    Click(Pos2),
    PointerDown(Pos2),
    PointerMove(Pos2),
    PointerUp(Pos2),
}

impl ViewerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ViewerEvent::CameraChanged => EventKind::CameraChange,
            ViewerEvent::Click(_) => EventKind::Click,
            ViewerEvent::PointerDown(_) => EventKind::PointerDown,
            ViewerEvent::PointerMove(_) => EventKind::PointerMove,
            ViewerEvent::PointerUp(_) => EventKind::PointerUp,
        }
    }

    pub fn pos(&self) -> Option<Pos2> {
        match *self {
            ViewerEvent::CameraChanged => None,
            ViewerEvent::Click(p)
            | ViewerEvent::PointerDown(p)
            | ViewerEvent::PointerMove(p)
            | ViewerEvent::PointerUp(p) => Some(p),
        }
    }
}

/// Visual pushed to the viewer for each marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderObject {
    /// Screen-space dot drawn above the canvas (pushpins)
    Sprite {
        center: Pos2,
        size: f32,
        color: Rgb,
        visible: bool,
    },
    /// Sphere in an overlay scene (issues)
    Sphere {
        center: Vec3,
        radius: f32,
        color: Rgb,
        highlighted: bool,
    },
}

impl RenderObject {
    pub fn color(&self) -> Rgb {
        match *self {
            RenderObject::Sprite { color, .. } | RenderObject::Sphere { color, .. } => color,
        }
    }
}

/// Host viewer capabilities used by the overlay
pub trait Viewer {
    fn camera(&self) -> Camera;

    /// Viewport rectangle in pointer-event coordinates
    fn viewport(&self) -> Rect;

    /// Surface point under a screen position, None on a miss
    fn hit_test(&self, screen: Pos2) -> Option<Vec3>;

    fn add_overlay_scene(&mut self, name: &str);
    fn remove_overlay_scene(&mut self, name: &str);
    fn has_overlay_scene(&self, name: &str) -> bool;

    fn add_render_object(&mut self, object: RenderObject, overlay: &str) -> RenderHandle;
    fn update_render_object(&mut self, handle: RenderHandle, object: RenderObject);
    /// Removing an unknown handle is a no-op
    fn remove_render_object(&mut self, handle: RenderHandle);

    fn add_listener(&mut self, target: ListenerTarget, kind: EventKind) -> ListenerId;
    /// Removing an already-removed listener is a no-op
    fn remove_listener(&mut self, id: ListenerId);

    /// Bounding box of the loaded model(s)
    fn model_bounds(&self) -> Option<Aabb> {
        None
    }

    /// Replace the active cut planes (`n·p + d = 0`, the positive side is cut)
    fn set_cut_planes(&mut self, _planes: &[Vec4]) {}

    /// Request a redraw
    fn invalidate(&mut self) {}
}
