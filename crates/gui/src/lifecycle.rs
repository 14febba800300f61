//! Overlay lifecycle: overlay scenes, listener scopes and teardown.
//!
//! Every listener the overlay registers goes through [`ListenerScope`], so
//! teardown can release all of them regardless of the interaction state,
//! and a listener is never detached twice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::OverlayError;
use crate::state::marker::{Marker, MarkerId, MarkerKind};
use crate::state::registry::MarkerRegistry;
use crate::state::settings::OverlaySettings;
use crate::viewer::{EventKind, ListenerId, ListenerTarget, RenderHandle, RenderObject, Viewer};
use crate::viewport::layout;

/// Overlay scene holding pushpin sprites
pub const PUSHPIN_OVERLAY: &str = "pushpin-overlay";
/// Overlay scene holding issue spheres
pub const ISSUE_OVERLAY: &str = "issues-overlay";

/// What a listener is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerRole {
    CameraSync,
    /// Persistent viewport pointer-down used for picking
    MarkerPointerDown,
    AddModeClick,
    DragMove,
    DragUp,
    SectionClick,
}

#[derive(Debug, Clone, Copy)]
struct ListenerEntry {
    role: ListenerRole,
    kind: EventKind,
}

/// Listeners currently registered with the viewer
#[derive(Debug, Default)]
pub struct ListenerScope {
    live: IndexMap<ListenerId, ListenerEntry>,
}

impl ListenerScope {
    pub fn acquire<V: Viewer>(
        &mut self,
        viewer: &mut V,
        role: ListenerRole,
        target: ListenerTarget,
        kind: EventKind,
    ) -> ListenerId {
        let id = viewer.add_listener(target, kind);
        self.live.insert(id, ListenerEntry { role, kind });
        id
    }

    /// Detach a listener. Returns false if it was already released.
    pub fn release<V: Viewer>(&mut self, viewer: &mut V, id: ListenerId) -> bool {
        if self.live.shift_remove(&id).is_none() {
            return false;
        }
        viewer.remove_listener(id);
        true
    }

    /// Detach everything; returns how many listeners were released
    pub fn release_all<V: Viewer>(&mut self, viewer: &mut V) -> usize {
        let count = self.live.len();
        for (id, _) in self.live.drain(..) {
            viewer.remove_listener(id);
        }
        count
    }

    pub fn role(&self, id: ListenerId) -> Option<ListenerRole> {
        self.live.get(&id).map(|e| e.role)
    }

    /// Live listeners for an event kind, in registration order
    pub fn ids_for(&self, kind: EventKind) -> Vec<ListenerId> {
        self.live
            .iter()
            .filter(|(_, e)| e.kind == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn count_role(&self, role: ListenerRole) -> usize {
        self.live.values().filter(|e| e.role == role).count()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

/// Shared flag telling deferred work whether the overlay still exists
#[derive(Debug, Clone)]
pub struct LivenessToken(Arc<AtomicBool>);

impl LivenessToken {
    fn alive() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn kill(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Borrowed pieces of the overlay handed to the interaction layer
pub struct Parts<'a, V: Viewer> {
    pub viewer: &'a mut V,
    pub registry: &'a mut MarkerRegistry,
    pub listeners: &'a mut ListenerScope,
    pub settings: &'a OverlaySettings,
}

impl<V: Viewer> Parts<'_, V> {
    /// Create the marker's render object and register the marker.
    /// On a duplicate id the fresh render object is removed again.
    pub fn attach(
        &mut self,
        kind: MarkerKind,
        build: impl FnOnce(RenderHandle) -> Marker,
    ) -> Result<MarkerId, OverlayError> {
        let overlay = match kind {
            MarkerKind::Pushpin => PUSHPIN_OVERLAY,
            MarkerKind::Issue => ISSUE_OVERLAY,
        };
        let handle = self.viewer.add_render_object(placeholder(kind), overlay);
        let marker = build(handle);
        let id = marker.id.clone();
        if let Err(e) = self.registry.insert(marker) {
            self.viewer.remove_render_object(handle);
            return Err(e);
        }
        Ok(id)
    }

    /// Remove a marker together with its render object. Unknown ids are a no-op.
    pub fn detach(&mut self, id: &str) -> Option<Marker> {
        let marker = self.registry.remove(id)?;
        self.viewer.remove_render_object(marker.handle);
        self.viewer.invalidate();
        Some(marker)
    }

    pub fn sync_all(&mut self) {
        layout::sync_all(self.viewer, self.registry, self.settings);
    }

    pub fn sync_marker(&mut self, id: &str) {
        layout::sync_marker(self.viewer, self.registry, self.settings, id);
    }

    /// Push the marker's current visual without re-placing it
    pub fn refresh(&mut self, id: &str) {
        if let Some(marker) = self.registry.get(id) {
            self.viewer
                .update_render_object(marker.handle, layout::render_object(marker, self.settings));
        }
    }
}

fn placeholder(kind: MarkerKind) -> RenderObject {
    match kind {
        MarkerKind::Pushpin => RenderObject::Sprite {
            center: egui::Pos2::ZERO,
            size: 0.0,
            color: [0, 0, 0],
            visible: false,
        },
        MarkerKind::Issue => RenderObject::Sphere {
            center: glam::Vec3::ZERO,
            radius: 0.0,
            color: [0, 0, 0],
            highlighted: false,
        },
    }
}

/// Owns the listener scope and the liveness token
#[derive(Debug, Default)]
pub struct Lifecycle {
    pub(crate) listeners: ListenerScope,
    token: Option<LivenessToken>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_live(&self) -> bool {
        self.token.as_ref().is_some_and(LivenessToken::is_alive)
    }

    /// Token for deferred work started while live
    pub fn token(&self) -> Option<LivenessToken> {
        self.token.clone().filter(LivenessToken::is_alive)
    }

    pub fn listeners(&self) -> &ListenerScope {
        &self.listeners
    }

    /// Create overlay scenes and wire the persistent listeners.
    /// Returns false if already initialized.
    pub fn initialize<V: Viewer>(&mut self, viewer: &mut V) -> bool {
        if self.is_live() {
            return false;
        }
        for scene in [PUSHPIN_OVERLAY, ISSUE_OVERLAY] {
            if !viewer.has_overlay_scene(scene) {
                viewer.add_overlay_scene(scene);
            }
        }
        self.listeners.acquire(
            viewer,
            ListenerRole::CameraSync,
            ListenerTarget::Viewer,
            EventKind::CameraChange,
        );
        self.listeners.acquire(
            viewer,
            ListenerRole::MarkerPointerDown,
            ListenerTarget::Viewport,
            EventKind::PointerDown,
        );
        self.token = Some(LivenessToken::alive());
        tracing::info!("Annotation overlay initialized");
        true
    }

    /// Release every listener, detach every marker visual and drop the
    /// overlay scenes. Safe to call repeatedly; returns the number of
    /// render objects removed.
    pub fn teardown<V: Viewer>(&mut self, viewer: &mut V, registry: &mut MarkerRegistry) -> usize {
        if let Some(token) = self.token.take() {
            token.kill();
        }
        let released = self.listeners.release_all(viewer);

        let handles = registry.clear();
        for handle in &handles {
            viewer.remove_render_object(*handle);
        }

        for scene in [PUSHPIN_OVERLAY, ISSUE_OVERLAY] {
            if viewer.has_overlay_scene(scene) {
                viewer.remove_overlay_scene(scene);
            }
        }
        if released > 0 || !handles.is_empty() {
            viewer.invalidate();
            tracing::info!(
                "Annotation overlay torn down ({} listeners, {} markers)",
                released,
                handles.len()
            );
        }
        handles.len()
    }
}
