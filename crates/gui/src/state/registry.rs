use glam::Vec3;
use indexmap::IndexMap;

use super::marker::{Anchor, Marker, MarkerId, MarkerKind, MarkerStatus, Placement};
use crate::error::OverlayError;
use crate::viewer::RenderHandle;

/// Owned map of live markers, in insertion order.
///
/// The registry holds the only reference to each marker's render handle.
/// It never talks to the viewer: removal hands the marker (and its handle)
/// back to the caller, which detaches the visual in the same operation.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: IndexMap<MarkerId, Marker>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a marker. Duplicate ids are rejected, never overwritten.
    pub fn insert(&mut self, marker: Marker) -> Result<(), OverlayError> {
        if self.markers.contains_key(&marker.id) {
            return Err(OverlayError::DuplicateId(marker.id));
        }
        self.markers.insert(marker.id.clone(), marker);
        Ok(())
    }

    /// Remove a marker. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<Marker> {
        self.markers.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.markers.contains_key(id)
    }

    /// All markers in insertion order
    pub fn all(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    /// Change a marker's status. Returns false for unknown ids.
    pub fn set_status(&mut self, id: &str, status: MarkerStatus) -> bool {
        match self.markers.get_mut(id) {
            Some(m) => {
                m.status = status;
                true
            }
            None => false,
        }
    }

    /// Set or reset the selection indicator. Returns false for unknown ids.
    pub fn set_selected(&mut self, id: &str, selected: bool) -> bool {
        match self.markers.get_mut(id) {
            Some(m) => {
                m.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Move a pushpin anchor. Issue markers are rejected.
    pub fn move_anchor(&mut self, id: &str, position: Vec3) -> bool {
        match self.markers.get_mut(id) {
            Some(Marker {
                anchor: Anchor::World(p),
                ..
            }) => {
                *p = position;
                true
            }
            _ => false,
        }
    }

    /// Store the result of a layout pass
    pub(crate) fn set_placement(&mut self, id: &str, placement: Placement) -> bool {
        match self.markers.get_mut(id) {
            Some(m) => {
                m.placement = placement;
                true
            }
            None => false,
        }
    }

    /// Drain every marker, returning exactly one handle per removed marker.
    pub fn clear(&mut self) -> Vec<RenderHandle> {
        self.markers.drain(..).map(|(_, m)| m.handle).collect()
    }

    /// Ids of issue markers, in ring order
    pub fn issue_ids(&self) -> Vec<MarkerId> {
        self.ids_of(MarkerKind::Issue)
    }

    pub fn pushpin_ids(&self) -> Vec<MarkerId> {
        self.ids_of(MarkerKind::Pushpin)
    }

    fn ids_of(&self, kind: MarkerKind) -> Vec<MarkerId> {
        self.markers
            .values()
            .filter(|m| m.kind() == kind)
            .map(|m| m.id.clone())
            .collect()
    }

    pub fn pushpin_count(&self) -> usize {
        self.markers.values().filter(|m| m.is_pushpin()).count()
    }

    pub fn issue_count(&self) -> usize {
        self.markers.len() - self.pushpin_count()
    }

    /// Currently selected markers (at most one while the invariant holds)
    pub fn selected_ids(&self) -> Vec<MarkerId> {
        self.markers
            .values()
            .filter(|m| m.selected)
            .map(|m| m.id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
