//! Marker records held by the registry

use egui::Pos2;
use glam::Vec3;
use shared::{Issue, IssueId, IssueStatus};

use crate::viewer::RenderHandle;

/// Unique marker identifier
pub type MarkerId = String;

/// Marker variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Anchored to a user-chosen point on the model
    Pushpin,
    /// Kept in front of the camera, bound to an issue record
    Issue,
}

/// What a marker is attached to
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    /// Fixed world-space point
    World(Vec3),
    /// Source record; the world position is derived from the camera
    Issue(Box<Issue>),
}

/// Display status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerStatus {
    /// Pushpins only carry the selection flag
    Pushpin,
    Issue(IssueStatus),
}

/// Result of the last layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub world: Vec3,
    /// None while the marker is behind the camera
    pub screen: Option<Pos2>,
    /// Visual size in pixels (pushpins)
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub anchor: Anchor,
    pub handle: RenderHandle,
    pub status: MarkerStatus,
    pub selected: bool,
    pub placement: Placement,
}

/// Marker id used for an issue record.
///
/// Ids are keyed by their display form, so `IssueId::Number(1)` and
/// `IssueId::Text("1")` share `issue-1`. A feed mixing both keeps the first
/// record's marker and skips the second as a duplicate; the list still
/// shows both records.
pub fn issue_marker_id(id: &IssueId) -> MarkerId {
    format!("issue-{id}")
}

impl Marker {
    pub fn pushpin(id: MarkerId, position: Vec3, handle: RenderHandle) -> Self {
        Self {
            id,
            anchor: Anchor::World(position),
            handle,
            status: MarkerStatus::Pushpin,
            selected: false,
            placement: Placement {
                world: position,
                screen: None,
                size: 0.0,
            },
        }
    }

    pub fn issue(issue: Issue, handle: RenderHandle) -> Self {
        let status = MarkerStatus::Issue(issue.status());
        Self {
            id: issue_marker_id(&issue.id),
            anchor: Anchor::Issue(Box::new(issue)),
            handle,
            status,
            selected: false,
            placement: Placement {
                world: Vec3::ZERO,
                screen: None,
                size: 0.0,
            },
        }
    }

    pub fn kind(&self) -> MarkerKind {
        match self.anchor {
            Anchor::World(_) => MarkerKind::Pushpin,
            Anchor::Issue(_) => MarkerKind::Issue,
        }
    }

    pub fn is_pushpin(&self) -> bool {
        self.kind() == MarkerKind::Pushpin
    }

    /// Current world position (anchor for pushpins, last layout for issues)
    pub fn world_position(&self) -> Vec3 {
        match self.anchor {
            Anchor::World(p) => p,
            Anchor::Issue(_) => self.placement.world,
        }
    }

    pub fn screen_position(&self) -> Option<Pos2> {
        self.placement.screen
    }

    pub fn issue_record(&self) -> Option<&Issue> {
        match &self.anchor {
            Anchor::Issue(issue) => Some(issue),
            Anchor::World(_) => None,
        }
    }
}
