//! Interaction state machine: add-mode, selection, drag and section pick.
//!
//! Exactly one mode is active at a time. Every mode that needs listeners
//! acquires them on entry and releases them on exit, through the shared
//! [`ListenerScope`](crate::lifecycle::ListenerScope).

use egui::Pos2;
use glam::Vec3;
use shared::Issue;

use super::marker::{Marker, MarkerId, MarkerKind};
use super::settings::AddModePolicy;
use crate::lifecycle::{ListenerRole, Parts};
use crate::viewer::{EventKind, ListenerId, ListenerTarget, Viewer};
use crate::viewport::picking::pick;

/// Active interaction mode with the listeners it owns
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// Waiting for a click on the model surface
    AddMode { listener: ListenerId },
    /// A pushpin follows the pointer until release
    Dragging {
        id: MarkerId,
        on_move: ListenerId,
        on_up: ListenerId,
    },
    /// Waiting for the section center point
    SectionPick { listener: ListenerId },
}

/// Listener-free view of [`Mode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    AddMode,
    Dragging(MarkerId),
    SectionPick,
}

/// Payload of the marker-clicked notification
#[derive(Debug, Clone, PartialEq)]
pub enum ClickedMarker {
    Issue(Box<Issue>),
    Pushpin { id: MarkerId, position: Vec3 },
}

/// Result of an input event for the overlay to act on
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    None,
    Clicked(ClickedMarker),
    /// Section center picked on the model surface
    SectionPoint(Vec3),
}

#[derive(Debug, Default)]
pub struct Interaction {
    mode: Mode,
    selected: Option<MarkerId>,
    last_pin_stamp: u64,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn state(&self) -> InteractionState {
        match &self.mode {
            Mode::Idle => InteractionState::Idle,
            Mode::AddMode { .. } => InteractionState::AddMode,
            Mode::Dragging { id, .. } => InteractionState::Dragging(id.clone()),
            Mode::SectionPick { .. } => InteractionState::SectionPick,
        }
    }

    pub fn selected(&self) -> Option<&MarkerId> {
        self.selected.as_ref()
    }

    /// Arm a one-shot click listener for placing a pushpin.
    /// Only valid from Idle; returns false otherwise.
    pub fn enable_add_mode<V: Viewer>(&mut self, parts: &mut Parts<'_, V>) -> bool {
        if self.mode != Mode::Idle {
            tracing::debug!("Add mode ignored in {:?}", self.state());
            return false;
        }
        let listener = parts.listeners.acquire(
            parts.viewer,
            ListenerRole::AddModeClick,
            ListenerTarget::Viewport,
            EventKind::Click,
        );
        self.mode = Mode::AddMode { listener };
        true
    }

    /// Toggle section picking. Calling it while picking cancels.
    pub fn enable_section_pick<V: Viewer>(&mut self, parts: &mut Parts<'_, V>) -> bool {
        match self.mode {
            Mode::SectionPick { listener } => {
                parts.listeners.release(parts.viewer, listener);
                self.mode = Mode::Idle;
                false
            }
            Mode::Idle => {
                let listener = parts.listeners.acquire(
                    parts.viewer,
                    ListenerRole::SectionClick,
                    ListenerTarget::Viewport,
                    EventKind::Click,
                );
                self.mode = Mode::SectionPick { listener };
                true
            }
            _ => false,
        }
    }

    /// Click delivered to an add-mode or section-pick listener.
    /// A miss keeps the mode armed so the user can try again.
    pub fn on_click<V: Viewer>(
        &mut self,
        parts: &mut Parts<'_, V>,
        listener: ListenerId,
        pos: Pos2,
    ) -> Outcome {
        match self.mode {
            Mode::AddMode { listener: armed } if armed == listener => {
                let Some(hit) = parts.viewer.hit_test(pos) else {
                    tracing::debug!("Add mode click at {pos:?} missed the model");
                    return Outcome::None;
                };
                parts.listeners.release(parts.viewer, armed);
                self.mode = Mode::Idle;
                self.place_pushpins(parts, pos, hit);
                Outcome::None
            }
            Mode::SectionPick { listener: armed } if armed == listener => {
                let Some(hit) = parts.viewer.hit_test(pos) else {
                    tracing::debug!("Section click at {pos:?} missed the model");
                    return Outcome::None;
                };
                parts.listeners.release(parts.viewer, armed);
                self.mode = Mode::Idle;
                Outcome::SectionPoint(hit)
            }
            _ => Outcome::None,
        }
    }

    fn place_pushpins<V: Viewer>(&mut self, parts: &mut Parts<'_, V>, pos: Pos2, hit: Vec3) {
        let mut points = Vec::new();
        if let AddModePolicy::SeedGrid {
            rows,
            cols,
            spacing_px,
        } = parts.settings.add_mode
        {
            if parts.registry.pushpin_count() == 0 {
                for r in 0..rows {
                    for c in 0..cols {
                        let dx = (c as f32 - (cols as f32 - 1.0) / 2.0) * spacing_px;
                        let dy = (r as f32 - (rows as f32 - 1.0) / 2.0) * spacing_px;
                        if let Some(p) = parts.viewer.hit_test(pos + egui::vec2(dx, dy)) {
                            points.push(p);
                        }
                    }
                }
            }
        }
        if points.is_empty() {
            points.push(hit);
        }

        for point in points {
            let id = self.next_pin_id(parts);
            match parts.attach(MarkerKind::Pushpin, |h| Marker::pushpin(id, point, h)) {
                Ok(id) => {
                    tracing::info!("Pushpin {id} placed at {point:?}");
                    parts.sync_marker(&id);
                }
                Err(e) => tracing::error!("Pushpin not placed: {e}"),
            }
        }
    }

    /// Creation-timestamp id, bumped until unique
    fn next_pin_id<V: Viewer>(&mut self, parts: &Parts<'_, V>) -> MarkerId {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let mut stamp = now.max(self.last_pin_stamp + 1);
        while parts.registry.contains(&format!("pin-{stamp}")) {
            stamp += 1;
        }
        self.last_pin_stamp = stamp;
        format!("pin-{stamp}")
    }

    /// Pointer-down on the viewport: pick, select and start a drag.
    pub fn on_pointer_down<V: Viewer>(&mut self, parts: &mut Parts<'_, V>, pos: Pos2) -> Outcome {
        if self.mode != Mode::Idle {
            return Outcome::None;
        }
        let camera = parts.viewer.camera();
        let rect = parts.viewer.viewport();
        let Some(id) = pick(pos, parts.registry, &camera, rect, parts.settings) else {
            return Outcome::None;
        };
        self.select(parts, &id);

        let Some(marker) = parts.registry.get(&id) else {
            return Outcome::None;
        };
        let clicked = match marker.issue_record() {
            Some(issue) => ClickedMarker::Issue(Box::new(issue.clone())),
            None => ClickedMarker::Pushpin {
                id: id.clone(),
                position: marker.world_position(),
            },
        };

        if marker.is_pushpin() {
            let on_move = parts.listeners.acquire(
                parts.viewer,
                ListenerRole::DragMove,
                ListenerTarget::Window,
                EventKind::PointerMove,
            );
            let on_up = parts.listeners.acquire(
                parts.viewer,
                ListenerRole::DragUp,
                ListenerTarget::Window,
                EventKind::PointerUp,
            );
            tracing::debug!("Dragging {id}");
            self.mode = Mode::Dragging { id, on_move, on_up };
        }
        Outcome::Clicked(clicked)
    }

    /// Drag step: re-anchor the pushpin where the pointer meets the model
    pub fn on_pointer_move<V: Viewer>(
        &mut self,
        parts: &mut Parts<'_, V>,
        listener: ListenerId,
        pos: Pos2,
    ) {
        let Mode::Dragging { id, on_move, .. } = &self.mode else {
            return;
        };
        if *on_move != listener {
            return;
        }
        if let Some(hit) = parts.viewer.hit_test(pos) {
            if parts.registry.move_anchor(id, hit) {
                parts.sync_marker(id);
            }
        }
    }

    pub fn on_pointer_up<V: Viewer>(&mut self, parts: &mut Parts<'_, V>, listener: ListenerId) {
        if matches!(&self.mode, Mode::Dragging { on_up, .. } if *on_up == listener) {
            self.end_drag(parts);
        }
    }

    fn end_drag<V: Viewer>(&mut self, parts: &mut Parts<'_, V>) {
        if let Mode::Dragging { id, on_move, on_up } = std::mem::take(&mut self.mode) {
            parts.listeners.release(parts.viewer, on_move);
            parts.listeners.release(parts.viewer, on_up);
            tracing::debug!("Drag of {id} finished");
        }
    }

    /// Select a marker, deselecting the previous one in the same step.
    /// Unknown ids are ignored and the current selection stays.
    pub fn select<V: Viewer>(&mut self, parts: &mut Parts<'_, V>, id: &str) -> bool {
        if !parts.registry.contains(id) {
            tracing::warn!("Cannot select unknown marker {id}");
            return false;
        }
        if let Some(prev) = self.selected.take() {
            parts.registry.set_selected(&prev, false);
            parts.refresh(&prev);
        }
        parts.registry.set_selected(id, true);
        parts.refresh(id);
        parts.viewer.invalidate();
        self.selected = Some(id.to_string());
        true
    }

    /// Remove the selected marker and its visual
    pub fn remove_selected<V: Viewer>(&mut self, parts: &mut Parts<'_, V>) -> Option<MarkerId> {
        let Some(id) = self.selected.clone() else {
            tracing::warn!("No marker selected");
            return None;
        };
        self.forget(parts, &id);
        parts.detach(&id);
        tracing::info!("Removed marker {id}");
        if !parts.registry.is_empty() {
            parts.sync_all();
        }
        Some(id)
    }

    /// Drop every reference to a marker about to leave the registry
    pub fn forget<V: Viewer>(&mut self, parts: &mut Parts<'_, V>, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        if matches!(&self.mode, Mode::Dragging { id: dragged, .. } if dragged == id) {
            self.end_drag(parts);
        }
    }

    /// Back to Idle with nothing selected. Listener bookkeeping is done by
    /// the lifecycle, which releases the whole scope on teardown.
    pub fn reset(&mut self) {
        self.mode = Mode::Idle;
        self.selected = None;
    }
}
