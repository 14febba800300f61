//! Annotation overlay: the single entry point a host viewer talks to.

use shared::Issue;

use crate::error::OverlayError;
use crate::issues::{IssueClient, IssueListState, IssueSender, PendingLoad, FETCH_FAILED};
use crate::lifecycle::{Lifecycle, ListenerRole, ListenerScope, Parts};
use crate::section::SectionState;
use crate::state::interaction::{ClickedMarker, Interaction, InteractionState, Outcome};
use crate::state::marker::{Marker, MarkerId, MarkerKind};
use crate::state::registry::MarkerRegistry;
use crate::state::settings::OverlaySettings;
use crate::viewer::{ListenerId, Viewer, ViewerEvent};

/// Extension hooks driven by the host viewer
pub trait OverlayExtension {
    /// Returns false if already initialized
    fn initialize(&mut self) -> bool;
    /// Idempotent; returns the number of render objects removed
    fn teardown(&mut self) -> usize;
    fn on_camera_change(&mut self);
}

pub type MarkerClickCallback = Box<dyn FnMut(&ClickedMarker)>;

pub struct AnnotationOverlay<V: Viewer> {
    viewer: V,
    settings: OverlaySettings,
    registry: MarkerRegistry,
    interaction: Interaction,
    lifecycle: Lifecycle,
    issues: IssueListState,
    pending: Option<PendingLoad>,
    section: SectionState,
    on_clicked: Option<MarkerClickCallback>,
}

impl<V: Viewer> AnnotationOverlay<V> {
    /// Create and initialize the overlay on `viewer`
    pub fn new(viewer: V, settings: OverlaySettings) -> Self {
        let section = SectionState::new(settings.section.range);
        let mut overlay = Self {
            viewer,
            settings,
            registry: MarkerRegistry::new(),
            interaction: Interaction::new(),
            lifecycle: Lifecycle::new(),
            issues: IssueListState::default(),
            pending: None,
            section,
            on_clicked: None,
        };
        overlay.initialize();
        overlay
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    pub fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn listeners(&self) -> &ListenerScope {
        self.lifecycle.listeners()
    }

    pub fn state(&self) -> InteractionState {
        self.interaction.state()
    }

    pub fn selected(&self) -> Option<&MarkerId> {
        self.interaction.selected()
    }

    pub fn is_live(&self) -> bool {
        self.lifecycle.is_live()
    }

    pub fn issue_list(&self) -> &IssueListState {
        &self.issues
    }

    pub fn section(&self) -> &SectionState {
        &self.section
    }

    pub fn is_loading_issues(&self) -> bool {
        self.pending.is_some()
    }

    /// Register the marker-clicked notification
    pub fn on_marker_clicked(&mut self, callback: impl FnMut(&ClickedMarker) + 'static) {
        self.on_clicked = Some(Box::new(callback));
    }

    fn split(&mut self) -> (&mut Interaction, Parts<'_, V>) {
        (
            &mut self.interaction,
            Parts {
                viewer: &mut self.viewer,
                registry: &mut self.registry,
                listeners: &mut self.lifecycle.listeners,
                settings: &self.settings,
            },
        )
    }

    pub fn enable_add_mode(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }
        let (interaction, mut parts) = self.split();
        interaction.enable_add_mode(&mut parts)
    }

    /// Toggle the section point picker
    pub fn enable_section_pick(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }
        let (interaction, mut parts) = self.split();
        interaction.enable_section_pick(&mut parts)
    }

    pub fn set_section_range(&mut self, range: f32) -> bool {
        self.section.set_range(&mut self.viewer, range)
    }

    pub fn clear_section(&mut self) {
        self.section.clear(&mut self.viewer);
    }

    pub fn select(&mut self, id: &str) -> bool {
        let (interaction, mut parts) = self.split();
        interaction.select(&mut parts, id)
    }

    pub fn remove_selected(&mut self) -> Option<MarkerId> {
        let (interaction, mut parts) = self.split();
        interaction.remove_selected(&mut parts)
    }

    /// Remove every marker, then start over with a fresh overlay.
    /// Returns the number of render objects removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.teardown();
        self.initialize();
        removed
    }

    /// Event delivered by the host to one listener. Events for listeners
    /// that are no longer live are ignored.
    pub fn handle_event(&mut self, listener: ListenerId, event: ViewerEvent) {
        if !self.is_live() {
            return;
        }
        let Some(role) = self.lifecycle.listeners.role(listener) else {
            tracing::trace!("Event for stale listener {listener:?}");
            return;
        };
        let outcome = {
            let (interaction, mut parts) = self.split();
            match (role, event) {
                (ListenerRole::CameraSync, ViewerEvent::CameraChanged) => {
                    parts.sync_all();
                    Outcome::None
                }
                (ListenerRole::MarkerPointerDown, ViewerEvent::PointerDown(pos)) => {
                    interaction.on_pointer_down(&mut parts, pos)
                }
                (ListenerRole::AddModeClick | ListenerRole::SectionClick, ViewerEvent::Click(pos)) => {
                    interaction.on_click(&mut parts, listener, pos)
                }
                (ListenerRole::DragMove, ViewerEvent::PointerMove(pos)) => {
                    interaction.on_pointer_move(&mut parts, listener, pos);
                    Outcome::None
                }
                (ListenerRole::DragUp, ViewerEvent::PointerUp(_)) => {
                    interaction.on_pointer_up(&mut parts, listener);
                    Outcome::None
                }
                _ => Outcome::None,
            }
        };

        match outcome {
            Outcome::None => {}
            Outcome::Clicked(clicked) => {
                if let Some(callback) = self.on_clicked.as_mut() {
                    callback(&clicked);
                }
            }
            Outcome::SectionPoint(point) => {
                if self.section.apply(&mut self.viewer, point) {
                    tracing::info!("Section applied at {point:?}");
                }
            }
        }
    }

    /// Deliver an event to every live listener of its kind
    pub fn dispatch(&mut self, event: ViewerEvent) {
        for id in self.lifecycle.listeners.ids_for(event.kind()) {
            self.handle_event(id, event);
        }
    }

    /// Replace all issue markers with markers for `issues`.
    /// Only the first `max_markers` issues get a marker.
    /// Returns the number of markers created.
    pub fn load_issues(&mut self, issues: Vec<Issue>) -> Result<usize, OverlayError> {
        if !self.is_live() {
            return Err(OverlayError::TornDown);
        }
        let cap = self.settings.issues.max_markers;
        let (interaction, mut parts) = self.split();

        for id in parts.registry.issue_ids() {
            interaction.forget(&mut parts, &id);
            parts.detach(&id);
        }

        let mut created = 0;
        for issue in issues.iter().take(cap) {
            let issue = issue.clone();
            match parts.attach(MarkerKind::Issue, |h| Marker::issue(issue, h)) {
                Ok(_) => created += 1,
                Err(e) => tracing::warn!("Skipping issue: {e}"),
            }
        }
        parts.sync_all();

        tracing::info!("Loaded {} issues ({created} markers)", issues.len());
        self.issues = IssueListState::loaded(issues, cap);
        Ok(created)
    }

    /// Start fetching issues from the configured endpoint.
    /// A load already in flight is replaced.
    pub fn begin_issue_load(&mut self, runtime: &tokio::runtime::Handle) -> bool {
        let Some(token) = self.lifecycle.token() else {
            return false;
        };
        let client = IssueClient::new(self.settings.issues.endpoint.clone());
        self.pending = Some(PendingLoad::spawn(runtime, client, token));
        self.issues = IssueListState::Loading;
        true
    }

    /// Start a load completed through the returned sender
    pub fn begin_external_issue_load(&mut self) -> Option<IssueSender> {
        let token = self.lifecycle.token()?;
        let (tx, pending) = PendingLoad::channel(token);
        self.pending = Some(pending);
        self.issues = IssueListState::Loading;
        Some(tx)
    }

    /// Apply a finished load. Call once per frame; returns true when a
    /// load completed during this call.
    pub fn poll_issue_load(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        if !pending.token().is_alive() {
            self.pending = None;
            return false;
        }
        let Some(result) = pending.poll() else {
            return false;
        };
        self.pending = None;

        match result {
            Ok(issues) => {
                if let Err(e) = self.load_issues(issues) {
                    tracing::warn!("Issues not applied: {e}");
                }
            }
            Err(e) => {
                tracing::warn!("Failed to fetch issues: {e}");
                self.issues = IssueListState::Failed(FETCH_FAILED.to_string());
            }
        }
        true
    }
}

impl<V: Viewer> OverlayExtension for AnnotationOverlay<V> {
    fn initialize(&mut self) -> bool {
        self.lifecycle.initialize(&mut self.viewer)
    }

    fn teardown(&mut self) -> usize {
        self.pending = None;
        self.interaction.reset();
        self.section.clear(&mut self.viewer);
        self.issues = IssueListState::Idle;
        self.lifecycle.teardown(&mut self.viewer, &mut self.registry)
    }

    fn on_camera_change(&mut self) {
        if !self.is_live() {
            return;
        }
        let (_, mut parts) = self.split();
        parts.sync_all();
    }
}

impl<V: Viewer> Drop for AnnotationOverlay<V> {
    fn drop(&mut self) {
        self.teardown();
    }
}
