// Library crate: the overlay engine plus the headless harness used by
// integration tests and the agent command protocol.
// The egui demo host (app, ui) stays in the binary crate.

pub mod command;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod issues;
pub mod lifecycle;
pub mod overlay;
pub mod section;
pub mod state;
pub mod viewer;

/// Camera math, projection, picking and marker layout
pub mod viewport {
    pub mod camera;
    pub mod layout;
    pub mod picking;
    pub mod projection;
}

pub use overlay::{AnnotationOverlay, OverlayExtension};
