use crate::state::marker::MarkerId;

/// Failures surfaced by the overlay engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    /// Programming error: two markers must never share an id
    #[error("marker id `{0}` is already registered")]
    DuplicateId(MarkerId),
    /// The overlay was torn down before the operation ran
    #[error("overlay has been torn down")]
    TornDown,
}
