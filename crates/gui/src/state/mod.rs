pub mod interaction;
pub mod marker;
pub mod registry;
pub mod settings;

pub use interaction::{ClickedMarker, Interaction, InteractionState, Mode};
pub use marker::{issue_marker_id, Anchor, Marker, MarkerId, MarkerKind, MarkerStatus};
pub use registry::MarkerRegistry;
pub use settings::{AddModePolicy, OverlaySettings, Palette};
