//! Overlay settings

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared::IssueStatus;

use crate::viewer::Rgb;

/// Issue marker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueSettings {
    /// `GET` endpoint returning `{ issues: [...] }`
    pub endpoint: String,
    /// Only the first N issues get markers; the list shows all
    pub max_markers: usize,
    /// Distance of the ring center in front of the camera
    pub distance: f32,
    /// Ring radius in the camera's right/up plane
    pub spread: f32,
    /// Sphere radius in world units
    pub world_radius: f32,
}

impl Default for IssueSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/api/issues".to_string(),
            max_markers: 100,
            distance: 5.0,
            spread: 2.0,
            world_radius: 0.5,
        }
    }
}

/// Pushpin display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushpinSettings {
    /// Size in pixels at scale 1
    pub base_size: f32,
    /// Camera distance at which scale is 1
    pub ref_distance: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Pick radius in world units
    pub world_radius: f32,
}

impl Default for PushpinSettings {
    fn default() -> Self {
        Self {
            base_size: 12.0,
            ref_distance: 100.0,
            min_scale: 0.5,
            max_scale: 2.0,
            world_radius: 0.25,
        }
    }
}

/// Picking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickSettings {
    /// Far-away markers stay clickable with at least this radius
    pub min_radius_px: f32,
}

impl Default for PickSettings {
    fn default() -> Self {
        Self { min_radius_px: 10.0 }
    }
}

/// Marker colours
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    /// Issue status label → colour
    pub status: BTreeMap<String, Rgb>,
    /// Status without an entry
    pub unknown: Rgb,
    pub pin: Rgb,
    pub pin_selected: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        let status = [
            ("Open", [0xff, 0x4d, 0x4d]),
            ("Closed", [0x4c, 0xaf, 0x50]),
            ("In Progress", [0xff, 0x98, 0x00]),
            ("Resolved", [0x21, 0x96, 0xf3]),
            ("Critical", [0xe9, 0x1e, 0x63]),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self {
            status,
            unknown: [0x99, 0x99, 0x99],
            pin: [0xff, 0x00, 0x00],
            pin_selected: [0x00, 0xaa, 0xff],
        }
    }
}

impl Palette {
    pub fn status_color(&self, status: &IssueStatus) -> Rgb {
        self.status.get(status.label()).copied().unwrap_or(self.unknown)
    }

    pub fn pin_color(&self, selected: bool) -> Rgb {
        if selected {
            self.pin_selected
        } else {
            self.pin
        }
    }
}

/// What a click in add-mode creates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AddModePolicy {
    /// One pushpin at the hit point
    #[default]
    Single,
    /// With no pushpins yet, seed a grid of pins around the click.
    /// Grid cells whose ray misses the model are skipped.
    SeedGrid {
        rows: u32,
        cols: u32,
        spacing_px: f32,
    },
}

/// Section tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSettings {
    /// Height of the kept slab around the picked point
    pub range: f32,
}

impl Default for SectionSettings {
    fn default() -> Self {
        Self { range: 5.0 }
    }
}

/// All overlay settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OverlaySettings {
    #[serde(default)]
    pub issues: IssueSettings,
    #[serde(default)]
    pub pushpins: PushpinSettings,
    #[serde(default)]
    pub picking: PickSettings,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub add_mode: AddModePolicy,
    #[serde(default)]
    pub section: SectionSettings,
}

impl OverlaySettings {
    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "pinview", "pinview") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring invalid {}: {e}", config_path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "pinview", "pinview") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    if let Err(e) = std::fs::write(&config_path, json) {
                        tracing::warn!("Failed to save {}: {e}", config_path.display());
                    }
                }
            }
        }
    }
}
