//! User preferences
//!
//! Persisted in LocalStorage on the web. Only the controls are remembered;
//! the painting itself is never saved.

use serde::{Deserialize, Serialize};

use crate::sim::{GravityPreset, Rgb, Shape, SimulationState};

/// Brush and gravity choices restored on the next visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Paint color (`#rrggbb` in JSON)
    pub color: Rgb,
    pub shape: Shape,
    pub gravity: GravityPreset,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            shape: Shape::Circle,
            gravity: GravityPreset::Earth,
        }
    }
}

impl Settings {
    /// Push these preferences into a session
    pub fn apply(&self, state: &mut SimulationState) {
        state.brush.color = self.color;
        state.brush.shape = self.shape;
        state.gravity.apply_preset(self.gravity);
    }

    /// Control id and value pairs that display these preferences in the page
    pub fn control_values(&self) -> [(&'static str, String); 3] {
        [
            ("color-picker", self.color.to_hex()),
            ("shape-select", self.shape.as_str().to_string()),
            ("gravity-select", self.gravity.as_str().to_string()),
        ]
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gravity_paint_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::debug!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_json_shape() {
        let settings = Settings {
            color: Rgb::new(255, 0, 128),
            shape: Shape::Triangle,
            gravity: GravityPreset::BlackHole,
        };
        let json = settings.to_json().unwrap();
        assert_eq!(
            json,
            r##"{"color":"#ff0080","shape":"triangle","gravity":"blackHole"}"##
        );
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_default() {
        let settings = Settings::from_json(r#"{"shape":"square"}"#).unwrap();
        assert_eq!(settings.shape, Shape::Square);
        assert_eq!(settings.color, Rgb::BLACK);
        assert_eq!(settings.gravity, GravityPreset::Earth);
    }

    #[test]
    fn test_bad_color_rejected() {
        assert!(Settings::from_json(r#"{"color":"red"}"#).is_err());
    }

    #[test]
    fn test_control_values_match_page_options() {
        let settings = Settings {
            color: Rgb::new(255, 0, 0),
            shape: Shape::Square,
            gravity: GravityPreset::BlackHole,
        };
        assert_eq!(
            settings.control_values(),
            [
                ("color-picker", "#ff0000".to_string()),
                ("shape-select", "square".to_string()),
                ("gravity-select", "blackHole".to_string()),
            ]
        );

        // Restored values read back to the same preferences
        for (id, value) in settings.control_values() {
            match id {
                "color-picker" => assert_eq!(value.parse::<Rgb>().unwrap(), settings.color),
                "shape-select" => assert_eq!(Shape::from_str(&value), Some(settings.shape)),
                "gravity-select" => {
                    assert_eq!(GravityPreset::from_str(&value), Some(settings.gravity))
                }
                other => panic!("unexpected control {}", other),
            }
        }
    }

    #[test]
    fn test_apply_to_session() {
        let mut state = SimulationState::new(1, 0);
        let settings = Settings {
            color: Rgb::new(1, 2, 3),
            shape: Shape::Square,
            gravity: GravityPreset::Moon,
        };
        settings.apply(&mut state);
        assert_eq!(state.brush.color, Rgb::new(1, 2, 3));
        assert_eq!(state.brush.shape, Shape::Square);
        assert_eq!(state.gravity.current(), Vec2::new(0.0, 0.08));
    }
}
