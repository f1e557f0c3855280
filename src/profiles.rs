//! Render Profiles - named, versioned presets
//!
//! A profile pins encode and render options (and optionally the
//! symbology) under a stable id, so callers ask for "shipping" instead
//! of repeating bar widths and bearer settings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::checksum::EncodeOptions;
use crate::error::ProfileError;
use crate::render::{LabelFont, RenderOptions, Scale};
use crate::symbology::Symbology;

pub type ProfileId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderProfile {
    pub id: ProfileId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub profile_version: String,
    #[serde(default = "default_version")]
    pub engine_min_version: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub superseded_by: Option<String>,
    /// Fixed symbology; requests must match it when set.
    #[serde(default)]
    pub symbology: Option<Symbology>,
    #[serde(default)]
    pub encode: EncodeOptions,
    #[serde(default)]
    pub render: RenderOptions,
}

fn default_version() -> String {
    crate::MIN_PROFILE_VERSION.to_string()
}

impl RenderProfile {
    fn builtin(id: &str, name: &str, description: &str, symbology: Symbology, render: RenderOptions) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            profile_version: default_version(),
            engine_min_version: default_version(),
            deprecated: false,
            superseded_by: None,
            symbology: Some(symbology),
            encode: EncodeOptions::default(),
            render,
        }
    }

    /// Both version fields must be valid semver.
    pub fn check_versions(&self) -> Result<(), ProfileError> {
        for version in [&self.profile_version, &self.engine_min_version] {
            semver::Version::parse(version).map_err(|_| ProfileError::InvalidVersion(version.clone()))?;
        }
        Ok(())
    }

    pub fn load_file(path: &Path) -> Result<Self, ProfileError> {
        let content = fs::read_to_string(path)?;
        let profile: Self = serde_json::from_str(&content).map_err(|source| ProfileError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        profile.check_versions()?;
        Ok(profile)
    }
}

fn builtins() -> Vec<RenderProfile> {
    vec![
        RenderProfile::builtin(
            "retail",
            "Retail",
            "EAN-13 point-of-sale label with large human-readable digits",
            Symbology::Ean13,
            RenderOptions { height_px: 60, label_font: LabelFont::Large, ..RenderOptions::default() },
        ),
        RenderProfile::builtin(
            "shipping",
            "Shipping Carton",
            "ITF-14 outer-case code framed by bearer bars",
            Symbology::Itf14,
            RenderOptions {
                scale: Scale::BarWidth(3),
                height_px: 80,
                bearer_bars: Some(true),
                ..RenderOptions::default()
            },
        ),
        RenderProfile::builtin(
            "logistics",
            "Logistics",
            "Code 128 with automatic subset selection",
            Symbology::Code128,
            RenderOptions { height_px: 60, ..RenderOptions::default() },
        ),
        RenderProfile::builtin(
            "postal",
            "Postal",
            "PostNet ZIP code bars, no label",
            Symbology::PostNet,
            RenderOptions { height_px: 20, include_label: false, ..RenderOptions::default() },
        ),
    ]
}

/// Profile registry - builtins plus whatever a directory adds or overrides
pub struct ProfileRegistry {
    profiles: HashMap<ProfileId, RenderProfile>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self { profiles: HashMap::new() }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for profile in builtins() {
            registry.register(profile);
        }
        registry
    }

    /// Builtins, then every `*.json` in `dir`. Unreadable or invalid
    /// files are skipped with a warning; a missing directory is not an error.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ProfileError> {
        let mut registry = Self::builtin();
        if !dir.exists() {
            log::info!("profile directory {} not found, using builtins", dir.display());
            return Ok(registry);
        }

        let mut loaded = 0usize;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |e| e != "json") {
                continue;
            }
            match RenderProfile::load_file(&path) {
                Ok(profile) => {
                    if profile.deprecated {
                        log::warn!(
                            "profile {} is deprecated{}",
                            profile.id,
                            profile
                                .superseded_by
                                .as_deref()
                                .map(|s| format!(", superseded by {}", s))
                                .unwrap_or_default()
                        );
                    }
                    registry.register(profile);
                    loaded += 1;
                }
                Err(e) => log::warn!("skipping profile {}: {}", path.display(), e),
            }
        }
        log::info!("loaded {} profiles from {}", loaded, dir.display());
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&RenderProfile> {
        self.profiles.get(id)
    }

    /// All profiles, ordered by id.
    pub fn list(&self) -> Vec<&RenderProfile> {
        let mut profiles: Vec<_> = self.profiles.values().collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        profiles
    }

    pub fn register(&mut self, profile: RenderProfile) {
        self.profiles.insert(profile.id.clone(), profile);
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_present() {
        let registry = ProfileRegistry::builtin();
        let ids: Vec<_> = registry.list().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["logistics", "postal", "retail", "shipping"]);
        assert_eq!(registry.get("shipping").unwrap().render.bearer_bars, Some(true));
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let profile: RenderProfile = serde_json::from_str(r#"{"id": "x", "name": "X"}"#).unwrap();
        assert_eq!(profile.render, RenderOptions::default());
        assert_eq!(profile.symbology, None);
        assert!(profile.check_versions().is_ok());
    }

    #[test]
    fn test_camel_case_fields() {
        let json = r#"{
            "id": "tall",
            "name": "Tall",
            "engineMinVersion": "1.0.0",
            "symbology": "upc_a",
            "render": {"heightPx": 120, "rotation": 90, "scale": {"fitWidth": 400}}
        }"#;
        let profile: RenderProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.symbology, Some(Symbology::UpcA));
        assert_eq!(profile.render.height_px, 120);
        assert_eq!(profile.render.scale, Scale::FitWidth(400));
    }

    #[test]
    fn test_bad_version_rejected() {
        let mut profile = ProfileRegistry::builtin().get("retail").unwrap().clone();
        profile.engine_min_version = "one".into();
        assert!(matches!(profile.check_versions(), Err(ProfileError::InvalidVersion(_))));
    }
}
