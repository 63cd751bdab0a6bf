//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sunburst/sunburst.toml`
//! 3. Local config: file given with `--config`
//! 4. Environment variables: `SUNBURST_*` prefix, `__` between section and key

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::layout::{LayoutConfig, LayoutDomain};

/// Partition settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    /// Gap between adjacent non-zero siblings, in domain units
    pub skip_length: f64,
    pub domain: LayoutDomain,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let defaults = LayoutConfig::default();
        Self {
            skip_length: defaults.skip_length,
            domain: defaults.domain,
        }
    }
}

/// Presentation settings used by the view and the radial geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewSettings {
    /// Keep old/new placement pairs on weight changes instead of jumping
    pub animate: bool,
    /// Radius of the center hole, in layer heights
    pub inner_radius_weight: f64,
    /// Ring thickness in pixels
    pub layer_height: f64,
    /// Icon edge length, in layer heights
    pub icon_scale: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            animate: true,
            inner_radius_weight: 2.0,
            layer_height: 50.0,
            icon_scale: 0.75,
        }
    }
}

/// Raw layout section for intermediate parsing.
///
/// `None` means "not specified, inherit from the layer below".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub skip_length: Option<f64>,
    pub domain: Option<LayoutDomain>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawViewSettings {
    pub animate: Option<bool>,
    pub inner_radius_weight: Option<f64>,
    pub layer_height: Option<f64>,
    pub icon_scale: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: RawLayoutSettings,
    pub view: RawViewSettings,
}

/// Unified configuration for sunburst.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutSettings,
    pub view: ViewSettings,
}

/// Get the XDG config directory for sunburst.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sunburst").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("sunburst.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).with_path_context("read config", path)?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            layout: LayoutSettings {
                skip_length: overlay.layout.skip_length.unwrap_or(self.layout.skip_length),
                domain: overlay.layout.domain.unwrap_or(self.layout.domain),
            },
            view: ViewSettings {
                animate: overlay.view.animate.unwrap_or(self.view.animate),
                inner_radius_weight: overlay
                    .view
                    .inner_radius_weight
                    .unwrap_or(self.view.inner_radius_weight),
                layer_height: overlay.view.layer_height.unwrap_or(self.view.layer_height),
                icon_scale: overlay.view.icon_scale.unwrap_or(self.view.icon_scale),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Optional config file layered over the global one; it must exist
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/sunburst/sunburst.toml` (skipped if absent)
    /// 3. Local config file
    /// 4. Environment variables: `SUNBURST_*` prefix
    #[instrument(level = "debug")]
    pub fn load(local: Option<&Path>) -> ApplicationResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(local_path) = local {
            debug!("local config: {}", local_path.display());
            current = current.merge_with(&load_raw_settings(local_path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply SUNBURST_* environment variables as explicit overrides,
    /// e.g. `SUNBURST_LAYOUT__SKIP_LENGTH=2`.
    fn apply_env_overrides(mut settings: Self) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("SUNBURST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<f64>("layout.skip_length") {
            settings.layout.skip_length = val;
        }
        if let Ok(val) = config.get_string("layout.domain") {
            settings.layout.domain = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_bool("view.animate") {
            settings.view.animate = val;
        }
        if let Ok(val) = config.get::<f64>("view.inner_radius_weight") {
            settings.view.inner_radius_weight = val;
        }
        if let Ok(val) = config.get::<f64>("view.layer_height") {
            settings.view.layer_height = val;
        }
        if let Ok(val) = config.get::<f64>("view.icon_scale") {
            settings.view.icon_scale = val;
        }

        Ok(settings)
    }

    /// Rejects values the layout or geometry cannot work with.
    pub fn validate(&self) -> ApplicationResult<()> {
        let non_negative = [
            ("layout.skip_length", self.layout.skip_length),
            ("view.inner_radius_weight", self.view.inner_radius_weight),
            ("view.layer_height", self.view.layer_height),
            ("view.icon_scale", self.view.icon_scale),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ApplicationError::Config {
                    message: format!("{} must be a non-negative number, got {}", key, value),
                });
            }
        }
        Ok(())
    }

    /// Engine configuration derived from the layout section.
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            skip_length: self.layout.skip_length,
            domain: self.layout.domain,
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# sunburst configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/sunburst/sunburst.toml
#   Local:  file passed with --config
#   Env:    SUNBURST_<SECTION>__<KEY>, e.g. SUNBURST_LAYOUT__SKIP_LENGTH=2

[layout]
# Gap between adjacent non-zero siblings (degrees or percent)
# skip_length = 1.0

# Allocation axis: "radial" (360 degrees) or "percentage" (100 percent)
# domain = "radial"

[view]
# Animate weight changes instead of jumping to the new layout
# animate = true

# Radius of the center hole, in layer heights
# inner_radius_weight = 2.0

# Ring thickness in pixels
# layer_height = 50.0

# Icon edge length, in layer heights
# icon_scale = 0.75
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_converted_then_layout_config_matches_engine_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.layout_config(), LayoutConfig::default());
        assert!(settings.view.animate);
        assert_eq!(settings.view.inner_radius_weight, 2.0);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_specified_values_change() {
        let overlay = RawSettings {
            layout: RawLayoutSettings {
                skip_length: Some(3.0),
                domain: None,
            },
            view: RawViewSettings {
                animate: Some(false),
                ..Default::default()
            },
        };

        let merged = Settings::default().merge_with(&overlay);

        assert_eq!(merged.layout.skip_length, 3.0);
        assert_eq!(merged.layout.domain, LayoutDomain::Radial);
        assert!(!merged.view.animate);
        assert_eq!(merged.view.layer_height, 50.0);
    }

    #[test]
    fn given_negative_skip_length_when_validating_then_fails() {
        let mut settings = Settings::default();
        settings.layout.skip_length = -1.0;
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("parse template");
        assert_eq!(Settings::default().merge_with(&raw), Settings::default());
    }
}
