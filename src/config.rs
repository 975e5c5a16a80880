//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treejack/treejack.toml`
//! 3. Local config: `./.treejack.toml` or an explicit `--config` file
//! 4. Environment variables: `TREEJACK_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DEFAULT_MAX_DEPTH;

/// Local config file name, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".treejack.toml";

/// Rendering preferences for terminal output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Colorize the active path (NO_COLOR still wins)
    pub color: bool,
    /// Print layout parameters below the tree
    pub show_layout: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_layout: true,
        }
    }
}

/// Raw render config for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub color: Option<bool>,
    pub show_layout: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub examples_dir: Option<PathBuf>,
    pub max_depth: Option<usize>,
    pub export_file: Option<PathBuf>,
    pub render: RawRenderConfig,
}

/// Unified configuration for treejack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory of additional example trees (`*.json`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples_dir: Option<PathBuf>,
    /// Depth guard for every tree walk
    pub max_depth: usize,
    /// Default target of `treejack export`
    pub export_file: PathBuf,
    pub render: RenderConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            examples_dir: None,
            max_depth: DEFAULT_MAX_DEPTH,
            export_file: PathBuf::from("path-results.json"),
            render: RenderConfig::default(),
        }
    }
}

/// Get the XDG config directory for treejack.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treejack").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treejack.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input alone on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.examples_dir {
            self.examples_dir = Some(PathBuf::from(expand_env_vars(&dir.to_string_lossy())));
        }
        self.export_file = PathBuf::from(expand_env_vars(&self.export_file.to_string_lossy()));
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            examples_dir: overlay
                .examples_dir
                .clone()
                .or_else(|| self.examples_dir.clone()),
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
            export_file: overlay
                .export_file
                .clone()
                .unwrap_or_else(|| self.export_file.clone()),
            render: RenderConfig {
                color: overlay.render.color.unwrap_or(self.render.color),
                show_layout: overlay.render.show_layout.unwrap_or(self.render.show_layout),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit local config file; when `None`, `./.treejack.toml`
    ///   is used if it exists. An explicit file must exist.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/treejack/treejack.toml`
    /// 3. Local config
    /// 4. Environment variables: `TREEJACK_*` prefix
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), local)
    }

    /// Like [`Settings::load`] with an explicit global config location.
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        match local {
            Some(path) => {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
            None => {
                let path = Path::new(LOCAL_CONFIG_FILE);
                if path.exists() {
                    let raw = load_raw_settings(path)?;
                    current = current.merge_with(&raw);
                }
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        if current.max_depth == 0 {
            return Err(ApplicationError::Config {
                message: "max_depth must be at least 1".to_string(),
            });
        }

        current.expand_paths();
        Ok(current)
    }

    /// Apply TREEJACK_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREEJACK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("examples_dir") {
            settings.examples_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("export_file") {
            settings.export_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("max_depth") {
            settings.max_depth = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("TREEJACK_MAX_DEPTH: {e}"),
            })?;
        }
        if let Ok(val) = config.get_bool("render.color") {
            settings.render.color = val;
        }
        if let Ok(val) = config.get_bool("render.show_layout") {
            settings.render.show_layout = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treejack configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treejack/treejack.toml
#   Local:  ./.treejack.toml (or --config <file>)
#   Env:    TREEJACK_* environment variables, e.g. TREEJACK_MAX_DEPTH=64,
#           TREEJACK_RENDER__COLOR=false

# Directory with additional example trees (*.json, name = file stem)
# examples_dir = "~/decision-trees"

# Depth guard for every tree walk
# max_depth = 128

# Default target of `treejack export`
# export_file = "path-results.json"

[render]
# Highlight the active path in color
# color = true

# Print layout parameters below the rendered tree
# show_layout = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
