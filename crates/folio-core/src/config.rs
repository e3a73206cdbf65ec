//! Site configuration loading and validation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::boundary::Fallback;
use crate::capability::NARROW_VIEWPORT_MAX_WIDTH;
use crate::model::{resolve_asset_path, MODEL_RELATIVE_PATH};

/// Configuration shipped inside the binary
const EMBEDDED_SITE_TOML: &str = include_str!("../data/site.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse site configuration: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Breakpoint must be a positive width, got {0}")]
    InvalidBreakpoint(f64),
    #[error("Model path is empty")]
    EmptyModelPath,
    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub deploy: DeployConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Path the site is served under (e.g. "/" or "/portfolio/")
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
        }
    }
}

fn default_base_path() -> String {
    "/".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Viewport width at or below which the device counts as narrow
    #[serde(default = "default_breakpoint")]
    pub breakpoint_px: f64,
    /// Model path relative to the base path
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// CSS selector of the canvas the scene renders into
    #[serde(default = "default_canvas")]
    pub canvas: String,
    /// What replaces the scene after a failure
    #[serde(default)]
    pub fallback: Fallback,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: default_breakpoint(),
            model_path: default_model_path(),
            canvas: default_canvas(),
            fallback: Fallback::default(),
        }
    }
}

fn default_breakpoint() -> f64 {
    NARROW_VIEWPORT_MAX_WIDTH
}

fn default_model_path() -> String {
    MODEL_RELATIVE_PATH.to_string()
}

fn default_canvas() -> String {
    "#folio-canvas".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Maximum tracing level routed to the browser console
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

impl SiteConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The configuration compiled into the binary, with an optional base path override
    pub fn embedded(base_path_override: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self::from_toml_str(EMBEDDED_SITE_TOML)?.with_base_path(base_path_override))
    }

    /// Load from disk; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config = Self::from_toml_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            info!(path = %path.display(), "Loaded site configuration");
            Ok(config)
        } else {
            info!(
                path = %path.display(),
                "Site configuration not found, using defaults"
            );
            Ok(Self::default())
        }
    }

    pub fn with_base_path(mut self, base_path: Option<&str>) -> Self {
        if let Some(base) = base_path.filter(|b| !b.trim().is_empty()) {
            self.deploy.base_path = base.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let breakpoint = self.scene.breakpoint_px;
        if !breakpoint.is_finite() || breakpoint <= 0.0 {
            return Err(ConfigError::InvalidBreakpoint(breakpoint));
        }
        if self.scene.model_path.trim().is_empty() {
            return Err(ConfigError::EmptyModelPath);
        }
        self.logging
            .level
            .parse::<tracing::Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(self.logging.level.clone()))?;
        Ok(())
    }

    /// Base-path-joined model location
    pub fn model_asset_path(&self) -> String {
        resolve_asset_path(&self.deploy.base_path, &self.scene.model_path)
    }

    pub fn log_level(&self) -> tracing::Level {
        self.logging.level.parse().unwrap_or(tracing::Level::WARN)
    }
}
