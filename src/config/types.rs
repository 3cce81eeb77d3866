//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_EXTENSIONS;
use crate::rotation::DEFAULT_DRAG_SENSITIVITY;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Image cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Prefetch reach and retention radius, in images
    #[serde(default = "default_group_size")]
    pub group_size: usize,
}

pub fn default_group_size() -> usize {
    30
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            group_size: default_group_size(),
        }
    }
}

/// Rotation input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Degrees per pixel of pointer drag
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    /// Pixels of simulated drag per fine-rotation key press
    #[serde(default = "default_step_pixels")]
    pub step_pixels: f64,
}

pub fn default_sensitivity() -> f64 {
    DEFAULT_DRAG_SENSITIVITY
}

pub fn default_step_pixels() -> f64 {
    5.0
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            step_pixels: default_step_pixels(),
        }
    }
}

/// Directory scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// File extensions (without dot, case-insensitive) treated as images
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

/// Annotation export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Destination used by the viewer's export key
    #[serde(default = "default_export_file")]
    pub file: String,
}

pub fn default_export_file() -> String {
    "annotations.csv".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file: default_export_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "imgrot=debug"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path (the terminal is owned by the viewer)
    #[serde(default = "default_log_file")]
    pub file: String,
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_file() -> String {
    "~/.config/imgrot/imgrot.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl Config {
    /// Check value ranges. Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.cache.group_size < 2 {
            return Err(format!(
                "cache.group_size must be at least 2 (got {})",
                self.cache.group_size
            ));
        }
        if !self.rotation.sensitivity.is_finite() || self.rotation.sensitivity <= 0.0 {
            return Err(format!(
                "rotation.sensitivity must be a positive number (got {})",
                self.rotation.sensitivity
            ));
        }
        if !self.rotation.step_pixels.is_finite() || self.rotation.step_pixels <= 0.0 {
            return Err(format!(
                "rotation.step_pixels must be a positive number (got {})",
                self.rotation.step_pixels
            ));
        }
        if self.catalog.extensions.iter().all(|ext| ext.trim().is_empty()) {
            return Err("catalog.extensions must list at least one extension".to_string());
        }
        Ok(())
    }
}
