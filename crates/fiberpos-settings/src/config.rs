//! Configuration and settings management for FiberPos
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats.
//!
//! Configuration is organized into logical sections:
//! - Positioner mechanics (link lengths, axis domains, motor steps)
//! - Error margins of positioners and exclusion areas
//! - Array layout (hexagonal grid, exclusion-area ring)

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

/// Mechanics shared by every positioner of the array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionerSettings {
    /// Distance P0-P1 in mm
    pub l01: f64,
    /// Distance P1-P3 in mm
    pub l13: f64,
    /// Orientation of the arm frame about its pivot in rad
    pub theta_o3o: f64,
    /// Axis-1 domain in rad
    pub theta_1_min: f64,
    pub theta_1_max: f64,
    /// Axis-2 domain in rad
    pub theta_2_min: f64,
    pub theta_2_max: f64,
    /// Steps per turn of the axis-1 motor
    pub sb1: f64,
    /// Steps per turn of the axis-2 motor
    pub sb2: f64,
    /// Snap axis 1 to whole steps
    pub quantify_1: bool,
    /// Snap axis 2 to whole steps
    pub quantify_2: bool,
    /// Half width of the arm outline in mm
    pub arm_half_width: f64,
    /// Radius of the fixed base outline in mm, zero for none
    pub base_radius: f64,
}

impl Default for PositionerSettings {
    fn default() -> Self {
        Self {
            l01: 1.443,
            l13: 1.443,
            theta_o3o: PI,
            theta_1_min: 0.0,
            theta_1_max: 2.0 * PI,
            theta_2_min: 0.0,
            theta_2_max: PI,
            sb1: 1728.0,
            sb2: 1728.0,
            quantify_1: true,
            quantify_2: true,
            arm_half_width: 0.35,
            base_radius: 0.0,
        }
    }
}

/// Orientation (rad) and position (mm) error margins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceSettings {
    pub positioner_eo: f64,
    pub positioner_ep: f64,
    pub exclusion_eo: f64,
    pub exclusion_ep: f64,
}

impl Default for ToleranceSettings {
    fn default() -> Self {
        Self {
            positioner_eo: 0.001,
            positioner_ep: 0.01,
            exclusion_eo: 0.001,
            exclusion_ep: 0.01,
        }
    }
}

/// Hexagonal array layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Distance between neighbouring positioners in mm
    pub pitch: f64,
    /// Rings of positioners around the central one
    pub rings: usize,
    /// Surround the array with a ring of exclusion areas
    pub exclusion_ring: bool,
    /// Radius of each exclusion area in mm
    pub exclusion_radius: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            pitch: 5.0,
            rings: 2,
            exclusion_ring: true,
            exclusion_radius: 2.0,
        }
    }
}

/// Complete instrument configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub positioner: PositionerSettings,
    pub tolerances: ToleranceSettings,
    pub layout: LayoutSettings,
}

fn positive(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, "must be > 0"))
    }
}

fn non_negative(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, "must be >= 0"))
    }
}

/// Axis domains must have positive width, as the kinematics layer requires.
fn ordered(key: &str, min: f64, max: f64) -> SettingsResult<()> {
    if min.is_finite() && max.is_finite() && min < max {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, "min must be below max"))
    }
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Option<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Some(Format::Json),
        Some("toml") => Some(Format::Toml),
        _ => None,
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the configuration file, when the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fiberpos").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path).ok_or_else(|| {
            SettingsError::LoadError("Config file must be .json or .toml".to_string())
        })?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = format_of(path).ok_or_else(|| {
            SettingsError::SaveError("Config file must be .json or .toml".to_string())
        })?;
        let content = match format {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let p = &self.positioner;
        positive("positioner.l01", p.l01)?;
        positive("positioner.l13", p.l13)?;
        if !p.theta_o3o.is_finite() {
            return Err(SettingsError::invalid("positioner.theta_o3o", "must be finite"));
        }
        ordered("positioner.theta_1", p.theta_1_min, p.theta_1_max)?;
        ordered("positioner.theta_2", p.theta_2_min, p.theta_2_max)?;
        positive("positioner.sb1", p.sb1)?;
        positive("positioner.sb2", p.sb2)?;
        positive("positioner.arm_half_width", p.arm_half_width)?;
        non_negative("positioner.base_radius", p.base_radius)?;

        let t = &self.tolerances;
        non_negative("tolerances.positioner_eo", t.positioner_eo)?;
        non_negative("tolerances.positioner_ep", t.positioner_ep)?;
        non_negative("tolerances.exclusion_eo", t.exclusion_eo)?;
        non_negative("tolerances.exclusion_ep", t.exclusion_ep)?;

        positive("layout.pitch", self.layout.pitch)?;
        if self.layout.exclusion_ring {
            positive("layout.exclusion_radius", self.layout.exclusion_radius)?;
        }
        Ok(())
    }
}
