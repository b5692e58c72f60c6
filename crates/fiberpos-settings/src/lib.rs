//! FiberPos Settings Crate
//!
//! Handles the configuration of positioner mechanics, error margins and the
//! array layout, stored as TOML or JSON.

pub mod config;
pub mod error;

pub use config::{Config, LayoutSettings, PositionerSettings, ToleranceSettings};
pub use error::{SettingsError, SettingsResult};
