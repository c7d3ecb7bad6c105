use crop_types::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_VERSION: u64 = 1;
pub const DEFAULT_CLASS_NAME: &str = "ResizableCrop";

/// Default edge length of the square a handle responds to, in host units.
pub const DEFAULT_HANDLE_HIT_SIZE: f32 = 24.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unsupported config version {0}")]
    UnsupportedVersion(u64),
}

/// When the resize notification produced by a viewport pan mid-drag reaches
/// the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReconcileDelivery {
    /// On the next idle turn of the host's event loop.
    #[default]
    Deferred,
    /// Synchronously, from inside the prop update.
    Immediate,
}

impl ReconcileDelivery {
    pub const ALL: &'static [Self] = &[Self::Deferred, Self::Immediate];
}

impl fmt::Display for ReconcileDelivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileDelivery::Deferred => write!(f, "Next idle turn"),
            ReconcileDelivery::Immediate => write!(f, "Immediately"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    pub version: u64,
    /// Base class of the crop element. Handles and bars derive theirs from it.
    pub class_name: String,
    pub speed: f32,
    pub viewport_offset: Vec2,
    pub handle_hit_size: f32,
    /// Whether the four full-length edge drag bars are rendered.
    pub drag_bars: bool,
    pub reconcile_delivery: ReconcileDelivery,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            class_name: DEFAULT_CLASS_NAME.to_string(),
            speed: 1.0,
            viewport_offset: Vec2::ZERO,
            handle_hit_size: DEFAULT_HANDLE_HIT_SIZE,
            drag_bars: true,
            reconcile_delivery: ReconcileDelivery::default(),
        }
    }
}

impl CropConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: CropConfig = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(config.version));
        }

        Ok(config.sanitized())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        tracing::debug!("Loaded crop config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Replaces values the drag controller cannot work with by their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !self.speed.is_finite() || self.speed <= 0.0 {
            tracing::warn!("Ignoring invalid speed {}, using {}", self.speed, defaults.speed);
            self.speed = defaults.speed;
        }

        if !self.handle_hit_size.is_finite() || self.handle_hit_size <= 0.0 {
            tracing::warn!(
                "Ignoring invalid handle hit size {}, using {}",
                self.handle_hit_size,
                defaults.handle_hit_size
            );
            self.handle_hit_size = defaults.handle_hit_size;
        }

        if !self.viewport_offset.x.is_finite() || !self.viewport_offset.y.is_finite() {
            self.viewport_offset = defaults.viewport_offset;
        }

        if self.class_name.trim().is_empty() {
            self.class_name = defaults.class_name;
        }

        self
    }
}
