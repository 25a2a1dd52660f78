//! Configuration system
//!
//! Each tree carries its own [`GridConfig`]; there are no process-wide
//! tunables, so independently built trees never affect each other.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Check loaded values before they are used
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        let config: Self = if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is out of range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Tuning for one grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Elements a leaf may hold before it subdivides
    pub max_elements_per_node: usize,

    /// Smallest half-width/half-height that may still subdivide
    pub min_node_size: f64,

    /// Maximum subdivision depth
    pub max_depth: u32,
}

impl GridConfig {
    /// Children per internal node, one per quadrant
    pub const MAX_CHILDREN: usize = 4;

    /// Parse a config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            max_elements_per_node: 2,
            min_node_size: 1.0,
            max_depth: 16,
        }
    }
}

impl Config for GridConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_elements_per_node == 0 {
            return Err(ConfigError::Invalid {
                field: "max_elements_per_node",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.min_node_size.is_finite() || self.min_node_size < 0.0 {
            return Err(ConfigError::Invalid {
                field: "min_node_size",
                reason: format!("expected a finite, non-negative size, got {}", self.min_node_size),
            });
        }
        Ok(())
    }
}
