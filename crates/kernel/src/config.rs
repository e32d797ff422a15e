use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skyline_common::ConfigError;
use skyline_layout::LayoutConfig;
use skyline_stream::{StreamConfig, StreamError};

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported scene file extension: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("world `{world}`: {source}")]
    Config {
        world: String,
        #[source]
        source: ConfigError,
    },
    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// One world in a scene description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub name: String,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

impl WorldConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layout: LayoutConfig::default(),
            stream: StreamConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        let wrap = |source| SceneError::Config {
            world: self.name.clone(),
            source,
        };
        self.layout.validate().map_err(wrap)?;
        self.stream.validate().map_err(wrap)?;
        Ok(())
    }
}

/// A scene file: a master seed and the worlds to spawn, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub seed: u64,
    pub worlds: Vec<WorldConfig>,
}

impl SceneConfig {
    /// Load from `.yaml`/`.yml` or `.json`, chosen by extension.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let config: Self = match ext.as_deref() {
            Some("yaml" | "yml") => serde_yaml::from_reader(std::fs::File::open(path)?)?,
            Some("json") => serde_json::from_reader(std::fs::File::open(path)?)?,
            _ => return Err(SceneError::UnsupportedFormat(path.to_path_buf())),
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), worlds = config.worlds.len(), "scene loaded");
        Ok(config)
    }

    /// Write as YAML or JSON, chosen by extension.
    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => serde_yaml::to_writer(std::fs::File::create(path)?, self)?,
            Some("json") => serde_json::to_writer_pretty(std::fs::File::create(path)?, self)?,
            _ => return Err(SceneError::UnsupportedFormat(path.to_path_buf())),
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        self.worlds.iter().try_for_each(WorldConfig::validate)
    }
}
