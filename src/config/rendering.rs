use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::shaders::{triangle_shaders, ShaderStage};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Window size must be non-zero, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("The {0} shader source is empty")]
    EmptyShader(ShaderStage),
    #[error("Failed to parse render config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize render config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Everything the window and the pipeline need at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub clear_color: [f32; 4],
    pub vsync: bool,
    pub gl_version: (u8, u8),
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Triangle".to_string(),
            vertex_shader: triangle_shaders::VERTEX_SRC.to_string(),
            fragment_shader: triangle_shaders::FRAGMENT_SRC.to_string(),
            clear_color: [0.2, 0.3, 0.3, 1.0],
            vsync: true,
            gl_version: (3, 3),
        }
    }
}

impl RenderConfig {
    /// Keys missing from `content` keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.vertex_shader.trim().is_empty() {
            return Err(ConfigError::EmptyShader(ShaderStage::Vertex));
        }
        if self.fragment_shader.trim().is_empty() {
            return Err(ConfigError::EmptyShader(ShaderStage::Fragment));
        }
        Ok(())
    }
}
