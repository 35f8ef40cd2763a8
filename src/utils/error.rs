use thiserror::Error;

use crate::config::ConfigError;
use crate::render::shaders::ShaderError;

/// Every way startup or presentation can fail. All of them end the process with status -1.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to create window: {0}")]
    WindowCreation(String),
    #[error("Failed to load OpenGL entry points: {0}")]
    ApiBinding(String),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to present frame: {0}")]
    Present(#[from] glutin::error::Error),
}

impl AppError {
    pub const EXIT_CODE: i32 = -1;
}

pub type Result<T> = std::result::Result<T, AppError>;
