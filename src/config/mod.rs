pub mod rendering;

pub use rendering::{ConfigError, RenderConfig};
