// Configuration: TOML-backed layout limits and divider geometry.

pub mod types;

pub use types::{Config, ConfigError, DividerConfig, LayoutConfig};
