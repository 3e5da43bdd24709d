pub mod config;
pub mod error;

pub use config::{AppConfig, DEFAULT_SYSTEM_MESSAGE};
pub use error::{Error, Result};
