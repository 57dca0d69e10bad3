pub mod config;
pub mod error;

pub use config::CleanerConfig;
pub use error::{CleanError, Result};
