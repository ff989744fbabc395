//! Configuration for talking to the remote source hosting service.

pub mod config;
pub mod error;

pub use config::RemoteConfig;
pub use error::{ConfigError, Result};
