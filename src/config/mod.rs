// src/config/mod.rs

//! Configuration for the demo driver.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and merge CLI overrides (`loader.rs`).
//! - Validate the merged settings (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_from_path, resolve};
pub use model::{DriverConfig, Mode, RawDriverConfig};
pub use validate::validate_config;
