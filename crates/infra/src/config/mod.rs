//! Configuration loading and management
//!
//! This module provides utilities for loading application configuration
//! from environment variables and files.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    apply_env_overrides, default_storage_path, load, load_from_file, probe_config_paths,
};
