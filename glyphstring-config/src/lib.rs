//! Configuration system for the glyphstring text layout cache.
//!
//! This crate provides configuration loading, saving, and default values
//! for the string renderer. It includes:
//!
//! - Default font family, styled variants and size
//! - The 32-entry text color palette (16 colors followed by 16 shadow colors)
//! - Layout cache tuning (retained string count, sweep interval)
//! - Underline / strikethrough placement

pub mod config;
pub mod defaults;
mod error;
mod types;

// Re-export main types for convenience
pub use config::Config;
pub use error::ConfigError;
pub use types::DecorationConfig;

/// Number of entries in a text palette: 16 colors followed by their 16 shadow variants.
pub const PALETTE_LEN: usize = 32;
