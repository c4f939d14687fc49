//! Configuration module for family-funds
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence
//! - The legacy accrual mode alias table

pub mod paths;
pub mod settings;

pub use paths::FundsPaths;
pub use settings::Settings;
