//! Configuration module for kgi-trader
//!
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::TraderPaths;
pub use settings::Settings;
