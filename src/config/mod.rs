/// Database configuration and connection management
pub mod database;

/// Server and invoice settings loading from config.toml
pub mod settings;
