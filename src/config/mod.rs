/// Database configuration and connection management
pub mod database;

/// Reference-data seeding from config.toml
pub mod seed;
