mod auth_config;
mod database;
mod logging;

pub use auth_config::{AuthConfig, ConfigError};
pub use database::{init_database, run_migrations};
pub use logging::init_logging;
