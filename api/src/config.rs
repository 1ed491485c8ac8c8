use hearth_shared::config::{AppConfig, Environment};

/// Loads `.env` files and reads the application configuration.
///
/// The environment-specific file (`.env.production`, ...) is read first so its
/// values win over the generic `.env`; variables already set in the process
/// win over both.
pub fn load() -> AppConfig {
    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();
    dotenvy::dotenv().ok();

    AppConfig::from_env()
}
