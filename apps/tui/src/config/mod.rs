use color_eyre::eyre::eyre;
use dotenv::dotenv;
use parkmap_core::Settings;
use std::env;
use std::path::{Path, PathBuf};

/// Everything the terminal app reads from `.env` and the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub settings: Settings,
    pub database_url: String,
    pub log_path: PathBuf,
    pub debug: bool,
}

/// Initializes the application configuration. CLI flags have already been
/// folded into the environment by the time this runs.
pub fn init_app_config() -> color_eyre::eyre::Result<AppConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    let base_dir: PathBuf = env::current_dir()?;

    let db_name = env::var("DATABASE_NAME").unwrap_or_else(|_| "parkmap.db".to_string());
    let database_path = base_dir.join(&db_name);

    if let Some(parent) = database_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let log_path = env::var("PARKMAP_LOG").map_or_else(|_| base_dir.join("parkmap.log"), PathBuf::from);

    Ok(AppConfig {
        settings: Settings::from_lookup(|key| env::var(key).ok()),
        database_url: database_url_for(&database_path)?,
        log_path,
        debug: debug_enabled(env::var("DEBUG").ok().as_deref()),
    })
}

/// SQLx wants `sqlite:///abs/path.db` for absolute paths and
/// `sqlite://rel/path.db` for relative ones.
pub fn database_url_for(path: &Path) -> color_eyre::eyre::Result<String> {
    let path_str = path.to_str().ok_or_else(|| eyre!("Invalid database path"))?;
    let clean_path = path_str.trim_start_matches('/');

    if path.is_absolute() {
        Ok(format!("sqlite:///{clean_path}"))
    } else {
        Ok(format!("sqlite://{clean_path}"))
    }
}

fn debug_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|value| !matches!(value.trim(), "" | "0" | "false"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_url_slashes() {
        assert_eq!(
            database_url_for(Path::new("/var/lib/parkmap/parkmap.db")).unwrap(),
            "sqlite:///var/lib/parkmap/parkmap.db"
        );
        assert_eq!(
            database_url_for(Path::new("data/parkmap.db")).unwrap(),
            "sqlite://data/parkmap.db"
        );
    }

    #[test]
    fn debug_flag_values() {
        assert!(debug_enabled(Some("1")));
        assert!(debug_enabled(Some("yes")));
        assert!(!debug_enabled(Some("0")));
        assert!(!debug_enabled(Some("")));
        assert!(!debug_enabled(None));
    }
}
