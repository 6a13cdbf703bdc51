use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::db::DashboardDb;
use crate::error::ServiceError;
use crate::identity::IdentityProvider;
use crate::types::{Config, Principal};

/// Shared state for request handlers.
pub struct AppState {
    pub config: Config,
    pub db: Mutex<Option<DashboardDb>>,
    identity: Box<dyn IdentityProvider>,
}

impl AppState {
    /// Load `~/.agency-hub/config.json` and open the configured database.
    ///
    /// Neither failure is fatal: a missing config falls back to defaults and
    /// a database that cannot be opened leaves handlers reporting
    /// `DbUnavailable`.
    pub fn new(identity: Box<dyn IdentityProvider>) -> Self {
        let config = match load_config() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}. Using default configuration.");
                Config::default()
            }
        };

        let db_path = config.database_path.as_deref().map(Path::new);
        let db = match DashboardDb::open_configured(db_path) {
            Ok(db) => Some(db),
            Err(e) => {
                log::warn!("Failed to open database: {e}. Storage features disabled.");
                None
            }
        };

        Self {
            config,
            db: Mutex::new(db),
            identity,
        }
    }

    /// Build state around an already-open database.
    pub fn with_database(
        config: Config,
        db: DashboardDb,
        identity: Box<dyn IdentityProvider>,
    ) -> Self {
        Self {
            config,
            db: Mutex::new(Some(db)),
            identity,
        }
    }

    /// Who is signed in, according to the identity provider.
    pub fn principal(&self) -> Option<Principal> {
        self.identity.current_principal()
    }

    /// Run `f` against the open database.
    pub fn with_db<T>(
        &self,
        f: impl FnOnce(&DashboardDb) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let guard = self
            .db
            .lock()
            .map_err(|_| ServiceError::DbUnavailable("Lock poisoned".to_string()))?;
        let db = guard
            .as_ref()
            .ok_or_else(|| ServiceError::DbUnavailable("Database not initialized".to_string()))?;
        f(db)
    }
}

/// `~/.agency-hub/config.json`
pub fn config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".agency-hub").join("config.json"))
}

/// Load configuration from `~/.agency-hub/config.json`.
pub fn load_config() -> Result<Config, String> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        return Err(format!("Config file not found at {}", path.display()));
    }

    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;
    use crate::identity::FixedIdentity;
    use crate::types::DEFAULT_LOGO;

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "databasePath": "/tmp/hub.db", "defaultLogo": "/brand.svg" }"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.database_path.as_deref(), Some("/tmp/hub.db"));
        assert_eq!(config.default_logo(), "/brand.svg");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{}").unwrap();

        let config = load_config_from(&path).unwrap();
        assert!(config.database_path.is_none());
        assert_eq!(config.default_logo(), DEFAULT_LOGO);
    }

    #[test]
    fn test_missing_and_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_config_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(missing.contains("not found"));

        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(load_config_from(&path).unwrap_err().contains("parse"));
    }

    #[test]
    fn test_with_db_reports_unavailable_database() {
        let state = AppState {
            config: Config::default(),
            db: Mutex::new(None),
            identity: Box::new(FixedIdentity::anonymous()),
        };
        let err = state.with_db(|_| Ok(())).unwrap_err();
        assert!(matches!(err, ServiceError::DbUnavailable(_)));
        assert!(err.is_fault());
        assert!(state.principal().is_none());
    }

    #[test]
    fn test_with_db_runs_against_open_database() {
        let state = AppState::with_database(
            Config::default(),
            test_db(),
            Box::new(FixedIdentity::anonymous()),
        );
        let count = state
            .with_db(|db| Ok(db.get_users_for_agency("none")?.len()))
            .unwrap();
        assert_eq!(count, 0);
    }
}
