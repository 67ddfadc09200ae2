/// Engine configuration
///
/// # 环境变量
///
/// All settings can be overridden through environment variables:
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/campus/booking | Working directory (database, logs) |
/// | LOG_LEVEL | info | Tracing filter level |
/// | LOG_DIR | (stdout only) | Directory for daily-rolling log files |
/// | ENVIRONMENT | development | development \| staging \| production |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the reservation database
    pub work_dir: String,
    /// Tracing level: trace | debug | info | warn | error
    pub log_level: String,
    /// Optional log file directory (stdout when unset)
    pub log_dir: Option<String>,
    /// Running environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR")
                .unwrap_or_else(|_| "/var/lib/campus/booking".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the working directory (test scenarios)
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// Path of the reservation database file inside the working directory
    pub fn db_path(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.work_dir).join("reservations.redb")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ReservationStore;
    use shared::models::ReservationFilter;

    #[test]
    fn overrides_point_the_store_at_the_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().to_str().unwrap());
        assert_eq!(config.db_path(), dir.path().join("reservations.redb"));

        let store = crate::open_store(&config).unwrap();
        let empty = store
            .list(&ReservationFilter {
                room_id: None,
                owner_id: None,
                from: None,
                to: None,
                status: None,
            })
            .unwrap();
        assert!(empty.is_empty());
        assert!(config.db_path().exists());
    }

    #[test]
    fn missing_work_dir_is_created_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("bookings").join("data");
        let config = Config::with_overrides(nested.to_str().unwrap());
        crate::open_store(&config).unwrap();
        assert!(nested.exists());
    }
}
