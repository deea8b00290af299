use serde::Deserialize;

use crate::infrastructure::storage::PostgresConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub tokens: TokenConfig,
    #[serde(default)]
    pub hashing: HashingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL, falls back to `DATABASE_URL` when empty
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Years until expiry for tokens issued without an explicit date
    pub default_expiry_years: u32,
}

/// Argon2 cost parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let pg = PostgresConfig::default();

        Self {
            url: String::new(),
            max_connections: pg.max_connections,
            min_connections: pg.min_connections,
            connect_timeout_secs: pg.connect_timeout_secs,
            idle_timeout_secs: pg.idle_timeout_secs,
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            default_expiry_years: 100,
        }
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl DatabaseConfig {
    pub fn to_postgres_config(&self) -> PostgresConfig {
        PostgresConfig::new(self.url.clone())
            .with_max_connections(self.max_connections)
            .with_min_connections(self.min_connections)
            .with_connect_timeout(self.connect_timeout_secs)
            .with_idle_timeout(self.idle_timeout_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_database_url_fallback(std::env::var("DATABASE_URL").ok());

        Ok(app_config)
    }

    fn apply_database_url_fallback(&mut self, database_url: Option<String>) {
        if self.database.url.is_empty() {
            if let Some(url) = database_url {
                self.database.url = url;
            }
        }
    }
}
