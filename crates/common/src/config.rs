//! Application configuration.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Dashboard aggregation settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Enquiry listing settings.
    #[serde(default)]
    pub leads: LeadsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// `host:port` string for the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Dashboard aggregation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// How many agents the leaderboard shows.
    #[serde(default = "default_top_agents_limit")]
    pub top_agents_limit: u64,
    /// How many courses the popularity chart shows.
    #[serde(default = "default_popular_courses_limit")]
    pub popular_courses_limit: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_agents_limit: default_top_agents_limit(),
            popular_courses_limit: default_popular_courses_limit(),
        }
    }
}

/// Enquiry listing settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadsConfig {
    /// Page size used when the client does not send one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound for client supplied page sizes.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for LeadsConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_top_agents_limit() -> u64 {
    5
}

const fn default_popular_courses_limit() -> u64 {
    6
}

const fn default_page_size() -> u64 {
    10
}

const fn default_max_page_size() -> u64 {
    100
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `INSTITUTE_ENV`)
    /// 4. Environment variables with `INSTITUTE__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("INSTITUTE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("INSTITUTE")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let raw = r#"
            [server]
            port = 8080

            [database]
            url = "postgres://localhost/institute"
        "#;
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.dashboard.top_agents_limit, 5);
        assert_eq!(config.dashboard.popular_courses_limit, 6);
        assert_eq!(config.leads.default_page_size, 10);
        assert_eq!(config.leads.max_page_size, 100);
    }
}
