//! Configuration loading from environment.

use std::env;

use payments_repo::StoreConfig;
use url::Url;

const DEFAULT_PG_PORT: &str = "5432";

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub store: StoreConfig,
    /// Path segment of the API (`/payments/{region_code}/api/v1/`).
    pub region_code: String,
    /// Fail list/create requests without touching the database.
    pub force_failure: bool,
    /// Fixed region; skips the metadata server when set.
    pub region: Option<String>,
    pub metadata_url: Option<String>,
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = get("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()?;

        let pg = PgParts {
            port: get("POSTGRES_PORT").unwrap_or_else(|| DEFAULT_PG_PORT.to_string()),
            user: get("POSTGRES_USER"),
            password: lookup("POSTGRES_PASSWORD").unwrap_or_default(),
            database: get("POSTGRES_DB"),
        };

        let primary_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => {
                let host = get("POSTGRES_HOST").ok_or_else(|| {
                    anyhow::anyhow!("DATABASE_URL or POSTGRES_HOST environment variable is required")
                })?;
                pg.url(&host)?
            }
        };

        let mut replica_urls = Vec::new();
        for host in split_list(get("POSTGRES_REPLICA_IPS")) {
            replica_urls.push(pg.url(&host)?);
        }
        replica_urls.extend(split_list(get("DATABASE_REPLICA_URLS")));

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(n) => n.parse()?,
            None => 10,
        };

        let region_code = get("COUNTRY_CODE").unwrap_or_else(|| "id".to_string());
        if !region_code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            anyhow::bail!("COUNTRY_CODE must be a single path segment, got {:?}", region_code);
        }

        Ok(Self {
            port,
            store: StoreConfig::new(primary_url)
                .with_replicas(replica_urls)
                .with_max_connections(max_connections),
            region_code,
            force_failure: lookup("FAIL").as_deref() == Some("true"),
            region: get("REGION"),
            metadata_url: get("METADATA_URL"),
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

/// Credentials and database shared by the primary and every replica host.
struct PgParts {
    port: String,
    user: Option<String>,
    password: String,
    database: Option<String>,
}

impl PgParts {
    fn url(&self, host: &str) -> anyhow::Result<String> {
        let user = self
            .user
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("POSTGRES_USER environment variable is required"))?;
        let database = self
            .database
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("POSTGRES_DB environment variable is required"))?;

        // Credentials and database name are percent-encoded by `Url`.
        let mut url = Url::parse(&format!("postgres://{}:{}", host, self.port))?;
        let invalid = || anyhow::anyhow!("invalid postgres host {:?}", host);
        url.set_username(user).map_err(|_| invalid())?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password)).map_err(|_| invalid())?;
        }
        url.path_segments_mut().map_err(|_| invalid())?.push(database);
        url.set_query(Some("sslmode=disable"));

        Ok(url.into())
    }
}

/// Comma-separated list; blank entries are skipped.
fn split_list(value: Option<String>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
