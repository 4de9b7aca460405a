//! SQLite record store adapter.
#![allow(clippy::collapsible_if)]

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use payments_types::{NewPayment, Payment, PaymentStore, StoreError};

use crate::StoreConfig;
use crate::router::{ReadPolicy, ReplicaRouter};
use crate::types::{SqlitePaymentRow, format_timestamp};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Store
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite store implementation.
///
/// Mostly used for local runs and tests; replica URLs point at other
/// database files and nothing copies rows between them.
pub struct SqliteStore {
    router: ReplicaRouter<SqlitePool>,
}

/// Creates the schema on `pool`.
pub async fn migrate(pool: &SqlitePool) -> Result<(), StoreError> {
    let ddl = include_str!("../migrations/0001_create_payments.sql");
    for statement in ddl.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| StoreError::Database(format!("Migration 0001 failed: {}", e)))?;
        }
    }
    Ok(())
}

async fn pool_options(
    database_url: &str,
    max_connections: u32,
) -> anyhow::Result<(SqlitePoolOptions, SqliteConnectOptions)> {
    // Ensure on-disk SQLite target directory exists (no-op for in-memory).
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        // Remove query parameters
        let path = path.split('?').next().unwrap_or(path);
        if path != ":memory:" {
            let p = std::path::Path::new(path);
            if let Some(parent) = p.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // Every connection to an in-memory database is a separate database, so
    // keep exactly one and never recycle it.
    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    Ok((pool, options))
}

impl SqliteStore {
    /// Opens the primary (with automatic migration) and the replicas.
    pub async fn connect(config: &StoreConfig) -> anyhow::Result<Self> {
        let (pool, options) = pool_options(&config.primary_url, config.max_connections).await?;
        let primary = pool.connect_with(options).await?;
        migrate(&primary).await?;

        let mut replicas = Vec::with_capacity(config.replica_urls.len());
        for url in &config.replica_urls {
            let (pool, options) = pool_options(url, config.max_connections).await?;
            replicas.push(pool.connect_lazy_with(options));
        }

        tracing::info!(replicas = replicas.len(), "sqlite store ready");

        Ok(Self::from_router(
            ReplicaRouter::new(primary).with_replicas(replicas),
        ))
    }

    /// Opens a single database with no replicas.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::connect(&StoreConfig::new(database_url)).await
    }

    /// Wraps already-built pools.
    pub fn from_router(router: ReplicaRouter<SqlitePool>) -> Self {
        Self { router }
    }

    /// Replaces the replica read policy.
    pub fn with_policy(self, policy: impl ReadPolicy) -> Self {
        Self {
            router: self.router.with_policy(policy),
        }
    }

    /// Returns the router holding the pools.
    pub fn router(&self) -> &ReplicaRouter<SqlitePool> {
        &self.router
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentStore for SqliteStore {
    #[tracing::instrument(skip(self, payment))]
    async fn create(&self, payment: NewPayment) -> Result<Payment, StoreError> {
        let payment = payment.into_payment(Utc::now())?;

        sqlx::query(
            r#"INSERT INTO payments (id, value, merchant_id, region, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(payment.id.to_string())
        .bind(payment.value)
        .bind(payment.merchant_id.to_string())
        .bind(&payment.region)
        .bind(format_timestamp(payment.created_at))
        .bind(format_timestamp(payment.updated_at))
        .execute(self.router.writer())
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(payment)
    }

    #[tracing::instrument(skip(self))]
    async fn list_recent(&self, limit: u32) -> Result<Vec<Payment>, StoreError> {
        let rows: Vec<SqlitePaymentRow> = sqlx::query_as(
            r#"SELECT id, value, merchant_id, region, created_at, updated_at
               FROM payments ORDER BY created_at DESC LIMIT ?"#,
        )
        .bind(i64::from(limit))
        .fetch_all(self.router.reader())
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter().map(SqlitePaymentRow::into_domain).collect()
    }
}
