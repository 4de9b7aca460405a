//! PostgreSQL record store adapter.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use payments_types::{NewPayment, Payment, PaymentStore, StoreError};

use crate::StoreConfig;
use crate::router::{ReadPolicy, ReplicaRouter};
use crate::types::PgPaymentRow;

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Store
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL store with one primary pool and optional replica pools.
pub struct PostgresStore {
    router: ReplicaRouter<PgPool>,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_payments_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresStore {
    /// Connects the primary, migrates it, and lazily connects the replicas.
    ///
    /// Replicas are expected to receive the schema through replication, so
    /// migrations only run on the primary. A replica that cannot be reached
    /// fails only the reads routed to it.
    pub async fn connect(config: &StoreConfig) -> anyhow::Result<Self> {
        let primary = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.primary_url)
            .await?;
        run_migrations(&primary).await?;

        let replicas = config
            .replica_urls
            .iter()
            .map(|url| {
                PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect_lazy(url)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(replicas = replicas.len(), "postgres store ready");

        Ok(Self::from_router(
            ReplicaRouter::new(primary).with_replicas(replicas),
        ))
    }

    /// Wraps already-built pools.
    pub fn from_router(router: ReplicaRouter<PgPool>) -> Self {
        Self { router }
    }

    /// Replaces the replica read policy.
    pub fn with_policy(self, policy: impl ReadPolicy) -> Self {
        Self {
            router: self.router.with_policy(policy),
        }
    }

    /// Returns the router holding the pools.
    pub fn router(&self) -> &ReplicaRouter<PgPool> {
        &self.router
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentStore for PostgresStore {
    #[tracing::instrument(skip(self, payment))]
    async fn create(&self, payment: NewPayment) -> Result<Payment, StoreError> {
        let payment = payment.into_payment(Utc::now())?;

        sqlx::query(
            r#"INSERT INTO payments (id, value, merchant_id, region, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(payment.id.into_uuid())
        .bind(payment.value)
        .bind(payment.merchant_id.into_uuid())
        .bind(&payment.region)
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(self.router.writer())
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(payment)
    }

    #[tracing::instrument(skip(self))]
    async fn list_recent(&self, limit: u32) -> Result<Vec<Payment>, StoreError> {
        let rows: Vec<PgPaymentRow> = sqlx::query_as(
            r#"SELECT id, value, merchant_id, region, created_at, updated_at
               FROM payments ORDER BY created_at DESC LIMIT $1"#,
        )
        .bind(i64::from(limit))
        .fetch_all(self.router.reader())
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        rows.into_iter().map(PgPaymentRow::into_domain).collect()
    }
}
