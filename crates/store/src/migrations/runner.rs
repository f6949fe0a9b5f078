//! Migration runner - applies and reverts the embedded schema history

use super::definitions::{
    split_sql_statements, Migration, MigrationRecord, MigrationRunResult, MigrationStatus,
    RollbackResult,
};
use super::schema::MIGRATIONS;
use crate::connection::Database;
use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::collections::HashMap;
use std::time::Instant;
use tracing::info;

/// Name of the tracking table
pub const MIGRATIONS_TABLE: &str = "docsearch_migrations";

/// Migration runner bound to one database
pub struct MigrationRunner<'a> {
    db: &'a Database,
    migrations: &'a [Migration],
}

impl<'a> MigrationRunner<'a> {
    /// Runner over the embedded schema history
    pub fn new(db: &'a Database) -> Self {
        Self::with_migrations(db, MIGRATIONS)
    }

    pub fn with_migrations(db: &'a Database, migrations: &'a [Migration]) -> Self {
        Self { db, migrations }
    }

    /// Apply every pending migration as one new batch
    pub async fn run(&self) -> StoreResult<MigrationRunResult> {
        let start_time = Instant::now();
        self.ensure_migrations_table().await?;

        let applied = self.applied_records().await?;
        let pending: Vec<&Migration> = self
            .migrations
            .iter()
            .filter(|m| !applied.contains_key(m.id))
            .collect();

        if pending.is_empty() {
            return Ok(MigrationRunResult {
                applied_migrations: Vec::new(),
                skipped_count: applied.len(),
                batch: None,
                execution_time_ms: start_time.elapsed().as_millis(),
            });
        }

        let batch = self.latest_batch().await? + 1;
        let mut applied_ids = Vec::with_capacity(pending.len());

        for migration in pending {
            info!("Applying migration: {} - {}", migration.id, migration.name);
            self.apply(migration, batch).await?;
            applied_ids.push(migration.id.to_string());
        }

        Ok(MigrationRunResult {
            applied_migrations: applied_ids,
            skipped_count: applied.len(),
            batch: Some(batch),
            execution_time_ms: start_time.elapsed().as_millis(),
        })
    }

    /// Revert the most recent batch, newest migration first
    pub async fn rollback(&self) -> StoreResult<RollbackResult> {
        let start_time = Instant::now();
        self.ensure_migrations_table().await?;

        let batch = self.latest_batch().await?;
        if batch == 0 {
            return Ok(RollbackResult {
                rolled_back_migrations: Vec::new(),
                batch: None,
                execution_time_ms: start_time.elapsed().as_millis(),
            });
        }

        let applied = self.applied_records().await?;
        let mut to_revert: Vec<&Migration> = self
            .migrations
            .iter()
            .filter(|m| applied.get(m.id).map_or(false, |r| r.batch == batch))
            .collect();
        to_revert.sort_by(|a, b| b.id.cmp(a.id));

        let mut reverted = Vec::with_capacity(to_revert.len());
        for migration in to_revert {
            info!("Rolling back migration: {} - {}", migration.id, migration.name);
            self.revert(migration).await?;
            reverted.push(migration.id.to_string());
        }

        Ok(RollbackResult {
            rolled_back_migrations: reverted,
            batch: Some(batch),
            execution_time_ms: start_time.elapsed().as_millis(),
        })
    }

    /// State of every known migration, oldest first
    pub async fn status(&self) -> StoreResult<Vec<(Migration, MigrationStatus)>> {
        self.ensure_migrations_table().await?;
        let applied = self.applied_records().await?;

        Ok(self
            .migrations
            .iter()
            .map(|migration| {
                let status = match applied.get(migration.id) {
                    Some(record) => MigrationStatus::Applied {
                        applied_at: record.applied_at,
                        batch: record.batch,
                    },
                    None => MigrationStatus::Pending,
                };
                (*migration, status)
            })
            .collect())
    }

    async fn apply(&self, migration: &Migration, batch: i64) -> StoreResult<()> {
        let dialect = self.db.dialect();
        let mut tx = self.db.pool().begin().await?;

        for statement in split_sql_statements(migration.up_sql(dialect)) {
            sqlx::query(&statement).execute(&mut *tx).await.map_err(|e| {
                StoreError::Migration(format!(
                    "Failed to execute migration {}: {}",
                    migration.id, e
                ))
            })?;
        }

        sqlx::query(&format!(
            "INSERT INTO {} (id, name, applied_at, batch) VALUES ($1, $2, $3, $4)",
            MIGRATIONS_TABLE
        ))
        .bind(migration.id.to_string())
        .bind(migration.name.to_string())
        .bind(Utc::now().to_rfc3339())
        .bind(batch)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Migration(format!("Failed to record migration: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Migration(format!("Failed to commit migration: {}", e)))?;
        Ok(())
    }

    async fn revert(&self, migration: &Migration) -> StoreResult<()> {
        let dialect = self.db.dialect();
        let mut tx = self.db.pool().begin().await?;

        for statement in split_sql_statements(migration.down_sql(dialect)) {
            sqlx::query(&statement).execute(&mut *tx).await.map_err(|e| {
                StoreError::Migration(format!(
                    "Failed to roll back migration {}: {}",
                    migration.id, e
                ))
            })?;
        }

        sqlx::query(&format!("DELETE FROM {} WHERE id = $1", MIGRATIONS_TABLE))
            .bind(migration.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Migration(format!("Failed to unrecord migration: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Migration(format!("Failed to commit rollback: {}", e)))?;
        Ok(())
    }

    async fn ensure_migrations_table(&self) -> StoreResult<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
                id TEXT PRIMARY KEY, \
                name TEXT NOT NULL, \
                applied_at TEXT NOT NULL, \
                batch BIGINT NOT NULL\
            )",
            MIGRATIONS_TABLE
        );
        sqlx::query(&sql).execute(self.db.pool()).await.map_err(|e| {
            StoreError::Migration(format!("Failed to create migrations table: {}", e))
        })?;
        Ok(())
    }

    async fn applied_records(&self) -> StoreResult<HashMap<String, MigrationRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT id, name, applied_at, batch FROM {}",
            MIGRATIONS_TABLE
        ))
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| StoreError::Migration(format!("Failed to query applied migrations: {}", e)))?;

        let mut records = HashMap::with_capacity(rows.len());
        for row in rows {
            let applied_at: String = row.try_get("applied_at")?;
            let applied_at = DateTime::parse_from_rfc3339(&applied_at)
                .map_err(|e| StoreError::Migration(format!("Invalid applied_at value: {}", e)))?
                .with_timezone(&Utc);

            let record = MigrationRecord {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                applied_at,
                batch: row.try_get("batch")?,
            };
            records.insert(record.id.clone(), record);
        }

        Ok(records)
    }

    async fn latest_batch(&self) -> StoreResult<i64> {
        let rows = sqlx::query(&format!("SELECT batch FROM {}", MIGRATIONS_TABLE))
            .fetch_all(self.db.pool())
            .await?;

        let mut latest = 0;
        for row in rows {
            latest = latest.max(row.try_get::<i64, _>("batch")?);
        }
        Ok(latest)
    }
}
