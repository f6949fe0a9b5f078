//! Core migration types

use crate::connection::Dialect;
use chrono::{DateTime, Utc};

/// SQL text per dialect
#[derive(Debug, Clone, Copy)]
pub struct DialectSql {
    pub postgres: &'static str,
    pub sqlite: &'static str,
}

impl DialectSql {
    /// Same statements for every dialect
    pub const fn portable(sql: &'static str) -> Self {
        Self {
            postgres: sql,
            sqlite: sql,
        }
    }

    pub fn for_dialect(&self, dialect: Dialect) -> &'static str {
        match dialect {
            Dialect::Postgres => self.postgres,
            Dialect::Sqlite => self.sqlite,
        }
    }
}

/// One versioned schema change
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Sortable identifier, typically a timestamp
    pub id: &'static str,
    pub name: &'static str,
    pub up: DialectSql,
    pub down: DialectSql,
}

impl Migration {
    pub fn up_sql(&self, dialect: Dialect) -> &'static str {
        self.up.for_dialect(dialect)
    }

    pub fn down_sql(&self, dialect: Dialect) -> &'static str {
        self.down.for_dialect(dialect)
    }
}

/// Row of the tracking table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    pub id: String,
    pub name: String,
    pub applied_at: DateTime<Utc>,
    pub batch: i64,
}

/// Migration state for `status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationStatus {
    Pending,
    Applied {
        applied_at: DateTime<Utc>,
        batch: i64,
    },
}

impl MigrationStatus {
    pub fn is_applied(&self) -> bool {
        matches!(self, MigrationStatus::Applied { .. })
    }
}

/// Result of running migrations
#[derive(Debug)]
pub struct MigrationRunResult {
    pub applied_migrations: Vec<String>,
    /// Migrations already present before this run
    pub skipped_count: usize,
    pub batch: Option<i64>,
    pub execution_time_ms: u128,
}

impl MigrationRunResult {
    pub fn applied_count(&self) -> usize {
        self.applied_migrations.len()
    }
}

/// Result of rolling back migrations
#[derive(Debug)]
pub struct RollbackResult {
    pub rolled_back_migrations: Vec<String>,
    pub batch: Option<i64>,
    pub execution_time_ms: u128,
}

impl RollbackResult {
    pub fn rolled_back_count(&self) -> usize {
        self.rolled_back_migrations.len()
    }
}

/// Split a script into statements on `;`. Migration scripts never contain
/// semicolons inside literals.
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|statement| {
            statement
                .lines()
                .filter(|line| !line.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}
