use crate::bootstrap::connect_database;
use docsearch_core::AppConfig;
use docsearch_store::{MigrationRunner, MigrationStatus};

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let db = connect_database(config).await?;
    let result = MigrationRunner::new(&db).run().await?;

    match result.batch {
        Some(batch) => {
            println!(
                "Applied {} migration(s) in batch {} ({}ms):",
                result.applied_count(),
                batch,
                result.execution_time_ms
            );
            for id in &result.applied_migrations {
                println!("  {}", id);
            }
        }
        None => println!("Nothing to migrate"),
    }

    db.close().await;
    Ok(())
}

pub async fn rollback(config: &AppConfig) -> anyhow::Result<()> {
    let db = connect_database(config).await?;
    let result = MigrationRunner::new(&db).rollback().await?;

    match result.batch {
        Some(batch) => {
            println!(
                "Rolled back {} migration(s) from batch {}:",
                result.rolled_back_count(),
                batch
            );
            for id in &result.rolled_back_migrations {
                println!("  {}", id);
            }
        }
        None => println!("Nothing to roll back"),
    }

    db.close().await;
    Ok(())
}

pub async fn status(config: &AppConfig) -> anyhow::Result<()> {
    let db = connect_database(config).await?;
    let statuses = MigrationRunner::new(&db).status().await?;

    println!("{:<16} {:<40} {}", "ID", "NAME", "STATUS");
    for (migration, status) in statuses {
        let state = match status {
            MigrationStatus::Applied { applied_at, batch } => {
                format!("applied {} (batch {})", applied_at.format("%Y-%m-%d %H:%M:%S"), batch)
            }
            MigrationStatus::Pending => "pending".to_string(),
        };
        println!("{:<16} {:<40} {}", migration.id, migration.name, state);
    }

    db.close().await;
    Ok(())
}
