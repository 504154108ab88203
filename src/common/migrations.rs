// src/common/migrations.rs
//! Schema bootstrap run at startup

use sqlx::SqlitePool;
use tracing::{info, warn};

/// Create the tables the service needs if they are missing.
///
/// With `reset` set the tables are dropped first. Nothing here alters an
/// existing table; schema changes are applied by hand.
pub async fn run_migrations(pool: &SqlitePool, reset: bool) -> Result<(), sqlx::Error> {
    if reset {
        warn!("⚠️  RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("✅ Dropped old tables");
    }

    create_user_tables(pool).await?;
    create_drug_tables(pool).await?;

    info!("✅ Database schema ready");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for table in ["drug_data", "users"] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }
    Ok(())
}

async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Users table, profile columns stay NULL until the first profile update
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            google_id TEXT PRIMARY KEY,
            email TEXT,
            name TEXT,
            height REAL,
            age INTEGER,
            weight REAL,
            created_at TEXT DEFAULT (datetime('now')),
            updated_at TEXT DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_drug_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Saved medicines. google_id is deliberately not a foreign key.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS drug_data (
            item_sn TEXT NOT NULL,
            google_id TEXT NOT NULL,
            drug_name TEXT NOT NULL,
            comp_name TEXT,
            type TEXT,
            item_image TEXT,
            class_name TEXT,
            al_b INTEGER NOT NULL DEFAULT 0,
            al_l INTEGER NOT NULL DEFAULT 0,
            al_d INTEGER NOT NULL DEFAULT 0,
            created_at TEXT DEFAULT (datetime('now')),
            updated_at TEXT DEFAULT (datetime('now')),
            UNIQUE(item_sn, google_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_drug_data_google_id ON drug_data(google_id)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_migrations_are_idempotent_and_reset_clears_rows() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        run_migrations(&pool, false).await.unwrap();
        sqlx::query("INSERT INTO users (google_id, email, name) VALUES ('g-1', 'a@b.c', 'A')")
            .execute(&pool)
            .await
            .unwrap();

        run_migrations(&pool, false).await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        run_migrations(&pool, true).await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
