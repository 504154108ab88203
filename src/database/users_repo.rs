use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, error, warn};

use super::{StoreError, StoreResult};

/// Body measurements kept on the user row
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub height: f64,
    pub age: i64,
    pub weight: f64,
}

const SQL_UPSERT_USER: &str = r#"
INSERT INTO users (google_id, email, name)
VALUES (?, ?, ?)
ON CONFLICT(google_id) DO UPDATE SET
  email = excluded.email,
  name = excluded.name,
  updated_at = datetime('now')
"#;

const SQL_GET_PROFILE: &str = r#"
SELECT
  CAST(COALESCE(height, 0) AS REAL) AS height,
  CAST(COALESCE(age, 0) AS INTEGER) AS age,
  CAST(COALESCE(weight, 0) AS REAL) AS weight
FROM users
WHERE google_id = ?
"#;

const SQL_UPDATE_PROFILE: &str = r#"
UPDATE users
SET height = ?, age = ?, weight = ?, updated_at = datetime('now')
WHERE google_id = ?
"#;

pub async fn upsert_user(
    pool: &SqlitePool,
    subject_id: &str,
    email: &str,
    name: &str,
) -> StoreResult<()> {
    let mut conn = pool.acquire().await?;

    sqlx::query(SQL_UPSERT_USER)
        .bind(subject_id)
        .bind(email)
        .bind(name)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %subject_id, "Database error upserting user");
            StoreError::Database(e)
        })?;

    debug!(user_id = %subject_id, "User upserted");
    Ok(())
}

pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> StoreResult<Profile> {
    let mut conn = pool.acquire().await?;

    let profile = sqlx::query_as::<_, Profile>(SQL_GET_PROFILE)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "Database error loading profile");
            StoreError::Database(e)
        })?;

    profile.ok_or_else(|| {
        warn!(user_id = %user_id, "Profile requested for unknown user");
        StoreError::NotFound(format!("user {}", user_id))
    })
}

/// Overwrites the three profile fields. `None` clears a field.
/// Returns the number of rows touched; zero means the user does not exist.
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: &str,
    height: Option<f64>,
    age: Option<i64>,
    weight: Option<f64>,
) -> StoreResult<u64> {
    let mut conn = pool.acquire().await?;

    let result = sqlx::query(SQL_UPDATE_PROFILE)
        .bind(height)
        .bind(age)
        .bind(weight)
        .bind(user_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "Database error updating profile");
            StoreError::Database(e)
        })?;

    if result.rows_affected() == 0 {
        warn!(user_id = %user_id, "Profile update matched no user");
    }

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::setup_test_db;

    async fn user_row(pool: &SqlitePool, id: &str) -> (String, String) {
        sqlx::query_as("SELECT email, name FROM users WHERE google_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_upsert_user_updates_existing_row() {
        let pool = setup_test_db().await;

        upsert_user(&pool, "g-1", "old@example.com", "Old Name").await.unwrap();
        upsert_user(&pool, "g-1", "new@example.com", "New Name").await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            user_row(&pool, "g-1").await,
            ("new@example.com".to_string(), "New Name".to_string())
        );
    }

    #[tokio::test]
    async fn test_upsert_user_keeps_profile_fields() {
        let pool = setup_test_db().await;

        upsert_user(&pool, "g-1", "a@example.com", "A").await.unwrap();
        update_profile(&pool, "g-1", Some(170.0), Some(30), Some(65.5))
            .await
            .unwrap();
        upsert_user(&pool, "g-1", "a@example.com", "A again").await.unwrap();

        let profile = get_profile(&pool, "g-1").await.unwrap();
        assert_eq!(
            profile,
            Profile {
                height: 170.0,
                age: 30,
                weight: 65.5
            }
        );
    }

    #[tokio::test]
    async fn test_get_profile_defaults_missing_fields_to_zero() {
        let pool = setup_test_db().await;
        upsert_user(&pool, "g-2", "b@example.com", "B").await.unwrap();

        let profile = get_profile(&pool, "g-2").await.unwrap();
        assert_eq!(profile, Profile::default());
    }

    #[tokio::test]
    async fn test_get_profile_unknown_user_is_not_found() {
        let pool = setup_test_db().await;

        let result = get_profile(&pool, "nobody").await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_profile_reports_rows_touched() {
        let pool = setup_test_db().await;
        upsert_user(&pool, "g-3", "c@example.com", "C").await.unwrap();

        assert_eq!(
            update_profile(&pool, "g-3", Some(180.0), Some(41), Some(80.0))
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            update_profile(&pool, "ghost", Some(1.0), Some(1), Some(1.0))
                .await
                .unwrap(),
            0
        );
    }
}
