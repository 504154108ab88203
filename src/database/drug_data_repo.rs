use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

use super::{StoreError, StoreResult};

/// A medicine saved by a user
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct DrugRecord {
    pub item_sn: String,
    pub drug_name: String,
    pub comp_name: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub drug_type: Option<String>,
    pub item_image: Option<String>,
    pub class_name: Option<String>,
    #[serde(skip_serializing)]
    pub google_id: String,
    pub al_b: bool,
    pub al_l: bool,
    pub al_d: bool,
}

const SQL_UPSERT_DRUG: &str = r#"
INSERT INTO drug_data (
  item_sn, drug_name, comp_name, type, item_image, class_name, google_id, al_b, al_l, al_d
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT(item_sn, google_id) DO UPDATE SET
  drug_name = excluded.drug_name,
  comp_name = excluded.comp_name,
  type = excluded.type,
  item_image = excluded.item_image,
  class_name = excluded.class_name,
  al_b = excluded.al_b,
  al_l = excluded.al_l,
  al_d = excluded.al_d,
  updated_at = datetime('now')
"#;

const SQL_DELETE_BY_NAME: &str = r#"
DELETE FROM drug_data
WHERE google_id = ?
  AND drug_name LIKE ? ESCAPE '\'
"#;

const SQL_LIST_FOR_USER: &str = r#"
SELECT
  item_sn,
  drug_name,
  comp_name,
  type,
  item_image,
  class_name,
  google_id,
  al_b,
  al_l,
  al_d
FROM drug_data
WHERE google_id = ?
ORDER BY CAST(item_sn AS INTEGER) ASC, item_sn ASC
"#;

/// Insert a record or refresh every mutable column of the existing one.
/// A unique-key violation counts as already saved; the upsert itself never
/// raises one, only a legacy table with extra unique keys does.
pub async fn upsert_drug_record(pool: &SqlitePool, record: &DrugRecord) -> StoreResult<()> {
    let mut conn = pool.acquire().await?;

    let result = sqlx::query(SQL_UPSERT_DRUG)
        .bind(&record.item_sn)
        .bind(&record.drug_name)
        .bind(record.comp_name.as_deref())
        .bind(record.drug_type.as_deref())
        .bind(record.item_image.as_deref())
        .bind(record.class_name.as_deref())
        .bind(&record.google_id)
        .bind(record.al_b)
        .bind(record.al_l)
        .bind(record.al_d)
        .execute(&mut *conn)
        .await;

    match result {
        Ok(_) => {
            debug!(item_sn = %record.item_sn, user_id = %record.google_id, "Drug record saved");
            Ok(())
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            info!(
                item_sn = %record.item_sn,
                user_id = %record.google_id,
                error = %db_err,
                "Duplicate drug record ignored"
            );
            Ok(())
        }
        Err(e) => {
            error!(
                error = %e,
                item_sn = %record.item_sn,
                user_id = %record.google_id,
                "Database error saving drug record"
            );
            Err(StoreError::Database(e))
        }
    }
}

/// Delete every record of `user_id` whose name contains `name_pattern`.
/// The pattern is matched literally; returns the number of rows removed.
pub async fn delete_drug_records(
    pool: &SqlitePool,
    user_id: &str,
    name_pattern: &str,
) -> StoreResult<u64> {
    let mut conn = pool.acquire().await?;

    let result = sqlx::query(SQL_DELETE_BY_NAME)
        .bind(user_id)
        .bind(contains_pattern(name_pattern))
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                user_id = %user_id,
                pattern = %name_pattern,
                "Database error removing drug records"
            );
            StoreError::Database(e)
        })?;

    if result.rows_affected() == 0 {
        warn!(user_id = %user_id, pattern = %name_pattern, "No drug records matched for removal");
    }

    Ok(result.rows_affected())
}

/// All records of `user_id` ordered by item serial number.
pub async fn list_drug_records(pool: &SqlitePool, user_id: &str) -> StoreResult<Vec<DrugRecord>> {
    let mut conn = pool.acquire().await?;

    let rows = sqlx::query_as::<_, DrugRecord>(SQL_LIST_FOR_USER)
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "Database error listing drug records");
            StoreError::Database(e)
        })?;

    if rows.is_empty() {
        return Err(StoreError::NotFound(format!("drug records for user {}", user_id)));
    }

    Ok(rows)
}

/// `%term%` with LIKE metacharacters escaped so the term matches literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::setup_test_db;

    fn record(item_sn: &str, drug_name: &str, user: &str) -> DrugRecord {
        DrugRecord {
            item_sn: item_sn.to_string(),
            drug_name: drug_name.to_string(),
            comp_name: Some("한국얀센".to_string()),
            drug_type: Some("일반의약품".to_string()),
            item_image: None,
            class_name: Some("해열.진통.소염제".to_string()),
            google_id: user.to_string(),
            al_b: false,
            al_l: false,
            al_d: false,
        }
    }

    async fn count_rows(pool: &SqlitePool) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM drug_data")
            .fetch_one(pool)
            .await
            .unwrap();
        count
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("타이레놀"), "%타이레놀%");
        assert_eq!(contains_pattern("50%_x\\"), "%50\\%\\_x\\\\%");
    }

    #[tokio::test]
    async fn test_upsert_same_key_twice_keeps_second_values() {
        let pool = setup_test_db().await;

        upsert_drug_record(&pool, &record("200000001", "타이레놀정500mg", "user-a"))
            .await
            .unwrap();

        let mut updated = record("200000001", "타이레놀정500밀리그람", "user-a");
        updated.comp_name = Some("Kenvue".to_string());
        updated.al_b = true;
        updated.al_d = true;
        upsert_drug_record(&pool, &updated).await.unwrap();

        assert_eq!(count_rows(&pool).await, 1);
        let rows = list_drug_records(&pool, "user-a").await.unwrap();
        assert_eq!(rows, vec![updated]);
    }

    #[tokio::test]
    async fn test_same_item_saved_by_two_users_is_two_rows() {
        let pool = setup_test_db().await;

        upsert_drug_record(&pool, &record("200000001", "타이레놀정500mg", "user-a"))
            .await
            .unwrap();
        upsert_drug_record(&pool, &record("200000001", "타이레놀정500mg", "user-b"))
            .await
            .unwrap();

        assert_eq!(count_rows(&pool).await, 2);
    }

    #[tokio::test]
    async fn test_delete_only_touches_matching_records_of_user() {
        let pool = setup_test_db().await;

        upsert_drug_record(&pool, &record("1", "타이레놀정500mg", "user-a")).await.unwrap();
        upsert_drug_record(&pool, &record("2", "어린이타이레놀현탁액", "user-a")).await.unwrap();
        upsert_drug_record(&pool, &record("3", "게보린정", "user-a")).await.unwrap();
        upsert_drug_record(&pool, &record("1", "타이레놀정500mg", "user-b")).await.unwrap();

        let removed = delete_drug_records(&pool, "user-a", "타이레놀").await.unwrap();
        assert_eq!(removed, 2);

        let remaining_a = list_drug_records(&pool, "user-a").await.unwrap();
        assert_eq!(remaining_a.len(), 1);
        assert_eq!(remaining_a[0].drug_name, "게보린정");

        let remaining_b = list_drug_records(&pool, "user-b").await.unwrap();
        assert_eq!(remaining_b.len(), 1);
        assert_eq!(remaining_b[0].drug_name, "타이레놀정500mg");
    }

    #[tokio::test]
    async fn test_delete_treats_wildcards_literally() {
        let pool = setup_test_db().await;

        upsert_drug_record(&pool, &record("1", "게보린정", "user-a")).await.unwrap();

        let removed = delete_drug_records(&pool, "user-a", "%").await.unwrap();
        assert_eq!(removed, 0);
        assert_eq!(count_rows(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_list_sorted_by_item_sn() {
        let pool = setup_test_db().await;

        for sn in ["201900003", "199800001", "200500002"] {
            upsert_drug_record(&pool, &record(sn, &format!("drug-{}", sn), "user-a"))
                .await
                .unwrap();
        }

        let serials: Vec<String> = list_drug_records(&pool, "user-a")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.item_sn)
            .collect();
        assert_eq!(serials, vec!["199800001", "200500002", "201900003"]);
    }

    #[tokio::test]
    async fn test_list_sorts_serials_numerically() {
        let pool = setup_test_db().await;

        for sn in ["100", "99", "1000"] {
            upsert_drug_record(&pool, &record(sn, "게보린정", "user-a"))
                .await
                .unwrap();
        }

        let serials: Vec<String> = list_drug_records(&pool, "user-a")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.item_sn)
            .collect();
        assert_eq!(serials, vec!["99", "100", "1000"]);
    }

    #[tokio::test]
    async fn test_unique_violation_on_legacy_table_is_ignored() {
        let pool = setup_test_db().await;
        // older databases keyed saved medicines on item_sn alone
        sqlx::query("DROP TABLE drug_data").execute(&pool).await.unwrap();
        sqlx::query(
            r#"
            CREATE TABLE drug_data (
                item_sn TEXT NOT NULL UNIQUE,
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
        .execute(&pool)
        .await
        .unwrap();

        upsert_drug_record(&pool, &record("200000001", "타이레놀정500mg", "user-a"))
            .await
            .unwrap();
        upsert_drug_record(&pool, &record("200000001", "타이레놀정500mg", "user-b"))
            .await
            .unwrap();

        assert_eq!(count_rows(&pool).await, 1);
        assert!(matches!(
            list_drug_records(&pool, "user-b").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_empty_is_not_found() {
        let pool = setup_test_db().await;

        let result = list_drug_records(&pool, "user-without-records").await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_connections_return_to_pool() {
        // single-connection pool: a leaked checkout would hang the next call
        let pool = setup_test_db().await;

        for i in 0..5 {
            upsert_drug_record(&pool, &record(&i.to_string(), "게보린정", "user-a"))
                .await
                .unwrap();
            let _ = list_drug_records(&pool, "nobody").await;
        }
        assert_eq!(delete_drug_records(&pool, "user-a", "게보린").await.unwrap(), 5);
        assert_eq!(pool.size(), 1);
    }
}
