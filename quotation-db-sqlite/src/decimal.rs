use quotation_core::RepositoryError;
use rust_decimal::Decimal;
use sqlx::{Row, TypeInfo, ValueRef};

/// Get a decimal value from a row.
///
/// Quotes store decimals as TEXT; INTEGER and REAL are accepted for rows
/// written by hand or imported from elsewhere. NULL reads as zero.
pub fn get_decimal(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{}' not found: {}", column, e)))?;

    if value_ref.is_null() {
        return Ok(Decimal::ZERO);
    }

    let type_info = value_ref.type_info();
    let type_name = type_info.name();

    match type_name {
        "TEXT" => {
            let val: String = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to get TEXT from '{}': {}", column, e))
            })?;
            val.trim().parse::<Decimal>().map_err(|e| {
                RepositoryError::Database(format!(
                    "Failed to parse decimal '{}' in '{}': {}",
                    val, column, e
                ))
            })
        }
        "INTEGER" => {
            let val: i64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!(
                    "Failed to get INTEGER from '{}': {}",
                    column, e
                ))
            })?;
            Ok(Decimal::from(val))
        }
        "REAL" => {
            let val: f64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to get REAL from '{}': {}", column, e))
            })?;
            Decimal::try_from(val).map_err(|e| {
                RepositoryError::Database(format!("Failed to convert {} to Decimal: {}", val, e))
            })
        }
        _ => Err(RepositoryError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            type_name, column
        ))),
    }
}

/// Decimal as stored in a TEXT column.
pub fn decimal_to_text(d: Decimal) -> String {
    d.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn setup_test_db() -> sqlx::sqlite::SqlitePool {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        sqlx::query(
            "CREATE TABLE test_decimals (
                id INTEGER PRIMARY KEY,
                int_value INTEGER,
                real_value REAL,
                text_value TEXT,
                blob_value BLOB
            )",
        )
        .execute(&pool)
        .await
        .expect("Failed to create test table");
        pool
    }

    async fn fetch(
        pool: &sqlx::sqlite::SqlitePool,
        insert: &str,
        column: &str,
    ) -> Result<Decimal, RepositoryError> {
        sqlx::query(insert)
            .execute(pool)
            .await
            .expect("Failed to insert test data");
        let row = sqlx::query(&format!("SELECT {column} FROM test_decimals WHERE id = 1"))
            .fetch_one(pool)
            .await
            .expect("Failed to fetch row");
        get_decimal(&row, column)
    }

    // get_decimal tests

    #[tokio::test]
    async fn test_get_decimal_from_text_keeps_exact_cents() {
        let pool = setup_test_db().await;

        let result = fetch(
            &pool,
            "INSERT INTO test_decimals (id, text_value) VALUES (1, '160.14')",
            "text_value",
        )
        .await;

        assert_eq!(result, Ok(dec!(160.14)));
    }

    #[tokio::test]
    async fn test_get_decimal_from_negative_text() {
        let pool = setup_test_db().await;

        let result = fetch(
            &pool,
            "INSERT INTO test_decimals (id, text_value) VALUES (1, '-23.00')",
            "text_value",
        )
        .await;

        assert_eq!(result, Ok(dec!(-23)));
    }

    #[tokio::test]
    async fn test_get_decimal_from_integer() {
        let pool = setup_test_db().await;

        let result = fetch(
            &pool,
            "INSERT INTO test_decimals (id, int_value) VALUES (1, 12345)",
            "int_value",
        )
        .await;

        assert_eq!(result, Ok(dec!(12345)));
    }

    #[tokio::test]
    async fn test_get_decimal_from_real() {
        let pool = setup_test_db().await;

        let result = fetch(
            &pool,
            "INSERT INTO test_decimals (id, real_value) VALUES (1, 4.5)",
            "real_value",
        )
        .await;

        assert_eq!(result, Ok(dec!(4.5)));
    }

    #[tokio::test]
    async fn test_get_decimal_null_is_zero() {
        let pool = setup_test_db().await;

        let result = fetch(
            &pool,
            "INSERT INTO test_decimals (id) VALUES (1)",
            "text_value",
        )
        .await;

        assert_eq!(result, Ok(Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_get_decimal_rejects_non_numeric_text() {
        let pool = setup_test_db().await;

        let result = fetch(
            &pool,
            "INSERT INTO test_decimals (id, text_value) VALUES (1, 'abc')",
            "text_value",
        )
        .await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }

    #[tokio::test]
    async fn test_get_decimal_rejects_blob() {
        let pool = setup_test_db().await;

        let result = fetch(
            &pool,
            "INSERT INTO test_decimals (id, blob_value) VALUES (1, x'01')",
            "blob_value",
        )
        .await;

        assert!(matches!(result, Err(RepositoryError::Database(msg)) if msg.contains("BLOB")));
    }

    #[tokio::test]
    async fn test_get_decimal_missing_column() {
        let pool = setup_test_db().await;

        let result = fetch(
            &pool,
            "INSERT INTO test_decimals (id, int_value) VALUES (1, 1)",
            "int_value",
        )
        .await;
        assert_eq!(result, Ok(dec!(1)));

        let row = sqlx::query("SELECT int_value FROM test_decimals WHERE id = 1")
            .fetch_one(&pool)
            .await
            .expect("Failed to fetch row");
        assert!(get_decimal(&row, "nope").is_err());
    }

    #[test]
    fn decimal_to_text_drops_trailing_zeros() {
        assert_eq!(decimal_to_text(dec!(114.50)), "114.5");
        assert_eq!(decimal_to_text(dec!(0.00)), "0");
        assert_eq!(decimal_to_text(dec!(-23.00)), "-23");
    }
}
