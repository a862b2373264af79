use sqlx::PgPool;

/// Connect, migrate, verify the lookup tables carry their seed rows.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    ams_db::health_check(&pool).await.unwrap();

    let tables = [
        ("asset_statuses", 2),
        ("borrowing_statuses", 4),
        ("audit_statuses", 3),
        ("service_request_statuses", 3),
        ("roles", 2),
    ];

    for (table, expected) in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, expected, "{table} seed rows");
    }
}

/// Seed labels must line up with the status enums' ids.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_ids_match_enums(pool: PgPool) {
    use ams_core::status::BorrowingStatus;

    for status in BorrowingStatus::ALL {
        let (name,): (String,) = sqlx::query_as("SELECT name FROM borrowing_statuses WHERE id = $1")
            .bind(status.id())
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(name, status.as_str());
    }
}
