use crate::db::models::SnapshotRecord;
use parkmap_core::ParkingLot;
use sqlx::{query, query_as, query_scalar, SqlitePool};

/// Records one snapshot row per lot. A reading whose `update_time` is
/// already stored for that lot is skipped, so repeated refreshes between
/// source updates don't duplicate rows. Returns the number of new rows.
pub async fn record_snapshot(
    pool: &SqlitePool,
    lots: &[ParkingLot],
    recorded_at: &str,
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for lot in lots {
        let result = query(
            "INSERT OR IGNORE INTO occupancy_snapshot
                (park_no, free_quantity, total_quantity, update_time, recorded_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(lot.id().as_str())
        .bind(lot.free_quantity)
        .bind(lot.total_quantity)
        .bind(&lot.update_time)
        .bind(recorded_at)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// The last `limit` readings of a lot, oldest first.
pub async fn recent_snapshots(
    pool: &SqlitePool,
    park_no: &str,
    limit: i64,
) -> Result<Vec<SnapshotRecord>, sqlx::Error> {
    let mut rows = query_as::<_, SnapshotRecord>(
        "SELECT id, park_no, free_quantity, total_quantity, update_time, recorded_at
         FROM occupancy_snapshot
         WHERE park_no = ?
         ORDER BY id DESC
         LIMIT ?",
    )
    .bind(park_no)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.reverse();
    Ok(rows)
}

/// Free counts for the detail sparkline, oldest first.
pub async fn recent_free_counts(
    pool: &SqlitePool,
    park_no: &str,
    limit: i64,
) -> Result<Vec<u64>, sqlx::Error> {
    let rows = recent_snapshots(pool, park_no, limit).await?;
    Ok(rows
        .into_iter()
        .map(|row| u64::try_from(row.free_quantity).unwrap_or(0))
        .collect())
}

pub async fn count_snapshots(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    query_scalar("SELECT COUNT(*) FROM occupancy_snapshot")
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::setup_database;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> Result<SqlitePool, sqlx::Error> {
        // A single connection, since every in-memory connection is its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        setup_database(&pool).await?;
        Ok(pool)
    }

    fn lot(park_no: &str, free: i64, update_time: &str) -> ParkingLot {
        serde_json::from_value(serde_json::json!({
            "park_no": park_no,
            "parking_name": format!("Lot {park_no}"),
            "free_quantity": free,
            "total_quantity": 292,
            "latitude": "24.807260",
            "longitude": "120.969783",
            "update_time": update_time,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_record_snapshot_skips_repeated_readings() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;
        let lots = vec![
            lot("004", 22, "2024-10-16 10:00:00"),
            lot("011", 5, "2024-10-16 10:00:00"),
        ];

        let first = record_snapshot(&pool, &lots, "2024-10-16T10:00:30Z").await?;
        let again = record_snapshot(&pool, &lots, "2024-10-16T10:01:30Z").await?;

        assert_eq!(first, 2);
        assert_eq!(again, 0);
        assert_eq!(count_snapshots(&pool).await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_recent_free_counts_oldest_first() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;
        for (minute, free) in [(0, 22), (5, 18), (10, 30), (15, 41)] {
            let time = format!("2024-10-16 10:{minute:02}:00");
            record_snapshot(&pool, &[lot("004", free, &time)], &time).await?;
        }
        record_snapshot(&pool, &[lot("011", 99, "2024-10-16 10:20:00")], "now").await?;

        let counts = recent_free_counts(&pool, "004", 3).await?;
        assert_eq!(counts, vec![18, 30, 41]);

        let rows = recent_snapshots(&pool, "004", 10).await?;
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].update_time, "2024-10-16 10:00:00");
        assert_eq!(rows[0].total_quantity, 292);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_lot_has_no_history() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;
        assert!(recent_free_counts(&pool, "missing", 10).await?.is_empty());
        Ok(())
    }
}
