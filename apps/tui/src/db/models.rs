use sqlx::FromRow;

/// One recorded reading of a lot.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SnapshotRecord {
    pub id: i64,
    pub park_no: String,
    pub free_quantity: i64,
    pub total_quantity: i64,
    pub update_time: String,
    pub recorded_at: String,
}
