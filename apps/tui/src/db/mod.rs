pub mod migrations;
pub mod models;
pub mod queries;
pub use migrations::create_database_pool;
pub use queries::{count_snapshots, recent_free_counts, record_snapshot};
