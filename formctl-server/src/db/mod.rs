//! Database layer - connection pool, migrations, and repositories
//!
//! # Design Principles
//!
//! - Connection pool with explicit limits - no Arc<Mutex<Connection>>
//! - List operations use JOINs or correlated aggregates - no N+1 queries
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Transactions for multi-step operations

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use sqlx::PgPool;
pub use repos::*;
