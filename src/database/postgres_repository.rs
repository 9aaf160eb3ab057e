use sqlx::PgPool;

/// Repository over the shared connection pool. Domain-specific methods live
/// in the sibling modules, each in its own `impl` block.
#[derive(Clone)]
pub struct PostgresRepository {
    pub pool: PgPool,
}
