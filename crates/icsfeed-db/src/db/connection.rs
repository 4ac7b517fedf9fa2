use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::{AsyncMysqlConnection, AsyncPgConnection};

use crate::db::store::{MysqlEventStore, PgEventStore, StoreProvider};
use crate::error::DbResult;

pub type PgPool = Pool<AsyncPgConnection>;
pub type PgPooledConnection<'pool> = PooledConnection<'pool, AsyncPgConnection>;

pub type MysqlPool = Pool<AsyncMysqlConnection>;
pub type MysqlPooledConnection<'pool> = PooledConnection<'pool, AsyncMysqlConnection>;

/// ## Summary
/// Creates a `PostgreSQL` connection pool.
///
/// The pool is built with all `size` connections established up front, so an
/// unreachable store fails here rather than on the first cycle.
///
/// ## Errors
/// Returns an error if the pool cannot be created with the provided database URL.
#[tracing::instrument(skip(database_url), fields(pool_size = size))]
pub async fn create_pg_pool(database_url: &str, size: u32) -> anyhow::Result<PgPool> {
    tracing::debug!("Creating PostgreSQL connection pool");

    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);

    let pool = Pool::builder()
        .max_size(size)
        .min_idle(Some(size))
        .test_on_check_out(true)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)
        .await?;

    tracing::info!(pool_size = size, "PostgreSQL connection pool created");

    Ok(pool)
}

/// ## Summary
/// Creates a `MySQL` connection pool.
///
/// Same pool settings as [`create_pg_pool`].
///
/// ## Errors
/// Returns an error if the pool cannot be created with the provided database URL.
#[tracing::instrument(skip(database_url), fields(pool_size = size))]
pub async fn create_mysql_pool(database_url: &str, size: u32) -> anyhow::Result<MysqlPool> {
    tracing::debug!("Creating MySQL connection pool");

    let manager = AsyncDieselConnectionManager::<AsyncMysqlConnection>::new(database_url);

    let pool = Pool::builder()
        .max_size(size)
        .min_idle(Some(size))
        .test_on_check_out(true)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)
        .await?;

    tracing::info!(pool_size = size, "MySQL connection pool created");

    Ok(pool)
}

/// ## Summary
/// Acquires and immediately releases one store handle.
///
/// Pools test connections on checkout, so a successful acquire means the
/// store answered a query.
///
/// ## Errors
/// Returns an error if no connection can be obtained.
#[tracing::instrument(skip(provider))]
pub async fn verify_connection<P: StoreProvider>(provider: &P) -> DbResult<()> {
    drop(provider.acquire().await?);

    tracing::debug!("Database connection verified");

    Ok(())
}

impl StoreProvider for PgPool {
    type Store = PgEventStore;

    #[tracing::instrument(skip(self))]
    async fn acquire(&self) -> DbResult<PgEventStore> {
        let conn = self.get_owned().await?;
        Ok(PgEventStore::new(conn))
    }
}

impl StoreProvider for MysqlPool {
    type Store = MysqlEventStore;

    #[tracing::instrument(skip(self))]
    async fn acquire(&self) -> DbResult<MysqlEventStore> {
        let conn = self.get_owned().await?;
        Ok(MysqlEventStore::new(conn))
    }
}
