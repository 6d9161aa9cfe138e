use std::future::Future;
use std::pin::Pin;

use diesel::{Connection, ConnectionError, SqliteConnection};
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::db::DbProvider;
use crate::error::{DbError, DbResult};

pub type AsyncSqliteConnection = SyncConnectionWrapper<SqliteConnection>;
pub type DbPool = Pool<AsyncSqliteConnection>;
pub type DbConnection<'pool> = PooledConnection<'pool, AsyncSqliteConnection>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type SetupFuture<'a> =
    Pin<Box<dyn Future<Output = diesel::ConnectionResult<AsyncSqliteConnection>> + Send + 'a>>;

/// Milliseconds a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// ## Summary
/// Creates a new database connection pool.
///
/// Every pooled connection is configured with a busy timeout so concurrent
/// writers queue on the database lock instead of failing immediately.
///
/// ## Errors
/// Returns an error if the pool cannot be created with the provided database URL.
#[tracing::instrument(skip(database_url), fields(pool_size = size))]
pub async fn create_pool(database_url: &str, size: u32) -> anyhow::Result<DbPool> {
    tracing::debug!("Creating database connection pool");

    let mut manager_config = ManagerConfig::<AsyncSqliteConnection>::default();
    manager_config.custom_setup = Box::new(establish_configured);
    let manager = AsyncDieselConnectionManager::<AsyncSqliteConnection>::new_with_config(
        database_url,
        manager_config,
    );

    let pool = Pool::builder()
        .max_size(size)
        .test_on_check_out(false)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)
        .await?;

    tracing::info!(
        pool_size = size,
        "Database connection pool created successfully"
    );

    Ok(pool)
}

fn establish_configured(url: &str) -> SetupFuture<'_> {
    Box::pin(async move {
        let mut conn = AsyncSqliteConnection::establish(url).await?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"))
            .execute(&mut conn)
            .await
            .map_err(ConnectionError::CouldntSetupConfiguration)?;
        Ok(conn)
    })
}

/// ## Summary
/// Applies every pending embedded migration to the database at `database_url`.
///
/// Runs on a blocking thread with a plain synchronous connection.
///
/// ## Errors
/// Returns an error if the database cannot be opened or a migration fails.
#[tracing::instrument(skip(database_url))]
pub async fn run_migrations(database_url: &str) -> DbResult<usize> {
    let url = database_url.to_string();

    let applied = tokio::task::spawn_blocking(move || -> DbResult<usize> {
        let mut conn = SqliteConnection::establish(&url)
            .map_err(|e| DbError::MigrationError(e.to_string()))?;
        let versions = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::MigrationError(e.to_string()))?;
        Ok(versions.len())
    })
    .await
    .map_err(|e| DbError::MigrationError(e.to_string()))??;

    tracing::info!(applied, "Database migrations applied");

    Ok(applied)
}

impl DbProvider for DbPool {
    #[tracing::instrument(skip(self))]
    fn get_connection<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = DbResult<DbConnection<'a>>> + Send + 'a>> {
        Box::pin(async move {
            let conn = self.get().await?;
            Ok(conn)
        })
    }
}
