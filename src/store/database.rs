use sqlx::{query, query_as};
use tracing::{debug, error};

#[cfg(feature = "sqlite")]
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

#[cfg(feature = "postgres")]
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::errors::{WardenError, WardenResult};

use super::models::{Account, NewNotificationLog, NotificationLog};

/// Unified database abstraction over SQLite and Postgres.
///
/// Available variants depend on enabled features:
/// - `sqlite` feature enables `Database::SQLite`
/// - `postgres` feature enables `Database::Postgres`
///
/// Expected tables:
///
/// ```sql
/// users     (id, username, enable, expire_time)
/// email_log (id, user_id, title, content, status, error, created_at)
/// ```
#[derive(Debug, Clone)]
pub enum Database {
    #[cfg(feature = "sqlite")]
    SQLite(SqlitePool),
    #[cfg(feature = "postgres")]
    Postgres(PgPool),
}

impl Database {
    /// Open a connection pool for the configured backend.
    pub async fn connect(config: &DatabaseConfig) -> WardenResult<Self> {
        match config.db_type.as_str() {
            #[cfg(feature = "sqlite")]
            "sqlite" => {
                let pool = SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(&config.sqlite_url)
                    .await
                    .map_err(|e| {
                        error!("Failed to connect to SQLite: {e}");
                        WardenError::DatabaseError(format!("failed to connect to SQLite: {e}"))
                    })?;

                Ok(Database::SQLite(pool))
            }
            #[cfg(not(feature = "sqlite"))]
            "sqlite" => Err(WardenError::ConfigError(
                "SQLite support not compiled in. Enable the 'sqlite' feature.".to_string(),
            )),
            #[cfg(feature = "postgres")]
            "postgres" => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(&config.postgres_url)
                    .await
                    .map_err(|e| {
                        error!("Failed to connect to PostgreSQL: {e}");
                        WardenError::DatabaseError(format!(
                            "failed to connect to PostgreSQL: {e}"
                        ))
                    })?;

                Ok(Database::Postgres(pool))
            }
            #[cfg(not(feature = "postgres"))]
            "postgres" => Err(WardenError::ConfigError(
                "PostgreSQL support not compiled in. Enable the 'postgres' feature.".to_string(),
            )),
            other => Err(WardenError::ConfigError(format!(
                "unsupported database type: {other}"
            ))),
        }
    }

    /// Backend name, for log lines.
    pub fn db_type(&self) -> &'static str {
        match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(_) => "sqlite",
            #[cfg(feature = "postgres")]
            Database::Postgres(_) => "postgres",
        }
    }

    /// Fetch every account with `enable` set, ordered by id.
    ///
    /// The whole result set is loaded at once. `expire_time` may be stored as
    /// a date or a datetime; dates are read as midnight of that day.
    pub async fn get_enabled_accounts(&self) -> WardenResult<Vec<Account>> {
        let accounts = match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(pool) => query_as::<_, Account>(
                "SELECT id, username, enable, datetime(expire_time) AS expire_time FROM users \
                 WHERE enable = 1 ORDER BY id",
            )
            .fetch_all(pool)
            .await
            .map_err(|e| {
                error!("SQLite get_enabled_accounts failed: {e}");
                WardenError::DatabaseError(format!("database error: {e}"))
            })?,
            #[cfg(feature = "postgres")]
            Database::Postgres(pool) => query_as::<_, Account>(
                "SELECT id, username, enable, expire_time::timestamp AS expire_time FROM users \
                 WHERE enable = TRUE ORDER BY id",
            )
            .fetch_all(pool)
            .await
            .map_err(|e| {
                error!("Postgres get_enabled_accounts failed: {e}");
                WardenError::DatabaseError(format!("database error: {e}"))
            })?,
        };

        debug!("Loaded {} enabled accounts", accounts.len());

        Ok(accounts)
    }

    /// Append one notification log row.
    pub async fn insert_notification_log(&self, entry: &NewNotificationLog) -> WardenResult<()> {
        match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(pool) => {
                query(
                    r#"
                    INSERT INTO email_log (user_id, title, content, status, error, created_at)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(entry.user_id)
                .bind(&entry.title)
                .bind(&entry.content)
                .bind(entry.status.code())
                .bind(&entry.error)
                .bind(entry.created_at)
                .execute(pool)
                .await
                .map_err(|e| {
                    error!("SQLite insert_notification_log failed: {e}");
                    WardenError::DatabaseError(format!("database error: {e}"))
                })?;
            }
            #[cfg(feature = "postgres")]
            Database::Postgres(pool) => {
                query(
                    r#"
                    INSERT INTO email_log (user_id, title, content, status, error, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(entry.user_id)
                .bind(&entry.title)
                .bind(&entry.content)
                .bind(entry.status.code())
                .bind(&entry.error)
                .bind(entry.created_at)
                .execute(pool)
                .await
                .map_err(|e| {
                    error!("Postgres insert_notification_log failed: {e}");
                    WardenError::DatabaseError(format!("database error: {e}"))
                })?;
            }
        }

        Ok(())
    }

    /// List notification log rows, oldest first.
    ///
    /// Pass `Some(user_id)` to restrict to one account.
    pub async fn list_notification_logs(
        &self,
        user_id: Option<i64>,
    ) -> WardenResult<Vec<NotificationLog>> {
        let rows = match self {
            #[cfg(feature = "sqlite")]
            Database::SQLite(pool) => query_as::<_, NotificationLog>(
                "SELECT id, user_id, title, content, status, error, created_at FROM email_log \
                 WHERE (? IS NULL OR user_id = ?) ORDER BY id",
            )
            .bind(user_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                error!("SQLite list_notification_logs failed: {e}");
                WardenError::DatabaseError(format!("database error: {e}"))
            })?,
            #[cfg(feature = "postgres")]
            Database::Postgres(pool) => query_as::<_, NotificationLog>(
                "SELECT id, user_id, title, content, status, error, created_at FROM email_log \
                 WHERE ($1::BIGINT IS NULL OR user_id = $1) ORDER BY id",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                error!("Postgres list_notification_logs failed: {e}");
                WardenError::DatabaseError(format!("database error: {e}"))
            })?,
        };

        Ok(rows)
    }
}
