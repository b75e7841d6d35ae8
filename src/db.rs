use std::fs;
use std::path::{Path, PathBuf};

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection,
    DatabaseTransaction, ExecResult, FromQueryResult, Schema, Statement, TransactionTrait,
};
use url::Url;

use crate::entities::item;
use crate::error::AppError;

pub const DEFAULT_DATABASE_PATH: &str = "./data/wishlist.sqlite3";

pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub async fn connect(path: &Path) -> Result<DatabaseConnection, AppError> {
    let path = std::path::absolute(path)?;
    let mut url = Url::from_file_path(&path)
        .map_err(|_| AppError::InvalidInput(format!("invalid sqlite path: {}", path.display())))?;
    url.set_query(Some("mode=rwc"));
    let sqlite_url = url.as_str().replacen("file://", "sqlite://", 1);

    let mut options = ConnectOptions::new(sqlite_url);
    options
        .max_connections(1)
        .min_connections(0)
        .sqlx_logging(false);
    Ok(Database::connect(options).await?)
}

/// Handle on the wishlist database file.
///
/// Holds no connection itself: every logical operation opens its own
/// [`Session`] and releases it with [`Session::finish`].
#[derive(Clone, Debug)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn open(&self) -> Result<Session, AppError> {
        let conn = connect(&self.path).await?;
        Ok(Session { conn })
    }

    /// Creates the `items` table when it does not exist yet. Idempotent.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        ensure_parent_dir(&self.path)?;
        let session = self.open().await?;
        let result = create_tables(&session).await;
        session.finish(result).await?;
        tracing::info!(path = %self.path.display(), "database initialized");
        Ok(())
    }
}

async fn create_tables(session: &Session) -> Result<(), AppError> {
    let backend = session.backend();
    let schema = Schema::new(backend);

    let mut item_stmt = schema.create_table_from_entity(item::Entity);
    item_stmt.if_not_exists();
    session.execute(backend.build(&item_stmt)).await?;
    Ok(())
}

/// One connection, scoped to a single store operation.
pub struct Session {
    conn: DatabaseConnection,
}

impl Session {
    pub fn backend(&self) -> DatabaseBackend {
        self.conn.get_database_backend()
    }

    /// Runs a mutating statement and commits it before returning.
    pub async fn execute(&self, statement: Statement) -> Result<ExecResult, AppError> {
        let txn = self.conn.begin().await?;
        let result = txn.execute(statement).await.map_err(AppError::from);
        finalize_transaction(txn, result).await
    }

    pub async fn fetch_all<T: FromQueryResult>(
        &self,
        statement: Statement,
    ) -> Result<Vec<T>, AppError> {
        let rows = self.conn.query_all(statement).await?;
        rows.iter()
            .map(|row| T::from_query_result(row, "").map_err(AppError::from))
            .collect()
    }

    /// First matching row, or `None` when the statement matches nothing.
    pub async fn fetch_one<T: FromQueryResult>(
        &self,
        statement: Statement,
    ) -> Result<Option<T>, AppError> {
        match self.conn.query_one(statement).await? {
            Some(row) => Ok(Some(T::from_query_result(&row, "")?)),
            None => Ok(None),
        }
    }

    /// Closes the connection on every path. A failed `result` is logged and
    /// handed back unchanged.
    pub async fn finish<T>(self, result: Result<T, AppError>) -> Result<T, AppError> {
        match result {
            Ok(value) => {
                self.conn.close().await?;
                Ok(value)
            }
            Err(err) => {
                tracing::error!(error = %err, "store session aborted");
                if let Err(close_err) = self.conn.close().await {
                    tracing::warn!(error = %close_err, "failed to close store connection");
                }
                Err(err)
            }
        }
    }
}

async fn finalize_transaction<T>(
    txn: DatabaseTransaction,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                return Err(rollback_err.into());
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, FromQueryResult)]
    struct TableCount {
        total: i64,
    }

    fn setup_store() -> (TempDir, Store) {
        let dir = TempDir::new().expect("temp dir");
        let store = Store::new(dir.path().join("data").join("wishlist.sqlite3"));
        (dir, store)
    }

    async fn items_table_count(store: &Store) -> i64 {
        let session = store.open().await.expect("open session");
        let count: Option<TableCount> = session
            .fetch_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT COUNT(*) AS total FROM sqlite_master WHERE type = 'table' AND name = 'items';",
            ))
            .await
            .expect("count tables");
        session.finish(Ok(())).await.expect("finish");
        count.expect("count row").total
    }

    #[tokio::test]
    async fn ensure_schema_creates_parent_dir_and_table() {
        let (_dir, store) = setup_store();
        store.ensure_schema().await.expect("ensure schema");

        assert!(store.path().exists());
        assert_eq!(items_table_count(&store).await, 1);
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let (_dir, store) = setup_store();
        store.ensure_schema().await.expect("first ensure");
        store.ensure_schema().await.expect("second ensure");

        assert_eq!(items_table_count(&store).await, 1);
    }

    #[tokio::test]
    async fn fetch_one_returns_none_for_zero_rows() {
        let (_dir, store) = setup_store();
        store.ensure_schema().await.expect("ensure schema");

        let session = store.open().await.expect("open session");
        let row: Option<item::Model> = session
            .fetch_one(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "SELECT id, title, deadline, category, priority FROM items WHERE id = ?;",
                [42i64.into()],
            ))
            .await
            .expect("fetch one");
        session.finish(Ok(())).await.expect("finish");
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn execute_applies_schema_defaults() {
        let (_dir, store) = setup_store();
        store.ensure_schema().await.expect("ensure schema");

        let session = store.open().await.expect("open session");
        let result = session
            .execute(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "INSERT INTO items (title) VALUES (?);",
                ["Dune".into()],
            ))
            .await
            .expect("insert");
        assert_eq!(result.rows_affected(), 1);

        let rows: Vec<item::Model> = session
            .fetch_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT id, title, deadline, category, priority FROM items;",
            ))
            .await
            .expect("fetch all");
        session.finish(Ok(())).await.expect("finish");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id as u64, result.last_insert_id());
        assert_eq!(rows[0].category, "General");
        assert_eq!(rows[0].priority, 1);
        assert_eq!(rows[0].deadline, None);
    }

    #[tokio::test]
    async fn finish_returns_original_error() {
        let (_dir, store) = setup_store();
        store.ensure_schema().await.expect("ensure schema");

        let session = store.open().await.expect("open session");
        let result = session
            .execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                "INSERT INTO missing_table (title) VALUES ('x');",
            ))
            .await;
        let err = session.finish(result).await.expect_err("should fail");
        assert!(matches!(err, AppError::Db(_)), "unexpected error: {err}");
    }
}
