use diesel::QueryableByName;
use diesel::connection::SimpleConnection;
use diesel::sql_types::BigInt;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rocket::fairing::AdHoc;
use rocket_sync_db_pools::{database, diesel};

use crate::error::DataError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[database("sqlite_db")]
pub struct DbConn(diesel::SqliteConnection);

impl DbConn {
    /// Runs `f` on a pooled connection after applying the connection
    /// pragmas.
    ///
    /// SQLite scopes `foreign_keys` and `busy_timeout` to a single
    /// connection, so they are re-applied on every checkout rather than once
    /// at ignition.
    pub async fn run_checked<F, R>(&self, f: F) -> Result<R, DataError>
    where
        F: FnOnce(&mut diesel::SqliteConnection) -> Result<R, DataError> + Send + 'static,
        R: Send + 'static,
    {
        self.run(move |conn| {
            set_connection_pragmas(conn)?;
            f(conn)
        })
        .await
    }
}

/// Enables foreign key enforcement and sets a busy timeout on `conn`.
///
/// Foreign keys are disabled by default in SQLite for backwards
/// compatibility. The busy timeout lets a writer wait for a competing
/// `BEGIN IMMEDIATE` instead of failing straight away with `SQLITE_BUSY`.
pub fn set_connection_pragmas(
    conn: &mut diesel::SqliteConnection,
) -> Result<(), diesel::result::Error> {
    conn.batch_execute(
        r#"
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        "#,
    )
}

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = BigInt)]
    last_insert_rowid: i64,
}

/// Id of the row most recently inserted on `conn`.
pub fn last_insert_rowid(conn: &mut diesel::SqliteConnection) -> Result<i32, diesel::result::Error> {
    use diesel::RunQueryDsl;

    let row = diesel::sql_query("SELECT last_insert_rowid() as last_insert_rowid")
        .get_result::<LastInsertRowId>(conn)?;
    Ok(row.last_insert_rowid as i32)
}

/// Runs all pending database migrations on the provided connection.
///
/// # Panics
/// Panics if any migration fails to run
pub fn run_pending_migrations(conn: &mut diesel::SqliteConnection) {
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run pending migrations");
}

/// Creates a Rocket fairing that runs database migrations on ignition.
pub fn run_migrations_fairing() -> AdHoc {
    AdHoc::on_ignite("Diesel Migrations", |rocket| async {
        let conn = DbConn::get_one(&rocket).await.expect("database connection for migration");
        conn.run(|c| {
            if let Err(e) = set_connection_pragmas(c) {
                error!("[migrations] Failed to set connection pragmas: {}", e);
            }
            run_pending_migrations(c);
        })
        .await;
        info!("[migrations] Schema is up to date");
        rocket
    })
}
