//! Test fixtures: a disposable Rocket instance and bare connections, both
//! backed by fresh in-memory databases.

use diesel::sqlite::SqliteConnection;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket};
use rocket_sync_db_pools::diesel;

use super::db::{DbConn, run_migrations_fairing, run_pending_migrations, set_connection_pragmas};

/// Creates and configures a Rocket instance for testing with an in-memory
/// SQLite database.
///
/// Each call gets its own shared-cache database, so pooled connections of
/// one instance see the same data while separate tests stay isolated.
pub fn test_rocket() -> Rocket<Build> {
    use uuid::Uuid;

    let unique_db_name = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());

    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };

    let figment = rocket::Config::figment().merge(("databases", map!["sqlite_db" => db_config]));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(run_migrations_fairing());

    crate::register_catchers(crate::mount_api_routes(rocket))
}

/// Creates a synchronous in-memory SQLite database connection for unit tests.
///
/// The connection has foreign keys enabled and all embedded migrations
/// applied. Each call returns a new, independent database.
pub fn setup_test_db() -> SqliteConnection {
    use diesel::Connection;

    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_connection_pragmas(&mut conn).expect("Failed to set connection pragmas");
    run_pending_migrations(&mut conn);
    conn
}
