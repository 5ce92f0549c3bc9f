//! API endpoints for users.
//!
//! Users are never removed: `DELETE` only clears `estado`.

use rocket::Route;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, error_response, found};
use crate::logged_json::LoggedJson;
use crate::models::{Usuario, UsuarioChanges, UsuarioFilter, UsuarioInput};
use crate::orm::DbConn;
use crate::orm::usuario::{
    get_usuario, insert_usuario, list_usuarios, soft_delete_usuario, update_usuario,
};

/// Create Usuario endpoint.
///
/// - **URL:** `/api/1/usuarios`
/// - **Method:** `POST`
///
/// # Request Format
///
/// ```json
/// {
///   "nombre": "Ana Pérez",
///   "email": "ana@kedikian.com",
///   "hash_contrasena": "$2b$12$...",
///   "roles": "operario"
/// }
/// ```
///
/// Returns 201 with the stored user (without `hash_contrasena`), 400 if the
/// email is malformed or already registered.
#[post("/1/usuarios", data = "<input>")]
pub async fn create_usuario(
    db: DbConn,
    input: LoggedJson<UsuarioInput>,
) -> Result<status::Created<Json<Usuario>>, ApiError> {
    let input = input.into_inner();
    db.run_checked(move |conn| insert_usuario(conn, input))
        .await
        .map(|u| status::Created::new(format!("/api/1/usuarios/{}", u.id)).body(Json(u)))
        .map_err(error_response)
}

/// Get Usuario endpoint.
///
/// - **URL:** `/api/1/usuarios/<usuario_id>`
/// - **Method:** `GET`
#[get("/1/usuarios/<usuario_id>")]
pub async fn get_usuario_route(db: DbConn, usuario_id: i32) -> Result<Json<Usuario>, ApiError> {
    db.run_checked(move |conn| found("usuario", usuario_id, get_usuario(conn, usuario_id)?))
        .await
        .map(Json)
        .map_err(error_response)
}

/// List Usuarios endpoint.
///
/// - **URL:** `/api/1/usuarios?estado=true&email=ana@kedikian.com`
/// - **Method:** `GET`
///
/// Both parameters are optional. `email` matches ignoring letter case.
#[get("/1/usuarios?<estado>&<email>")]
pub async fn list_usuarios_route(
    db: DbConn,
    estado: Option<bool>,
    email: Option<String>,
) -> Result<Json<Vec<Usuario>>, ApiError> {
    let filter = UsuarioFilter { estado, email };
    db.run_checked(move |conn| list_usuarios(conn, &filter))
        .await
        .map(Json)
        .map_err(error_response)
}

/// Update Usuario endpoint.
///
/// - **URL:** `/api/1/usuarios/<usuario_id>`
/// - **Method:** `PUT`
///
/// All fields are optional; omitted fields keep their value.
#[put("/1/usuarios/<usuario_id>", data = "<changes>")]
pub async fn update_usuario_route(
    db: DbConn,
    usuario_id: i32,
    changes: LoggedJson<UsuarioChanges>,
) -> Result<Json<Usuario>, ApiError> {
    let changes = changes.into_inner();
    db.run_checked(move |conn| update_usuario(conn, usuario_id, changes))
        .await
        .map(Json)
        .map_err(error_response)
}

/// Deactivate Usuario endpoint.
///
/// - **URL:** `/api/1/usuarios/<usuario_id>`
/// - **Method:** `DELETE`
///
/// Sets `estado` to false and returns the row.
#[delete("/1/usuarios/<usuario_id>")]
pub async fn delete_usuario_route(db: DbConn, usuario_id: i32) -> Result<Json<Usuario>, ApiError> {
    db.run_checked(move |conn| soft_delete_usuario(conn, usuario_id))
        .await
        .map(Json)
        .map_err(error_response)
}

pub fn routes() -> Vec<Route> {
    routes![
        create_usuario,
        get_usuario_route,
        list_usuarios_route,
        update_usuario_route,
        delete_usuario_route
    ]
}
