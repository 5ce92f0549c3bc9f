//! API endpoints for operator shifts on machines (`maquina_usuario`).

use rocket::Route;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, error_response, found};
use crate::logged_json::LoggedJson;
use crate::models::{MaquinaUsuario, MaquinaUsuarioChanges, MaquinaUsuarioFilter, MaquinaUsuarioInput};
use crate::orm::DbConn;
use crate::orm::maquina_usuario::{
    get_maquina_usuario, insert_maquina_usuario, list_maquina_usuarios, update_maquina_usuario,
};

/// Create Asignacion endpoint.
///
/// - **URL:** `/api/1/asignaciones`
/// - **Method:** `POST`
///
/// ```json
/// { "maquina_id": 1, "usuario_id": 2, "horas_turno": 8.5 }
/// ```
///
/// 400 if the machine or user is missing or inactive.
#[post("/1/asignaciones", data = "<input>")]
pub async fn create_asignacion(
    db: DbConn,
    input: LoggedJson<MaquinaUsuarioInput>,
) -> Result<status::Created<Json<MaquinaUsuario>>, ApiError> {
    let input = input.into_inner();
    db.run_checked(move |conn| insert_maquina_usuario(conn, input))
        .await
        .map(|row| status::Created::new(format!("/api/1/asignaciones/{}", row.id)).body(Json(row)))
        .map_err(error_response)
}

#[get("/1/asignaciones/<asignacion_id>")]
pub async fn get_asignacion(db: DbConn, asignacion_id: i32) -> Result<Json<MaquinaUsuario>, ApiError> {
    db.run_checked(move |conn| {
        found("maquina_usuario", asignacion_id, get_maquina_usuario(conn, asignacion_id)?)
    })
    .await
    .map(Json)
    .map_err(error_response)
}

#[get("/1/asignaciones?<maquina_id>&<usuario_id>")]
pub async fn list_asignaciones(
    db: DbConn,
    maquina_id: Option<i32>,
    usuario_id: Option<i32>,
) -> Result<Json<Vec<MaquinaUsuario>>, ApiError> {
    let filter = MaquinaUsuarioFilter { maquina_id, usuario_id };
    db.run_checked(move |conn| list_maquina_usuarios(conn, &filter))
        .await
        .map(Json)
        .map_err(error_response)
}

#[put("/1/asignaciones/<asignacion_id>", data = "<changes>")]
pub async fn update_asignacion(
    db: DbConn,
    asignacion_id: i32,
    changes: LoggedJson<MaquinaUsuarioChanges>,
) -> Result<Json<MaquinaUsuario>, ApiError> {
    let changes = changes.into_inner();
    db.run_checked(move |conn| update_maquina_usuario(conn, asignacion_id, changes))
        .await
        .map(Json)
        .map_err(error_response)
}

pub fn routes() -> Vec<Route> {
    routes![create_asignacion, get_asignacion, list_asignaciones, update_asignacion]
}
