//! API endpoints for machines, their usage hours and project history.

use chrono::NaiveDateTime;
use rocket::Route;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::{ApiError, error_response, found};
use crate::logged_json::LoggedJson;
use crate::models::{Maquina, MaquinaChanges, MaquinaFilter, MaquinaInput, ProyectoMaquina, ProyectoMaquinaInput};
use crate::orm::DbConn;
use crate::orm::maquina::{
    get_maquina, insert_maquina, list_maquinas, record_machine_usage, soft_delete_maquina,
    update_maquina,
};
use crate::orm::proyecto_maquina::{historial_maquina, insert_proyecto_maquina};

/// Request payload for adding usage hours to a machine.
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct RegistrarUsoRequest {
    pub horas: i32,
}

/// Request payload for booking machine hours on a project.
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct RegistrarHorasProyectoRequest {
    pub horas: i32,
    #[ts(type = "string | null")]
    pub fecha_asignacion: Option<NaiveDateTime>,
}

#[post("/1/maquinas", data = "<input>")]
pub async fn create_maquina(
    db: DbConn,
    input: LoggedJson<MaquinaInput>,
) -> Result<status::Created<Json<Maquina>>, ApiError> {
    let input = input.into_inner();
    db.run_checked(move |conn| insert_maquina(conn, input))
        .await
        .map(|m| status::Created::new(format!("/api/1/maquinas/{}", m.id)).body(Json(m)))
        .map_err(error_response)
}

#[get("/1/maquinas/<maquina_id>")]
pub async fn get_maquina_route(db: DbConn, maquina_id: i32) -> Result<Json<Maquina>, ApiError> {
    db.run_checked(move |conn| found("maquina", maquina_id, get_maquina(conn, maquina_id)?))
        .await
        .map(Json)
        .map_err(error_response)
}

#[get("/1/maquinas?<estado>")]
pub async fn list_maquinas_route(
    db: DbConn,
    estado: Option<bool>,
) -> Result<Json<Vec<Maquina>>, ApiError> {
    db.run_checked(move |conn| list_maquinas(conn, &MaquinaFilter { estado }))
        .await
        .map(Json)
        .map_err(error_response)
}

/// Update Maquina endpoint.
///
/// - **URL:** `/api/1/maquinas/<maquina_id>`
/// - **Method:** `PUT`
///
/// Lowering `horas_uso` is refused with 409.
#[put("/1/maquinas/<maquina_id>", data = "<changes>")]
pub async fn update_maquina_route(
    db: DbConn,
    maquina_id: i32,
    changes: LoggedJson<MaquinaChanges>,
) -> Result<Json<Maquina>, ApiError> {
    let changes = changes.into_inner();
    db.run_checked(move |conn| update_maquina(conn, maquina_id, changes))
        .await
        .map(Json)
        .map_err(error_response)
}

#[delete("/1/maquinas/<maquina_id>")]
pub async fn delete_maquina_route(db: DbConn, maquina_id: i32) -> Result<Json<Maquina>, ApiError> {
    db.run_checked(move |conn| soft_delete_maquina(conn, maquina_id))
        .await
        .map(Json)
        .map_err(error_response)
}

/// Record Usage endpoint.
///
/// - **URL:** `/api/1/maquinas/<maquina_id>/uso`
/// - **Method:** `POST`
///
/// # Request Format
///
/// ```json
/// { "horas": 5 }
/// ```
///
/// Returns the machine with its new `horas_uso`; 409 for negative hours,
/// 404 for an unknown machine.
#[post("/1/maquinas/<maquina_id>/uso", data = "<request>")]
pub async fn record_usage(
    db: DbConn,
    maquina_id: i32,
    request: LoggedJson<RegistrarUsoRequest>,
) -> Result<Json<Maquina>, ApiError> {
    let horas = request.horas;
    db.run_checked(move |conn| record_machine_usage(conn, maquina_id, horas))
        .await
        .map(Json)
        .map_err(error_response)
}

/// Machine Project History endpoint.
///
/// - **URL:** `/api/1/maquinas/<maquina_id>/historial`
/// - **Method:** `GET`
///
/// Bookings of the machine on projects, newest first.
#[get("/1/maquinas/<maquina_id>/historial")]
pub async fn historial(db: DbConn, maquina_id: i32) -> Result<Json<Vec<ProyectoMaquina>>, ApiError> {
    db.run_checked(move |conn| historial_maquina(conn, maquina_id))
        .await
        .map(Json)
        .map_err(error_response)
}

/// Book Project Hours endpoint.
///
/// - **URL:** `/api/1/maquinas/<maquina_id>/proyectos/<proyecto_id>/horas`
/// - **Method:** `POST`
///
/// Shortcut for creating a proyecto-maquina booking; the hours also accrue
/// to the machine.
#[post("/1/maquinas/<maquina_id>/proyectos/<proyecto_id>/horas", data = "<request>")]
pub async fn book_project_hours(
    db: DbConn,
    maquina_id: i32,
    proyecto_id: i32,
    request: LoggedJson<RegistrarHorasProyectoRequest>,
) -> Result<status::Created<Json<ProyectoMaquina>>, ApiError> {
    let request = request.into_inner();
    let input = ProyectoMaquinaInput {
        proyecto_id,
        maquina_id,
        horas_uso: request.horas,
        fecha_asignacion: request.fecha_asignacion,
    };
    db.run_checked(move |conn| insert_proyecto_maquina(conn, input))
        .await
        .map(|row| status::Created::new(format!("/api/1/proyectos-maquinas/{}", row.id)).body(Json(row)))
        .map_err(error_response)
}

pub fn routes() -> Vec<Route> {
    routes![
        create_maquina,
        get_maquina_route,
        list_maquinas_route,
        update_maquina_route,
        delete_maquina_route,
        record_usage,
        historial,
        book_project_hours
    ]
}
