//! API endpoints for projects and the machine hours booked on them.

use rocket::Route;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, error_response, found};
use crate::logged_json::LoggedJson;
use crate::models::{
    Proyecto, ProyectoChanges, ProyectoFilter, ProyectoInput, ProyectoMaquina,
    ProyectoMaquinaChanges, ProyectoMaquinaFilter, ProyectoMaquinaInput,
};
use crate::orm::DbConn;
use crate::orm::proyecto::{
    get_proyecto, insert_proyecto, list_proyectos, soft_delete_proyecto, update_proyecto,
};
use crate::orm::proyecto_maquina::{
    get_proyecto_maquina, insert_proyecto_maquina, list_proyecto_maquinas, update_proyecto_maquina,
};

#[post("/1/proyectos", data = "<input>")]
pub async fn create_proyecto(
    db: DbConn,
    input: LoggedJson<ProyectoInput>,
) -> Result<status::Created<Json<Proyecto>>, ApiError> {
    let input = input.into_inner();
    db.run_checked(move |conn| insert_proyecto(conn, input))
        .await
        .map(|p| status::Created::new(format!("/api/1/proyectos/{}", p.id)).body(Json(p)))
        .map_err(error_response)
}

#[get("/1/proyectos/<proyecto_id>")]
pub async fn get_proyecto_route(db: DbConn, proyecto_id: i32) -> Result<Json<Proyecto>, ApiError> {
    db.run_checked(move |conn| found("proyecto", proyecto_id, get_proyecto(conn, proyecto_id)?))
        .await
        .map(Json)
        .map_err(error_response)
}

#[get("/1/proyectos?<estado>")]
pub async fn list_proyectos_route(
    db: DbConn,
    estado: Option<bool>,
) -> Result<Json<Vec<Proyecto>>, ApiError> {
    db.run_checked(move |conn| list_proyectos(conn, &ProyectoFilter { estado }))
        .await
        .map(Json)
        .map_err(error_response)
}

/// Update Proyecto endpoint.
///
/// - **URL:** `/api/1/proyectos/<proyecto_id>`
/// - **Method:** `PUT`
///
/// `contrato_id` and `ubicacion` may be sent as `null` to clear them.
#[put("/1/proyectos/<proyecto_id>", data = "<changes>")]
pub async fn update_proyecto_route(
    db: DbConn,
    proyecto_id: i32,
    changes: LoggedJson<ProyectoChanges>,
) -> Result<Json<Proyecto>, ApiError> {
    let changes = changes.into_inner();
    db.run_checked(move |conn| update_proyecto(conn, proyecto_id, changes))
        .await
        .map(Json)
        .map_err(error_response)
}

#[delete("/1/proyectos/<proyecto_id>")]
pub async fn delete_proyecto_route(db: DbConn, proyecto_id: i32) -> Result<Json<Proyecto>, ApiError> {
    db.run_checked(move |conn| soft_delete_proyecto(conn, proyecto_id))
        .await
        .map(Json)
        .map_err(error_response)
}

/// Book Machine Hours endpoint.
///
/// - **URL:** `/api/1/proyectos-maquinas`
/// - **Method:** `POST`
///
/// ```json
/// { "proyecto_id": 1, "maquina_id": 3, "horas_uso": 6 }
/// ```
///
/// The hours are added to the machine's `horas_uso` in the same transaction.
#[post("/1/proyectos-maquinas", data = "<input>")]
pub async fn create_proyecto_maquina(
    db: DbConn,
    input: LoggedJson<ProyectoMaquinaInput>,
) -> Result<status::Created<Json<ProyectoMaquina>>, ApiError> {
    let input = input.into_inner();
    db.run_checked(move |conn| insert_proyecto_maquina(conn, input))
        .await
        .map(|row| status::Created::new(format!("/api/1/proyectos-maquinas/{}", row.id)).body(Json(row)))
        .map_err(error_response)
}

#[get("/1/proyectos-maquinas/<row_id>")]
pub async fn get_proyecto_maquina_route(
    db: DbConn,
    row_id: i32,
) -> Result<Json<ProyectoMaquina>, ApiError> {
    db.run_checked(move |conn| found("proyecto_maquina", row_id, get_proyecto_maquina(conn, row_id)?))
        .await
        .map(Json)
        .map_err(error_response)
}

#[get("/1/proyectos-maquinas?<proyecto_id>&<maquina_id>")]
pub async fn list_proyecto_maquinas_route(
    db: DbConn,
    proyecto_id: Option<i32>,
    maquina_id: Option<i32>,
) -> Result<Json<Vec<ProyectoMaquina>>, ApiError> {
    let filter = ProyectoMaquinaFilter { proyecto_id, maquina_id };
    db.run_checked(move |conn| list_proyecto_maquinas(conn, &filter))
        .await
        .map(Json)
        .map_err(error_response)
}

/// Correct Machine Hours endpoint.
///
/// - **URL:** `/api/1/proyectos-maquinas/<row_id>`
/// - **Method:** `PUT`
///
/// Raising the hours adds the difference to the machine; lowering them is
/// refused with 409.
#[put("/1/proyectos-maquinas/<row_id>", data = "<changes>")]
pub async fn update_proyecto_maquina_route(
    db: DbConn,
    row_id: i32,
    changes: LoggedJson<ProyectoMaquinaChanges>,
) -> Result<Json<ProyectoMaquina>, ApiError> {
    let changes = changes.into_inner();
    db.run_checked(move |conn| update_proyecto_maquina(conn, row_id, changes))
        .await
        .map(Json)
        .map_err(error_response)
}

pub fn routes() -> Vec<Route> {
    routes![
        create_proyecto,
        get_proyecto_route,
        list_proyectos_route,
        update_proyecto_route,
        delete_proyecto_route,
        create_proyecto_maquina,
        get_proyecto_maquina_route,
        list_proyecto_maquinas_route,
        update_proyecto_maquina_route
    ]
}
