//! API endpoints for contracts.

use rocket::Route;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, error_response, found};
use crate::logged_json::LoggedJson;
use crate::models::{Contrato, ContratoChanges, ContratoFilter, ContratoInput};
use crate::orm::DbConn;
use crate::orm::contrato::{get_contrato, insert_contrato, list_contratos, update_contrato};

/// Create Contrato endpoint.
///
/// - **URL:** `/api/1/contratos`
/// - **Method:** `POST`
///
/// 409 for a negative `importe_total` or a period that ends before it
/// starts; 400 for an unknown or already contracted project.
#[post("/1/contratos", data = "<input>")]
pub async fn create_contrato(
    db: DbConn,
    input: LoggedJson<ContratoInput>,
) -> Result<status::Created<Json<Contrato>>, ApiError> {
    let input = input.into_inner();
    db.run_checked(move |conn| insert_contrato(conn, input))
        .await
        .map(|c| status::Created::new(format!("/api/1/contratos/{}", c.id)).body(Json(c)))
        .map_err(error_response)
}

#[get("/1/contratos/<contrato_id>")]
pub async fn get_contrato_route(db: DbConn, contrato_id: i32) -> Result<Json<Contrato>, ApiError> {
    db.run_checked(move |conn| found("contrato", contrato_id, get_contrato(conn, contrato_id)?))
        .await
        .map(Json)
        .map_err(error_response)
}

#[get("/1/contratos?<proyecto_id>&<cliente>")]
pub async fn list_contratos_route(
    db: DbConn,
    proyecto_id: Option<i32>,
    cliente: Option<String>,
) -> Result<Json<Vec<Contrato>>, ApiError> {
    let filter = ContratoFilter { proyecto_id, cliente };
    db.run_checked(move |conn| list_contratos(conn, &filter))
        .await
        .map(Json)
        .map_err(error_response)
}

#[put("/1/contratos/<contrato_id>", data = "<changes>")]
pub async fn update_contrato_route(
    db: DbConn,
    contrato_id: i32,
    changes: LoggedJson<ContratoChanges>,
) -> Result<Json<Contrato>, ApiError> {
    let changes = changes.into_inner();
    db.run_checked(move |conn| update_contrato(conn, contrato_id, changes))
        .await
        .map(Json)
        .map_err(error_response)
}

pub fn routes() -> Vec<Route> {
    routes![create_contrato, get_contrato_route, list_contratos_route, update_contrato_route]
}
