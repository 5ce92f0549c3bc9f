//! API endpoints for payments.

use rocket::Route;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, error_response, found, rango};
use crate::logged_json::LoggedJson;
use crate::models::{Pago, PagoChanges, PagoFilter, PagoInput};
use crate::orm::DbConn;
use crate::orm::pago::{get_pago, insert_pago, list_pagos, update_pago};

#[post("/1/pagos", data = "<input>")]
pub async fn create_pago(
    db: DbConn,
    input: LoggedJson<PagoInput>,
) -> Result<status::Created<Json<Pago>>, ApiError> {
    let input = input.into_inner();
    db.run_checked(move |conn| insert_pago(conn, input))
        .await
        .map(|p| status::Created::new(format!("/api/1/pagos/{}", p.id)).body(Json(p)))
        .map_err(error_response)
}

#[get("/1/pagos/<pago_id>")]
pub async fn get_pago_route(db: DbConn, pago_id: i32) -> Result<Json<Pago>, ApiError> {
    db.run_checked(move |conn| found("pago", pago_id, get_pago(conn, pago_id)?))
        .await
        .map(Json)
        .map_err(error_response)
}

/// List Pagos endpoint.
///
/// - **URL:** `/api/1/pagos?proyecto_id=&producto_id=&fecha_inicio=&fecha_fin=`
/// - **Method:** `GET`
#[get("/1/pagos?<proyecto_id>&<producto_id>&<fecha_inicio>&<fecha_fin>")]
pub async fn list_pagos_route(
    db: DbConn,
    proyecto_id: Option<i32>,
    producto_id: Option<i32>,
    fecha_inicio: Option<&str>,
    fecha_fin: Option<&str>,
) -> Result<Json<Vec<Pago>>, ApiError> {
    let filter = PagoFilter {
        proyecto_id,
        producto_id,
        rango: rango(fecha_inicio, fecha_fin)?,
    };
    db.run_checked(move |conn| list_pagos(conn, &filter))
        .await
        .map(Json)
        .map_err(error_response)
}

#[put("/1/pagos/<pago_id>", data = "<changes>")]
pub async fn update_pago_route(
    db: DbConn,
    pago_id: i32,
    changes: LoggedJson<PagoChanges>,
) -> Result<Json<Pago>, ApiError> {
    let changes = changes.into_inner();
    db.run_checked(move |conn| update_pago(conn, pago_id, changes))
        .await
        .map(Json)
        .map_err(error_response)
}

pub fn routes() -> Vec<Route> {
    routes![create_pago, get_pago_route, list_pagos_route, update_pago_route]
}
