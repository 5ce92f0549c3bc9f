//! API endpoints for expenses.

use rocket::Route;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, error_response, found, rango};
use crate::logged_json::LoggedJson;
use crate::models::{Gasto, GastoChanges, GastoFilter, GastoInput};
use crate::orm::DbConn;
use crate::orm::gasto::{get_gasto, insert_gasto, list_gastos, update_gasto};

/// Create Gasto endpoint.
///
/// - **URL:** `/api/1/gastos`
/// - **Method:** `POST`
///
/// ```json
/// {
///   "maquina_id": 3,
///   "tipo": "combustible",
///   "importe_total": 85000,
///   "descripcion": "Gasoil",
///   "imagen": "uploads/ticket-0001.jpg"
/// }
/// ```
///
/// At least one of `usuario_id` / `maquina_id` is required (400).
#[post("/1/gastos", data = "<input>")]
pub async fn create_gasto(
    db: DbConn,
    input: LoggedJson<GastoInput>,
) -> Result<status::Created<Json<Gasto>>, ApiError> {
    let input = input.into_inner();
    db.run_checked(move |conn| insert_gasto(conn, input))
        .await
        .map(|g| status::Created::new(format!("/api/1/gastos/{}", g.id)).body(Json(g)))
        .map_err(error_response)
}

#[get("/1/gastos/<gasto_id>")]
pub async fn get_gasto_route(db: DbConn, gasto_id: i32) -> Result<Json<Gasto>, ApiError> {
    db.run_checked(move |conn| found("gasto", gasto_id, get_gasto(conn, gasto_id)?))
        .await
        .map(Json)
        .map_err(error_response)
}

/// List Gastos endpoint.
///
/// - **URL:** `/api/1/gastos?usuario_id=&maquina_id=&tipo=&fecha_inicio=&fecha_fin=`
/// - **Method:** `GET`
///
/// Dates accept `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` or RFC 3339. The range
/// is inclusive; an unparseable date or an inverted range is a 400.
#[get("/1/gastos?<usuario_id>&<maquina_id>&<tipo>&<fecha_inicio>&<fecha_fin>")]
pub async fn list_gastos_route(
    db: DbConn,
    usuario_id: Option<i32>,
    maquina_id: Option<i32>,
    tipo: Option<String>,
    fecha_inicio: Option<&str>,
    fecha_fin: Option<&str>,
) -> Result<Json<Vec<Gasto>>, ApiError> {
    let filter = GastoFilter {
        usuario_id,
        maquina_id,
        tipo,
        rango: rango(fecha_inicio, fecha_fin)?,
    };
    db.run_checked(move |conn| list_gastos(conn, &filter))
        .await
        .map(Json)
        .map_err(error_response)
}

#[put("/1/gastos/<gasto_id>", data = "<changes>")]
pub async fn update_gasto_route(
    db: DbConn,
    gasto_id: i32,
    changes: LoggedJson<GastoChanges>,
) -> Result<Json<Gasto>, ApiError> {
    let changes = changes.into_inner();
    db.run_checked(move |conn| update_gasto(conn, gasto_id, changes))
        .await
        .map(Json)
        .map_err(error_response)
}

pub fn routes() -> Vec<Route> {
    routes![create_gasto, get_gasto_route, list_gastos_route, update_gasto_route]
}
