//! API endpoints for products and their stock movements.
//!
//! Stock (`inventario`) is read-only here except through movements.

use rocket::Route;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, error_response, found, rango};
use crate::logged_json::LoggedJson;
use crate::models::{
    MovimientoChanges, MovimientoFilter, MovimientoInput, Producto, ProductoChanges,
    ProductoFilter, ProductoInput, ProductoUsuario, TipoTransaccion,
};
use crate::orm::DbConn;
use crate::orm::producto::{get_producto, insert_producto, list_productos, update_producto};
use crate::orm::producto_usuario::{get_movimiento, list_movimientos, record_movement, update_movimiento};

#[post("/1/productos", data = "<input>")]
pub async fn create_producto(
    db: DbConn,
    input: LoggedJson<ProductoInput>,
) -> Result<status::Created<Json<Producto>>, ApiError> {
    let input = input.into_inner();
    db.run_checked(move |conn| insert_producto(conn, input))
        .await
        .map(|p| status::Created::new(format!("/api/1/productos/{}", p.id)).body(Json(p)))
        .map_err(error_response)
}

#[get("/1/productos/<producto_id>")]
pub async fn get_producto_route(db: DbConn, producto_id: i32) -> Result<Json<Producto>, ApiError> {
    db.run_checked(move |conn| found("producto", producto_id, get_producto(conn, producto_id)?))
        .await
        .map(Json)
        .map_err(error_response)
}

#[get("/1/productos?<codigo_producto>")]
pub async fn list_productos_route(
    db: DbConn,
    codigo_producto: Option<String>,
) -> Result<Json<Vec<Producto>>, ApiError> {
    let filter = ProductoFilter { codigo_producto };
    db.run_checked(move |conn| list_productos(conn, &filter))
        .await
        .map(Json)
        .map_err(error_response)
}

#[put("/1/productos/<producto_id>", data = "<changes>")]
pub async fn update_producto_route(
    db: DbConn,
    producto_id: i32,
    changes: LoggedJson<ProductoChanges>,
) -> Result<Json<Producto>, ApiError> {
    let changes = changes.into_inner();
    db.run_checked(move |conn| update_producto(conn, producto_id, changes))
        .await
        .map(Json)
        .map_err(error_response)
}

/// Record Movement endpoint.
///
/// - **URL:** `/api/1/movimientos`
/// - **Method:** `POST`
///
/// # Request Format
///
/// ```json
/// {
///   "producto_id": 1,
///   "usuario_id": 2,
///   "cantidad": 10,
///   "tipo_transaccion": "salida"
/// }
/// ```
///
/// # Response
///
/// - 201 with the movement; the product's `inventario` has changed.
/// - 409 if `cantidad` is not positive or a salida exceeds the stock.
/// - 400 if the product or user does not exist.
#[post("/1/movimientos", data = "<input>")]
pub async fn create_movimiento(
    db: DbConn,
    input: LoggedJson<MovimientoInput>,
) -> Result<status::Created<Json<ProductoUsuario>>, ApiError> {
    let input = input.into_inner();
    db.run_checked(move |conn| record_movement(conn, input))
        .await
        .map(|m| status::Created::new(format!("/api/1/movimientos/{}", m.id)).body(Json(m)))
        .map_err(error_response)
}

#[get("/1/movimientos/<movimiento_id>")]
pub async fn get_movimiento_route(
    db: DbConn,
    movimiento_id: i32,
) -> Result<Json<ProductoUsuario>, ApiError> {
    db.run_checked(move |conn| found("movimiento", movimiento_id, get_movimiento(conn, movimiento_id)?))
        .await
        .map(Json)
        .map_err(error_response)
}

#[get("/1/movimientos?<producto_id>&<usuario_id>&<tipo_transaccion>&<fecha_inicio>&<fecha_fin>")]
pub async fn list_movimientos_route(
    db: DbConn,
    producto_id: Option<i32>,
    usuario_id: Option<i32>,
    tipo_transaccion: Option<&str>,
    fecha_inicio: Option<&str>,
    fecha_fin: Option<&str>,
) -> Result<Json<Vec<ProductoUsuario>>, ApiError> {
    let tipo_transaccion = tipo_transaccion
        .map(str::parse::<TipoTransaccion>)
        .transpose()
        .map_err(error_response)?;
    let filter = MovimientoFilter {
        producto_id,
        usuario_id,
        tipo_transaccion,
        rango: rango(fecha_inicio, fecha_fin)?,
    };
    db.run_checked(move |conn| list_movimientos(conn, &filter))
        .await
        .map(Json)
        .map_err(error_response)
}

/// Movements of one product, newest first.
#[get("/1/productos/<producto_id>/movimientos")]
pub async fn list_producto_movimientos(
    db: DbConn,
    producto_id: i32,
) -> Result<Json<Vec<ProductoUsuario>>, ApiError> {
    db.run_checked(move |conn| {
        found("producto", producto_id, get_producto(conn, producto_id)?)?;
        let filter = MovimientoFilter {
            producto_id: Some(producto_id),
            ..Default::default()
        };
        list_movimientos(conn, &filter)
    })
    .await
    .map(Json)
    .map_err(error_response)
}

/// Update Movement endpoint.
///
/// - **URL:** `/api/1/movimientos/<movimiento_id>`
/// - **Method:** `PUT`
///
/// The old effect on stock is reverted and the new one applied in one
/// transaction; 409 if any product would end up negative.
#[put("/1/movimientos/<movimiento_id>", data = "<changes>")]
pub async fn update_movimiento_route(
    db: DbConn,
    movimiento_id: i32,
    changes: LoggedJson<MovimientoChanges>,
) -> Result<Json<ProductoUsuario>, ApiError> {
    let changes = changes.into_inner();
    db.run_checked(move |conn| update_movimiento(conn, movimiento_id, changes))
        .await
        .map(Json)
        .map_err(error_response)
}

pub fn routes() -> Vec<Route> {
    routes![
        create_producto,
        get_producto_route,
        list_productos_route,
        update_producto_route,
        create_movimiento,
        get_movimiento_route,
        list_movimientos_route,
        list_producto_movimientos,
        update_movimiento_route
    ]
}
