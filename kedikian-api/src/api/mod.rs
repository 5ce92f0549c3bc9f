//! HTTP API, version 1.
//!
//! Every route is a thin wrapper over one access-layer operation. Failures
//! come back as `{"error": "..."}` with a status derived from the
//! [`DataError`] category.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::DataError;
use crate::models::FechaRango;

pub mod asignacion;
pub mod contrato;
pub mod gasto;
pub mod maquina;
pub mod pago;
pub mod producto;
pub mod proyecto;
pub mod status;
pub mod usuario;

/// Error response structure for API failures.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = Custom<Json<ErrorResponse>>;

/// HTTP status for each error category.
pub fn error_status(err: &DataError) -> Status {
    match err {
        DataError::Validation(_) => Status::BadRequest,
        DataError::NotFound(_) => Status::NotFound,
        DataError::Constraint(_) => Status::Conflict,
        DataError::Database(_) => Status::InternalServerError,
    }
}

/// Logs a failed operation and turns it into a JSON error response.
///
/// Store failures are logged in full but answered with a generic message.
pub fn error_response(err: DataError) -> ApiError {
    let status = error_status(&err);
    let message = match &err {
        DataError::Database(e) => {
            error!("[api] Database error: {:?}", e);
            "Internal database error".to_string()
        }
        other => {
            warn!("[api] {} ({})", other, status.code);
            other.to_string()
        }
    };
    Custom(status, Json(ErrorResponse { error: message }))
}

/// Turns an absent row into `NotFound`.
pub(crate) fn found<T>(entity: &str, id: i32, row: Option<T>) -> Result<T, DataError> {
    row.ok_or_else(|| DataError::not_found(entity, id))
}

/// Parses the `fecha_inicio`/`fecha_fin` query parameters.
pub(crate) fn rango(
    fecha_inicio: Option<&str>,
    fecha_fin: Option<&str>,
) -> Result<FechaRango, ApiError> {
    FechaRango::parse(fecha_inicio, fecha_fin).map_err(error_response)
}

/// All routes of the API, to be mounted under `/api`.
pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(status::routes());
    routes.extend(usuario::routes());
    routes.extend(maquina::routes());
    routes.extend(asignacion::routes());
    routes.extend(proyecto::routes());
    routes.extend(contrato::routes());
    routes.extend(gasto::routes());
    routes.extend(pago::routes());
    routes.extend(producto::routes());
    routes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories_map_to_statuses() {
        assert_eq!(error_status(&DataError::Validation("x".into())), Status::BadRequest);
        assert_eq!(error_status(&DataError::NotFound("x".into())), Status::NotFound);
        assert_eq!(error_status(&DataError::Constraint("x".into())), Status::Conflict);
        assert_eq!(
            error_status(&DataError::Database(diesel::result::Error::RollbackTransaction)),
            Status::InternalServerError
        );
    }

    #[test]
    fn test_store_failures_are_not_leaked() {
        let response = error_response(DataError::Database(
            diesel::result::Error::RollbackTransaction,
        ));
        assert_eq!(response.0, Status::InternalServerError);
        assert_eq!(response.1.error, "Internal database error");
    }
}
