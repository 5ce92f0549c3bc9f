pub mod contrato;
mod db;
pub mod gasto;
pub mod maquina;
pub mod maquina_usuario;
pub mod pago;
pub mod producto;
pub mod producto_usuario;
pub mod proyecto;
pub mod proyecto_maquina;
pub mod testing;
pub mod usuario;

pub use db::*;

use chrono::{NaiveDateTime, Utc};

use crate::error::DataError;

/// Current time in UTC, the default for every `fecha*` column.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Trims `value` and rejects it if nothing is left.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String, DataError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DataError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Rejects negative amounts and hour counts.
pub(crate) fn require_non_negative<T>(field: &str, value: T) -> Result<T, DataError>
where
    T: PartialOrd + Default + std::fmt::Display + Copy,
{
    if value < T::default() {
        return Err(DataError::Constraint(format!(
            "{} must not be negative (got {})",
            field, value
        )));
    }
    Ok(value)
}
