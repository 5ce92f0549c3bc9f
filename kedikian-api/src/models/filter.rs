//! Listing filters and the small input helpers shared by the models.
//!
//! Every filter field is optional; an all-`None` filter lists everything.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::DataError;
use crate::models::TipoTransaccion;

/// Deserializes a present field into `Some`, including `null` into
/// `Some(None)`. Paired with `#[serde(default)]` an absent field stays `None`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Parses the date formats the frontend sends: a bare date, a naive
/// datetime, or an RFC 3339 timestamp (converted to UTC).
pub fn parse_fecha(raw: &str) -> Result<NaiveDateTime, DataError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts);
        }
    }
    Err(DataError::Validation(format!("unrecognised date '{}'", raw)))
}

/// Like [`parse_fecha`], but a bare date stands for the end of that day so
/// that an inclusive upper bound covers the whole day.
pub fn parse_fecha_fin(raw: &str) -> Result<NaiveDateTime, DataError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_nano_opt(23, 59, 59, 999_999_999) {
            return Ok(ts);
        }
    }
    parse_fecha(raw)
}

/// Inclusive date range. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct FechaRango {
    #[ts(type = "string | null")]
    pub fecha_inicio: Option<NaiveDateTime>,
    #[ts(type = "string | null")]
    pub fecha_fin: Option<NaiveDateTime>,
}

impl FechaRango {
    /// Builds a range from raw query-string values.
    pub fn parse(inicio: Option<&str>, fin: Option<&str>) -> Result<Self, DataError> {
        let rango = FechaRango {
            fecha_inicio: inicio.map(parse_fecha).transpose()?,
            fecha_fin: fin.map(parse_fecha_fin).transpose()?,
        };
        rango.validate()?;
        Ok(rango)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        match (self.fecha_inicio, self.fecha_fin) {
            (Some(inicio), Some(fin)) if inicio > fin => Err(DataError::Validation(format!(
                "fecha_inicio ({}) is after fecha_fin ({})",
                inicio, fin
            ))),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UsuarioFilter {
    pub estado: Option<bool>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MaquinaFilter {
    pub estado: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MaquinaUsuarioFilter {
    pub maquina_id: Option<i32>,
    pub usuario_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProyectoFilter {
    pub estado: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProyectoMaquinaFilter {
    pub proyecto_id: Option<i32>,
    pub maquina_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContratoFilter {
    pub proyecto_id: Option<i32>,
    pub cliente: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GastoFilter {
    pub usuario_id: Option<i32>,
    pub maquina_id: Option<i32>,
    pub tipo: Option<String>,
    pub rango: FechaRango,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PagoFilter {
    pub proyecto_id: Option<i32>,
    pub producto_id: Option<i32>,
    pub rango: FechaRango,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProductoFilter {
    pub codigo_producto: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MovimientoFilter {
    pub producto_id: Option<i32>,
    pub usuario_id: Option<i32>,
    pub tipo_transaccion: Option<TipoTransaccion>,
    pub rango: FechaRango,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fecha_accepts_frontend_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_fecha("2025-06-01").unwrap(), expected);
        assert_eq!(parse_fecha("2025-06-01T00:00:00").unwrap(), expected);
        assert_eq!(parse_fecha("2025-06-01 00:00:00").unwrap(), expected);
        assert_eq!(parse_fecha("2025-06-01T00:00:00.000Z").unwrap(), expected);
        assert_eq!(parse_fecha("2025-06-01T03:00:00+03:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_fecha_rejects_garbage() {
        let err = parse_fecha("mañana").unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = FechaRango::parse(Some("2025-06-02"), Some("2025-06-01")).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));

        let open = FechaRango::parse(None, Some("2025-06-01")).unwrap();
        assert!(open.fecha_inicio.is_none());
        let end_of_day = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .unwrap();
        assert_eq!(open.fecha_fin, Some(end_of_day));

        // Same day on both ends is a valid one-day range.
        assert!(FechaRango::parse(Some("2025-06-01"), Some("2025-06-01")).is_ok());
    }
}
