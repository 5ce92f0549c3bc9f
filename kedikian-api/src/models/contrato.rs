use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::filter::deserialize_some;
use crate::schema::contrato;

#[derive(Deserialize, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, TS)]
#[diesel(table_name = contrato)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Contrato {
    pub id: i32,
    pub proyecto_id: Option<i32>,
    pub detalle: Option<String>,
    pub cliente: String,
    #[ts(type = "number")]
    pub importe_total: i64,
    #[ts(type = "string | null")]
    pub fecha_inicio: Option<NaiveDateTime>,
    #[ts(type = "string | null")]
    pub fecha_terminacion: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = contrato)]
pub struct NewContrato {
    pub proyecto_id: Option<i32>,
    pub detalle: Option<String>,
    pub cliente: String,
    pub importe_total: i64,
    pub fecha_inicio: Option<NaiveDateTime>,
    pub fecha_terminacion: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ContratoInput {
    pub proyecto_id: Option<i32>,
    pub detalle: Option<String>,
    pub cliente: String,
    #[ts(type = "number")]
    pub importe_total: i64,
    #[ts(type = "string | null")]
    pub fecha_inicio: Option<NaiveDateTime>,
    #[ts(type = "string | null")]
    pub fecha_terminacion: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, AsChangeset, TS)]
#[diesel(table_name = contrato)]
#[ts(export)]
pub struct ContratoChanges {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub proyecto_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub detalle: Option<Option<String>>,
    pub cliente: Option<String>,
    #[ts(type = "number | null")]
    pub importe_total: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[ts(type = "string | null")]
    pub fecha_inicio: Option<Option<NaiveDateTime>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[ts(type = "string | null")]
    pub fecha_terminacion: Option<Option<NaiveDateTime>>,
}

impl ContratoChanges {
    pub fn is_empty(&self) -> bool {
        self.proyecto_id.is_none()
            && self.detalle.is_none()
            && self.cliente.is_none()
            && self.importe_total.is_none()
            && self.fecha_inicio.is_none()
            && self.fecha_terminacion.is_none()
    }
}
