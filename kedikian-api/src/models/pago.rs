use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::filter::deserialize_some;
use crate::schema::pago;

#[derive(Deserialize, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, TS)]
#[diesel(table_name = pago)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Pago {
    pub id: i32,
    pub proyecto_id: i32,
    pub producto_id: Option<i32>,
    #[ts(type = "number")]
    pub monto: i64,
    #[ts(type = "string")]
    pub fecha: NaiveDateTime,
    pub descripcion: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = pago)]
pub struct NewPago {
    pub proyecto_id: i32,
    pub producto_id: Option<i32>,
    pub monto: i64,
    pub fecha: NaiveDateTime,
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct PagoInput {
    pub proyecto_id: i32,
    pub producto_id: Option<i32>,
    #[ts(type = "number")]
    pub monto: i64,
    #[ts(type = "string | null")]
    pub fecha: Option<NaiveDateTime>,
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, AsChangeset, TS)]
#[diesel(table_name = pago)]
#[ts(export)]
pub struct PagoChanges {
    pub proyecto_id: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub producto_id: Option<Option<i32>>,
    #[ts(type = "number | null")]
    pub monto: Option<i64>,
    #[ts(type = "string | null")]
    pub fecha: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub descripcion: Option<Option<String>>,
}

impl PagoChanges {
    pub fn is_empty(&self) -> bool {
        self.proyecto_id.is_none()
            && self.producto_id.is_none()
            && self.monto.is_none()
            && self.fecha.is_none()
            && self.descripcion.is_none()
    }
}
