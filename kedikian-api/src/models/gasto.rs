use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::filter::deserialize_some;
use crate::schema::gasto;

/// An expense, attributable to a user, a machine, or both.
#[derive(Deserialize, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, TS)]
#[diesel(table_name = gasto)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Gasto {
    pub id: i32,
    pub usuario_id: Option<i32>,
    pub maquina_id: Option<i32>,
    pub tipo: String,
    #[ts(type = "number")]
    pub importe_total: i64,
    #[ts(type = "string")]
    pub fecha: NaiveDateTime,
    pub descripcion: Option<String>,
    /// Reference to the attached receipt image (path or URL).
    pub imagen: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = gasto)]
pub struct NewGasto {
    pub usuario_id: Option<i32>,
    pub maquina_id: Option<i32>,
    pub tipo: String,
    pub importe_total: i64,
    pub fecha: NaiveDateTime,
    pub descripcion: Option<String>,
    pub imagen: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct GastoInput {
    pub usuario_id: Option<i32>,
    pub maquina_id: Option<i32>,
    pub tipo: String,
    #[ts(type = "number")]
    pub importe_total: i64,
    #[ts(type = "string | null")]
    pub fecha: Option<NaiveDateTime>,
    pub descripcion: Option<String>,
    pub imagen: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, AsChangeset, TS)]
#[diesel(table_name = gasto)]
#[ts(export)]
pub struct GastoChanges {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub usuario_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub maquina_id: Option<Option<i32>>,
    pub tipo: Option<String>,
    #[ts(type = "number | null")]
    pub importe_total: Option<i64>,
    #[ts(type = "string | null")]
    pub fecha: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub descripcion: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub imagen: Option<Option<String>>,
}

impl GastoChanges {
    pub fn is_empty(&self) -> bool {
        self.usuario_id.is_none()
            && self.maquina_id.is_none()
            && self.tipo.is_none()
            && self.importe_total.is_none()
            && self.fecha.is_none()
            && self.descripcion.is_none()
            && self.imagen.is_none()
    }
}
