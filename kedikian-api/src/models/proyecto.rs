use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::filter::deserialize_some;
use crate::schema::proyecto;

#[derive(Deserialize, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, TS)]
#[diesel(table_name = proyecto)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Proyecto {
    pub id: i32,
    pub nombre: String,
    pub estado: bool,
    #[ts(type = "string")]
    pub fecha_creacion: NaiveDateTime,
    pub contrato_id: Option<i32>,
    pub ubicacion: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = proyecto)]
pub struct NewProyecto {
    pub nombre: String,
    pub estado: bool,
    pub fecha_creacion: NaiveDateTime,
    pub contrato_id: Option<i32>,
    pub ubicacion: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ProyectoInput {
    pub nombre: String,
    pub estado: Option<bool>,
    #[ts(type = "string | null")]
    pub fecha_creacion: Option<NaiveDateTime>,
    pub contrato_id: Option<i32>,
    pub ubicacion: Option<String>,
}

/// Partial update. The double options distinguish "leave as is" (absent)
/// from "clear" (`null`).
#[derive(Debug, Clone, Default, Deserialize, Serialize, AsChangeset, TS)]
#[diesel(table_name = proyecto)]
#[ts(export)]
pub struct ProyectoChanges {
    pub nombre: Option<String>,
    pub estado: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub contrato_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub ubicacion: Option<Option<String>>,
}

impl ProyectoChanges {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.estado.is_none()
            && self.contrato_id.is_none()
            && self.ubicacion.is_none()
    }
}
