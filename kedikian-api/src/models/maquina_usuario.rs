use chrono::NaiveDateTime;
use diesel::{AsChangeset, Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::maquina_usuario;

/// Assignment of an operator to a machine for one shift.
#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Associations,
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    TS,
)]
#[diesel(belongs_to(crate::models::maquina::Maquina))]
#[diesel(belongs_to(crate::models::usuario::Usuario))]
#[diesel(table_name = maquina_usuario)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct MaquinaUsuario {
    pub id: i32,
    pub maquina_id: i32,
    pub usuario_id: i32,
    #[ts(type = "string")]
    pub fecha_asignacion: NaiveDateTime,
    /// Shift length in hours.
    pub horas_turno: f64,
}

#[derive(Insertable)]
#[diesel(table_name = maquina_usuario)]
pub struct NewMaquinaUsuario {
    pub maquina_id: i32,
    pub usuario_id: i32,
    pub fecha_asignacion: NaiveDateTime,
    pub horas_turno: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct MaquinaUsuarioInput {
    pub maquina_id: i32,
    pub usuario_id: i32,
    #[ts(type = "string | null")]
    pub fecha_asignacion: Option<NaiveDateTime>,
    pub horas_turno: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, AsChangeset, TS)]
#[diesel(table_name = maquina_usuario)]
#[ts(export)]
pub struct MaquinaUsuarioChanges {
    pub maquina_id: Option<i32>,
    pub usuario_id: Option<i32>,
    #[ts(type = "string | null")]
    pub fecha_asignacion: Option<NaiveDateTime>,
    pub horas_turno: Option<f64>,
}

impl MaquinaUsuarioChanges {
    pub fn is_empty(&self) -> bool {
        self.maquina_id.is_none()
            && self.usuario_id.is_none()
            && self.fecha_asignacion.is_none()
            && self.horas_turno.is_none()
    }
}
