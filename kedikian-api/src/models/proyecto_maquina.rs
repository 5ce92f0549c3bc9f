use chrono::NaiveDateTime;
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::proyecto_maquina;

/// Hours a machine worked on a project. The hours also accrue to
/// `Maquina::horas_uso`.
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
#[diesel(belongs_to(crate::models::proyecto::Proyecto))]
#[diesel(belongs_to(crate::models::maquina::Maquina))]
#[diesel(table_name = proyecto_maquina)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct ProyectoMaquina {
    pub id: i32,
    pub proyecto_id: i32,
    pub maquina_id: i32,
    pub horas_uso: i32,
    #[ts(type = "string")]
    pub fecha_asignacion: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = proyecto_maquina)]
pub struct NewProyectoMaquina {
    pub proyecto_id: i32,
    pub maquina_id: i32,
    pub horas_uso: i32,
    pub fecha_asignacion: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ProyectoMaquinaInput {
    pub proyecto_id: i32,
    pub maquina_id: i32,
    pub horas_uso: i32,
    #[ts(type = "string | null")]
    pub fecha_asignacion: Option<NaiveDateTime>,
}

/// Only the hours and the date may change; moving the row to another
/// machine or project would rewrite another machine's history.
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ProyectoMaquinaChanges {
    pub horas_uso: Option<i32>,
    #[ts(type = "string | null")]
    pub fecha_asignacion: Option<NaiveDateTime>,
}

impl ProyectoMaquinaChanges {
    pub fn is_empty(&self) -> bool {
        self.horas_uso.is_none() && self.fecha_asignacion.is_none()
    }
}
