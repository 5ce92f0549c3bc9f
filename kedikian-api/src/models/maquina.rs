use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Deserialize, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, TS)]
#[diesel(table_name = crate::schema::maquina)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Maquina {
    pub id: i32,
    pub nombre: String,
    pub estado: bool,
    /// Accumulated usage hours. Never decreases.
    pub horas_uso: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::maquina)]
pub struct NewMaquina {
    pub nombre: String,
    pub estado: bool,
    pub horas_uso: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct MaquinaInput {
    pub nombre: String,
    pub estado: Option<bool>,
    pub horas_uso: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, AsChangeset, TS)]
#[diesel(table_name = crate::schema::maquina)]
#[ts(export)]
pub struct MaquinaChanges {
    pub nombre: Option<String>,
    pub estado: Option<bool>,
    pub horas_uso: Option<i32>,
}

impl MaquinaChanges {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none() && self.estado.is_none() && self.horas_uso.is_none()
    }
}
