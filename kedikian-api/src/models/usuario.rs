use crate::schema::usuario;
use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Deserialize, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, TS)]
#[diesel(table_name = usuario)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Usuario {
    pub id: i32,
    pub nombre: String,
    pub email: String, // Unique, compared case-insensitively
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub hash_contrasena: String,
    pub estado: bool,
    pub roles: String,
    #[ts(type = "string")]
    pub fecha_creacion: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = usuario)]
pub struct NewUsuario {
    pub nombre: String,
    pub email: String,
    pub hash_contrasena: String,
    pub estado: bool,
    pub roles: String,
    pub fecha_creacion: NaiveDateTime,
}

// For API inputs and validation
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UsuarioInput {
    pub nombre: String,
    pub email: String,
    pub hash_contrasena: String,
    pub estado: Option<bool>,
    pub roles: Option<String>,
    #[ts(type = "string | null")]
    pub fecha_creacion: Option<NaiveDateTime>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize, Serialize, AsChangeset, TS)]
#[diesel(table_name = usuario)]
#[ts(export)]
pub struct UsuarioChanges {
    pub nombre: Option<String>,
    pub email: Option<String>,
    pub hash_contrasena: Option<String>,
    pub estado: Option<bool>,
    pub roles: Option<String>,
}

impl UsuarioChanges {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.email.is_none()
            && self.hash_contrasena.is_none()
            && self.estado.is_none()
            && self.roles.is_none()
    }
}
