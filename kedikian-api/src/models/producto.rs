use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Deserialize, Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, TS)]
#[diesel(table_name = crate::schema::producto)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Producto {
    pub id: i32,
    pub nombre: String,
    pub codigo_producto: String,
    /// Units in stock.
    pub inventario: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::producto)]
pub struct NewProducto {
    pub nombre: String,
    pub codigo_producto: String,
    pub inventario: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ProductoInput {
    pub nombre: String,
    pub codigo_producto: String,
    pub inventario: Option<i32>,
}

/// Stock is only changed through movements, so it is not part of the
/// changeset.
#[derive(Debug, Clone, Default, Deserialize, Serialize, AsChangeset, TS)]
#[diesel(table_name = crate::schema::producto)]
#[ts(export)]
pub struct ProductoChanges {
    pub nombre: Option<String>,
    pub codigo_producto: Option<String>,
}

impl ProductoChanges {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none() && self.codigo_producto.is_none()
    }
}
