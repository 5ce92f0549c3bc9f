use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::DataError;
use crate::schema::producto_usuario;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow, Serialize, Deserialize, TS)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TipoTransaccion {
    /// Stock intake.
    Entrada,
    /// Stock withdrawal.
    Salida,
}

impl TipoTransaccion {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoTransaccion::Entrada => "entrada",
            TipoTransaccion::Salida => "salida",
        }
    }

    /// Signed effect of `cantidad` units on the stock count.
    pub fn delta(&self, cantidad: i32) -> i32 {
        match self {
            TipoTransaccion::Entrada => cantidad,
            TipoTransaccion::Salida => -cantidad,
        }
    }
}

impl fmt::Display for TipoTransaccion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TipoTransaccion {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entrada" => Ok(TipoTransaccion::Entrada),
            "salida" => Ok(TipoTransaccion::Salida),
            other => Err(DataError::Validation(format!(
                "tipo_transaccion must be 'entrada' or 'salida', got '{}'",
                other
            ))),
        }
    }
}

impl ToSql<Text, Sqlite> for TipoTransaccion {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for TipoTransaccion {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let raw = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        raw.parse().map_err(Into::into)
    }
}

/// A stock movement of a product, recorded against the user who made it.
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
#[diesel(belongs_to(crate::models::producto::Producto))]
#[diesel(belongs_to(crate::models::usuario::Usuario))]
#[diesel(table_name = producto_usuario)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct ProductoUsuario {
    pub id: i32,
    pub producto_id: i32,
    pub usuario_id: i32,
    pub cantidad: i32,
    #[ts(type = "string")]
    pub fecha: NaiveDateTime,
    pub tipo_transaccion: TipoTransaccion,
}

#[derive(Insertable)]
#[diesel(table_name = producto_usuario)]
pub struct NewProductoUsuario {
    pub producto_id: i32,
    pub usuario_id: i32,
    pub cantidad: i32,
    pub fecha: NaiveDateTime,
    pub tipo_transaccion: TipoTransaccion,
}

#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct MovimientoInput {
    pub producto_id: i32,
    pub usuario_id: i32,
    pub cantidad: i32,
    pub tipo_transaccion: TipoTransaccion,
    #[ts(type = "string | null")]
    pub fecha: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct MovimientoChanges {
    pub producto_id: Option<i32>,
    pub usuario_id: Option<i32>,
    pub cantidad: Option<i32>,
    pub tipo_transaccion: Option<TipoTransaccion>,
    #[ts(type = "string | null")]
    pub fecha: Option<NaiveDateTime>,
}

impl MovimientoChanges {
    pub fn is_empty(&self) -> bool {
        self.producto_id.is_none()
            && self.usuario_id.is_none()
            && self.cantidad.is_none()
            && self.tipo_transaccion.is_none()
            && self.fecha.is_none()
    }
}
