use diesel::prelude::*;

use crate::error::DataError;
use crate::models::{NewProducto, Producto, ProductoChanges, ProductoFilter, ProductoInput};
use crate::orm::{last_insert_rowid, require_non_negative, require_text};
use crate::schema::producto;

fn ensure_codigo_free(
    conn: &mut SqliteConnection,
    codigo: &str,
    except_id: Option<i32>,
) -> Result<(), DataError> {
    if let Some(existing) = get_producto_by_codigo(conn, codigo)? {
        if Some(existing.id) != except_id {
            return Err(DataError::Validation(format!(
                "codigo_producto '{}' is already used by producto {}",
                codigo, existing.id
            )));
        }
    }
    Ok(())
}

/// Creates a product with its opening stock (default 0). Afterwards stock
/// only moves through recorded movements.
pub fn insert_producto(conn: &mut SqliteConnection, input: ProductoInput) -> Result<Producto, DataError> {
    let codigo_producto = require_text("codigo_producto", &input.codigo_producto)?;
    ensure_codigo_free(conn, &codigo_producto, None)?;

    let new_producto = NewProducto {
        nombre: require_text("nombre", &input.nombre)?,
        codigo_producto,
        inventario: require_non_negative("inventario", input.inventario.unwrap_or(0))?,
    };

    diesel::insert_into(producto::table).values(&new_producto).execute(conn)?;
    let new_id = last_insert_rowid(conn)?;
    get_producto(conn, new_id)?.ok_or_else(|| DataError::not_found("producto", new_id))
}

pub fn get_producto(conn: &mut SqliteConnection, producto_id: i32) -> Result<Option<Producto>, DataError> {
    Ok(producto::table
        .find(producto_id)
        .select(Producto::as_select())
        .first(conn)
        .optional()?)
}

pub fn get_producto_by_codigo(
    conn: &mut SqliteConnection,
    codigo: &str,
) -> Result<Option<Producto>, DataError> {
    Ok(producto::table
        .filter(producto::codigo_producto.eq(codigo.trim()))
        .select(Producto::as_select())
        .first(conn)
        .optional()?)
}

pub fn list_productos(
    conn: &mut SqliteConnection,
    filter: &ProductoFilter,
) -> Result<Vec<Producto>, DataError> {
    let mut query = producto::table.into_boxed();
    if let Some(codigo) = &filter.codigo_producto {
        query = query.filter(producto::codigo_producto.eq(codigo.trim().to_string()));
    }
    Ok(query.order(producto::id.asc()).select(Producto::as_select()).load(conn)?)
}

pub fn update_producto(
    conn: &mut SqliteConnection,
    producto_id: i32,
    mut changes: ProductoChanges,
) -> Result<Producto, DataError> {
    let current = get_producto(conn, producto_id)?
        .ok_or_else(|| DataError::not_found("producto", producto_id))?;

    if let Some(nombre) = changes.nombre.take() {
        changes.nombre = Some(require_text("nombre", &nombre)?);
    }
    if let Some(codigo) = changes.codigo_producto.take() {
        let codigo = require_text("codigo_producto", &codigo)?;
        ensure_codigo_free(conn, &codigo, Some(producto_id))?;
        changes.codigo_producto = Some(codigo);
    }
    if changes.is_empty() {
        return Ok(current);
    }

    diesel::update(producto::table.find(producto_id)).set(&changes).execute(conn)?;
    get_producto(conn, producto_id)?.ok_or_else(|| DataError::not_found("producto", producto_id))
}

/// Adds `delta` (negative for withdrawals) to the stock of a product.
///
/// The arithmetic runs in SQL (64-bit in SQLite) and the `WHERE` clause
/// refuses any change that would leave the count negative or past
/// `i32::MAX`. Callers own the transaction.
pub(crate) fn apply_stock_delta(
    conn: &mut SqliteConnection,
    producto_id: i32,
    delta: i32,
) -> Result<(), DataError> {
    let updated = diesel::update(
        producto::table
            .find(producto_id)
            .filter((producto::inventario + delta).ge(0))
            .filter((producto::inventario + delta).le(i32::MAX)),
    )
    .set(producto::inventario.eq(producto::inventario + delta))
    .execute(conn)?;

    if updated == 0 {
        return match get_producto(conn, producto_id)? {
            Some(p) if i64::from(p.inventario) + i64::from(delta) > i64::from(i32::MAX) => {
                Err(DataError::Constraint(format!(
                    "inventario of producto {} would exceed {}: {} held, change of {}",
                    producto_id,
                    i32::MAX,
                    p.inventario,
                    delta
                )))
            }
            Some(p) => Err(DataError::Constraint(format!(
                "insufficient stock for producto {}: {} available, change of {}",
                producto_id, p.inventario, delta
            ))),
            None => Err(DataError::Validation(format!("producto {} does not exist", producto_id))),
        };
    }
    debug!("[inventario] producto {} inventario {:+}", producto_id, delta);
    Ok(())
}
