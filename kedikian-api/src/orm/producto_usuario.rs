//! Stock movements.
//!
//! A movement row and the stock change it causes are written in the same
//! `BEGIN IMMEDIATE` transaction. The write lock is taken before anything is
//! read, so concurrent withdrawals on one product serialize and stock never
//! goes negative.

use diesel::prelude::*;

use crate::error::DataError;
use crate::models::{
    MovimientoChanges, MovimientoFilter, MovimientoInput, NewProductoUsuario, ProductoUsuario,
};
use crate::orm::producto::apply_stock_delta;
use crate::orm::usuario::require_active_usuario;
use crate::orm::{last_insert_rowid, now};
use crate::schema::producto_usuario;

fn require_positive_cantidad(cantidad: i32) -> Result<i32, DataError> {
    if cantidad <= 0 {
        return Err(DataError::Constraint(format!(
            "cantidad must be greater than zero (got {})",
            cantidad
        )));
    }
    Ok(cantidad)
}

/// Records a stock movement and adjusts the product's inventario by
/// `+cantidad` (entrada) or `-cantidad` (salida).
///
/// Fails with `Constraint` for a non-positive cantidad or when a salida
/// exceeds the stock, and with `Validation` when the product does not exist
/// or the user does not exist or is inactive. On failure nothing is written.
pub fn record_movement(
    conn: &mut SqliteConnection,
    input: MovimientoInput,
) -> Result<ProductoUsuario, DataError> {
    let cantidad = require_positive_cantidad(input.cantidad)?;

    conn.immediate_transaction(|conn| {
        require_active_usuario(conn, input.usuario_id)?;
        apply_stock_delta(conn, input.producto_id, input.tipo_transaccion.delta(cantidad))?;

        let new_row = NewProductoUsuario {
            producto_id: input.producto_id,
            usuario_id: input.usuario_id,
            cantidad,
            fecha: input.fecha.unwrap_or_else(now),
            tipo_transaccion: input.tipo_transaccion,
        };
        diesel::insert_into(producto_usuario::table).values(&new_row).execute(conn)?;
        let new_id = last_insert_rowid(conn)?;

        info!(
            "[inventario] {} of {} units on producto {} by usuario {}",
            input.tipo_transaccion, cantidad, input.producto_id, input.usuario_id
        );
        get_movimiento(conn, new_id)?.ok_or_else(|| DataError::not_found("movimiento", new_id))
    })
}

/// Re-applies an edited movement: the old effect is reverted and the new one
/// applied, possibly on a different product. Either step failing rolls back
/// both.
pub fn update_movimiento(
    conn: &mut SqliteConnection,
    movimiento_id: i32,
    changes: MovimientoChanges,
) -> Result<ProductoUsuario, DataError> {
    if let Some(cantidad) = changes.cantidad {
        require_positive_cantidad(cantidad)?;
    }

    conn.immediate_transaction(|conn| {
        let current = get_movimiento(conn, movimiento_id)?
            .ok_or_else(|| DataError::not_found("movimiento", movimiento_id))?;
        if changes.is_empty() {
            return Ok(current);
        }

        let producto_id = changes.producto_id.unwrap_or(current.producto_id);
        let usuario_id = changes.usuario_id.unwrap_or(current.usuario_id);
        let cantidad = changes.cantidad.unwrap_or(current.cantidad);
        let tipo = changes.tipo_transaccion.unwrap_or(current.tipo_transaccion);
        let fecha = changes.fecha.unwrap_or(current.fecha);

        if usuario_id != current.usuario_id {
            require_active_usuario(conn, usuario_id)?;
        }

        let old_delta = current.tipo_transaccion.delta(current.cantidad);
        let new_delta = tipo.delta(cantidad);
        if producto_id == current.producto_id {
            // Stock lies in 0..=i32::MAX, so a net change outside i32 would
            // overdraw or overflow it either way.
            let net = i32::try_from(i64::from(new_delta) - i64::from(old_delta)).map_err(|_| {
                DataError::Constraint(format!(
                    "movimiento {} cannot change stock of producto {} by {}",
                    movimiento_id,
                    producto_id,
                    i64::from(new_delta) - i64::from(old_delta)
                ))
            })?;
            apply_stock_delta(conn, producto_id, net)?;
        } else {
            apply_stock_delta(conn, current.producto_id, -old_delta)?;
            apply_stock_delta(conn, producto_id, new_delta)?;
        }

        diesel::update(producto_usuario::table.find(movimiento_id))
            .set((
                producto_usuario::producto_id.eq(producto_id),
                producto_usuario::usuario_id.eq(usuario_id),
                producto_usuario::cantidad.eq(cantidad),
                producto_usuario::tipo_transaccion.eq(tipo),
                producto_usuario::fecha.eq(fecha),
            ))
            .execute(conn)?;

        info!(
            "[inventario] movimiento {} re-applied: {} {} on producto {}",
            movimiento_id, tipo, cantidad, producto_id
        );
        get_movimiento(conn, movimiento_id)?
            .ok_or_else(|| DataError::not_found("movimiento", movimiento_id))
    })
}

pub fn get_movimiento(
    conn: &mut SqliteConnection,
    movimiento_id: i32,
) -> Result<Option<ProductoUsuario>, DataError> {
    Ok(producto_usuario::table
        .find(movimiento_id)
        .select(ProductoUsuario::as_select())
        .first(conn)
        .optional()?)
}

/// Lists movements, newest first.
pub fn list_movimientos(
    conn: &mut SqliteConnection,
    filter: &MovimientoFilter,
) -> Result<Vec<ProductoUsuario>, DataError> {
    filter.rango.validate()?;

    let mut query = producto_usuario::table.into_boxed();
    if let Some(producto_id) = filter.producto_id {
        query = query.filter(producto_usuario::producto_id.eq(producto_id));
    }
    if let Some(usuario_id) = filter.usuario_id {
        query = query.filter(producto_usuario::usuario_id.eq(usuario_id));
    }
    if let Some(tipo) = filter.tipo_transaccion {
        query = query.filter(producto_usuario::tipo_transaccion.eq(tipo));
    }
    if let Some(desde) = filter.rango.fecha_inicio {
        query = query.filter(producto_usuario::fecha.ge(desde));
    }
    if let Some(hasta) = filter.rango.fecha_fin {
        query = query.filter(producto_usuario::fecha.le(hasta));
    }
    Ok(query
        .order((producto_usuario::fecha.desc(), producto_usuario::id.desc()))
        .select(ProductoUsuario::as_select())
        .load(conn)?)
}
