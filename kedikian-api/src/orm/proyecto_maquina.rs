//! Machine hours booked against projects.
//!
//! Each row's hours also accrue to `maquina.horas_uso`. Inserts and hour
//! corrections update both tables in one `BEGIN IMMEDIATE` transaction.

use diesel::prelude::*;

use crate::error::DataError;
use crate::models::{
    NewProyectoMaquina, ProyectoMaquina, ProyectoMaquinaChanges, ProyectoMaquinaFilter,
    ProyectoMaquinaInput,
};
use crate::orm::maquina::{add_horas_uso, get_maquina, require_active_maquina};
use crate::orm::proyecto::require_active_proyecto;
use crate::orm::{last_insert_rowid, now, require_non_negative};
use crate::schema::proyecto_maquina;

/// Books `horas_uso` hours of a machine on a project and adds them to the
/// machine's total.
pub fn insert_proyecto_maquina(
    conn: &mut SqliteConnection,
    input: ProyectoMaquinaInput,
) -> Result<ProyectoMaquina, DataError> {
    let horas = require_non_negative("horas_uso", input.horas_uso)?;

    conn.immediate_transaction(|conn| {
        require_active_proyecto(conn, input.proyecto_id)?;
        require_active_maquina(conn, input.maquina_id)?;

        let new_row = NewProyectoMaquina {
            proyecto_id: input.proyecto_id,
            maquina_id: input.maquina_id,
            horas_uso: horas,
            fecha_asignacion: input.fecha_asignacion.unwrap_or_else(now),
        };
        diesel::insert_into(proyecto_maquina::table).values(&new_row).execute(conn)?;
        let new_id = last_insert_rowid(conn)?;

        add_horas_uso(conn, input.maquina_id, horas)?;
        info!(
            "[maquina] {} h booked on proyecto {} for maquina {}",
            horas, input.proyecto_id, input.maquina_id
        );

        get_proyecto_maquina(conn, new_id)?
            .ok_or_else(|| DataError::not_found("proyecto_maquina", new_id))
    })
}

pub fn get_proyecto_maquina(
    conn: &mut SqliteConnection,
    row_id: i32,
) -> Result<Option<ProyectoMaquina>, DataError> {
    Ok(proyecto_maquina::table
        .find(row_id)
        .select(ProyectoMaquina::as_select())
        .first(conn)
        .optional()?)
}

pub fn list_proyecto_maquinas(
    conn: &mut SqliteConnection,
    filter: &ProyectoMaquinaFilter,
) -> Result<Vec<ProyectoMaquina>, DataError> {
    let mut query = proyecto_maquina::table.into_boxed();
    if let Some(proyecto_id) = filter.proyecto_id {
        query = query.filter(proyecto_maquina::proyecto_id.eq(proyecto_id));
    }
    if let Some(maquina_id) = filter.maquina_id {
        query = query.filter(proyecto_maquina::maquina_id.eq(maquina_id));
    }
    Ok(query
        .order(proyecto_maquina::id.asc())
        .select(ProyectoMaquina::as_select())
        .load(conn)?)
}

/// Project history of a machine, newest booking first.
pub fn historial_maquina(
    conn: &mut SqliteConnection,
    maquina_id: i32,
) -> Result<Vec<ProyectoMaquina>, DataError> {
    if get_maquina(conn, maquina_id)?.is_none() {
        return Err(DataError::not_found("maquina", maquina_id));
    }
    Ok(proyecto_maquina::table
        .filter(proyecto_maquina::maquina_id.eq(maquina_id))
        .order((proyecto_maquina::fecha_asignacion.desc(), proyecto_maquina::id.desc()))
        .select(ProyectoMaquina::as_select())
        .load(conn)?)
}

/// Corrects the hours or date of a booking.
///
/// Hours may only be raised: the difference is added to the machine, and a
/// lower value is refused because machine hours never decrease.
pub fn update_proyecto_maquina(
    conn: &mut SqliteConnection,
    row_id: i32,
    changes: ProyectoMaquinaChanges,
) -> Result<ProyectoMaquina, DataError> {
    if let Some(horas) = changes.horas_uso {
        require_non_negative("horas_uso", horas)?;
    }

    conn.immediate_transaction(|conn| {
        let current = get_proyecto_maquina(conn, row_id)?
            .ok_or_else(|| DataError::not_found("proyecto_maquina", row_id))?;
        if changes.is_empty() {
            return Ok(current);
        }

        if let Some(horas) = changes.horas_uso {
            let delta = horas - current.horas_uso;
            if delta < 0 {
                return Err(DataError::Constraint(format!(
                    "lowering proyecto_maquina {} from {} to {} h would decrease maquina {} hours",
                    row_id, current.horas_uso, horas, current.maquina_id
                )));
            }
            if delta > 0 {
                add_horas_uso(conn, current.maquina_id, delta)?;
            }
        }

        diesel::update(proyecto_maquina::table.find(row_id))
            .set((
                proyecto_maquina::horas_uso.eq(changes.horas_uso.unwrap_or(current.horas_uso)),
                proyecto_maquina::fecha_asignacion
                    .eq(changes.fecha_asignacion.unwrap_or(current.fecha_asignacion)),
            ))
            .execute(conn)?;

        get_proyecto_maquina(conn, row_id)?
            .ok_or_else(|| DataError::not_found("proyecto_maquina", row_id))
    })
}
