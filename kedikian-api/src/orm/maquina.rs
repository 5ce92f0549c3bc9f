use diesel::prelude::*;

use crate::error::DataError;
use crate::models::{Maquina, MaquinaChanges, MaquinaFilter, MaquinaInput, NewMaquina};
use crate::orm::{last_insert_rowid, require_non_negative, require_text};
use crate::schema::maquina;

pub fn insert_maquina(conn: &mut SqliteConnection, input: MaquinaInput) -> Result<Maquina, DataError> {
    let new_maquina = NewMaquina {
        nombre: require_text("nombre", &input.nombre)?,
        estado: input.estado.unwrap_or(true),
        horas_uso: require_non_negative("horas_uso", input.horas_uso.unwrap_or(0))?,
    };

    diesel::insert_into(maquina::table).values(&new_maquina).execute(conn)?;
    let new_id = last_insert_rowid(conn)?;
    get_maquina(conn, new_id)?.ok_or_else(|| DataError::not_found("maquina", new_id))
}

pub fn get_maquina(conn: &mut SqliteConnection, maquina_id: i32) -> Result<Option<Maquina>, DataError> {
    Ok(maquina::table
        .find(maquina_id)
        .select(Maquina::as_select())
        .first(conn)
        .optional()?)
}

pub fn list_maquinas(
    conn: &mut SqliteConnection,
    filter: &MaquinaFilter,
) -> Result<Vec<Maquina>, DataError> {
    let mut query = maquina::table.into_boxed();
    if let Some(estado) = filter.estado {
        query = query.filter(maquina::estado.eq(estado));
    }
    Ok(query.order(maquina::id.asc()).select(Maquina::as_select()).load(conn)?)
}

/// Applies a partial update. `horas_uso` may only grow; use
/// [`record_machine_usage`] for ordinary accrual.
///
/// The check and the write share one `BEGIN IMMEDIATE` transaction, so a
/// concurrent increment cannot slip in between them.
pub fn update_maquina(
    conn: &mut SqliteConnection,
    maquina_id: i32,
    mut changes: MaquinaChanges,
) -> Result<Maquina, DataError> {
    if let Some(nombre) = changes.nombre.take() {
        changes.nombre = Some(require_text("nombre", &nombre)?);
    }

    conn.immediate_transaction(|conn| {
        let current = get_maquina(conn, maquina_id)?
            .ok_or_else(|| DataError::not_found("maquina", maquina_id))?;

        if let Some(horas) = changes.horas_uso {
            if horas < current.horas_uso {
                return Err(DataError::Constraint(format!(
                    "horas_uso of maquina {} cannot go down from {} to {}",
                    maquina_id, current.horas_uso, horas
                )));
            }
        }
        if changes.is_empty() {
            return Ok(current);
        }

        diesel::update(maquina::table.find(maquina_id)).set(&changes).execute(conn)?;
        get_maquina(conn, maquina_id)?.ok_or_else(|| DataError::not_found("maquina", maquina_id))
    })
}

/// Marks a machine inactive. The row stays readable.
pub fn soft_delete_maquina(conn: &mut SqliteConnection, maquina_id: i32) -> Result<Maquina, DataError> {
    let updated = diesel::update(maquina::table.find(maquina_id))
        .set(maquina::estado.eq(false))
        .execute(conn)?;
    if updated == 0 {
        return Err(DataError::not_found("maquina", maquina_id));
    }
    get_maquina(conn, maquina_id)?.ok_or_else(|| DataError::not_found("maquina", maquina_id))
}

/// Adds `horas` to the machine's accumulated usage.
///
/// The increment runs as `horas_uso = horas_uso + ?` inside a
/// `BEGIN IMMEDIATE` transaction, so concurrent callers serialize on the
/// write lock and no increment is lost.
pub fn record_machine_usage(
    conn: &mut SqliteConnection,
    maquina_id: i32,
    horas: i32,
) -> Result<Maquina, DataError> {
    require_non_negative("horas", horas)?;

    conn.immediate_transaction(|conn| {
        add_horas_uso(conn, maquina_id, horas)?;
        get_maquina(conn, maquina_id)?.ok_or_else(|| DataError::not_found("maquina", maquina_id))
    })
}

/// Increments `horas_uso` in place, refusing a total past `i32::MAX`.
/// Callers own the transaction.
pub(crate) fn add_horas_uso(
    conn: &mut SqliteConnection,
    maquina_id: i32,
    horas: i32,
) -> Result<(), DataError> {
    let updated = diesel::update(
        maquina::table
            .find(maquina_id)
            .filter((maquina::horas_uso + horas).le(i32::MAX)),
    )
    .set(maquina::horas_uso.eq(maquina::horas_uso + horas))
    .execute(conn)?;

    if updated == 0 {
        return match get_maquina(conn, maquina_id)? {
            Some(m) => Err(DataError::Constraint(format!(
                "horas_uso of maquina {} would exceed {}: {} accrued, adding {}",
                maquina_id,
                i32::MAX,
                m.horas_uso,
                horas
            ))),
            None => Err(DataError::not_found("maquina", maquina_id)),
        };
    }
    debug!("[maquina] horas_uso of maquina {} += {}", maquina_id, horas);
    Ok(())
}

/// Loads a machine that another row is about to reference. A missing or
/// inactive machine is a validation failure of the referencing input.
pub fn require_active_maquina(
    conn: &mut SqliteConnection,
    maquina_id: i32,
) -> Result<Maquina, DataError> {
    match get_maquina(conn, maquina_id)? {
        Some(m) if m.estado => Ok(m),
        Some(_) => Err(DataError::Validation(format!("maquina {} is inactive", maquina_id))),
        None => Err(DataError::Validation(format!("maquina {} does not exist", maquina_id))),
    }
}
