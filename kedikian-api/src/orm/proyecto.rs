use diesel::prelude::*;

use crate::error::DataError;
use crate::models::{NewProyecto, Proyecto, ProyectoChanges, ProyectoFilter, ProyectoInput};
use crate::orm::contrato::get_contrato;
use crate::orm::{last_insert_rowid, now, require_text};
use crate::schema::proyecto;

/// A project may point at an existing contract that no other project
/// already uses.
fn ensure_contrato_available(
    conn: &mut SqliteConnection,
    contrato_id: i32,
    except_proyecto: Option<i32>,
) -> Result<(), DataError> {
    if get_contrato(conn, contrato_id)?.is_none() {
        return Err(DataError::Validation(format!("contrato {} does not exist", contrato_id)));
    }
    let holder: Option<i32> = proyecto::table
        .filter(proyecto::contrato_id.eq(contrato_id))
        .select(proyecto::id)
        .first(conn)
        .optional()?;
    match holder {
        Some(other) if Some(other) != except_proyecto => Err(DataError::Validation(format!(
            "contrato {} is already linked to proyecto {}",
            contrato_id, other
        ))),
        _ => Ok(()),
    }
}

pub fn insert_proyecto(conn: &mut SqliteConnection, input: ProyectoInput) -> Result<Proyecto, DataError> {
    if let Some(contrato_id) = input.contrato_id {
        ensure_contrato_available(conn, contrato_id, None)?;
    }

    let new_proyecto = NewProyecto {
        nombre: require_text("nombre", &input.nombre)?,
        estado: input.estado.unwrap_or(true),
        fecha_creacion: input.fecha_creacion.unwrap_or_else(now),
        contrato_id: input.contrato_id,
        ubicacion: input.ubicacion,
    };

    diesel::insert_into(proyecto::table).values(&new_proyecto).execute(conn)?;
    let new_id = last_insert_rowid(conn)?;
    get_proyecto(conn, new_id)?.ok_or_else(|| DataError::not_found("proyecto", new_id))
}

pub fn get_proyecto(conn: &mut SqliteConnection, proyecto_id: i32) -> Result<Option<Proyecto>, DataError> {
    Ok(proyecto::table
        .find(proyecto_id)
        .select(Proyecto::as_select())
        .first(conn)
        .optional()?)
}

pub fn list_proyectos(
    conn: &mut SqliteConnection,
    filter: &ProyectoFilter,
) -> Result<Vec<Proyecto>, DataError> {
    let mut query = proyecto::table.into_boxed();
    if let Some(estado) = filter.estado {
        query = query.filter(proyecto::estado.eq(estado));
    }
    Ok(query.order(proyecto::id.asc()).select(Proyecto::as_select()).load(conn)?)
}

pub fn update_proyecto(
    conn: &mut SqliteConnection,
    proyecto_id: i32,
    mut changes: ProyectoChanges,
) -> Result<Proyecto, DataError> {
    let current = get_proyecto(conn, proyecto_id)?
        .ok_or_else(|| DataError::not_found("proyecto", proyecto_id))?;

    if let Some(nombre) = changes.nombre.take() {
        changes.nombre = Some(require_text("nombre", &nombre)?);
    }
    if let Some(Some(contrato_id)) = changes.contrato_id {
        ensure_contrato_available(conn, contrato_id, Some(proyecto_id))?;
    }
    if changes.is_empty() {
        return Ok(current);
    }

    diesel::update(proyecto::table.find(proyecto_id)).set(&changes).execute(conn)?;
    get_proyecto(conn, proyecto_id)?.ok_or_else(|| DataError::not_found("proyecto", proyecto_id))
}

/// Marks a project inactive. The row stays readable.
pub fn soft_delete_proyecto(conn: &mut SqliteConnection, proyecto_id: i32) -> Result<Proyecto, DataError> {
    let updated = diesel::update(proyecto::table.find(proyecto_id))
        .set(proyecto::estado.eq(false))
        .execute(conn)?;
    if updated == 0 {
        return Err(DataError::not_found("proyecto", proyecto_id));
    }
    get_proyecto(conn, proyecto_id)?.ok_or_else(|| DataError::not_found("proyecto", proyecto_id))
}

/// Loads a project that another row is about to reference.
pub fn require_active_proyecto(
    conn: &mut SqliteConnection,
    proyecto_id: i32,
) -> Result<Proyecto, DataError> {
    match get_proyecto(conn, proyecto_id)? {
        Some(p) if p.estado => Ok(p),
        Some(_) => Err(DataError::Validation(format!("proyecto {} is inactive", proyecto_id))),
        None => Err(DataError::Validation(format!("proyecto {} does not exist", proyecto_id))),
    }
}
