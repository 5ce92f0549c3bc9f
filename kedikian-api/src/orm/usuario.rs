use diesel::prelude::*;

use crate::error::DataError;
use crate::models::{NewUsuario, Usuario, UsuarioChanges, UsuarioFilter, UsuarioInput};
use crate::orm::{last_insert_rowid, now, require_text};
use crate::schema::usuario;

/// Normalizes an email address and checks it looks like one.
fn validate_email(raw: &str) -> Result<String, DataError> {
    let email = require_text("email", raw)?;
    if !email.contains('@') {
        return Err(DataError::Validation(format!("'{}' is not a valid email address", email)));
    }
    Ok(email)
}

/// Rejects `email` if another user already holds it, ignoring letter case.
fn ensure_email_free(
    conn: &mut SqliteConnection,
    email: &str,
    except_id: Option<i32>,
) -> Result<(), DataError> {
    if let Some(existing) = get_usuario_by_email(conn, email)? {
        if Some(existing.id) != except_id {
            return Err(DataError::Validation(format!("email '{}' is already registered", email)));
        }
    }
    Ok(())
}

/// Creates a new user. `estado` defaults to active and `fecha_creacion` to
/// now.
pub fn insert_usuario(conn: &mut SqliteConnection, input: UsuarioInput) -> Result<Usuario, DataError> {
    let email = validate_email(&input.email)?;
    ensure_email_free(conn, &email, None)?;

    let new_usuario = NewUsuario {
        nombre: require_text("nombre", &input.nombre)?,
        email,
        hash_contrasena: input.hash_contrasena,
        estado: input.estado.unwrap_or(true),
        roles: input.roles.unwrap_or_default(),
        fecha_creacion: input.fecha_creacion.unwrap_or_else(now),
    };

    diesel::insert_into(usuario::table).values(&new_usuario).execute(conn)?;
    let new_id = last_insert_rowid(conn)?;
    get_usuario(conn, new_id)?.ok_or_else(|| DataError::not_found("usuario", new_id))
}

/// Gets a user by id.
pub fn get_usuario(conn: &mut SqliteConnection, usuario_id: i32) -> Result<Option<Usuario>, DataError> {
    Ok(usuario::table
        .find(usuario_id)
        .select(Usuario::as_select())
        .first(conn)
        .optional()?)
}

/// Gets a user by email. The column is `COLLATE NOCASE`, so the lookup
/// ignores letter case.
pub fn get_usuario_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<Usuario>, DataError> {
    Ok(usuario::table
        .filter(usuario::email.eq(email.trim()))
        .select(Usuario::as_select())
        .first(conn)
        .optional()?)
}

pub fn list_usuarios(
    conn: &mut SqliteConnection,
    filter: &UsuarioFilter,
) -> Result<Vec<Usuario>, DataError> {
    let mut query = usuario::table.into_boxed();
    if let Some(estado) = filter.estado {
        query = query.filter(usuario::estado.eq(estado));
    }
    if let Some(email) = &filter.email {
        query = query.filter(usuario::email.eq(email.trim().to_string()));
    }
    Ok(query.order(usuario::id.asc()).select(Usuario::as_select()).load(conn)?)
}

/// Applies a partial update. Email changes are validated the same way as on
/// creation.
pub fn update_usuario(
    conn: &mut SqliteConnection,
    usuario_id: i32,
    mut changes: UsuarioChanges,
) -> Result<Usuario, DataError> {
    let current = get_usuario(conn, usuario_id)?
        .ok_or_else(|| DataError::not_found("usuario", usuario_id))?;

    if let Some(nombre) = changes.nombre.take() {
        changes.nombre = Some(require_text("nombre", &nombre)?);
    }
    if let Some(email) = changes.email.take() {
        let email = validate_email(&email)?;
        ensure_email_free(conn, &email, Some(usuario_id))?;
        changes.email = Some(email);
    }
    if changes.is_empty() {
        return Ok(current);
    }

    diesel::update(usuario::table.find(usuario_id)).set(&changes).execute(conn)?;
    get_usuario(conn, usuario_id)?.ok_or_else(|| DataError::not_found("usuario", usuario_id))
}

/// Marks a user inactive. The row stays readable.
pub fn soft_delete_usuario(conn: &mut SqliteConnection, usuario_id: i32) -> Result<Usuario, DataError> {
    let updated = diesel::update(usuario::table.find(usuario_id))
        .set(usuario::estado.eq(false))
        .execute(conn)?;
    if updated == 0 {
        return Err(DataError::not_found("usuario", usuario_id));
    }
    get_usuario(conn, usuario_id)?.ok_or_else(|| DataError::not_found("usuario", usuario_id))
}

/// Loads a user that another row is about to reference. A missing or
/// inactive user is a validation failure of the referencing input.
pub fn require_active_usuario(
    conn: &mut SqliteConnection,
    usuario_id: i32,
) -> Result<Usuario, DataError> {
    match get_usuario(conn, usuario_id)? {
        Some(u) if u.estado => Ok(u),
        Some(_) => Err(DataError::Validation(format!("usuario {} is inactive", usuario_id))),
        None => Err(DataError::Validation(format!("usuario {} does not exist", usuario_id))),
    }
}
