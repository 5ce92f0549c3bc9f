use diesel::prelude::*;

use crate::error::DataError;
use crate::models::{
    MaquinaUsuario, MaquinaUsuarioChanges, MaquinaUsuarioFilter, MaquinaUsuarioInput,
    NewMaquinaUsuario,
};
use crate::orm::maquina::require_active_maquina;
use crate::orm::usuario::require_active_usuario;
use crate::orm::{last_insert_rowid, now, require_non_negative};
use crate::schema::maquina_usuario;

fn validate_horas_turno(horas: f64) -> Result<f64, DataError> {
    if !horas.is_finite() {
        return Err(DataError::Validation("horas_turno must be a finite number".to_string()));
    }
    require_non_negative("horas_turno", horas)
}

/// Assigns an operator to a machine. Both must exist and be active.
pub fn insert_maquina_usuario(
    conn: &mut SqliteConnection,
    input: MaquinaUsuarioInput,
) -> Result<MaquinaUsuario, DataError> {
    require_active_maquina(conn, input.maquina_id)?;
    require_active_usuario(conn, input.usuario_id)?;

    let new_row = NewMaquinaUsuario {
        maquina_id: input.maquina_id,
        usuario_id: input.usuario_id,
        fecha_asignacion: input.fecha_asignacion.unwrap_or_else(now),
        horas_turno: validate_horas_turno(input.horas_turno)?,
    };

    diesel::insert_into(maquina_usuario::table).values(&new_row).execute(conn)?;
    let new_id = last_insert_rowid(conn)?;
    get_maquina_usuario(conn, new_id)?.ok_or_else(|| DataError::not_found("maquina_usuario", new_id))
}

pub fn get_maquina_usuario(
    conn: &mut SqliteConnection,
    row_id: i32,
) -> Result<Option<MaquinaUsuario>, DataError> {
    Ok(maquina_usuario::table
        .find(row_id)
        .select(MaquinaUsuario::as_select())
        .first(conn)
        .optional()?)
}

pub fn list_maquina_usuarios(
    conn: &mut SqliteConnection,
    filter: &MaquinaUsuarioFilter,
) -> Result<Vec<MaquinaUsuario>, DataError> {
    let mut query = maquina_usuario::table.into_boxed();
    if let Some(maquina_id) = filter.maquina_id {
        query = query.filter(maquina_usuario::maquina_id.eq(maquina_id));
    }
    if let Some(usuario_id) = filter.usuario_id {
        query = query.filter(maquina_usuario::usuario_id.eq(usuario_id));
    }
    Ok(query
        .order((maquina_usuario::fecha_asignacion.desc(), maquina_usuario::id.desc()))
        .select(MaquinaUsuario::as_select())
        .load(conn)?)
}

pub fn update_maquina_usuario(
    conn: &mut SqliteConnection,
    row_id: i32,
    mut changes: MaquinaUsuarioChanges,
) -> Result<MaquinaUsuario, DataError> {
    let current = get_maquina_usuario(conn, row_id)?
        .ok_or_else(|| DataError::not_found("maquina_usuario", row_id))?;

    if let Some(maquina_id) = changes.maquina_id {
        if maquina_id != current.maquina_id {
            require_active_maquina(conn, maquina_id)?;
        }
    }
    if let Some(usuario_id) = changes.usuario_id {
        if usuario_id != current.usuario_id {
            require_active_usuario(conn, usuario_id)?;
        }
    }
    if let Some(horas) = changes.horas_turno.take() {
        changes.horas_turno = Some(validate_horas_turno(horas)?);
    }
    if changes.is_empty() {
        return Ok(current);
    }

    diesel::update(maquina_usuario::table.find(row_id)).set(&changes).execute(conn)?;
    get_maquina_usuario(conn, row_id)?.ok_or_else(|| DataError::not_found("maquina_usuario", row_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::maquina::{insert_maquina, soft_delete_maquina, tests::maquina_input};
    use crate::orm::testing::setup_test_db;
    use crate::orm::usuario::{insert_usuario, tests::usuario_input};

    fn asignacion(maquina_id: i32, usuario_id: i32, horas_turno: f64) -> MaquinaUsuarioInput {
        MaquinaUsuarioInput {
            maquina_id,
            usuario_id,
            fecha_asignacion: None,
            horas_turno,
        }
    }

    #[test]
    fn test_assign_operator_to_machine() {
        let mut conn = setup_test_db();
        let m = insert_maquina(&mut conn, maquina_input("Excavadora")).unwrap();
        let u = insert_usuario(&mut conn, usuario_input("op@kedikian.com")).unwrap();

        let row = insert_maquina_usuario(&mut conn, asignacion(m.id, u.id, 7.5)).unwrap();
        assert_eq!(row.horas_turno, 7.5);
        assert_eq!(get_maquina_usuario(&mut conn, row.id).unwrap(), Some(row.clone()));

        let por_maquina = list_maquina_usuarios(
            &mut conn,
            &MaquinaUsuarioFilter {
                maquina_id: Some(m.id),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(por_maquina, vec![row]);
    }

    #[test]
    fn test_missing_machine_is_validation_error_and_creates_nothing() {
        let mut conn = setup_test_db();
        let u = insert_usuario(&mut conn, usuario_input("op@kedikian.com")).unwrap();

        let err = insert_maquina_usuario(&mut conn, asignacion(999, u.id, 8.0)).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
        assert!(list_maquina_usuarios(&mut conn, &MaquinaUsuarioFilter::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_inactive_machine_cannot_be_assigned() {
        let mut conn = setup_test_db();
        let m = insert_maquina(&mut conn, maquina_input("Excavadora")).unwrap();
        let u = insert_usuario(&mut conn, usuario_input("op@kedikian.com")).unwrap();
        soft_delete_maquina(&mut conn, m.id).unwrap();

        let err = insert_maquina_usuario(&mut conn, asignacion(m.id, u.id, 8.0)).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }

    #[test]
    fn test_shift_hours_must_be_non_negative() {
        let mut conn = setup_test_db();
        let m = insert_maquina(&mut conn, maquina_input("Excavadora")).unwrap();
        let u = insert_usuario(&mut conn, usuario_input("op@kedikian.com")).unwrap();

        let err = insert_maquina_usuario(&mut conn, asignacion(m.id, u.id, -1.0)).unwrap_err();
        assert!(matches!(err, DataError::Constraint(_)));

        let err = insert_maquina_usuario(&mut conn, asignacion(m.id, u.id, f64::NAN)).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }

    #[test]
    fn test_update_shift_hours() {
        let mut conn = setup_test_db();
        let m = insert_maquina(&mut conn, maquina_input("Excavadora")).unwrap();
        let u = insert_usuario(&mut conn, usuario_input("op@kedikian.com")).unwrap();
        let row = insert_maquina_usuario(&mut conn, asignacion(m.id, u.id, 8.0)).unwrap();

        let updated = update_maquina_usuario(
            &mut conn,
            row.id,
            MaquinaUsuarioChanges {
                horas_turno: Some(6.25),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.horas_turno, 6.25);
        assert_eq!(updated.maquina_id, m.id);

        let err = update_maquina_usuario(
            &mut conn,
            row.id,
            MaquinaUsuarioChanges {
                usuario_id: Some(999),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }
}
