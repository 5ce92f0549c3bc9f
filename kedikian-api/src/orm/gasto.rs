use diesel::prelude::*;

use crate::error::DataError;
use crate::models::{Gasto, GastoChanges, GastoFilter, GastoInput, NewGasto};
use crate::orm::maquina::get_maquina;
use crate::orm::usuario::get_usuario;
use crate::orm::{last_insert_rowid, now, require_non_negative, require_text};
use crate::schema::gasto;

/// An expense is charged to a user, a machine, or both; whichever is set
/// must exist.
fn validate_imputacion(
    conn: &mut SqliteConnection,
    usuario_id: Option<i32>,
    maquina_id: Option<i32>,
) -> Result<(), DataError> {
    if usuario_id.is_none() && maquina_id.is_none() {
        return Err(DataError::Validation(
            "a gasto needs a usuario_id, a maquina_id, or both".to_string(),
        ));
    }
    if let Some(id) = usuario_id {
        if get_usuario(conn, id)?.is_none() {
            return Err(DataError::Validation(format!("usuario {} does not exist", id)));
        }
    }
    if let Some(id) = maquina_id {
        if get_maquina(conn, id)?.is_none() {
            return Err(DataError::Validation(format!("maquina {} does not exist", id)));
        }
    }
    Ok(())
}

pub fn insert_gasto(conn: &mut SqliteConnection, input: GastoInput) -> Result<Gasto, DataError> {
    let tipo = require_text("tipo", &input.tipo)?;
    require_non_negative("importe_total", input.importe_total)?;
    validate_imputacion(conn, input.usuario_id, input.maquina_id)?;

    let new_gasto = NewGasto {
        usuario_id: input.usuario_id,
        maquina_id: input.maquina_id,
        tipo,
        importe_total: input.importe_total,
        fecha: input.fecha.unwrap_or_else(now),
        descripcion: input.descripcion,
        imagen: input.imagen,
    };

    diesel::insert_into(gasto::table).values(&new_gasto).execute(conn)?;
    let new_id = last_insert_rowid(conn)?;
    get_gasto(conn, new_id)?.ok_or_else(|| DataError::not_found("gasto", new_id))
}

pub fn get_gasto(conn: &mut SqliteConnection, gasto_id: i32) -> Result<Option<Gasto>, DataError> {
    Ok(gasto::table
        .find(gasto_id)
        .select(Gasto::as_select())
        .first(conn)
        .optional()?)
}

/// Lists expenses, newest first.
pub fn list_gastos(conn: &mut SqliteConnection, filter: &GastoFilter) -> Result<Vec<Gasto>, DataError> {
    filter.rango.validate()?;

    let mut query = gasto::table.into_boxed();
    if let Some(usuario_id) = filter.usuario_id {
        query = query.filter(gasto::usuario_id.eq(usuario_id));
    }
    if let Some(maquina_id) = filter.maquina_id {
        query = query.filter(gasto::maquina_id.eq(maquina_id));
    }
    if let Some(tipo) = &filter.tipo {
        query = query.filter(gasto::tipo.eq(tipo.trim().to_string()));
    }
    if let Some(desde) = filter.rango.fecha_inicio {
        query = query.filter(gasto::fecha.ge(desde));
    }
    if let Some(hasta) = filter.rango.fecha_fin {
        query = query.filter(gasto::fecha.le(hasta));
    }
    Ok(query
        .order((gasto::fecha.desc(), gasto::id.desc()))
        .select(Gasto::as_select())
        .load(conn)?)
}

pub fn update_gasto(
    conn: &mut SqliteConnection,
    gasto_id: i32,
    mut changes: GastoChanges,
) -> Result<Gasto, DataError> {
    let current = get_gasto(conn, gasto_id)?.ok_or_else(|| DataError::not_found("gasto", gasto_id))?;

    if let Some(tipo) = changes.tipo.take() {
        changes.tipo = Some(require_text("tipo", &tipo)?);
    }
    if let Some(importe) = changes.importe_total {
        require_non_negative("importe_total", importe)?;
    }
    if changes.usuario_id.is_some() || changes.maquina_id.is_some() {
        validate_imputacion(
            conn,
            changes.usuario_id.unwrap_or(current.usuario_id),
            changes.maquina_id.unwrap_or(current.maquina_id),
        )?;
    }
    if changes.is_empty() {
        return Ok(current);
    }

    diesel::update(gasto::table.find(gasto_id)).set(&changes).execute(conn)?;
    get_gasto(conn, gasto_id)?.ok_or_else(|| DataError::not_found("gasto", gasto_id))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::models::FechaRango;
    use crate::orm::maquina::{insert_maquina, tests::maquina_input};
    use crate::orm::testing::setup_test_db;
    use crate::orm::usuario::{insert_usuario, tests::usuario_input};

    fn fecha(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap().and_hms_opt(10, 30, 0).unwrap()
    }

    fn gasto_input(usuario_id: Option<i32>, maquina_id: Option<i32>, dia: u32) -> GastoInput {
        GastoInput {
            usuario_id,
            maquina_id,
            tipo: "combustible".to_string(),
            importe_total: 85_000,
            fecha: Some(fecha(dia)),
            descripcion: Some("Gasoil".to_string()),
            imagen: Some("uploads/ticket-0001.jpg".to_string()),
        }
    }

    #[test]
    fn test_insert_then_get() {
        let mut conn = setup_test_db();
        let m = insert_maquina(&mut conn, maquina_input("Camión volcador")).unwrap();
        let g = insert_gasto(&mut conn, gasto_input(None, Some(m.id), 3)).unwrap();
        assert_eq!(g.maquina_id, Some(m.id));
        assert_eq!(get_gasto(&mut conn, g.id).unwrap(), Some(g));
    }

    #[test]
    fn test_needs_user_or_machine() {
        let mut conn = setup_test_db();
        let err = insert_gasto(&mut conn, gasto_input(None, None, 3)).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));

        let err = insert_gasto(&mut conn, gasto_input(Some(12), None, 3)).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }

    #[test]
    fn test_negative_amount_is_constraint_error() {
        let mut conn = setup_test_db();
        let u = insert_usuario(&mut conn, usuario_input("chofer@kedikian.com")).unwrap();
        let err = insert_gasto(
            &mut conn,
            GastoInput {
                importe_total: -10,
                ..gasto_input(Some(u.id), None, 3)
            },
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Constraint(_)));
    }

    #[test]
    fn test_date_range_filter_is_inclusive() {
        let mut conn = setup_test_db();
        let u = insert_usuario(&mut conn, usuario_input("chofer@kedikian.com")).unwrap();
        for dia in [1, 10, 20] {
            insert_gasto(&mut conn, gasto_input(Some(u.id), None, dia)).unwrap();
        }

        let filter = GastoFilter {
            rango: FechaRango::parse(Some("2025-05-10"), Some("2025-05-20")).unwrap(),
            ..Default::default()
        };
        let gastos = list_gastos(&mut conn, &filter).unwrap();
        let fechas: Vec<_> = gastos.iter().map(|g| g.fecha).collect();
        assert_eq!(fechas, vec![fecha(20), fecha(10)]);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let mut conn = setup_test_db();
        let filter = GastoFilter {
            rango: FechaRango {
                fecha_inicio: Some(fecha(20)),
                fecha_fin: Some(fecha(1)),
            },
            ..Default::default()
        };
        assert!(matches!(list_gastos(&mut conn, &filter).unwrap_err(), DataError::Validation(_)));
    }

    #[test]
    fn test_update_cannot_detach_both_owners() {
        let mut conn = setup_test_db();
        let u = insert_usuario(&mut conn, usuario_input("chofer@kedikian.com")).unwrap();
        let g = insert_gasto(&mut conn, gasto_input(Some(u.id), None, 3)).unwrap();

        let err = update_gasto(
            &mut conn,
            g.id,
            GastoChanges {
                usuario_id: Some(None),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));

        let updated = update_gasto(
            &mut conn,
            g.id,
            GastoChanges {
                importe_total: Some(90_000),
                imagen: Some(None),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.importe_total, 90_000);
        assert_eq!(updated.imagen, None);
        assert_eq!(updated.usuario_id, Some(u.id));
    }
}
