use diesel::prelude::*;

use crate::error::DataError;
use crate::models::{NewPago, Pago, PagoChanges, PagoFilter, PagoInput};
use crate::orm::producto::get_producto;
use crate::orm::proyecto::get_proyecto;
use crate::orm::{last_insert_rowid, now, require_non_negative};
use crate::schema::pago;

fn validate_referencias(
    conn: &mut SqliteConnection,
    proyecto_id: i32,
    producto_id: Option<i32>,
) -> Result<(), DataError> {
    if get_proyecto(conn, proyecto_id)?.is_none() {
        return Err(DataError::Validation(format!("proyecto {} does not exist", proyecto_id)));
    }
    if let Some(id) = producto_id {
        if get_producto(conn, id)?.is_none() {
            return Err(DataError::Validation(format!("producto {} does not exist", id)));
        }
    }
    Ok(())
}

pub fn insert_pago(conn: &mut SqliteConnection, input: PagoInput) -> Result<Pago, DataError> {
    require_non_negative("monto", input.monto)?;
    validate_referencias(conn, input.proyecto_id, input.producto_id)?;

    let new_pago = NewPago {
        proyecto_id: input.proyecto_id,
        producto_id: input.producto_id,
        monto: input.monto,
        fecha: input.fecha.unwrap_or_else(now),
        descripcion: input.descripcion,
    };

    diesel::insert_into(pago::table).values(&new_pago).execute(conn)?;
    let new_id = last_insert_rowid(conn)?;
    get_pago(conn, new_id)?.ok_or_else(|| DataError::not_found("pago", new_id))
}

pub fn get_pago(conn: &mut SqliteConnection, pago_id: i32) -> Result<Option<Pago>, DataError> {
    Ok(pago::table
        .find(pago_id)
        .select(Pago::as_select())
        .first(conn)
        .optional()?)
}

/// Lists payments, newest first.
pub fn list_pagos(conn: &mut SqliteConnection, filter: &PagoFilter) -> Result<Vec<Pago>, DataError> {
    filter.rango.validate()?;

    let mut query = pago::table.into_boxed();
    if let Some(proyecto_id) = filter.proyecto_id {
        query = query.filter(pago::proyecto_id.eq(proyecto_id));
    }
    if let Some(producto_id) = filter.producto_id {
        query = query.filter(pago::producto_id.eq(producto_id));
    }
    if let Some(desde) = filter.rango.fecha_inicio {
        query = query.filter(pago::fecha.ge(desde));
    }
    if let Some(hasta) = filter.rango.fecha_fin {
        query = query.filter(pago::fecha.le(hasta));
    }
    Ok(query
        .order((pago::fecha.desc(), pago::id.desc()))
        .select(Pago::as_select())
        .load(conn)?)
}

pub fn update_pago(
    conn: &mut SqliteConnection,
    pago_id: i32,
    changes: PagoChanges,
) -> Result<Pago, DataError> {
    let current = get_pago(conn, pago_id)?.ok_or_else(|| DataError::not_found("pago", pago_id))?;

    if let Some(monto) = changes.monto {
        require_non_negative("monto", monto)?;
    }
    if changes.proyecto_id.is_some() || changes.producto_id.is_some() {
        validate_referencias(
            conn,
            changes.proyecto_id.unwrap_or(current.proyecto_id),
            changes.producto_id.unwrap_or(current.producto_id),
        )?;
    }
    if changes.is_empty() {
        return Ok(current);
    }

    diesel::update(pago::table.find(pago_id)).set(&changes).execute(conn)?;
    get_pago(conn, pago_id)?.ok_or_else(|| DataError::not_found("pago", pago_id))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::models::{FechaRango, ProductoInput};
    use crate::orm::producto::insert_producto;
    use crate::orm::proyecto::{insert_proyecto, tests::proyecto_input};
    use crate::orm::testing::setup_test_db;

    fn fecha(m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn pago_input(proyecto_id: i32, producto_id: Option<i32>, fecha: NaiveDateTime) -> PagoInput {
        PagoInput {
            proyecto_id,
            producto_id,
            monto: 320_000,
            fecha: Some(fecha),
            descripcion: Some("Anticipo".to_string()),
        }
    }

    #[test]
    fn test_insert_then_get() {
        let mut conn = setup_test_db();
        let p = insert_proyecto(&mut conn, proyecto_input("Obra A")).unwrap();
        let producto = insert_producto(
            &mut conn,
            ProductoInput {
                nombre: "Cemento".to_string(),
                codigo_producto: "CEM-50".to_string(),
                inventario: None,
            },
        )
        .unwrap();

        let pago = insert_pago(&mut conn, pago_input(p.id, Some(producto.id), fecha(4, 2))).unwrap();
        assert_eq!(pago.producto_id, Some(producto.id));
        assert_eq!(get_pago(&mut conn, pago.id).unwrap(), Some(pago));
    }

    #[test]
    fn test_references_must_exist() {
        let mut conn = setup_test_db();
        let err = insert_pago(&mut conn, pago_input(5, None, fecha(4, 2))).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));

        let p = insert_proyecto(&mut conn, proyecto_input("Obra A")).unwrap();
        let err = insert_pago(&mut conn, pago_input(p.id, Some(8), fecha(4, 2))).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
        assert!(list_pagos(&mut conn, &PagoFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_negative_amount_is_constraint_error() {
        let mut conn = setup_test_db();
        let p = insert_proyecto(&mut conn, proyecto_input("Obra A")).unwrap();
        let err = insert_pago(
            &mut conn,
            PagoInput {
                monto: -5,
                ..pago_input(p.id, None, fecha(4, 2))
            },
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Constraint(_)));
    }

    #[test]
    fn test_filters_by_project_and_range() {
        let mut conn = setup_test_db();
        let a = insert_proyecto(&mut conn, proyecto_input("Obra A")).unwrap();
        let b = insert_proyecto(&mut conn, proyecto_input("Obra B")).unwrap();
        insert_pago(&mut conn, pago_input(a.id, None, fecha(3, 15))).unwrap();
        let abril = insert_pago(&mut conn, pago_input(a.id, None, fecha(4, 15))).unwrap();
        insert_pago(&mut conn, pago_input(b.id, None, fecha(4, 16))).unwrap();

        let filter = PagoFilter {
            proyecto_id: Some(a.id),
            rango: FechaRango::parse(Some("2025-04-01"), Some("2025-04-30")).unwrap(),
            ..Default::default()
        };
        assert_eq!(list_pagos(&mut conn, &filter).unwrap(), vec![abril]);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut conn = setup_test_db();
        let err = update_pago(
            &mut conn,
            1,
            PagoChanges {
                monto: Some(1),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }
}
