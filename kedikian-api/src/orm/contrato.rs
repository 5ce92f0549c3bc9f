use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::error::DataError;
use crate::models::{Contrato, ContratoChanges, ContratoFilter, ContratoInput, NewContrato};
use crate::orm::proyecto::get_proyecto;
use crate::orm::{last_insert_rowid, require_non_negative, require_text};
use crate::schema::contrato;

fn validate_periodo(
    fecha_inicio: Option<NaiveDateTime>,
    fecha_terminacion: Option<NaiveDateTime>,
) -> Result<(), DataError> {
    if let (Some(inicio), Some(fin)) = (fecha_inicio, fecha_terminacion) {
        if fin < inicio {
            return Err(DataError::Constraint(format!(
                "fecha_terminacion ({}) is before fecha_inicio ({})",
                fin, inicio
            )));
        }
    }
    Ok(())
}

/// A contract backs at most one project.
fn ensure_proyecto_available(
    conn: &mut SqliteConnection,
    proyecto_id: i32,
    except_contrato: Option<i32>,
) -> Result<(), DataError> {
    if get_proyecto(conn, proyecto_id)?.is_none() {
        return Err(DataError::Validation(format!("proyecto {} does not exist", proyecto_id)));
    }
    let holder: Option<i32> = contrato::table
        .filter(contrato::proyecto_id.eq(proyecto_id))
        .select(contrato::id)
        .first(conn)
        .optional()?;
    match holder {
        Some(other) if Some(other) != except_contrato => Err(DataError::Validation(format!(
            "proyecto {} already has contrato {}",
            proyecto_id, other
        ))),
        _ => Ok(()),
    }
}

pub fn insert_contrato(conn: &mut SqliteConnection, input: ContratoInput) -> Result<Contrato, DataError> {
    let cliente = require_text("cliente", &input.cliente)?;
    require_non_negative("importe_total", input.importe_total)?;
    validate_periodo(input.fecha_inicio, input.fecha_terminacion)?;
    if let Some(proyecto_id) = input.proyecto_id {
        ensure_proyecto_available(conn, proyecto_id, None)?;
    }

    let new_contrato = NewContrato {
        proyecto_id: input.proyecto_id,
        detalle: input.detalle,
        cliente,
        importe_total: input.importe_total,
        fecha_inicio: input.fecha_inicio,
        fecha_terminacion: input.fecha_terminacion,
    };

    diesel::insert_into(contrato::table).values(&new_contrato).execute(conn)?;
    let new_id = last_insert_rowid(conn)?;
    get_contrato(conn, new_id)?.ok_or_else(|| DataError::not_found("contrato", new_id))
}

pub fn get_contrato(conn: &mut SqliteConnection, contrato_id: i32) -> Result<Option<Contrato>, DataError> {
    Ok(contrato::table
        .find(contrato_id)
        .select(Contrato::as_select())
        .first(conn)
        .optional()?)
}

/// Lists contracts. `cliente` matches as a case-insensitive substring.
pub fn list_contratos(
    conn: &mut SqliteConnection,
    filter: &ContratoFilter,
) -> Result<Vec<Contrato>, DataError> {
    let mut query = contrato::table.into_boxed();
    if let Some(proyecto_id) = filter.proyecto_id {
        query = query.filter(contrato::proyecto_id.eq(proyecto_id));
    }
    if let Some(cliente) = &filter.cliente {
        query = query.filter(contrato::cliente.like(format!("%{}%", cliente.trim())));
    }
    Ok(query.order(contrato::id.asc()).select(Contrato::as_select()).load(conn)?)
}

/// Applies a partial update. The date ordering is checked against the
/// merged result, so changing one end alone cannot invert the period.
pub fn update_contrato(
    conn: &mut SqliteConnection,
    contrato_id: i32,
    mut changes: ContratoChanges,
) -> Result<Contrato, DataError> {
    let current = get_contrato(conn, contrato_id)?
        .ok_or_else(|| DataError::not_found("contrato", contrato_id))?;

    if let Some(cliente) = changes.cliente.take() {
        changes.cliente = Some(require_text("cliente", &cliente)?);
    }
    if let Some(importe) = changes.importe_total {
        require_non_negative("importe_total", importe)?;
    }
    validate_periodo(
        changes.fecha_inicio.unwrap_or(current.fecha_inicio),
        changes.fecha_terminacion.unwrap_or(current.fecha_terminacion),
    )?;
    if let Some(Some(proyecto_id)) = changes.proyecto_id {
        ensure_proyecto_available(conn, proyecto_id, Some(contrato_id))?;
    }
    if changes.is_empty() {
        return Ok(current);
    }

    diesel::update(contrato::table.find(contrato_id)).set(&changes).execute(conn)?;
    get_contrato(conn, contrato_id)?.ok_or_else(|| DataError::not_found("contrato", contrato_id))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::orm::proyecto::{insert_proyecto, tests::proyecto_input};
    use crate::orm::testing::setup_test_db;

    fn fecha(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn contrato_input() -> ContratoInput {
        ContratoInput {
            proyecto_id: None,
            detalle: Some("Bacheo zona norte".to_string()),
            cliente: "Vialidad Provincial".to_string(),
            importe_total: 2_500_000,
            fecha_inicio: Some(fecha(2025, 3, 1)),
            fecha_terminacion: Some(fecha(2025, 9, 30)),
        }
    }

    #[test]
    fn test_insert_then_get() {
        let mut conn = setup_test_db();
        let c = insert_contrato(&mut conn, contrato_input()).unwrap();
        assert_eq!(c.importe_total, 2_500_000);
        assert_eq!(get_contrato(&mut conn, c.id).unwrap(), Some(c));
    }

    #[test]
    fn test_inverted_period_is_a_constraint_error() {
        let mut conn = setup_test_db();
        let err = insert_contrato(
            &mut conn,
            ContratoInput {
                fecha_inicio: Some(fecha(2025, 9, 30)),
                fecha_terminacion: Some(fecha(2025, 3, 1)),
                ..contrato_input()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Constraint(_)));

        let c = insert_contrato(&mut conn, contrato_input()).unwrap();
        let err = update_contrato(
            &mut conn,
            c.id,
            ContratoChanges {
                fecha_terminacion: Some(Some(fecha(2024, 12, 31))),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Constraint(_)));
    }

    #[test]
    fn test_negative_amount_is_a_constraint_error() {
        let mut conn = setup_test_db();
        let err = insert_contrato(
            &mut conn,
            ContratoInput {
                importe_total: -1,
                ..contrato_input()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Constraint(_)));
    }

    #[test]
    fn test_one_contract_per_project() {
        let mut conn = setup_test_db();
        let p = insert_proyecto(&mut conn, proyecto_input("Obra A")).unwrap();

        let first = insert_contrato(
            &mut conn,
            ContratoInput {
                proyecto_id: Some(p.id),
                ..contrato_input()
            },
        )
        .unwrap();
        let err = insert_contrato(
            &mut conn,
            ContratoInput {
                proyecto_id: Some(p.id),
                ..contrato_input()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));

        let err = insert_contrato(
            &mut conn,
            ContratoInput {
                proyecto_id: Some(p.id + 100),
                ..contrato_input()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));

        let listed = list_contratos(
            &mut conn,
            &ContratoFilter {
                proyecto_id: Some(p.id),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(listed, vec![first]);
    }

    #[test]
    fn test_cliente_filter_is_substring() {
        let mut conn = setup_test_db();
        insert_contrato(&mut conn, contrato_input()).unwrap();
        insert_contrato(
            &mut conn,
            ContratoInput {
                cliente: "Constructora del Sur".to_string(),
                ..contrato_input()
            },
        )
        .unwrap();

        let vialidad = list_contratos(
            &mut conn,
            &ContratoFilter {
                cliente: Some("vialidad".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(vialidad.len(), 1);
        assert_eq!(vialidad[0].cliente, "Vialidad Provincial");
    }
}
