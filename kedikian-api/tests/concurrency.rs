//! Concurrent writers on the derived counters, each thread on its own
//! connection to the same database file.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::thread;

use diesel::prelude::*;
use kedikian_api::DataError;
use kedikian_api::models::{
    MaquinaChanges, MaquinaInput, MovimientoFilter, MovimientoInput, ProductoInput,
    TipoTransaccion, UsuarioInput,
};
use kedikian_api::orm::maquina::{get_maquina, insert_maquina, record_machine_usage, update_maquina};
use kedikian_api::orm::producto::{get_producto, insert_producto};
use kedikian_api::orm::producto_usuario::{list_movimientos, record_movement};
use kedikian_api::orm::usuario::insert_usuario;
use kedikian_api::orm::{run_pending_migrations, set_connection_pragmas};

const THREADS: usize = 8;
const SALIDAS_PER_THREAD: usize = 5;
const STOCK: i32 = 20;
const USAGE_PER_THREAD: i32 = 25;

fn connect(url: &str) -> SqliteConnection {
    let mut conn = SqliteConnection::establish(url).expect("open database file");
    set_connection_pragmas(&mut conn).expect("set pragmas");
    conn
}

#[test]
fn test_concurrent_salidas_never_oversell() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = dir.path().join("kedikian.db").to_string_lossy().into_owned();

    let (producto_id, usuario_id) = {
        let mut conn = connect(&url);
        run_pending_migrations(&mut conn);
        let producto = insert_producto(
            &mut conn,
            ProductoInput {
                nombre: "Cemento".to_string(),
                codigo_producto: "CEM-50".to_string(),
                inventario: Some(STOCK),
            },
        )
        .expect("insert producto");
        let usuario = insert_usuario(
            &mut conn,
            UsuarioInput {
                nombre: "Depósito".to_string(),
                email: "deposito@kedikian.com".to_string(),
                hash_contrasena: "x".to_string(),
                estado: None,
                roles: None,
                fecha_creacion: None,
            },
        )
        .expect("insert usuario");
        (producto.id, usuario.id)
    };

    let accepted = Arc::new(AtomicI32::new(0));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let url = url.clone();
            let accepted = Arc::clone(&accepted);
            thread::spawn(move || {
                let mut conn = connect(&url);
                for _ in 0..SALIDAS_PER_THREAD {
                    let result = record_movement(
                        &mut conn,
                        MovimientoInput {
                            producto_id,
                            usuario_id,
                            cantidad: 1,
                            tipo_transaccion: TipoTransaccion::Salida,
                            fecha: None,
                        },
                    );
                    match result {
                        Ok(_) => {
                            accepted.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(DataError::Constraint(_)) => {}
                        Err(other) => panic!("unexpected failure: {:?}", other),
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread");
    }

    let accepted = accepted.load(Ordering::SeqCst);
    assert_eq!(accepted, STOCK);

    let mut conn = connect(&url);
    let producto = get_producto(&mut conn, producto_id).unwrap().unwrap();
    assert_eq!(producto.inventario, STOCK - accepted);
    assert_eq!(producto.inventario, 0);

    let movimientos = list_movimientos(
        &mut conn,
        &MovimientoFilter {
            producto_id: Some(producto_id),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(movimientos.len() as i32, accepted);
}

#[test]
fn test_stale_hours_update_never_lowers_usage() {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = dir.path().join("kedikian.db").to_string_lossy().into_owned();

    let maquina_id = {
        let mut conn = connect(&url);
        run_pending_migrations(&mut conn);
        insert_maquina(
            &mut conn,
            MaquinaInput {
                nombre: "Excavadora".to_string(),
                estado: None,
                horas_uso: None,
            },
        )
        .expect("insert maquina")
        .id
    };

    let accruers: Vec<_> = (0..THREADS)
        .map(|_| {
            let url = url.clone();
            thread::spawn(move || {
                let mut conn = connect(&url);
                for _ in 0..USAGE_PER_THREAD {
                    record_machine_usage(&mut conn, maquina_id, 1).expect("record usage");
                }
            })
        })
        .collect();

    // Re-submits whatever it last read. Any value that went stale in the
    // meantime must be refused rather than written back.
    let setter = {
        let url = url.clone();
        thread::spawn(move || {
            let mut conn = connect(&url);
            let mut last_seen = 0;
            for _ in 0..(THREADS as i32 * USAGE_PER_THREAD) {
                let seen = get_maquina(&mut conn, maquina_id)
                    .expect("read maquina")
                    .expect("maquina exists")
                    .horas_uso;
                assert!(seen >= last_seen);
                last_seen = seen;

                let result = update_maquina(
                    &mut conn,
                    maquina_id,
                    MaquinaChanges {
                        horas_uso: Some(seen),
                        ..Default::default()
                    },
                );
                match result {
                    Ok(m) => assert!(m.horas_uso >= seen),
                    Err(DataError::Constraint(_)) => {}
                    Err(other) => panic!("unexpected failure: {:?}", other),
                }
            }
        })
    };

    for handle in accruers {
        handle.join().expect("accruing thread");
    }
    setter.join().expect("setter thread");

    let mut conn = connect(&url);
    let maquina = get_maquina(&mut conn, maquina_id).unwrap().unwrap();
    assert_eq!(maquina.horas_uso, THREADS as i32 * USAGE_PER_THREAD);
}
