//! TypeScript type generation module.
//!
//! Exports TypeScript definitions for the structs annotated with
//! `#[ts(export)]` so the frontend can share the API types.

#[cfg(test)]
mod tests {
    use std::{env, path::Path};

    use ts_rs::TS;

    #[test]
    fn generate_typescript_types() {
        // KEDIKIAN_TS_OUTPUT_DIR wins; otherwise ../ts-bindings.
        let output_dir_str = match env::var("KEDIKIAN_TS_OUTPUT_DIR") {
            Ok(env_dir) => {
                println!("Using TypeScript output directory from KEDIKIAN_TS_OUTPUT_DIR: {}", env_dir);
                env_dir
            }
            Err(_) => "../ts-bindings".to_string(),
        };

        let output_dir = Path::new(&output_dir_str);

        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir).expect("Failed to create output directory");
        }

        // Remove stale definitions so renamed or deleted types do not linger.
        println!("Cleaning old TypeScript files from {:?}", output_dir);
        for entry in std::fs::read_dir(output_dir).expect("Failed to read output directory") {
            let entry = entry.expect("Failed to read directory entry");
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("ts") {
                std::fs::remove_file(&path).unwrap_or_else(|_| panic!("Failed to remove {:?}", path));
            }
        }

        unsafe {
            env::set_var("TS_RS_EXPORT_DIR", output_dir);
        }

        use crate::api::ErrorResponse;
        use crate::api::maquina::{RegistrarHorasProyectoRequest, RegistrarUsoRequest};
        use crate::api::status::HealthStatus;
        use crate::models::*;

        Usuario::export().expect("Failed to export Usuario type");
        UsuarioInput::export().expect("Failed to export UsuarioInput type");
        UsuarioChanges::export().expect("Failed to export UsuarioChanges type");

        Maquina::export().expect("Failed to export Maquina type");
        MaquinaInput::export().expect("Failed to export MaquinaInput type");
        MaquinaChanges::export().expect("Failed to export MaquinaChanges type");

        MaquinaUsuario::export().expect("Failed to export MaquinaUsuario type");
        MaquinaUsuarioInput::export().expect("Failed to export MaquinaUsuarioInput type");
        MaquinaUsuarioChanges::export().expect("Failed to export MaquinaUsuarioChanges type");

        Proyecto::export().expect("Failed to export Proyecto type");
        ProyectoInput::export().expect("Failed to export ProyectoInput type");
        ProyectoChanges::export().expect("Failed to export ProyectoChanges type");

        ProyectoMaquina::export().expect("Failed to export ProyectoMaquina type");
        ProyectoMaquinaInput::export().expect("Failed to export ProyectoMaquinaInput type");
        ProyectoMaquinaChanges::export().expect("Failed to export ProyectoMaquinaChanges type");

        Contrato::export().expect("Failed to export Contrato type");
        ContratoInput::export().expect("Failed to export ContratoInput type");
        ContratoChanges::export().expect("Failed to export ContratoChanges type");

        Gasto::export().expect("Failed to export Gasto type");
        GastoInput::export().expect("Failed to export GastoInput type");
        GastoChanges::export().expect("Failed to export GastoChanges type");

        Pago::export().expect("Failed to export Pago type");
        PagoInput::export().expect("Failed to export PagoInput type");
        PagoChanges::export().expect("Failed to export PagoChanges type");

        Producto::export().expect("Failed to export Producto type");
        ProductoInput::export().expect("Failed to export ProductoInput type");
        ProductoChanges::export().expect("Failed to export ProductoChanges type");

        TipoTransaccion::export().expect("Failed to export TipoTransaccion type");
        ProductoUsuario::export().expect("Failed to export ProductoUsuario type");
        MovimientoInput::export().expect("Failed to export MovimientoInput type");
        MovimientoChanges::export().expect("Failed to export MovimientoChanges type");

        FechaRango::export().expect("Failed to export FechaRango type");

        ErrorResponse::export().expect("Failed to export ErrorResponse type");
        RegistrarUsoRequest::export().expect("Failed to export RegistrarUsoRequest type");
        RegistrarHorasProyectoRequest::export()
            .expect("Failed to export RegistrarHorasProyectoRequest type");
        HealthStatus::export().expect("Failed to export HealthStatus type");

        println!("TypeScript types generated successfully in {:?}", output_dir);
    }
}
