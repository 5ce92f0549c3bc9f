pub mod contrato;
pub mod filter;
pub mod gasto;
pub mod maquina;
pub mod maquina_usuario;
pub mod pago;
pub mod producto;
pub mod producto_usuario;
pub mod proyecto;
pub mod proyecto_maquina;
pub mod usuario;

// Re-export models for easier access
pub use contrato::*;
pub use filter::*;
pub use gasto::*;
pub use maquina::*;
pub use maquina_usuario::*;
pub use pago::*;
pub use producto::*;
pub use producto_usuario::*;
pub use proyecto::*;
pub use proyecto_maquina::*;
pub use usuario::*;
