pub mod pedido;
pub mod producto;
pub mod usuario;

// Re-export only the types we actually use
pub use pedido::{
    detalle_pedido, fecha_entrega_valida, fecha_retiro, Estado, MetodoEnvio, Pedido, TipoEntrega,
    PROVINCIAS, SECTORES,
};
pub use producto::Producto;
pub use usuario::Usuario;
