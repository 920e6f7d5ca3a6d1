pub mod auth;
pub mod panel;
pub mod pedidos;
pub mod stock;
