use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of `productos`. Read-only in this application: stock is maintained
/// out-of-band.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Producto {
    pub producto: String,
    pub cantidad: i32,
}
