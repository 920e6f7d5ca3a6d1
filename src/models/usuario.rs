use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const TIPO_ADMIN: &str = "admin";

/// Row of `usuarios`. Accounts are provisioned directly in the database;
/// the application only ever reads them.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Usuario {
    pub usuario: String,
    // Hash bcrypt; solo se compara, nunca se emite.
    #[serde(skip_serializing)]
    pub password: String,
    pub nombre: String,
    pub tipo_usuario: String,
}

impl Usuario {
    pub fn es_admin(&self) -> bool {
        self.tipo_usuario == TIPO_ADMIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn el_hash_de_la_contrasena_no_se_serializa() {
        let usuario = Usuario {
            usuario: "mgarcia".to_string(),
            password: "$2b$04$hash-de-prueba".to_string(),
            nombre: "María García".to_string(),
            tipo_usuario: "admin".to_string(),
        };

        let json = serde_json::to_string(&usuario).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash-de-prueba"));
        assert!(json.contains("María García"));
    }
}
