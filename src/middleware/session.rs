use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use crate::{models::Usuario, utils::verify_token, AppState};

pub const AUTH_COOKIE: &str = "auth_token";

/// Typed per-request session context resolved from the auth cookie. Handlers
/// receive this instead of reaching into any ambient session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub usuario: String,
    pub nombre: String,
    pub tipo_usuario: String,
    // Helper property for templates
    pub es_admin: bool,
}

impl CurrentUser {
    pub fn from_usuario(usuario: Usuario) -> Self {
        let es_admin = usuario.es_admin();
        Self {
            usuario: usuario.usuario,
            nombre: usuario.nombre,
            tipo_usuario: usuario.tipo_usuario,
            es_admin,
        }
    }
}

pub async fn get_current_user(cookies: Cookies, state: &AppState) -> Option<CurrentUser> {
    let token = cookies.get(AUTH_COOKIE)?.value().to_string();

    let claims = verify_token(&token, &state.jwt_secret).ok()?;

    let usuario = sqlx::query_as::<_, Usuario>(
        "SELECT usuario, password, nombre, tipo_usuario FROM usuarios WHERE usuario = ?",
    )
    .bind(&claims.sub)
    .fetch_optional(&state.db)
    .await
    .ok()??;

    Some(CurrentUser::from_usuario(usuario))
}
