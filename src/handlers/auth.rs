use askama::Template;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_cookies::{Cookie, Cookies};

use crate::{
    database::Database,
    middleware::AUTH_COOKIE,
    models::Usuario,
    utils::{create_token, verify_password},
    AppState,
};

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    usuario: String,
    password: String,
}

pub async fn login_page() -> Html<String> {
    let template = LoginTemplate {
        error: String::new(),
    };
    Html(template.render().unwrap())
}

pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, (StatusCode, Html<String>)> {
    match authenticate_user(&state.db, &form.usuario, &form.password).await {
        Ok(usuario) => {
            let token = create_token(&usuario.usuario, &state.jwt_secret).map_err(|_| {
                let template = LoginTemplate {
                    error: "No se pudo iniciar la sesión".to_string(),
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(template.render().unwrap()),
                )
            })?;

            // Set secure HTTP-only cookie with the session token
            let cookie = Cookie::build((AUTH_COOKIE, token))
                .path("/")
                .http_only(true)
                .max_age(time::Duration::hours(24))
                .build();

            cookies.add(cookie);

            Ok(Redirect::to("/stock"))
        }
        Err(_) => {
            let template = LoginTemplate {
                error: "Usuario o contraseña incorrectos".to_string(),
            };
            Err((StatusCode::UNAUTHORIZED, Html(template.render().unwrap())))
        }
    }
}

pub async fn logout(cookies: Cookies) -> impl IntoResponse {
    cookies.remove(Cookie::from(AUTH_COOKIE));
    Redirect::to("/login")
}

async fn authenticate_user(
    db: &Database,
    usuario: &str,
    password: &str,
) -> Result<Usuario, sqlx::Error> {
    let usuario = sqlx::query_as::<_, Usuario>(
        "SELECT usuario, password, nombre, tipo_usuario FROM usuarios WHERE usuario = ?",
    )
    .bind(usuario)
    .fetch_one(db)
    .await?;

    if verify_password(password, &usuario.password).unwrap_or(false) {
        Ok(usuario)
    } else {
        Err(sqlx::Error::RowNotFound)
    }
}
