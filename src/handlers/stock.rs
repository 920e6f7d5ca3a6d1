use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::{
    middleware::{get_current_user, CurrentUser},
    models::Producto,
    AppState,
};

#[derive(Template)]
#[template(path = "stock.html")]
struct StockTemplate<'a> {
    current_user: &'a CurrentUser,
    productos: Vec<Producto>,
}

pub async fn ver_stock(
    cookies: Cookies,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let Some(current_user) = get_current_user(cookies, &state).await else {
        return Ok(Redirect::to("/login").into_response());
    };

    let productos =
        sqlx::query_as::<_, Producto>("SELECT producto, cantidad FROM productos ORDER BY producto")
            .fetch_all(&state.db)
            .await
            .map_err(|e| {
                log::error!("no se pudo leer el stock: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

    let template = StockTemplate {
        current_user: &current_user,
        productos,
    };
    Ok(Html(template.render().unwrap()).into_response())
}
