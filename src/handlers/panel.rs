use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Serialize;
use serde_json::json;
use sqlx::FromRow;
use tower_cookies::Cookies;

use crate::{
    middleware::{get_current_user, CurrentUser},
    AppState,
};

#[derive(Template)]
#[template(path = "panel.html")]
struct PanelTemplate<'a> {
    current_user: &'a CurrentUser,
    sectores: Vec<SectorResumen>,
    datos_sectores: String,
    datos_envios: String,
}

/// Per-sector order counts. The conditional sums split the total by delivery
/// mode, so envios + retiros always equals total.
#[derive(Debug, Serialize, FromRow)]
pub struct SectorResumen {
    pub sector: String,
    pub total: i64,
    pub envios: i64,
    pub retiros: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct MetodoResumen {
    pub metodo_envio: String,
    pub cantidad: i64,
}

pub async fn panel_control(
    cookies: Cookies,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let Some(current_user) = get_current_user(cookies, &state).await else {
        return Ok(Redirect::to("/login").into_response());
    };

    if !current_user.es_admin {
        return Err(StatusCode::FORBIDDEN);
    }

    let sectores = sqlx::query_as::<_, SectorResumen>(
        r#"
        SELECT sector,
               COUNT(*) AS total,
               CAST(SUM(CASE WHEN envia_o_retira = 'Enviar' THEN 1 ELSE 0 END) AS SIGNED) AS envios,
               CAST(SUM(CASE WHEN envia_o_retira = 'Retirar' THEN 1 ELSE 0 END) AS SIGNED) AS retiros
        FROM pedidos
        GROUP BY sector
        ORDER BY sector
        "#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        log::error!("no se pudo agregar los pedidos por sector: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let metodos = sqlx::query_as::<_, MetodoResumen>(
        r#"
        SELECT metodo_envio, COUNT(*) AS cantidad
        FROM pedidos
        WHERE metodo_envio IS NOT NULL
        GROUP BY metodo_envio
        ORDER BY metodo_envio
        "#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(|e| {
        log::error!("no se pudo agregar los métodos de envío: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let datos_sectores = datos_grafico_sectores(&sectores).to_string();
    let datos_envios = datos_grafico_envios(&metodos).to_string();

    let template = PanelTemplate {
        current_user: &current_user,
        sectores,
        datos_sectores,
        datos_envios,
    };
    Ok(Html(template.render().unwrap()).into_response())
}

/// Dataset for the grouped bar chart: one label per sector, one series per
/// delivery mode.
fn datos_grafico_sectores(filas: &[SectorResumen]) -> serde_json::Value {
    json!({
        "labels": filas.iter().map(|f| f.sector.as_str()).collect::<Vec<_>>(),
        "envios": filas.iter().map(|f| f.envios).collect::<Vec<_>>(),
        "retiros": filas.iter().map(|f| f.retiros).collect::<Vec<_>>(),
    })
}

/// Dataset for the pie chart of shipping methods.
fn datos_grafico_envios(filas: &[MetodoResumen]) -> serde_json::Value {
    json!({
        "labels": filas.iter().map(|f| f.metodo_envio.as_str()).collect::<Vec<_>>(),
        "cantidades": filas.iter().map(|f| f.cantidad).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn el_grafico_de_sectores_conserva_orden_y_valores() {
        let filas = vec![
            SectorResumen {
                sector: "Turismo".to_string(),
                total: 5,
                envios: 2,
                retiros: 3,
            },
            SectorResumen {
                sector: "Legales".to_string(),
                total: 1,
                envios: 0,
                retiros: 1,
            },
        ];

        let datos = datos_grafico_sectores(&filas);
        assert_eq!(datos["labels"], json!(["Turismo", "Legales"]));
        assert_eq!(datos["envios"], json!([2, 0]));
        assert_eq!(datos["retiros"], json!([3, 1]));

        // Por sector, los envíos más los retiros cubren el total.
        for fila in &filas {
            assert_eq!(fila.envios + fila.retiros, fila.total);
        }
    }

    #[test]
    fn el_grafico_de_envios_refleja_la_distribucion() {
        let filas = vec![
            MetodoResumen {
                metodo_envio: "Oca".to_string(),
                cantidad: 4,
            },
            MetodoResumen {
                metodo_envio: "Retiró".to_string(),
                cantidad: 7,
            },
        ];

        let datos = datos_grafico_envios(&filas);
        assert_eq!(datos["labels"], json!(["Oca", "Retiró"]));
        assert_eq!(datos["cantidades"], json!([4, 7]));
    }
}
