use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    database::Database,
    filters,
    middleware::{get_current_user, CurrentUser},
    models::{
        detalle_pedido, fecha_entrega_valida, fecha_retiro, Estado, MetodoEnvio, Pedido,
        TipoEntrega, PROVINCIAS, SECTORES,
    },
    AppState,
};

#[derive(Template)]
#[template(path = "pedidos/nuevo.html")]
struct NuevoPedidoTemplate<'a> {
    current_user: &'a CurrentUser,
    productos: Vec<String>,
    sectores: Vec<String>,
    provincias: Vec<String>,
    hoy: String,
    manana: String,
    error: String,
}

#[derive(Template)]
#[template(path = "pedidos/confirmacion.html")]
struct ConfirmacionTemplate<'a> {
    current_user: &'a CurrentUser,
    detalle: String,
    correo: String,
    correo_enviado: bool,
}

#[derive(Template)]
#[template(path = "historial.html")]
struct HistorialTemplate<'a> {
    current_user: &'a CurrentUser,
    pedidos: Vec<Pedido>,
    estados: Vec<String>,
    metodos_envio: Vec<String>,
}

#[derive(Deserialize)]
pub struct PedidoForm {
    fecha: NaiveDate,
    sector: String,
    correo: String,
    tipo_entrega: String,
    // Shipping-address block, present only when the delivery mode is Enviar.
    // Collected for the shipping label; not persisted.
    #[allow(dead_code)]
    nombre_autoriza: Option<String>,
    #[allow(dead_code)]
    direccion: Option<String>,
    #[allow(dead_code)]
    provincia: Option<String>,
    #[allow(dead_code)]
    codigo_postal: Option<String>,
    #[allow(dead_code)]
    nombre_receptor: Option<String>,
    #[allow(dead_code)]
    telefono: Option<String>,
    #[serde(default)]
    material: Vec<String>,
    #[serde(default)]
    cantidad: Vec<u32>,
    fecha_entrega: NaiveDate,
    #[allow(dead_code)]
    observaciones: Option<String>,
}

#[derive(Deserialize)]
pub struct ActualizarPedidoForm {
    estado: String,
    metodo_envio: String,
    seguimiento: String,
}

pub async fn formulario_pedido(
    cookies: Cookies,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let Some(current_user) = get_current_user(cookies, &state).await else {
        return Ok(Redirect::to("/login").into_response());
    };

    let productos = nombres_de_productos(&state.db).await?;
    Ok(render_formulario(&current_user, productos, String::new()))
}

pub async fn crear_pedido(
    cookies: Cookies,
    State(state): State<AppState>,
    Form(form): Form<PedidoForm>,
) -> Result<Response, StatusCode> {
    let Some(current_user) = get_current_user(cookies, &state).await else {
        return Ok(Redirect::to("/login").into_response());
    };

    let tipo_entrega =
        TipoEntrega::parse(&form.tipo_entrega).ok_or(StatusCode::BAD_REQUEST)?;

    if !SECTORES.contains(&form.sector.as_str()) {
        return Err(StatusCode::BAD_REQUEST);
    }

    let productos = nombres_de_productos(&state.db).await?;

    let hoy = Local::now().date_naive();
    if !fecha_entrega_valida(form.fecha_entrega, hoy) {
        return Ok(render_formulario(
            &current_user,
            productos,
            "La fecha de entrega estimada debe ser posterior al día de hoy".to_string(),
        ));
    }

    let materiales = match materiales_seleccionados(&form.material, &form.cantidad) {
        Ok(materiales) => materiales,
        Err(mensaje) => {
            return Ok(render_formulario(&current_user, productos, mensaje.to_string()));
        }
    };

    // Only materials that exist in stock can be ordered, even from a forged
    // request.
    if let Some(desconocido) = material_desconocido(&materiales, &productos) {
        let mensaje = format!("El material \"{desconocido}\" no figura en el stock");
        return Ok(render_formulario(&current_user, productos, mensaje));
    }

    let detalle = detalle_pedido(&materiales);

    sqlx::query(
        r#"
        INSERT INTO pedidos (fecha_pedido, sector, quien_realiza_pedido,
        detalle_pedido, envia_o_retira)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(form.fecha)
    .bind(&form.sector)
    .bind(&current_user.nombre)
    .bind(&detalle)
    .bind(tipo_entrega.as_str())
    .execute(&state.db)
    .await
    .map_err(|e| {
        log::error!("no se pudo registrar el pedido: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    // The order is already committed; a mail failure is surfaced but never
    // rolls it back.
    let cuerpo = cuerpo_confirmacion(&current_user.nombre, &detalle, tipo_entrega, form.fecha);
    let correo_enviado = match state
        .mailer
        .enviar(&form.correo, "Recepción de solicitud", cuerpo)
        .await
    {
        Ok(()) => true,
        Err(e) => {
            log::error!("error al enviar correo: {e:#}");
            false
        }
    };

    let template = ConfirmacionTemplate {
        current_user: &current_user,
        detalle,
        correo: form.correo,
        correo_enviado,
    };
    Ok(Html(template.render().unwrap()).into_response())
}

pub async fn historial(
    cookies: Cookies,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let Some(current_user) = get_current_user(cookies, &state).await else {
        return Ok(Redirect::to("/login").into_response());
    };

    let consulta = sqlx::query_as::<_, Pedido>(consulta_historial(current_user.es_admin));
    let pedidos = if current_user.es_admin {
        consulta.fetch_all(&state.db).await
    } else {
        consulta
            .bind(&current_user.nombre)
            .fetch_all(&state.db)
            .await
    }
    .map_err(|e| {
        log::error!("no se pudo leer el historial: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let template = HistorialTemplate {
        current_user: &current_user,
        pedidos,
        estados: Estado::VALORES.iter().map(|s| s.to_string()).collect(),
        metodos_envio: MetodoEnvio::VALORES.iter().map(|s| s.to_string()).collect(),
    };
    Ok(Html(template.render().unwrap()).into_response())
}

/// Per-row admin update. One UPDATE keyed by id; concurrent admins race
/// last-write-wins.
pub async fn actualizar_pedido(
    cookies: Cookies,
    Path(id): Path<i32>,
    State(state): State<AppState>,
    Form(form): Form<ActualizarPedidoForm>,
) -> Result<Response, StatusCode> {
    let current_user = get_current_user(cookies, &state)
        .await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !current_user.es_admin {
        return Err(StatusCode::FORBIDDEN);
    }

    let estado = Estado::parse(&form.estado).ok_or(StatusCode::BAD_REQUEST)?;
    let metodo_envio = MetodoEnvio::parse(&form.metodo_envio).ok_or(StatusCode::BAD_REQUEST)?;
    let seguimiento = match form.seguimiento.trim() {
        "" => None,
        codigo => Some(codigo.to_string()),
    };

    sqlx::query(ACTUALIZAR_PEDIDO)
        .bind(estado.as_str())
        .bind(metodo_envio.as_str())
        .bind(&seguimiento)
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            log::error!("no se pudo actualizar el pedido {id}: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Redirect::to("/historial").into_response())
}

const CONSULTA_HISTORIAL_TODOS: &str =
    "SELECT * FROM pedidos ORDER BY fecha_pedido DESC, id DESC";
const CONSULTA_HISTORIAL_PROPIO: &str =
    "SELECT * FROM pedidos WHERE quien_realiza_pedido = ? ORDER BY fecha_pedido DESC, id DESC";
const ACTUALIZAR_PEDIDO: &str =
    "UPDATE pedidos SET estado = ?, metodo_envio = ?, seguimiento = ? WHERE id = ?";

/// Admins see every order; everyone else only the rows they requested.
fn consulta_historial(es_admin: bool) -> &'static str {
    if es_admin {
        CONSULTA_HISTORIAL_TODOS
    } else {
        CONSULTA_HISTORIAL_PROPIO
    }
}

async fn nombres_de_productos(db: &Database) -> Result<Vec<String>, StatusCode> {
    sqlx::query_scalar::<_, String>("SELECT producto FROM productos ORDER BY producto")
        .fetch_all(db)
        .await
        .map_err(|e| {
            log::error!("no se pudo leer la lista de productos: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

fn render_formulario(current_user: &CurrentUser, productos: Vec<String>, error: String) -> Response {
    let hoy = Local::now().date_naive();
    let template = NuevoPedidoTemplate {
        current_user,
        productos,
        sectores: SECTORES.iter().map(|s| s.to_string()).collect(),
        provincias: PROVINCIAS.iter().map(|s| s.to_string()).collect(),
        hoy: hoy.format("%Y-%m-%d").to_string(),
        manana: fecha_retiro(hoy).format("%Y-%m-%d").to_string(),
        error,
    };
    Html(template.render().unwrap()).into_response()
}

/// Pairs the repeated material/cantidad form fields, rejecting empty or
/// inconsistent selections.
fn materiales_seleccionados(
    material: &[String],
    cantidad: &[u32],
) -> Result<Vec<(String, u32)>, &'static str> {
    if material.is_empty() {
        return Err("Seleccione al menos un material");
    }
    if material.len() != cantidad.len() {
        return Err("Cada material necesita una cantidad");
    }
    if cantidad.iter().any(|&c| c == 0) {
        return Err("Las cantidades deben ser mayores a cero");
    }
    Ok(material
        .iter()
        .cloned()
        .zip(cantidad.iter().copied())
        .collect())
}

/// First selected material that does not exist in the product list, if any.
fn material_desconocido<'a>(
    materiales: &'a [(String, u32)],
    productos: &[String],
) -> Option<&'a str> {
    materiales
        .iter()
        .map(|(material, _)| material.as_str())
        .find(|material| !productos.iter().any(|producto| producto == material))
}

fn cuerpo_confirmacion(
    nombre: &str,
    detalle: &str,
    tipo_entrega: TipoEntrega,
    fecha_pedido: NaiveDate,
) -> String {
    let base = format!(
        "Estimado/a {nombre}:\nSe ha recibido con éxito su pedido de {detalle}.\n"
    );

    match tipo_entrega {
        TipoEntrega::Retirar => format!(
            "{base}\nSu pedido podrá ser retirado el día {} por el departamento de bases de datos.",
            fecha_retiro(fecha_pedido).format("%d/%m/%Y")
        ),
        TipoEntrega::Enviar => format!(
            "{base}\nSu pedido será cotizado. Una vez aprobado el presupuesto, \
             se enviará a la dirección solicitada y será notificado por este medio."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn confirmacion_de_retiro_indica_el_dia_siguiente() {
        let cuerpo = cuerpo_confirmacion(
            "Ana Pérez",
            "Resmas A4: 2",
            TipoEntrega::Retirar,
            d(2024, 3, 15),
        );
        assert!(cuerpo.contains("Ana Pérez"));
        assert!(cuerpo.contains("Resmas A4: 2"));
        assert!(cuerpo.contains("retirado el día 16/03/2024"));
        assert!(!cuerpo.contains("cotizado"));
    }

    #[test]
    fn confirmacion_de_envio_anuncia_cotizacion_sin_fecha_de_retiro() {
        let cuerpo = cuerpo_confirmacion(
            "Ana Pérez",
            "Biromes: 10",
            TipoEntrega::Enviar,
            d(2024, 3, 15),
        );
        assert!(cuerpo.contains("será cotizado"));
        assert!(!cuerpo.contains("retirado el día"));
    }

    #[test]
    fn la_seleccion_de_materiales_se_empareja_con_sus_cantidades() {
        let material = vec!["Toner".to_string(), "Resmas A4".to_string()];
        let cantidad = vec![1, 3];
        let materiales = materiales_seleccionados(&material, &cantidad).unwrap();
        assert_eq!(
            materiales,
            vec![("Toner".to_string(), 1), ("Resmas A4".to_string(), 3)]
        );
    }

    #[test]
    fn una_seleccion_vacia_o_inconsistente_se_rechaza() {
        assert!(materiales_seleccionados(&[], &[]).is_err());
        assert!(materiales_seleccionados(&["Toner".to_string()], &[]).is_err());
        assert!(materiales_seleccionados(&["Toner".to_string()], &[0]).is_err());
    }

    #[test]
    fn un_material_fuera_del_stock_se_detecta() {
        let productos = vec!["Toner".to_string(), "Resmas A4".to_string()];
        let conocidos = vec![("Resmas A4".to_string(), 2), ("Toner".to_string(), 1)];
        assert_eq!(material_desconocido(&conocidos, &productos), None);

        let forjados = vec![("Resmas A4".to_string(), 2), ("Notebook".to_string(), 1)];
        assert_eq!(material_desconocido(&forjados, &productos), Some("Notebook"));
    }

    #[test]
    fn el_historial_propio_filtra_por_solicitante_y_el_de_admin_no() {
        let propio = consulta_historial(false);
        assert!(propio.contains("WHERE quien_realiza_pedido = ?"));

        let todos = consulta_historial(true);
        assert!(!todos.contains("WHERE"));

        // Ambas variantes listan lo más reciente primero.
        for consulta in [propio, todos] {
            assert!(consulta.contains("ORDER BY fecha_pedido DESC, id DESC"));
        }
    }

    #[test]
    fn la_actualizacion_queda_acotada_a_la_fila_del_id() {
        assert!(ACTUALIZAR_PEDIDO.ends_with("WHERE id = ?"));
        // Tres columnas más la clave del WHERE.
        assert_eq!(ACTUALIZAR_PEDIDO.matches('?').count(), 4);
    }
}
