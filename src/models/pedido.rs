use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Sectores a los que puede atribuirse un pedido.
pub const SECTORES: [&str; 27] = [
    "Comercio y servicios",
    "Turismo",
    "Industria",
    "Parques industriales",
    "Economías regionales",
    "Construcción",
    "Mujeres empresarias",
    "CAME Joven",
    "CAME Cultura",
    "Eventos",
    "Presidencia",
    "Secretaria general",
    "Hacienda",
    "Presupuestos",
    "Capacitación",
    "Rondas de negocios",
    "Correspondencia",
    "Financiamiento",
    "Recursos humanos",
    "Dirección ejecutiva",
    "Legales",
    "RSE",
    "Base de datos",
    "Comisión de asuntos tributarios",
    "Comercio exterior",
    "CAME Sustentable",
    "Fronteras e ilegalidad",
];

pub const PROVINCIAS: [&str; 24] = [
    "Buenos Aires",
    "Ciudad Autónoma de Buenos Aires",
    "Catamarca",
    "Chaco",
    "Chubut",
    "Córdoba",
    "Corrientes",
    "Entre Ríos",
    "Formosa",
    "Jujuy",
    "La Pampa",
    "La Rioja",
    "Mendoza",
    "Misiones",
    "Neuquén",
    "Río Negro",
    "Salta",
    "San Juan",
    "San Luis",
    "Santa Cruz",
    "Santa Fe",
    "Santiago del Estero",
    "Tierra del Fuego",
    "Tucumán",
];

/// Row of `pedidos`. The enumerated columns are stored as their literal
/// form-facing strings; the enums below parse and produce them.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Pedido {
    pub id: i32,
    pub fecha_pedido: NaiveDate,
    pub sector: String,
    pub quien_realiza_pedido: String,
    pub detalle_pedido: String,
    pub envia_o_retira: String,
    pub estado: String,
    pub metodo_envio: Option<String>,
    pub seguimiento: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoEntrega {
    Retirar,
    Enviar,
}

impl TipoEntrega {
    pub const VALORES: [&'static str; 2] = ["Retirar", "Enviar"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Retirar" => Some(Self::Retirar),
            "Enviar" => Some(Self::Enviar),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Retirar => "Retirar",
            Self::Enviar => "Enviar",
        }
    }
}

/// Flat status field: any value can be set from any other, there is no
/// enforced transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estado {
    EnProceso,
    Entregado,
    Cancelado,
}

impl Estado {
    pub const VALORES: [&'static str; 3] = ["En proceso", "Entregado", "Cancelado"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "En proceso" => Some(Self::EnProceso),
            "Entregado" => Some(Self::Entregado),
            "Cancelado" => Some(Self::Cancelado),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnProceso => "En proceso",
            Self::Entregado => "Entregado",
            Self::Cancelado => "Cancelado",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetodoEnvio {
    Oca,
    Motojet,
    Retiro,
}

impl MetodoEnvio {
    pub const VALORES: [&'static str; 3] = ["Oca", "Motojet", "Retiró"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Oca" => Some(Self::Oca),
            "Motojet" => Some(Self::Motojet),
            "Retiró" => Some(Self::Retiro),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Oca => "Oca",
            Self::Motojet => "Motojet",
            Self::Retiro => "Retiró",
        }
    }
}

/// Flattens the selected materials into the stored detail string,
/// e.g. `"Resmas A4: 2, Biromes: 10"`.
pub fn detalle_pedido(materiales: &[(String, u32)]) -> String {
    materiales
        .iter()
        .map(|(material, cantidad)| format!("{material}: {cantidad}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pickup date for a `Retirar` order: the day after the order date.
pub fn fecha_retiro(fecha_pedido: NaiveDate) -> NaiveDate {
    fecha_pedido + Duration::days(1)
}

/// The estimated delivery date must be strictly after today.
pub fn fecha_entrega_valida(fecha_entrega: NaiveDate, hoy: NaiveDate) -> bool {
    fecha_entrega > hoy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn detalle_une_materiales_y_cantidades() {
        let materiales = vec![("Resmas A4".to_string(), 2), ("Biromes".to_string(), 10)];
        assert_eq!(detalle_pedido(&materiales), "Resmas A4: 2, Biromes: 10");
    }

    #[test]
    fn detalle_de_un_solo_material_no_lleva_coma() {
        let materiales = vec![("Toner".to_string(), 1)];
        assert_eq!(detalle_pedido(&materiales), "Toner: 1");
    }

    #[test]
    fn fecha_de_retiro_es_el_dia_siguiente() {
        assert_eq!(fecha_retiro(d(2024, 3, 15)), d(2024, 3, 16));
        // Cruce de mes
        assert_eq!(fecha_retiro(d(2024, 2, 29)), d(2024, 3, 1));
    }

    #[test]
    fn fecha_de_entrega_debe_ser_posterior_a_hoy() {
        let hoy = d(2024, 3, 15);
        assert!(!fecha_entrega_valida(hoy, hoy));
        assert!(!fecha_entrega_valida(d(2024, 3, 14), hoy));
        assert!(fecha_entrega_valida(d(2024, 3, 16), hoy));
    }

    #[test]
    fn los_enums_recorren_sus_valores_de_formulario() {
        for valor in Estado::VALORES {
            assert_eq!(Estado::parse(valor).unwrap().as_str(), valor);
        }
        for valor in MetodoEnvio::VALORES {
            assert_eq!(MetodoEnvio::parse(valor).unwrap().as_str(), valor);
        }
        for valor in TipoEntrega::VALORES {
            assert_eq!(TipoEntrega::parse(valor).unwrap().as_str(), valor);
        }
        assert!(Estado::parse("Pendiente").is_none());
        assert!(MetodoEnvio::parse("").is_none());
    }
}
