use anyhow::{Context, Result};
use std::env;

// The relay is fixed; only the credentials come from the environment.
const SMTP_HOST: &str = "smtp.gmail.com";
const SMTP_PORT: u16 = 587;

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub sender: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db: DbConfig,
    pub smtp: SmtpConfig,
    pub jwt_secret: String,
}

impl AppConfig {
    /// Reads the whole configuration up front so a misconfigured deployment
    /// fails at boot instead of on the first request that needs a variable.
    pub fn from_env() -> Result<Self> {
        let db = DbConfig {
            host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            user: env::var("DB_USER").unwrap_or_else(|_| "root".to_string()),
            password: env::var("DB_PASSWORD").unwrap_or_default(),
            database: env::var("DB_NAME").unwrap_or_else(|_| "inventario".to_string()),
        };

        let smtp = SmtpConfig {
            host: SMTP_HOST.to_string(),
            port: SMTP_PORT,
            sender: env::var("EMAIL_USER").context("EMAIL_USER must be set")?,
            password: env::var("EMAIL_PASSWORD").context("EMAIL_PASSWORD must be set")?,
        };

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        Ok(Self {
            db,
            smtp,
            jwt_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn la_configuracion_exige_el_secreto_de_sesion_al_arrancar() {
        env::set_var("EMAIL_USER", "pedidos@example.com");
        env::set_var("EMAIL_PASSWORD", "clave-smtp");

        env::remove_var("JWT_SECRET");
        let error = AppConfig::from_env().unwrap_err();
        assert!(error.to_string().contains("JWT_SECRET"));

        env::set_var("JWT_SECRET", "clave-de-prueba");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.jwt_secret, "clave-de-prueba");
        assert_eq!(config.smtp.sender, "pedidos@example.com");
    }
}
