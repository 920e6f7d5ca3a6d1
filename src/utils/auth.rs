use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // login name
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(usuario: &str) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(24); // Token expires in 24 hours

        Self {
            sub: usuario.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }
}

pub fn create_token(usuario: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::new(usuario);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contrasena_correcta_verifica_y_la_incorrecta_no() {
        let hash = bcrypt::hash("secreto123", 4).unwrap();
        assert!(verify_password("secreto123", &hash).unwrap());
        assert!(!verify_password("otra-cosa", &hash).unwrap());
    }

    #[test]
    fn el_token_recupera_el_usuario() {
        let token = create_token("mgarcia", "clave-de-prueba").unwrap();
        let claims = verify_token(&token, "clave-de-prueba").unwrap();
        assert_eq!(claims.sub, "mgarcia");
    }

    #[test]
    fn un_token_firmado_con_otra_clave_se_rechaza() {
        let token = create_token("mgarcia", "clave-de-prueba").unwrap();
        assert!(verify_token(&token, "otra-clave").is_err());
    }
}
