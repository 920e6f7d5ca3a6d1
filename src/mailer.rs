use anyhow::Result;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;

#[derive(Clone)]
pub struct Mailer {
    config: SmtpConfig,
}

impl Mailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Sends one plaintext message over the relay. The connection is opened
    /// and closed per call; any failure is returned to the caller, who
    /// decides whether it is fatal.
    pub async fn enviar(&self, destinatario: &str, asunto: &str, cuerpo: String) -> Result<()> {
        let mensaje = Message::builder()
            .from(self.config.sender.parse()?)
            .to(destinatario.parse()?)
            .subject(asunto)
            .header(ContentType::TEXT_PLAIN)
            .body(cuerpo)?;

        let transporte =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
                .port(self.config.port)
                .credentials(Credentials::new(
                    self.config.sender.clone(),
                    self.config.password.clone(),
                ))
                .build();

        transporte.send(mensaje).await?;
        Ok(())
    }
}
