//! Outbound email.
//!
//! Confirmation codes go out through a [`Mailer`]. Delivery is best-effort:
//! signup never fails because SMTP is down, the failure is only logged.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use yamdb_common::{AppError, AppResult, MailConfig};

/// Transport abstraction for outbound mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a plain-text message to a single recipient.
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// SMTP mailer backed by lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    /// Build an SMTP mailer from configuration.
    ///
    /// Returns an error when the config has no SMTP host.
    pub fn from_config(config: &MailConfig) -> AppResult<Self> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| AppError::Config("mail.smtp_host is not set".to_string()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| AppError::Mail(e.to_string()))?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| AppError::Mail(format!("Invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::Mail(format!("Invalid recipient address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Mail(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        Ok(())
    }
}

/// Mailer that drops messages, used when SMTP is not configured and in tests.
pub struct NoOpMailer;

#[async_trait]
impl Mailer for NoOpMailer {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> AppResult<()> {
        tracing::debug!(to = %to, subject = %subject, "NoOp mailer: dropping message");
        Ok(())
    }
}

/// Mail service wrapping a transport.
#[derive(Clone)]
pub struct MailerService {
    mailer: Arc<dyn Mailer>,
}

impl MailerService {
    /// Create a service over an explicit transport.
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Build from configuration, falling back to the no-op transport when
    /// SMTP is not configured.
    #[must_use]
    pub fn from_config(config: &MailConfig) -> Self {
        match SmtpMailer::from_config(config) {
            Ok(smtp) => Self::new(Arc::new(smtp)),
            Err(e) => {
                tracing::warn!(error = %e, "SMTP not configured, using NoOp mailer");
                Self::new(Arc::new(NoOpMailer))
            }
        }
    }

    /// Send a confirmation code, logging failures instead of propagating them.
    pub async fn send_confirmation_code(&self, to: &str, username: &str, code: &str) {
        let body = format!(
            "Hello {username},\n\n\
             Your confirmation code is: {code}\n\n\
             Use it to obtain an access token."
        );

        if let Err(e) = self.mailer.send(to, "Your confirmation code", &body).await {
            tracing::warn!(to = %to, error = %e, "Failed to send confirmation code");
        }
    }
}
