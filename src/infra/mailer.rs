//! Outgoing mail.
//!
//! With SMTP configured, messages go out through `lettre`. Without it,
//! messages are logged instead of sent (development mode).

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use thiserror::Error;

use crate::config::SmtpConfig;

#[cfg(test)]
use mockall::automock;

/// Mail delivery failures. Callers log these; they never reach clients.
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address '{0}'")]
    InvalidAddress(String),

    #[error("Could not build message: {0}")]
    Build(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// A single outgoing message
#[derive(Debug, Clone, PartialEq)]
pub struct MailMessage {
    pub to: String,
    /// Sender override; defaults to the configured SMTP_FROM
    pub from: Option<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    /// Optional HTML alternative to `text`
    pub html: Option<String>,
}

impl MailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: None,
            reply_to: None,
            subject: subject.into(),
            text: text.into(),
            html: None,
        }
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }
}

/// Mail transport trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

/// Mailer used when SMTP is not configured
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    /// Bodies may carry credentials (temporary passwords), so only the
    /// envelope is logged.
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        let from = message.from.as_deref().unwrap_or(&self.from);
        tracing::warn!(
            from = %from,
            to = %message.to,
            subject = %message.subject,
            body_len = message.text.len(),
            "SMTP not configured, email not sent"
        );
        Ok(())
    }
}

/// SMTP mailer backed by lettre
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let host = config
            .host
            .as_deref()
            .ok_or_else(|| MailError::Build("SMTP_HOST is not set".to_string()))?;

        let mut builder = if config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| MailError::Build(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };
        builder = builder.port(config.port);

        if let (Some(user), Some(pass)) = (config.user.as_ref(), config.password()) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.to_string()));
        }

        Ok(Self {
            transport: builder.build(),
            from: parse_mailbox(&config.from)?,
        })
    }

    fn build_message(&self, message: &MailMessage) -> Result<Message, MailError> {
        let from = match message.from.as_deref() {
            Some(from) => parse_mailbox(from)?,
            None => self.from.clone(),
        };

        let mut builder = Message::builder()
            .from(from)
            .to(parse_mailbox(&message.to)?)
            .subject(message.subject.as_str());

        if let Some(reply_to) = message.reply_to.as_deref() {
            builder = builder.reply_to(parse_mailbox(reply_to)?);
        }

        let built = match message.html.as_ref() {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                message.text.clone(),
                html.clone(),
            )),
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(message.text.clone()),
        };

        built.map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        let email = self.build_message(&message)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;

        tracing::info!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

/// Pick the SMTP mailer when configured, otherwise the logging fallback.
///
/// A configured but unusable SMTP setup is an error; mail is never
/// silently downgraded to the log.
pub fn build_mailer(config: &SmtpConfig) -> Result<Arc<dyn Mailer>, MailError> {
    if !config.is_configured() {
        return Ok(Arc::new(LogMailer::new(config.from.clone())));
    }

    Ok(Arc::new(SmtpMailer::new(config)?))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_message_builder() {
        let msg = MailMessage::new("a@example.com", "Hi", "text")
            .with_reply_to("b@example.com")
            .with_html("<p>text</p>");

        assert_eq!(msg.reply_to.as_deref(), Some("b@example.com"));
        assert_eq!(msg.html.as_deref(), Some("<p>text</p>"));
        assert!(msg.from.is_none());
    }

    #[test]
    fn test_parse_mailbox_rejects_garbage() {
        assert!(parse_mailbox("not an address").is_err());
        assert!(parse_mailbox("user@example.com").is_ok());
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let mailer = LogMailer::new("noreply@example.com");
        let result = mailer
            .send(MailMessage::new("a@example.com", "Subject", "Body"))
            .await;
        assert!(result.is_ok());
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_log_mailer_keeps_body_out_of_logs() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        LogMailer::new("noreply@example.com")
            .send(MailMessage::new(
                "a@example.com",
                "Your password has changed",
                "Your new password: SECRET123",
            ))
            .await
            .unwrap();

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("a@example.com"));
        assert!(output.contains("Your password has changed"));
        assert!(!output.contains("SECRET123"));
    }

    #[tokio::test]
    async fn test_unconfigured_smtp_falls_back_to_logging() {
        let mailer = build_mailer(&SmtpConfig::disabled()).unwrap();
        assert!(mailer
            .send(MailMessage::new("a@example.com", "Subject", "Body"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_configured_smtp_with_bad_sender_is_an_error() {
        let mut config = SmtpConfig::disabled();
        config.host = Some("smtp.example.com".to_string());
        config.tls = false;
        config.from = "not an address".to_string();

        let err = build_mailer(&config).err().expect("setup should fail");
        assert!(matches!(err, MailError::InvalidAddress(_)));
    }
}
