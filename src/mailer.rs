//! Outbound email.
//!
//! Handlers talk to [`Mailer`]; production uses SMTP through lettre, and an
//! unconfigured server falls back to [`LogMailer`]. Bodies are rendered from
//! the Askama templates in `templates/email/`, which escape their input.

use std::time::Duration;

use askama::Template;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use thiserror::Error;

use crate::{config::SmtpConfig, error::AppError};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::Template(err) => AppError::Internal(anyhow::anyhow!(err.to_string())),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

#[derive(Template)]
#[template(path = "email/otp.html")]
pub struct OtpEmail<'a> {
    pub headline: &'a str,
    pub otp: &'a str,
}

/// Shop-side copy of a contact form submission.
#[derive(Template)]
#[template(path = "email/contact_notification.html")]
pub struct ContactNotificationEmail<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

#[derive(Template)]
#[template(path = "email/contact_auto_reply.html")]
pub struct ContactAutoReplyEmail<'a> {
    pub name: &'a str,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, timeout: Duration) -> Result<Self, MailError> {
        let from = config
            .from_address
            .parse::<Mailbox>()
            .map_err(|_| MailError::InvalidAddress(config.from_address.clone()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        let to_mailbox = to
            .parse::<Mailbox>()
            .map_err(|_| MailError::InvalidAddress(to.to_string()))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?;

        self.transport.send(email).await?;
        tracing::info!(to = %to, subject = %subject, "email sent");
        Ok(())
    }
}

/// Logs messages instead of delivering them. Used when SMTP is not configured.
#[derive(Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        tracing::warn!(to = %to, subject = %subject, body = %html_body, "SMTP not configured, email not delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_escape_markup() {
        let html = ContactAutoReplyEmail {
            name: r#"<b>"Tom" & Jerry</b>"#,
        }
        .render()
        .expect("render");
        assert!(html.contains("Tom"));
        assert!(!html.contains(r#""Tom""#));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn otp_body_carries_the_code() {
        let html = OtpEmail {
            headline: "Your verification OTP",
            otp: "482913",
        }
        .render()
        .expect("render");
        assert!(html.contains("<h2>Your verification OTP: 482913</h2>"));
    }
}
