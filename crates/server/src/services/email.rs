//! Email service for staff invites and welcome mail.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// HTML template for the staff invite email.
#[derive(Template)]
#[template(path = "email/invite.html")]
struct InviteEmailHtml<'a> {
    name: &'a str,
    role: &'a str,
    accept_url: &'a str,
    expires_in_days: i32,
}

/// Plain text template for the staff invite email.
#[derive(Template)]
#[template(path = "email/invite.txt")]
struct InviteEmailText<'a> {
    name: &'a str,
    role: &'a str,
    accept_url: &'a str,
    expires_in_days: i32,
}

/// HTML template for the welcome email.
#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeEmailHtml<'a> {
    name: &'a str,
    app_url: &'a str,
}

/// Plain text template for the welcome email.
#[derive(Template)]
#[template(path = "email/welcome.txt")]
struct WelcomeEmailText<'a> {
    name: &'a str,
    app_url: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    base_url: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig, base_url: &str) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Send a staff invite email.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or a template fails to render.
    pub async fn send_invite(
        &self,
        to: &str,
        name: &str,
        role: &str,
        expires_in_days: i32,
    ) -> Result<(), EmailError> {
        let accept_url = format!("{}/api/staff/invites/accept", self.base_url);
        let html = InviteEmailHtml {
            name,
            role,
            accept_url: &accept_url,
            expires_in_days,
        }
        .render()?;
        let text = InviteEmailText {
            name,
            role,
            accept_url: &accept_url,
            expires_in_days,
        }
        .render()?;

        self.send_multipart_email(to, "You have been invited to Stockroom", &text, &html)
            .await
    }

    /// Send a welcome email after an invite is accepted.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or a template fails to render.
    pub async fn send_welcome(&self, to: &str, name: &str) -> Result<(), EmailError> {
        let html = WelcomeEmailHtml {
            name,
            app_url: &self.base_url,
        }
        .render()?;
        let text = WelcomeEmailText {
            name,
            app_url: &self.base_url,
        }
        .render()?;

        self.send_multipart_email(to, "Welcome to Stockroom", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_templates_render() {
        let html = InviteEmailHtml {
            name: "Robin",
            role: "clerk",
            accept_url: "https://stockroom.example/api/staff/invites/accept",
            expires_in_days: 7,
        }
        .render()
        .expect("html renders");
        assert!(html.contains("Robin"));
        assert!(html.contains("clerk"));

        let text = InviteEmailText {
            name: "Robin",
            role: "clerk",
            accept_url: "https://stockroom.example/api/staff/invites/accept",
            expires_in_days: 7,
        }
        .render()
        .expect("text renders");
        assert!(text.contains("7"));
    }

    #[test]
    fn test_welcome_templates_render() {
        let html = WelcomeEmailHtml {
            name: "Robin",
            app_url: "https://stockroom.example",
        }
        .render()
        .expect("html renders");
        assert!(html.contains("Robin"));

        let text = WelcomeEmailText {
            name: "Robin",
            app_url: "https://stockroom.example",
        }
        .render()
        .expect("text renders");
        assert!(text.contains("https://stockroom.example"));
    }
}
