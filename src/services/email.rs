//! Email service for reservation confirmations

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::{Game, Reservation},
};

/// Outbound notification channel for reservation events
#[async_trait]
pub trait ReservationNotifier: Send + Sync {
    async fn send_reservation_confirmation(
        &self,
        reservation: &Reservation,
        game: &Game,
    ) -> AppResult<()>;
}

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn confirmation_body(reservation: &Reservation, game: &Game) -> String {
        let message = reservation
            .message
            .as_deref()
            .map(|m| format!("\nYour message: {}\n", m))
            .unwrap_or_default();

        format!(
            r#"
Hello {name},

Your reservation of "{title}" is confirmed.

Pickup date: {pickup}
Return date: {ret}
{message}
Have fun playing!
"#,
            name = reservation.borrower_name,
            title = game.title,
            pickup = reservation.pickup_date,
            ret = reservation.return_date,
            message = message,
        )
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        if !self.config.enabled {
            return Err(AppError::Notification("Email delivery is disabled".to_string()));
        }

        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Meeple Library");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Notification(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Notification(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Notification(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host).map_err(|e| {
                AppError::Notification(format!("Failed to create SMTP transport: {}", e))
            })?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        // SMTP transport is blocking
        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::Internal(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Notification(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl ReservationNotifier for EmailService {
    async fn send_reservation_confirmation(
        &self,
        reservation: &Reservation,
        game: &Game,
    ) -> AppResult<()> {
        let subject = format!("Your reservation of {}", game.title);
        let body = Self::confirmation_body(reservation, game);
        self.send_email(&reservation.borrower_email, &subject, &body).await
    }
}
