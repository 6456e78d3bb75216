//! Expiration warning e-mails.
//!
//! The scanner only depends on the [`Mailer`] trait. [`SmtpMailer`] is the
//! production transport built on `lettre`; a delivery failure is returned as a
//! [`MailError`] value so the caller decides how to record it.

use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::debug;

use crate::config::SmtpConfig;

/// Title shared by both warning variants.
pub const WARNING_TITLE: &str = "Account expiration notice";

/// Errors returned by a mail transport.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Which warning template to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningTemplate {
    /// The account expires at the end of the current day.
    ExpireToday,
    /// The account expires in the given number of days.
    ExpireInDays(i64),
}

impl WarningTemplate {
    /// Stable template identifier.
    pub fn template_id(&self) -> &'static str {
        match self {
            WarningTemplate::ExpireToday => "user_expire_warning_today",
            WarningTemplate::ExpireInDays(_) => "user_expire_warning",
        }
    }

    /// Body recorded in the notification log.
    pub fn log_content(&self) -> String {
        match self {
            WarningTemplate::ExpireToday => "Your account will expire tonight at 24:00.".to_string(),
            WarningTemplate::ExpireInDays(days) => {
                format!("Your account will expire in {days} days.")
            }
        }
    }
}

/// A rendered-on-demand warning mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningMail {
    pub template: WarningTemplate,
    pub website_name: String,
}

impl WarningMail {
    pub fn new(template: WarningTemplate, website_name: &str) -> Self {
        Self {
            template,
            website_name: website_name.to_string(),
        }
    }

    pub fn subject(&self) -> String {
        format!("{} - {}", self.website_name, WARNING_TITLE)
    }

    /// Plain-text body.
    pub fn body(&self) -> String {
        let notice = match self.template {
            WarningTemplate::ExpireToday => {
                "your account will expire tonight at 24:00.".to_string()
            }
            WarningTemplate::ExpireInDays(days) => {
                format!("your account will expire in {days} days.")
            }
        };

        format!(
            "Hello,\n\n\
             This is a reminder from {site}: {notice}\n\
             Please renew it to keep using the service without interruption.\n\n\
             -- {site}\n",
            site = self.website_name,
        )
    }
}

/// Something that can deliver a warning mail.
///
/// Implementations report failure through the returned `Result` and must not
/// panic on bad input.
#[allow(async_fn_in_trait)]
pub trait Mailer {
    async fn send(&self, recipient: &str, mail: &WarningMail) -> Result<(), MailError>;
}

/// SMTP relay transport.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a pooled STARTTLS relay transport from configuration.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MailError> {
        let from = parse_mailbox(&config.from)?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port);

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, recipient: &str, mail: &WarningMail) -> Result<Message, MailError> {
        Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(recipient)?)
            .subject(mail.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, recipient: &str, mail: &WarningMail) -> Result<(), MailError> {
        let message = self.build_message(recipient, mail)?;

        debug!(
            template = mail.template.template_id(),
            recipient = %recipient,
            "Sending warning mail"
        );

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_template_mentions_midnight() {
        let mail = WarningMail::new(WarningTemplate::ExpireToday, "Acme");
        assert_eq!(mail.template.template_id(), "user_expire_warning_today");
        assert!(mail.body().contains("tonight at 24:00"));
        assert!(mail.body().contains("Acme"));
    }

    #[test]
    fn n_day_template_carries_days_left() {
        let mail = WarningMail::new(WarningTemplate::ExpireInDays(3), "Acme");
        assert_eq!(mail.template.template_id(), "user_expire_warning");
        assert!(mail.body().contains("in 3 days"));
        assert_eq!(mail.subject(), "Acme - Account expiration notice");
    }

    #[test]
    fn log_content_mentions_days() {
        assert_eq!(
            WarningTemplate::ExpireInDays(5).log_content(),
            "Your account will expire in 5 days."
        );
        assert!(WarningTemplate::ExpireToday
            .log_content()
            .contains("24:00"));
    }

    #[test]
    fn bad_sender_is_reported_not_panicked() {
        let config = SmtpConfig {
            from: "not an address".to_string(),
            ..SmtpConfig::default()
        };
        assert!(matches!(
            SmtpMailer::from_config(&config),
            Err(MailError::InvalidAddress { .. })
        ));
    }
}
