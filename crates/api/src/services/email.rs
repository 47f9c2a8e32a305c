//! Email dispatch via SMTP.
//!
//! [`EmailService`] wraps the `lettre` async SMTP transport. The
//! `EMAIL_SERVICE_NAME` setting is either a well-known provider name
//! (`gmail`, `outlook`, ...) or an SMTP host.

use axum::http::StatusCode;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use raxel_core::config::{ConfigDomain, ConfigError, EmailSettings, WebServiceConfig};

use super::ServiceError;
use crate::response::ApiResponse;

const SOURCE: &str = "EmailService";

/// Message returned when the provider rejects or cannot be reached.
pub const SEND_FAILED_MSG: &str = "There's an error sending the email";

/// One outgoing email.
#[derive(Debug, Clone, Default)]
pub struct SendEmail {
    pub to: String,
    pub subject: String,
    /// Plain-text body, wrapped in `<p>` when no `html` is given.
    pub text: String,
    pub html: Option<String>,
}

/// Sends email through the configured provider.
#[derive(Clone)]
pub struct EmailService {
    from: String,
    relay: String,
    user: String,
    pass: String,
}

impl std::fmt::Debug for EmailService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailService")
            .field("from", &self.from)
            .field("relay", &self.relay)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl EmailService {
    /// Build the service from the `EMAIL_*` settings.
    ///
    /// | Env Var                  | Required |
    /// |--------------------------|----------|
    /// | `EMAIL_PROVIDER_ADDRESS` | **yes**  |
    /// | `EMAIL_SERVICE_NAME`     | **yes**  |
    /// | `EMAIL_SERVICE_USERNAME` | **yes**  |
    /// | `EMAIL_SERVICE_PASSWORD` | **yes**  |
    pub fn new(settings: &EmailSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            from: required(&settings.provider, "EMAIL_PROVIDER_ADDRESS")?,
            relay: relay_host(&required(&settings.service, "EMAIL_SERVICE_NAME")?),
            user: required(&settings.user, "EMAIL_SERVICE_USERNAME")?,
            pass: required(&settings.pass, "EMAIL_SERVICE_PASSWORD")?,
        })
    }

    /// SMTP host mail is relayed through.
    pub fn relay(&self) -> &str {
        &self.relay
    }

    /// Assemble the MIME message for `email`.
    pub fn build_message(&self, email: &SendEmail) -> Result<Message, ServiceError> {
        let from: Mailbox = self.from.parse().map_err(|e| {
            ServiceError::internal(SOURCE, "Invalid sender address").with_details(e)
        })?;
        let to: Mailbox = email.to.parse().map_err(|e| {
            ServiceError::new(StatusCode::BAD_REQUEST, SOURCE, "Invalid recipient address")
                .with_details(e)
        })?;

        let body = match &email.html {
            Some(html) => html.clone(),
            None => format!("<p>{}</p>", email.text),
        };

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.to_uppercase())
            .header(ContentType::TEXT_HTML)
            .body(body)
            .map_err(|e| ServiceError::internal(SOURCE, SEND_FAILED_MSG).with_details(e))
    }

    /// Send `email`.
    ///
    /// Success is reported as the `201 Email sent successfully` envelope.
    pub async fn send(&self, email: &SendEmail) -> Result<ApiResponse<&'static str>, ServiceError> {
        let message = self.build_message(email)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.relay)
            .map_err(|e| ServiceError::internal(SOURCE, SEND_FAILED_MSG).with_details(e))?
            .credentials(Credentials::new(self.user.clone(), self.pass.clone()))
            .build();

        mailer.send(message).await.map_err(|e| {
            tracing::error!(source = SOURCE, to = %email.to, error = %e, "Email delivery failed");
            ServiceError::internal(SOURCE, SEND_FAILED_MSG).with_details(e)
        })?;

        tracing::info!(source = SOURCE, to = %email.to, "Email sent");
        Ok(ApiResponse::created("Email sent successfully", "ok"))
    }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value
        .clone()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingField {
            domain: WebServiceConfig::NAME,
            field,
        })
}

/// SMTP host for a provider name; anything unrecognised is taken as a host.
fn relay_host(service: &str) -> String {
    match service.to_ascii_lowercase().as_str() {
        "gmail" => "smtp.gmail.com".to_string(),
        "outlook" | "hotmail" | "outlook365" => "smtp.office365.com".to_string(),
        "yahoo" => "smtp.mail.yahoo.com".to_string(),
        "icloud" => "smtp.mail.me.com".to_string(),
        "zoho" => "smtp.zoho.com".to_string(),
        _ => service.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn settings() -> EmailSettings {
        EmailSettings {
            provider: Some("noreply@raxel.dev".into()),
            service: Some("gmail".into()),
            user: Some("mailer".into()),
            pass: Some("secret".into()),
        }
    }

    #[test]
    fn every_setting_is_required() {
        let mut partial = settings();
        partial.pass = None;
        assert_matches!(
            EmailService::new(&partial),
            Err(ConfigError::MissingField { field: "EMAIL_SERVICE_PASSWORD", .. })
        );

        let mut partial = settings();
        partial.provider = Some(String::new());
        assert_matches!(
            EmailService::new(&partial),
            Err(ConfigError::MissingField { field: "EMAIL_PROVIDER_ADDRESS", .. })
        );
    }

    #[test]
    fn well_known_providers_resolve_to_smtp_hosts() {
        assert_eq!(relay_host("gmail"), "smtp.gmail.com");
        assert_eq!(relay_host("Outlook"), "smtp.office365.com");
        assert_eq!(relay_host("mail.example.com"), "mail.example.com");

        let service = EmailService::new(&settings()).unwrap();
        assert_eq!(service.relay(), "smtp.gmail.com");
    }

    #[test]
    fn message_uppercases_subject_and_wraps_text() {
        let service = EmailService::new(&settings()).unwrap();
        let message = service
            .build_message(&SendEmail {
                to: "user@example.com".into(),
                subject: "welcome aboard".into(),
                text: "hello there".into(),
                html: None,
            })
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: WELCOME ABOARD"));
        assert!(raw.contains("<p>hello there</p>"));
    }

    #[test]
    fn html_body_takes_precedence_over_text() {
        let service = EmailService::new(&settings()).unwrap();
        let message = service
            .build_message(&SendEmail {
                to: "user@example.com".into(),
                subject: "s".into(),
                text: "plain".into(),
                html: Some("<h1>rich</h1>".into()),
            })
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("<h1>rich</h1>"));
        assert!(!raw.contains("<p>plain</p>"));
    }

    #[test]
    fn invalid_recipient_is_a_bad_request() {
        let service = EmailService::new(&settings()).unwrap();
        let err = service
            .build_message(&SendEmail {
                to: "not-an-address".into(),
                ..SendEmail::default()
            })
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.origin, SOURCE);
    }
}
