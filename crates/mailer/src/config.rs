use chrono_tz::Tz;
use eyre::{eyre, Result};
use std::env;

use crate::templates::MailTemplates;

const DEFAULT_LOCATION: &str = "117 Satterfield Circle";

/// Configuration for outgoing email.
///
/// Loaded from environment variables:
///
/// - `SMTP_HOST` (required)
/// - `SMTP_PORT` (default 587; 465 switches to implicit TLS)
/// - `SMTP_USER` / `SMTP_PASS` (optional, both needed for authentication)
/// - `SENDER_EMAIL` (required)
/// - `OPERATOR_EMAIL` (blind-copied on every email, defaults to the sender)
/// - `SESSION_LOCATION` (shown in confirmations)
/// - `DISPLAY_TIMEZONE` (IANA name used to print session times, default `UTC`)
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub sender: String,
    pub operator: Option<String>,
    pub session_location: String,
    pub display_timezone: Tz,
}

impl MailerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let smtp_host = env::var("SMTP_HOST")
            .map_err(|_| eyre!("SMTP_HOST environment variable not set"))?;

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|_| eyre!("SMTP_PORT must be a valid port number"))?;

        let smtp_username = env::var("SMTP_USER").ok();
        let smtp_password = env::var("SMTP_PASS").ok();

        let sender = env::var("SENDER_EMAIL")
            .map_err(|_| eyre!("SENDER_EMAIL environment variable not set"))?;

        let operator = env::var("OPERATOR_EMAIL").ok();

        let session_location =
            env::var("SESSION_LOCATION").unwrap_or_else(|_| DEFAULT_LOCATION.to_string());

        let display_timezone = env::var("DISPLAY_TIMEZONE")
            .unwrap_or_else(|_| "UTC".to_string())
            .parse::<Tz>()
            .map_err(|e| eyre!("DISPLAY_TIMEZONE is not a valid IANA timezone: {}", e))?;

        Ok(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            sender,
            operator,
            session_location,
            display_timezone,
        })
    }

    /// Address copied on every email (defaults to the sender)
    pub fn operator(&self) -> &str {
        self.operator.as_deref().unwrap_or(&self.sender)
    }

    pub fn templates(&self) -> MailTemplates {
        MailTemplates {
            operator: self.operator().to_string(),
            location: self.session_location.clone(),
            display_timezone: self.display_timezone,
        }
    }
}
