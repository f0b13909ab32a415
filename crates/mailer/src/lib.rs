//! # Tutorslot Mailer
//!
//! Email notifications for booking events. The service layer only sees the
//! [`Notifier`] trait; [`smtp::SmtpNotifier`] is the production transport.
//!
//! Sends are fire-and-forget: [`dispatch`] spawns the send on the runtime and
//! logs the outcome. Nothing is retried.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub mod config;
pub mod smtp;
pub mod templates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    Confirmation,
    Cancellation,
}

impl fmt::Display for MailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailKind::Confirmation => f.write_str("confirmation"),
            MailKind::Cancellation => f.write_str("cancellation"),
        }
    }
}

/// A rendered HTML email ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Mail {
    pub kind: MailKind,
    pub to: String,
    /// Blind copy, normally the operator's own address.
    pub bcc: Option<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, mail: Mail) -> Result<(), NotifyError>;
}

/// Sends `mail` on a detached task.
///
/// The caller is not expected to await the handle; failures end up in the
/// log and nowhere else.
pub fn dispatch(notifier: Arc<dyn Notifier>, mail: Mail) -> JoinHandle<()> {
    tokio::spawn(async move {
        let kind = mail.kind;
        let to = mail.to.clone();

        match notifier.send(mail).await {
            Ok(()) => info!(%kind, %to, "Notification email sent"),
            Err(e) => error!(%kind, %to, error = %e, "Failed to send notification email"),
        }
    })
}
