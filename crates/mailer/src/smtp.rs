use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::{config::MailerConfig, Mail, Notifier, NotifyError};

const IMPLICIT_TLS_PORT: u16 = 465;

/// Sends notifications through an SMTP relay.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &MailerConfig) -> Result<Self, NotifyError> {
        // Port 465 speaks TLS from the first byte; everything else upgrades
        // with STARTTLS.
        let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        };
        let mut builder = builder.port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            sender: config.sender.parse()?,
        })
    }
}

/// Converts a rendered [`Mail`] into a MIME message from `sender`.
pub fn build_message(sender: &Mailbox, mail: Mail) -> Result<Message, NotifyError> {
    let mut builder = Message::builder()
        .from(sender.clone())
        .to(mail.to.parse()?)
        .subject(mail.subject);

    if let Some(bcc) = &mail.bcc {
        builder = builder.bcc(bcc.parse()?);
    }

    Ok(builder.header(ContentType::TEXT_HTML).body(mail.html)?)
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, mail: Mail) -> Result<(), NotifyError> {
        let kind = mail.kind;
        let message = build_message(&self.sender, mail)?;

        let response = self.transport.send(message).await?;
        debug!(%kind, code = %response.code(), "SMTP relay accepted message");

        Ok(())
    }
}
