use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::config::RecordsConfig;
use crate::domain::notify::{DispatchError, Notifier, OutgoingEmail};

/// SMTP relay settings, split out of [`RecordsConfig`].
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
    pub sender_address: String,
    pub sender_name: String,
}

impl From<&RecordsConfig> for SmtpSettings {
    fn from(config: &RecordsConfig) -> Self {
        Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            username: config.smtp_username.clone(),
            password: config.smtp_password.clone(),
            use_tls: config.smtp_use_tls,
            sender_address: config.mail_sender_address.clone(),
            sender_name: config.mail_sender_name.clone(),
        }
    }
}

/// Sends HTML mail through an SMTP relay.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpNotifier {
    /// Build the transport. No connection is opened until the first send.
    pub fn new(settings: &SmtpSettings) -> Result<Self, DispatchError> {
        let sender = Mailbox::new(
            Some(settings.sender_name.clone()),
            settings
                .sender_address
                .parse()
                .map_err(|e| DispatchError::InvalidAddress(format!("sender: {e}")))?,
        );

        let mut builder = if settings.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                .map_err(|e| DispatchError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        }
        .port(settings.port);
        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            sender,
        })
    }

    fn message(&self, email: OutgoingEmail) -> Result<Message, DispatchError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| DispatchError::InvalidAddress(format!("{}: {e}", email.to)))?;
        Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html_body)
            .map_err(|e| DispatchError::Message(e.to_string()))
    }
}

impl Notifier for SmtpNotifier {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DispatchError> {
        let message = self.message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        Ok(())
    }
}
