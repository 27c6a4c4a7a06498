//! Stead Mailer
//!
//! Transactional email over SMTP. Bodies are small inline HTML; the relay
//! host, credentials and the admin notification address all come from the
//! environment at call time.

pub mod templates;

use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use stead_config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("message build failed: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp relay failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("mail configuration missing: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MailError>;

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    admin: Mailbox,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();
        Ok(Self {
            transport,
            from: config.from.parse()?,
            admin: config.admin_email.parse()?,
        })
    }

    pub fn from_env() -> Result<Self> {
        let config = MailConfig::from_env().map_err(|e| MailError::Config(e.to_string()))?;
        Self::new(config)
    }

    async fn send_html(&self, builder: lettre::message::MessageBuilder, html: String) -> Result<()> {
        let message = builder
            .from(self.from.clone())
            .header(ContentType::TEXT_HTML)
            .body(html)?;
        self.transport.send(message).await?;
        Ok(())
    }

    /// Bcc blast to every recipient. The caller records the newsletter
    /// document after a successful send.
    pub async fn send_newsletter(
        &self,
        subject: &str,
        content: &str,
        recipients: &[String],
    ) -> Result<()> {
        let mut builder = Message::builder().subject(subject);
        for recipient in recipients {
            builder = builder.bcc(recipient.parse()?);
        }
        self.send_html(builder, templates::newsletter_html(subject, content))
            .await?;
        tracing::info!(subject, recipients = recipients.len(), "newsletter sent");
        Ok(())
    }

    /// Admin notification plus a confirmation to the registrant.
    pub async fn send_waitlist_notification(
        &self,
        name: &str,
        email: &str,
        user_type: &str,
    ) -> Result<()> {
        let admin_message = Message::builder()
            .to(self.admin.clone())
            .subject("New Waitlist Registration");
        self.send_html(
            admin_message,
            templates::waitlist_admin_html(name, email, user_type),
        )
        .await?;

        let confirmation = Message::builder()
            .to(email.parse()?)
            .subject("Welcome to the Stead Waitlist");
        self.send_html(confirmation, templates::waitlist_welcome_html(name, user_type))
            .await?;
        Ok(())
    }

    pub async fn send_subscription_confirmation(&self, email: &str) -> Result<()> {
        let message = Message::builder()
            .to(email.parse()?)
            .subject("Welcome to Our Newsletter!");
        self.send_html(message, templates::subscription_html()).await
    }
}
