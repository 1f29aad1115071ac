//! Email delivery.

use std::future::Future;
use std::pin::Pin;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, Mailboxes, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::config::SmtpConfig;
use crate::error::{Result, SheetError};

/// Primary and carbon-copy recipients of one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipients {
    /// Primary recipient.
    pub to: Mailbox,
    /// Carbon-copy recipients.
    pub cc: Vec<Mailbox>,
}

impl Recipients {
    /// A single recipient.
    pub fn single(to: Mailbox) -> Self {
        Self { to, cc: Vec::new() }
    }

    /// Parses a comma or semicolon separated address list.
    ///
    /// The first address becomes `to`, the rest `cc`. Returns `Ok(None)` for
    /// a blank list so the caller can pick its default.
    pub fn parse_list(list: &str) -> std::result::Result<Option<Self>, String> {
        let normalized = list.replace(';', ",");
        if normalized.split(',').all(|s| s.trim().is_empty()) {
            return Ok(None);
        }
        let mailboxes: Mailboxes = normalized.parse().map_err(|e| format!("{e}"))?;

        let mut iter = mailboxes.into_iter();
        Ok(iter.next().map(|to| Self {
            to,
            cc: iter.collect(),
        }))
    }
}

/// A file attached to an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    /// File name shown to the recipient.
    pub file_name: String,
    /// MIME type, e.g. `text/csv`.
    pub content_type: String,
    /// Raw bytes.
    pub data: Vec<u8>,
}

/// An HTML email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Recipients.
    pub recipients: Recipients,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Attached files.
    pub attachments: Vec<EmailAttachment>,
}

/// Something that can deliver an [`OutgoingEmail`].
pub trait Mailer: Send + Sync {
    /// Sends `email`, resolving once the transport accepted or rejected it.
    fn send<'a>(
        &'a self,
        email: &'a OutgoingEmail,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// SMTP mailer using STARTTLS and plain credentials.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Creates a mailer from SMTP settings; the username doubles as sender.
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from: Mailbox = config
            .username
            .parse()
            .map_err(|e| SheetError::Delivery(format!("invalid sender address: {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| SheetError::Delivery(format!("invalid SMTP relay: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }

    /// Builds the MIME message for `email`.
    pub fn build_message(&self, email: &OutgoingEmail) -> Result<Message> {
        build_message(&self.from, email)
    }
}

/// Builds a multipart/mixed message: HTML body followed by attachments.
pub fn build_message(from: &Mailbox, email: &OutgoingEmail) -> Result<Message> {
    let mut builder = Message::builder()
        .from(from.clone())
        .to(email.recipients.to.clone())
        .subject(email.subject.clone());
    for cc in &email.recipients.cc {
        builder = builder.cc(cc.clone());
    }

    let mut body = MultiPart::mixed().singlepart(SinglePart::html(email.html.clone()));
    for attachment in &email.attachments {
        let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
            SheetError::Delivery(format!(
                "invalid content type '{}': {e}",
                attachment.content_type
            ))
        })?;
        body = body.singlepart(
            Attachment::new(attachment.file_name.clone()).body(attachment.data.clone(), content_type),
        );
    }

    builder
        .multipart(body)
        .map_err(|e| SheetError::Delivery(format!("failed to build email: {e}")))
}

impl Mailer for SmtpMailer {
    fn send<'a>(
        &'a self,
        email: &'a OutgoingEmail,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let message = self.build_message(email)?;
            debug!(
                to = %email.recipients.to,
                cc = email.recipients.cc.len(),
                subject = %email.subject,
                "Sending email"
            );

            self.transport
                .send(message)
                .await
                .map_err(|e| SheetError::Delivery(format!("SMTP send failed: {e}")))?;

            info!(to = %email.recipients.to, "Email sent");
            Ok(())
        })
    }
}
