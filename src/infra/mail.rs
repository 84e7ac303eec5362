//! Outbound mail: the queue services push to and the SMTP relay the
//! worker delivers through.

use apalis::prelude::Storage;
use apalis_sql::mysql::MysqlStorage;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::MailSettings;
use crate::errors::{AppError, AppResult};
use crate::jobs::EmailJob;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Where services hand off mail for background delivery.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MailQueue: Send + Sync {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()>;
}

/// MailQueue backed by the apalis MySQL job table.
#[derive(Clone)]
pub struct ApalisMailQueue {
    storage: MysqlStorage<EmailJob>,
}

impl ApalisMailQueue {
    pub fn new(storage: MysqlStorage<EmailJob>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl MailQueue for ApalisMailQueue {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()> {
        let to = job.to.clone();
        let mut storage = self.storage.clone();
        storage
            .push(job)
            .await
            .map_err(|e| AppError::mail(format!("Failed to queue mail for {}: {}", to, e)))?;
        tracing::debug!(to = %to, "Email job queued");
        Ok(())
    }
}

/// SMTP delivery. Without a configured relay host, messages are logged.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
}

impl SmtpMailer {
    pub fn from_settings(settings: &MailSettings) -> AppResult<Self> {
        let transport = match settings.smtp_host.as_deref() {
            Some(host) => {
                let mut builder = if settings.smtp_tls {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).map_err(|e| {
                        AppError::mail(format!("Invalid SMTP relay '{}': {}", host, e))
                    })?
                } else {
                    AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                };
                builder = builder.port(settings.smtp_port);
                if let Some((user, pass)) = settings.credentials() {
                    builder = builder.credentials(Credentials::new(user, pass));
                }
                Some(builder.build())
            }
            None => None,
        };

        Ok(Self {
            transport,
            from_address: settings.smtp_from.clone(),
        })
    }

    pub fn is_log_only(&self) -> bool {
        self.transport.is_none()
    }

    /// Deliver one message.
    pub async fn send(&self, job: &EmailJob) -> AppResult<()> {
        let from = self.from_address.as_str();

        let Some(transport) = &self.transport else {
            tracing::warn!("SMTP not configured - logging email instead of sending");
            tracing::info!(
                "=== EMAIL (not sent) ===\n\
                 From: {}\n\
                 To: {}\n\
                 Reply-To: {}\n\
                 Subject: {}\n\
                 Body:\n{}\n\
                 ========================",
                from,
                job.to,
                job.reply_to.as_deref().unwrap_or("-"),
                job.subject,
                job.body
            );
            return Ok(());
        };

        let message = build_message(job, from)?;
        transport
            .send(message)
            .await
            .map_err(|e| AppError::mail(format!("SMTP delivery to {} failed: {}", job.to, e)))?;
        Ok(())
    }
}

fn mailbox(address: &str) -> AppResult<Mailbox> {
    address
        .parse()
        .map_err(|e| AppError::mail(format!("Invalid address '{}': {}", address, e)))
}

fn build_message(job: &EmailJob, from: &str) -> AppResult<Message> {
    let mut builder = Message::builder()
        .from(mailbox(from)?)
        .to(mailbox(&job.to)?)
        .subject(job.subject.as_str())
        .header(ContentType::TEXT_HTML);
    if let Some(reply_to) = &job.reply_to {
        builder = builder.reply_to(mailbox(reply_to)?);
    }
    builder
        .body(job.body.clone())
        .map_err(|e| AppError::mail(format!("Failed to build message: {}", e)))
}
