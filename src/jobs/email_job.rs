//! Email background job.
//!
//! Approval notices and decision notices are queued as `EmailJob`s and
//! delivered by the worker started with `jobs work`. Without SMTP settings
//! the worker logs each message instead of sending it.

use apalis::prelude::Data;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::infra::SmtpMailer;

/// Email job payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// HTML body
    pub body: String,
    /// Address replies should go to, usually the requester
    #[serde(default)]
    pub reply_to: Option<String>,
}

impl EmailJob {
    /// Create a new email job
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            reply_to: None,
        }
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob, mailer: Data<SmtpMailer>) -> Result<(), AppError> {
    tracing::info!(
        to = %job.to,
        subject = %job.subject,
        "Processing email job"
    );

    mailer.send(&job).await?;

    tracing::info!(to = %job.to, "Email processed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_older_payloads_still_decode() {
        let job: EmailJob =
            serde_json::from_str(r#"{"to":"a@example.com","subject":"s","body":"b"}"#).unwrap();
        assert_eq!(job, EmailJob::new("a@example.com", "s", "b"));
    }

    #[test]
    fn test_reply_to_builder() {
        let job = EmailJob::new("a@example.com", "s", "b").with_reply_to("jdoe@example.com");
        assert_eq!(job.reply_to.as_deref(), Some("jdoe@example.com"));
    }
}
