//! Approval workflow.
//!
//! Submitting stores the proposed change on a `Pending` request and mails
//! every Super-Admin a link to it. Deciding moves the request to
//! `Approved` or `Rejected` exactly once; approval applies the stored
//! change in the same transaction as the status update.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;

use super::cabinet_service::{create_cabinet_in, delete_cabinet_in};
use super::device_service::{
    check_batch, create_device_in, delete_device_in, import_devices_in, update_device_in,
};
use crate::domain::request::{approval_body, approval_link, decision_notice};
use crate::domain::{ApprovalRequest, ProposedChange, RequestStatus, SubmittedRequest};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{MailQueue, TransactionContext, UnitOfWork};
use crate::jobs::EmailJob;

/// Request service trait for dependency injection.
#[async_trait]
pub trait RequestService: Send + Sync {
    /// Store a pending change and notify the approvers
    async fn submit(&self, requested_by: &str, change: ProposedChange)
        -> AppResult<SubmittedRequest>;

    async fn get(&self, id: i32) -> AppResult<ApprovalRequest>;

    /// Newest first, optionally filtered by status
    async fn list(&self, status: Option<RequestStatus>) -> AppResult<Vec<ApprovalRequest>>;

    /// Approve or reject a pending request
    async fn decide(&self, id: i32, status: &str, decided_by: &str) -> AppResult<ApprovalRequest>;
}

/// Concrete implementation of RequestService using Unit of Work.
pub struct ApprovalWorkflow<U: UnitOfWork> {
    uow: Arc<U>,
    mail: Arc<dyn MailQueue>,
    approval_base_url: String,
}

impl<U: UnitOfWork> ApprovalWorkflow<U> {
    pub fn new(uow: Arc<U>, mail: Arc<dyn MailQueue>, approval_base_url: impl Into<String>) -> Self {
        Self {
            uow,
            mail,
            approval_base_url: approval_base_url.into(),
        }
    }
}

/// Targets of deletes and updates must exist when the request is filed.
async fn check_target(ctx: &TransactionContext<'_>, change: &ProposedChange) -> AppResult<()> {
    match change {
        ProposedChange::DeleteCabinet { cabinet_id } => {
            if !ctx.cabinets().exists(*cabinet_id).await? {
                return Err(AppError::not_found(format!("Cabinet {}", cabinet_id)));
            }
        }
        ProposedChange::UpdateDevice { device_id, .. } | ProposedChange::DeleteDevice { device_id } => {
            if !ctx.devices().exists(*device_id).await? {
                return Err(AppError::not_found(format!("Device {}", device_id)));
            }
        }
        ProposedChange::BulkImportDevices { devices } => check_batch(devices)?,
        ProposedChange::AddCabinet(_) | ProposedChange::AddDevice(_) => {}
    }
    Ok(())
}

/// Carry out an approved change.
async fn apply_change(ctx: &TransactionContext<'_>, change: ProposedChange) -> AppResult<()> {
    match change {
        ProposedChange::AddCabinet(cabinet) => {
            create_cabinet_in(ctx, cabinet).await?;
        }
        ProposedChange::DeleteCabinet { cabinet_id } => delete_cabinet_in(ctx, cabinet_id).await?,
        ProposedChange::AddDevice(device) => {
            create_device_in(ctx, &device).await?;
        }
        ProposedChange::BulkImportDevices { devices } => {
            let report = import_devices_in(ctx, devices).await?;
            for failure in &report.failed {
                tracing::warn!(
                    index = failure.index,
                    label = %failure.label,
                    reason = %failure.reason,
                    "Approved import row skipped"
                );
            }
        }
        ProposedChange::UpdateDevice { device_id, patch } => {
            update_device_in(ctx, device_id, patch).await?
        }
        ProposedChange::DeleteDevice { device_id } => delete_device_in(ctx, device_id).await?,
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> RequestService for ApprovalWorkflow<U> {
    async fn submit(
        &self,
        requested_by: &str,
        change: ProposedChange,
    ) -> AppResult<SubmittedRequest> {
        change.validate()?;

        let requester = requested_by.to_string();
        let base_url = self.approval_base_url.clone();
        let mail = self.mail.clone();

        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let user = ctx
                        .users()
                        .find_by_id(&requester)
                        .await?
                        .ok_or(AppError::Unauthorized)?;
                    let reply_to = user
                        .email
                        .filter(|email| !email.trim().is_empty())
                        .ok_or_else(|| AppError::validation("Email not set for the user"))?;

                    let approvers = ctx.users().super_admin_emails().await?;
                    if approvers.is_empty() {
                        return Err(AppError::invalid_state(
                            "No Super-Admin has a notification email",
                        ));
                    }

                    check_target(&ctx, &change).await?;

                    let id = ctx.requests().insert(&change, &requester).await?;
                    let link = approval_link(&base_url, id, &change)?;
                    let subject = change.subject(id);
                    let body = approval_body(&requester, &change, &link);

                    try_join_all(approvers.into_iter().map(|to| {
                        mail.enqueue(
                            EmailJob::new(to, subject.clone(), body.clone())
                                .with_reply_to(reply_to.clone()),
                        )
                    }))
                    .await?;

                    tracing::info!(
                        request_id = id,
                        kind = change.kind(),
                        requested_by = %requester,
                        "Approval requested"
                    );
                    Ok(SubmittedRequest {
                        request_id: id,
                        status: RequestStatus::Pending,
                    })
                })
            })
            .await
    }

    async fn get(&self, id: i32) -> AppResult<ApprovalRequest> {
        self.uow
            .requests()
            .find(id)
            .await?
            .ok_or_not_found(format!("Request {}", id))
    }

    async fn list(&self, status: Option<RequestStatus>) -> AppResult<Vec<ApprovalRequest>> {
        self.uow.requests().list(status).await
    }

    async fn decide(&self, id: i32, status: &str, decided_by: &str) -> AppResult<ApprovalRequest> {
        let status = RequestStatus::parse_decision(status)?;
        let decider = decided_by.to_string();

        let (request, notify) = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let pending = ctx
                        .requests()
                        .find(id)
                        .await?
                        .ok_or_not_found(format!("Request {}", id))?;

                    if !ctx.requests().decide(id, status, &decider).await? {
                        return Err(AppError::invalid_state(format!(
                            "Request {} is no longer pending",
                            id
                        )));
                    }

                    if status == RequestStatus::Approved {
                        apply_change(&ctx, pending.proposed_change()?).await?;
                    }

                    let notify = ctx
                        .users()
                        .find_by_id(&pending.requested_by)
                        .await?
                        .and_then(|user| user.email)
                        .filter(|email| !email.trim().is_empty());
                    let decided = ctx
                        .requests()
                        .find(id)
                        .await?
                        .ok_or_not_found(format!("Request {}", id))?;
                    Ok((decided, notify))
                })
            })
            .await?;

        tracing::info!(
            request_id = id,
            status = %request.status,
            decided_by = %decided_by,
            "Request decided"
        );

        // The decision is committed; a failed notice only gets logged
        if let Some(to) = notify {
            let (subject, body) = decision_notice(id, &request.kind, request.status);
            if let Err(e) = self.mail.enqueue(EmailJob::new(to, subject, body)).await {
                tracing::warn!(request_id = id, error = %e, "Decision notice not queued");
            }
        }

        Ok(request)
    }
}
