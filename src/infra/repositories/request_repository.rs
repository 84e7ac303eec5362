//! Approval request persistence.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::request::{self, ActiveModel, Entity as RequestEntity};
use super::update_set::UpdateSet;
use crate::domain::{ApprovalRequest, ProposedChange, RequestStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Request repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn find(&self, id: i32) -> AppResult<Option<ApprovalRequest>>;

    /// Newest first, optionally filtered by status
    async fn list(&self, status: Option<RequestStatus>) -> AppResult<Vec<ApprovalRequest>>;
}

impl TryFrom<request::Model> for ApprovalRequest {
    type Error = AppError;

    fn try_from(model: request::Model) -> Result<Self, Self::Error> {
        let change = serde_json::from_str(&model.payload).map_err(|e| {
            AppError::internal(format!("Request {} has an unreadable payload: {}", model.id, e))
        })?;
        Ok(ApprovalRequest {
            id: model.id,
            created_at: model.created_at,
            status: model.status.parse()?,
            kind: model.kind,
            requested_by: model.requested_by,
            decided_by: model.decided_by,
            decided_at: model.decided_at,
            change,
        })
    }
}

/// Request queries over any connection.
pub struct RequestQueries<'c, C: ConnectionTrait> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> RequestQueries<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find(&self, id: i32) -> AppResult<Option<ApprovalRequest>> {
        RequestEntity::find_by_id(id)
            .one(self.conn)
            .await?
            .map(ApprovalRequest::try_from)
            .transpose()
    }

    pub async fn list(&self, status: Option<RequestStatus>) -> AppResult<Vec<ApprovalRequest>> {
        let mut query = RequestEntity::find().order_by_desc(request::Column::Id);
        if let Some(status) = status {
            query = query.filter(request::Column::Status.eq(status.as_str()));
        }
        query
            .all(self.conn)
            .await?
            .into_iter()
            .map(ApprovalRequest::try_from)
            .collect()
    }

    /// Store a new pending request carrying `change`.
    pub async fn insert(&self, change: &ProposedChange, requested_by: &str) -> AppResult<i32> {
        let payload = serde_json::to_string(change)
            .map_err(|e| AppError::internal(format!("Failed to encode change: {}", e)))?;
        let model = ActiveModel {
            created_at: Set(Utc::now()),
            status: Set(RequestStatus::Pending.as_str().to_string()),
            kind: Set(change.kind().to_string()),
            payload: Set(payload),
            requested_by: Set(requested_by.to_string()),
            decided_by: Set(None),
            decided_at: Set(None),
            ..Default::default()
        };
        let result = RequestEntity::insert(model).exec(self.conn).await?;
        Ok(result.last_insert_id)
    }

    /// Move a request out of `Pending`. Returns false when the request was
    /// not pending, so only one decider can win.
    pub async fn decide(&self, id: i32, status: RequestStatus, decided_by: &str) -> AppResult<bool> {
        let mut set = UpdateSet::<RequestEntity>::new();
        set.set(request::Column::Status, status.as_str())
            .set(request::Column::DecidedBy, decided_by.to_string())
            .set(request::Column::DecidedAt, Utc::now());
        let affected = set
            .exec(
                self.conn,
                request::Column::Id
                    .eq(id)
                    .and(request::Column::Status.eq(RequestStatus::Pending.as_str())),
            )
            .await?;
        Ok(affected > 0)
    }
}

/// Pool-backed RequestRepository.
pub struct RequestStore {
    db: DatabaseConnection,
}

impl RequestStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RequestRepository for RequestStore {
    async fn find(&self, id: i32) -> AppResult<Option<ApprovalRequest>> {
        RequestQueries::new(&self.db).find(id).await
    }

    async fn list(&self, status: Option<RequestStatus>) -> AppResult<Vec<ApprovalRequest>> {
        RequestQueries::new(&self.db).list(status).await
    }
}
