use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{group::Group, username::Username};

/// Durable note that an identity exists but never received its group.
///
/// Written when the second step of a provisioning workflow fails, replayed by
/// reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingGroupAssignment {
    pub username: Username,
    pub group: Group,
    /// Unix timestamp (seconds) of the failed assignment.
    pub recorded_at: i64,
}

impl PendingGroupAssignment {
    /// Stable identifier: one marker per (username, group) pair.
    pub fn key(&self) -> String {
        Self::key_for(&self.username, self.group)
    }

    pub fn key_for(username: &Username, group: Group) -> String {
        format!("{username}:{group}")
    }
}

#[derive(Debug, Error)]
pub enum PendingGroupStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Corrupt marker: {0}")]
    Serialization(String),
}

#[async_trait]
pub trait PendingGroupStore: Send + Sync {
    /// Records a marker; recording the same pair twice keeps a single marker.
    async fn record(&self, assignment: PendingGroupAssignment)
    -> Result<(), PendingGroupStoreError>;

    async fn list(&self) -> Result<Vec<PendingGroupAssignment>, PendingGroupStoreError>;

    async fn resolve(&self, username: &Username, group: Group)
    -> Result<(), PendingGroupStoreError>;
}
