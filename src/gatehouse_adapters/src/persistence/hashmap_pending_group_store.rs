use std::{collections::HashMap, sync::Arc};

use gatehouse_core::{
    Group, PendingGroupAssignment, PendingGroupStore, PendingGroupStoreError, Username,
};
use tokio::sync::RwLock;

/// Process-local marker store. Markers do not survive a restart.
#[derive(Default, Clone)]
pub struct HashMapPendingGroupStore {
    markers: Arc<RwLock<HashMap<String, PendingGroupAssignment>>>,
}

impl HashMapPendingGroupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PendingGroupStore for HashMapPendingGroupStore {
    async fn record(
        &self,
        assignment: PendingGroupAssignment,
    ) -> Result<(), PendingGroupStoreError> {
        let mut markers = self.markers.write().await;
        markers.insert(assignment.key(), assignment);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<PendingGroupAssignment>, PendingGroupStoreError> {
        let markers = self.markers.read().await;
        let mut pending: Vec<_> = markers.values().cloned().collect();
        pending.sort_by(|a, b| {
            a.recorded_at
                .cmp(&b.recorded_at)
                .then_with(|| a.key().cmp(&b.key()))
        });
        Ok(pending)
    }

    async fn resolve(
        &self,
        username: &Username,
        group: Group,
    ) -> Result<(), PendingGroupStoreError> {
        let mut markers = self.markers.write().await;
        markers.remove(&PendingGroupAssignment::key_for(username, group));
        Ok(())
    }
}
