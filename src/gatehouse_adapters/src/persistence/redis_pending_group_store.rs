use std::{collections::HashMap, sync::Arc};

use gatehouse_core::{
    Group, PendingGroupAssignment, PendingGroupStore, PendingGroupStoreError, Username,
};
use redis::{Commands, Connection};
use tokio::sync::RwLock;

/// Markers live in a single Redis hash, one field per `username:group`
/// pair, each holding the JSON-encoded assignment.
#[derive(Clone)]
pub struct RedisPendingGroupStore {
    conn: Arc<RwLock<Connection>>,
}

impl RedisPendingGroupStore {
    pub fn new(conn: Arc<RwLock<Connection>>) -> Self {
        Self { conn }
    }
}

const PENDING_GROUPS_KEY: &str = "pending_group_assignments";

fn database_error(error: redis::RedisError) -> PendingGroupStoreError {
    PendingGroupStoreError::DatabaseError(error.to_string())
}

#[async_trait::async_trait]
impl PendingGroupStore for RedisPendingGroupStore {
    async fn record(
        &self,
        assignment: PendingGroupAssignment,
    ) -> Result<(), PendingGroupStoreError> {
        let value = serde_json::to_string(&assignment)
            .map_err(|e| PendingGroupStoreError::Serialization(e.to_string()))?;

        let mut conn = self.conn.write().await;
        conn.hset::<_, _, _, ()>(PENDING_GROUPS_KEY, assignment.key(), value)
            .map_err(database_error)
    }

    async fn list(&self) -> Result<Vec<PendingGroupAssignment>, PendingGroupStoreError> {
        let entries: HashMap<String, String> = {
            let mut conn = self.conn.write().await;
            conn.hgetall(PENDING_GROUPS_KEY).map_err(database_error)?
        };

        let mut pending = entries
            .into_iter()
            .map(|(field, value)| {
                serde_json::from_str::<PendingGroupAssignment>(&value)
                    .map_err(|e| PendingGroupStoreError::Serialization(format!("{field}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
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
        let mut conn = self.conn.write().await;
        conn.hdel::<_, _, ()>(
            PENDING_GROUPS_KEY,
            PendingGroupAssignment::key_for(username, group),
        )
        .map_err(database_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testcontainers_modules::{redis::Redis, testcontainers::runners::AsyncRunner};

    #[tokio::test]
    #[ignore = "needs a Docker daemon"]
    async fn test_markers_round_trip_through_redis() {
        let container = Redis::default().start().await.unwrap();
        let host = container.get_host().await.unwrap();
        let port = container.get_host_port_ipv4(6379).await.unwrap();
        let conn = redis::Client::open(format!("redis://{host}:{port}/"))
            .unwrap()
            .get_connection()
            .unwrap();
        let store = RedisPendingGroupStore::new(Arc::new(RwLock::new(conn)));
        let username = Username::parse("redis@example.com").unwrap();

        store
            .record(PendingGroupAssignment {
                username: username.clone(),
                group: Group::User,
                recorded_at: 42,
            })
            .await
            .unwrap();

        let pending = store.list().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].username, username);
        assert_eq!(pending[0].recorded_at, 42);

        store.resolve(&username, Group::User).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
