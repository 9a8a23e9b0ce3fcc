pub mod hashmap_pending_group_store;
pub mod redis_pending_group_store;

pub use hashmap_pending_group_store::HashMapPendingGroupStore;
pub use redis_pending_group_store::RedisPendingGroupStore;
