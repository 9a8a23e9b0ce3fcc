use redis::{Client, RedisResult};

/// Create a Redis client for `redis_hostname`.
pub fn get_redis_client(redis_hostname: &str) -> RedisResult<Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}

/// Open a blocking connection to `redis_hostname`.
pub fn configure_redis(redis_hostname: &str) -> RedisResult<redis::Connection> {
    get_redis_client(redis_hostname)?.get_connection()
}
