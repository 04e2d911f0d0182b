use std::sync::Arc;

use redis::{AsyncCommands, Client as RedisClient};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::keys;

/// 会话记录，以JSON形式写入redis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub user_id: String,
    pub created_at: i64,
    pub expires_at: i64,
}

/// redis会话存储，登录时绑定用户ID，登出时销毁
#[derive(Clone)]
pub struct SessionStore {
    redis: Arc<RedisClient>,
    ttl_secs: u64,
}

impl SessionStore {
    pub fn new(redis: Arc<RedisClient>, ttl_secs: u64) -> Self {
        Self { redis, ttl_secs }
    }

    /// 创建会话，会话ID即客户端持有的令牌
    pub async fn create(&self, user_id: &str) -> Result<Session, redis::RedisError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let now = chrono::Utc::now().timestamp();
        let session = Session {
            session_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now + self.ttl_secs as i64,
        };

        let key = keys::session_key(&session.session_id);
        let json = serde_json::to_string(&session).map_err(|e| {
            redis::RedisError::from((redis::ErrorKind::IoError, "序列化错误", e.to_string()))
        })?;

        let _: () = conn.set_ex(key, json, self.ttl_secs).await?;

        Ok(session)
    }

    /// 获取会话，过期或不存在返回None
    pub async fn get(&self, session_id: &str) -> Result<Option<Session>, redis::RedisError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let key = keys::session_key(session_id);
        let result: Option<String> = conn.get(key).await?;

        match result {
            Some(json) => {
                let session = serde_json::from_str(&json).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::IoError,
                        "反序列化错误",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// 销毁会话
    pub async fn destroy(&self, session_id: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let key = keys::session_key(session_id);
        let _: () = conn.del(key).await?;

        Ok(())
    }
}
