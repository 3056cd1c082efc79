//! Mapping of Redis failures onto domain errors

use std::future::Future;
use std::time::Duration;

use redis::{RedisError, RedisResult};

use crate::domain::{CacheOp, DomainError};

/// Maps a Redis failure onto the error kind owned by `op`; client-side
/// timeouts become [`DomainError::Timeout`]
pub fn map_redis_error(op: CacheOp, target: &str, e: RedisError) -> DomainError {
    if e.is_timeout() {
        DomainError::timeout(format!("cache.{} {}", op, target))
    } else {
        op.error(target, e.to_string())
    }
}

/// Runs one Redis command under an optional deadline
pub async fn run_command<T, F>(
    op: CacheOp,
    target: &str,
    deadline: Option<Duration>,
    command: F,
) -> Result<T, DomainError>
where
    F: Future<Output = RedisResult<T>>,
{
    let result = match deadline {
        Some(deadline) => tokio::time::timeout(deadline, command)
            .await
            .map_err(|_| DomainError::timeout(format!("cache.{} {}", op, target)))?,
        None => command.await,
    };

    result.map_err(|e| map_redis_error(op, target, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::ErrorKind;

    #[test]
    fn test_error_kind_follows_operation() {
        let io = || RedisError::from((ErrorKind::IoError, "broken pipe"));

        assert!(matches!(
            map_redis_error(CacheOp::Get, "Issue:i1", io()),
            DomainError::CacheRead { .. }
        ));
        assert!(matches!(
            map_redis_error(CacheOp::Set, "Issue:i1", io()),
            DomainError::CacheWrite { .. }
        ));
        assert!(matches!(
            map_redis_error(CacheOp::Keys, "Issue*", io()),
            DomainError::CacheDelete { .. }
        ));
    }

    #[tokio::test]
    async fn test_deadline_surfaces_as_timeout() {
        let result: Result<(), _> = run_command(
            CacheOp::Get,
            "Issue:i1",
            Some(Duration::from_millis(10)),
            std::future::pending::<RedisResult<()>>(),
        )
        .await;

        assert!(matches!(result, Err(DomainError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_command_result_passes_through() {
        let result = run_command(CacheOp::Delete, "Issue:i1", None, async { Ok(1i64) }).await;
        assert_eq!(result.unwrap(), 1);
    }
}
