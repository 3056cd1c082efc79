//! `evict` command

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::cache::{Cache, CachePattern};
use crate::infrastructure::cache::CacheFactory;

#[derive(Args, Debug)]
pub struct EvictArgs {
    /// Pattern ending in `*`, e.g. `Issue:GetRelations:*`
    pub pattern: String,
}

pub async fn run(args: EvictArgs, config: &AppConfig) -> anyhow::Result<()> {
    let cache = CacheFactory::new().create(&config.cache).await?;
    let removed = evict(cache.as_ref(), &args.pattern).await?;

    println!("{} key(s) removed", removed);
    Ok(())
}

/// Parses `raw` and deletes every matching key
pub async fn evict(cache: &dyn Cache, raw: &str) -> anyhow::Result<usize> {
    let pattern = CachePattern::parse(raw)?;
    let removed = cache.delete_pattern(&pattern).await?;

    info!(pattern = %pattern, removed, "Evicted cache pattern");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{CacheOp, MockCache};

    #[tokio::test]
    async fn test_evict_removes_matching_keys() {
        let cache = MockCache::new()
            .with_entry("Issue:GetRelations:Issue:i1", &"stale")
            .with_entry("Issue:GetRelations:Issue:i2", &"stale")
            .with_entry("Issue:i1", &"kept");

        let removed = evict(&cache, "Issue:GetRelations:*").await.unwrap();

        assert_eq!(removed, 2);
        assert_eq!(cache.keys(), vec!["Issue:i1"]);
    }

    #[tokio::test]
    async fn test_rejects_pattern_without_wildcard() {
        let cache = MockCache::new();

        let result = evict(&cache, "Issue:GetRelations").await;

        assert!(result.is_err());
        assert_eq!(cache.calls(CacheOp::DeletePattern), 0);
    }
}
