//! Cached issue repository

use async_trait::async_trait;

use super::coordinator::{entity_key, CacheCoordinator};
use crate::cache_key;
use crate::domain::entity::{EntityId, EntityKind, Patch};
use crate::domain::invalidation::{relation_endpoint, EvictionArgs, Operation, ReadOp};
use crate::domain::issue::{Issue, IssueRelation, IssueRelationKind, IssueRepository};
use crate::domain::user::User;
use crate::domain::DomainError;

const KIND: EntityKind = EntityKind::Issue;

/// Issue repository wrapper that caches reads and invalidates on writes
///
/// Watcher and relation changes evict the issue itself plus its per-issue
/// listing. Relations are evicted on their issue endpoint, which is the source
/// unless the source is a document.
pub struct CachedIssueRepository<R: IssueRepository> {
    inner: R,
    coordinator: CacheCoordinator,
}

impl<R: IssueRepository> CachedIssueRepository<R> {
    pub fn new(inner: R, coordinator: CacheCoordinator) -> Self {
        Self { inner, coordinator }
    }
}

#[async_trait]
impl<R: IssueRepository> IssueRepository for CachedIssueRepository<R> {
    async fn create(&self, project: &EntityId, issue: Issue) -> Result<Issue, DomainError> {
        let parent_issue = issue.parent.clone();

        self.coordinator
            .mutate(
                KIND,
                Operation::Create,
                EvictionArgs::new()
                    .parent(project)
                    .maybe_related(parent_issue.as_ref()),
                self.inner.create(project, issue),
            )
            .await
    }

    async fn get(&self, id: &EntityId) -> Result<Issue, DomainError> {
        self.coordinator
            .read_through(entity_key(KIND, id)?, self.inner.get(id))
            .await
    }

    async fn get_all_for_project(
        &self,
        project: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Issue>, DomainError> {
        let key = cache_key!(KIND, ReadOp::GetAllForProject, project, offset, limit);

        self.coordinator
            .read_through(key, self.inner.get_all_for_project(project, offset, limit))
            .await
    }

    async fn get_all_for_issue(
        &self,
        issue: &EntityId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Issue>, DomainError> {
        let key = cache_key!(KIND, ReadOp::GetAllForIssue, issue, offset, limit);

        self.coordinator
            .read_through(key, self.inner.get_all_for_issue(issue, offset, limit))
            .await
    }

    async fn add_watcher(&self, issue: &EntityId, user: &EntityId) -> Result<(), DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::AddWatcher,
                EvictionArgs::new().subject(issue).related(user),
                self.inner.add_watcher(issue, user),
            )
            .await
    }

    async fn get_watchers(&self, issue: &EntityId) -> Result<Vec<User>, DomainError> {
        let key = cache_key!(KIND, ReadOp::GetWatchers, issue);

        self.coordinator
            .read_through(key, self.inner.get_watchers(issue))
            .await
    }

    async fn remove_watcher(
        &self,
        issue: &EntityId,
        user: &EntityId,
    ) -> Result<(), DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::RemoveWatcher,
                EvictionArgs::new().subject(issue).related(user),
                self.inner.remove_watcher(issue, user),
            )
            .await
    }

    async fn add_relation(&self, relation: &IssueRelation) -> Result<(), DomainError> {
        let endpoint = relation_endpoint(&relation.source, &relation.target);

        self.coordinator
            .mutate(
                KIND,
                Operation::AddRelation,
                EvictionArgs::new().subject(endpoint),
                self.inner.add_relation(relation),
            )
            .await
    }

    async fn get_relations(&self, issue: &EntityId) -> Result<Vec<IssueRelation>, DomainError> {
        let key = cache_key!(KIND, ReadOp::GetRelations, issue);

        self.coordinator
            .read_through(key, self.inner.get_relations(issue))
            .await
    }

    async fn remove_relation(
        &self,
        source: &EntityId,
        target: &EntityId,
        kind: IssueRelationKind,
    ) -> Result<(), DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::RemoveRelation,
                EvictionArgs::new().subject(relation_endpoint(source, target)),
                self.inner.remove_relation(source, target, kind),
            )
            .await
    }

    async fn update(&self, id: &EntityId, patch: &Patch) -> Result<Issue, DomainError> {
        self.coordinator
            .update_with(KIND, id, self.inner.update(id, patch), |issue: &Issue| {
                issue.parent.as_ref()
            })
            .await
    }

    async fn delete(&self, id: &EntityId) -> Result<(), DomainError> {
        self.coordinator
            .mutate(
                KIND,
                Operation::Delete,
                EvictionArgs::new().subject(id),
                self.inner.delete(id),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::{CacheOp, Journal, MockCache};
    use crate::domain::issue::MockIssueRepository;
    use std::sync::Arc;

    fn id(kind: EntityKind, value: &str) -> EntityId {
        EntityId::new(kind, value).unwrap()
    }

    fn wrap(
        repo: MockIssueRepository,
        cache: MockCache,
    ) -> (CachedIssueRepository<MockIssueRepository>, Arc<MockCache>) {
        let cache = Arc::new(cache);
        let coordinator = CacheCoordinator::new(cache.clone());
        (CachedIssueRepository::new(repo, coordinator), cache)
    }

    fn issue(value: &str) -> Issue {
        let mut issue = Issue::new(id(EntityKind::Project, "p1"), "Crash on save");
        issue.id = id(EntityKind::Issue, value);
        issue
    }

    #[tokio::test]
    async fn test_get_twice_loads_once() {
        let stored = issue("i1");

        let mut repo = MockIssueRepository::new();
        let loaded = stored.clone();
        repo.expect_get()
            .times(1)
            .returning(move |_| Ok(loaded.clone()));

        let (cached, cache) = wrap(repo, MockCache::new());
        let issue_id = id(EntityKind::Issue, "i1");

        assert_eq!(cached.get(&issue_id).await.unwrap(), stored);
        assert_eq!(cache.calls(CacheOp::Set), 1);
        assert_eq!(cache.keys(), vec!["Issue:i1"]);

        cache.journal().clear();
        assert_eq!(cached.get(&issue_id).await.unwrap(), stored);
        assert_eq!(cache.journal().entries(), vec!["cache.get Issue:i1"]);
    }

    #[tokio::test]
    async fn test_update_with_parent_refreshes_then_evicts() {
        let journal = Journal::new();
        let fresh = issue("i1").with_parent(id(EntityKind::Issue, "p1"));

        let mut repo = MockIssueRepository::new();
        let updated = fresh.clone();
        let repo_journal = journal.clone();
        repo.expect_update().times(1).returning(move |_, _| {
            repo_journal.record("repo.update");
            Ok(updated.clone())
        });

        let (cached, cache) = wrap(repo, MockCache::with_journal(journal.clone()));
        let patch = Patch::new().set("status", "in_progress");

        let result = cached.update(&id(EntityKind::Issue, "i1"), &patch).await.unwrap();

        assert_eq!(result, fresh);
        assert_eq!(
            journal.entries(),
            vec![
                "repo.update",
                "cache.set Issue:i1",
                "cache.delete_pattern Issue:GetAllForIssue:Issue:p1:*",
                "cache.delete_pattern Project:*",
            ]
        );
        assert_eq!(cache.keys(), vec!["Issue:i1"]);
    }

    #[tokio::test]
    async fn test_update_without_parent_skips_child_listing() {
        let fresh = issue("i1");

        let mut repo = MockIssueRepository::new();
        repo.expect_update()
            .times(1)
            .returning(move |_, _| Ok(fresh.clone()));

        let (cached, cache) = wrap(repo, MockCache::new());

        cached
            .update(&id(EntityKind::Issue, "i1"), &Patch::new())
            .await
            .unwrap();

        assert_eq!(
            cache.journal().entries(),
            vec!["cache.set Issue:i1", "cache.delete_pattern Project:*"]
        );
    }

    #[tokio::test]
    async fn test_add_relation_between_issues() {
        let journal = Journal::new();
        let relation = IssueRelation::new(
            id(EntityKind::Issue, "i1"),
            id(EntityKind::Issue, "i2"),
            IssueRelationKind::Blocks,
        );

        let mut repo = MockIssueRepository::new();
        let repo_journal = journal.clone();
        repo.expect_add_relation().times(1).returning(move |_| {
            repo_journal.record("repo.add_relation");
            Ok(())
        });

        let (cached, _) = wrap(repo, MockCache::with_journal(journal.clone()));

        cached.add_relation(&relation).await.unwrap();

        assert_eq!(
            journal.entries(),
            vec![
                "cache.delete Issue:i1",
                "cache.delete_pattern Issue:GetRelations:Issue:i1:*",
                "cache.delete_pattern Issue:GetAllForIssue:*",
                "cache.delete_pattern Issue:GetAllForProject:*",
                "repo.add_relation",
            ]
        );
    }

    #[tokio::test]
    async fn test_document_mention_evicts_target_issue() {
        let relation = IssueRelation::new(
            id(EntityKind::Document, "doc1"),
            id(EntityKind::Issue, "i1"),
            IssueRelationKind::Mentions,
        );

        let mut repo = MockIssueRepository::new();
        repo.expect_add_relation().times(1).returning(|_| Ok(()));

        let (cached, cache) = wrap(repo, MockCache::new());

        cached.add_relation(&relation).await.unwrap();

        assert_eq!(
            cache.journal().entries(),
            vec![
                "cache.delete Issue:i1",
                "cache.delete_pattern Issue:GetRelations:Issue:i1:*",
                "cache.delete_pattern Issue:GetAllForIssue:*",
                "cache.delete_pattern Issue:GetAllForProject:*",
            ]
        );
    }

    #[tokio::test]
    async fn test_relations_cache_dropped_after_removal() {
        let relation = IssueRelation::new(
            id(EntityKind::Issue, "i1"),
            id(EntityKind::Issue, "i2"),
            IssueRelationKind::DependsOn,
        );

        let mut repo = MockIssueRepository::new();
        let listed = vec![relation.clone()];
        repo.expect_get_relations()
            .times(2)
            .returning(move |_| Ok(listed.clone()));
        repo.expect_remove_relation().times(1).returning(|_, _, _| Ok(()));

        let (cached, _) = wrap(repo, MockCache::new());
        let i1 = id(EntityKind::Issue, "i1");
        let i2 = id(EntityKind::Issue, "i2");

        cached.get_relations(&i1).await.unwrap();
        cached.get_relations(&i1).await.unwrap();
        cached
            .remove_relation(&i1, &i2, IssueRelationKind::DependsOn)
            .await
            .unwrap();
        cached.get_relations(&i1).await.unwrap();
    }

    #[tokio::test]
    async fn test_watchers_cached_per_issue() {
        let mut repo = MockIssueRepository::new();
        repo.expect_get_watchers()
            .times(1)
            .returning(|_| Ok(vec![User::new("ada@example.com", "ada")]));
        repo.expect_add_watcher().times(1).returning(|_, _| Ok(()));

        let cache = MockCache::new().with_entry("Issue:GetWatchers:Issue:i2", &Vec::<User>::new());
        let (cached, cache) = wrap(repo, cache);
        let i1 = id(EntityKind::Issue, "i1");

        assert_eq!(cached.get_watchers(&i1).await.unwrap().len(), 1);
        cached
            .add_watcher(&i1, &id(EntityKind::User, "u1"))
            .await
            .unwrap();

        assert_eq!(cache.keys(), vec!["Issue:GetWatchers:Issue:i2"]);
    }

    #[tokio::test]
    async fn test_create_subtask_evicts_parent_listing() {
        let project = id(EntityKind::Project, "p1");
        let subtask = issue("i2").with_parent(id(EntityKind::Issue, "i1"));

        let mut repo = MockIssueRepository::new();
        repo.expect_create().times(1).returning(|_, i| Ok(i));

        let (cached, cache) = wrap(repo, MockCache::new());

        cached.create(&project, subtask).await.unwrap();

        assert_eq!(
            cache.journal().entries(),
            vec![
                "cache.delete_pattern Issue:GetAllForProject:Project:p1:*",
                "cache.delete_pattern Issue:GetAllForIssue:Issue:i1:*",
                "cache.delete_pattern Project:*",
            ]
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let mut repo = MockIssueRepository::new();
        repo.expect_delete().times(1).returning(|_| Ok(()));

        let (cached, cache) = wrap(repo, MockCache::new());

        cached.delete(&id(EntityKind::Issue, "i1")).await.unwrap();

        assert_eq!(
            cache.journal().entries(),
            vec![
                "cache.delete Issue:i1",
                "cache.delete_pattern Issue:GetWatchers:Issue:i1:*",
                "cache.delete_pattern Issue:GetRelations:Issue:i1:*",
                "cache.delete_pattern Issue:GetAllForIssue:*",
                "cache.delete_pattern Issue:GetAllForProject:*",
                "cache.delete_pattern Comment:GetAllBelongsTo:Issue:i1:*",
                "cache.delete_pattern Attachment:GetAllBelongsTo:Issue:i1:*",
                "cache.delete_pattern Project:*",
            ]
        );
    }
}
