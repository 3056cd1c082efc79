//! Caching decorators for the domain repositories
//!
//! Each wrapper implements the same repository trait as the store it wraps.
//! Reads go through the cache; writes are routed through the
//! [`CacheCoordinator`] so the invalidation graph decides what to evict.

mod assignment;
mod attachment;
mod comment;
mod coordinator;
mod document;
mod issue;
mod label;
mod namespace;
mod organization;
mod permission;
mod project;
mod role;
mod todo;
mod user;

pub use assignment::CachedAssignmentRepository;
pub use attachment::CachedAttachmentRepository;
pub use comment::CachedCommentRepository;
pub use coordinator::{entity_key, CacheCoordinator};
pub use document::CachedDocumentRepository;
pub use issue::CachedIssueRepository;
pub use label::CachedLabelRepository;
pub use namespace::CachedNamespaceRepository;
pub use organization::CachedOrganizationRepository;
pub use permission::CachedPermissionRepository;
pub use project::CachedProjectRepository;
pub use role::CachedRoleRepository;
pub use todo::CachedTodoRepository;
pub use user::CachedUserRepository;
