//! The invalidation table for every entity kind

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::graph::{GraphBuilder, GraphError, InvalidationGraph};
use super::operation::{Operation, ReadOp};
use super::shape::ReadScope;
use super::target::{Slot, Target};
use crate::domain::entity::{EntityId, EntityKind};

use EntityKind::*;
use ReadOp::*;

/// Kinds that embed their comments, attachments and assignments
const HOLDS_CHILDREN: &[EntityKind] = &[Document, Issue];

/// Kinds a document can belong to
const HOLDS_DOCUMENTS: &[EntityKind] = &[Namespace, Project];

/// Kinds a label can be attached to
const LABELLED: &[EntityKind] = &[Document, Issue];

const PERMISSION_READS: [ReadOp; 6] = [
    GetBySubject,
    GetByTarget,
    GetBySubjectAndTarget,
    HasPermission,
    HasAnyRelation,
    HasSystemRole,
];

static STANDARD: Lazy<Arc<InvalidationGraph>> = Lazy::new(|| {
    Arc::new(standard_graph().expect("standard invalidation graph must be consistent"))
});

/// The shared standard graph
pub fn standard() -> Arc<InvalidationGraph> {
    STANDARD.clone()
}

/// Id whose per-issue caches a relation mutation touches: the source when it
/// is an issue, otherwise the target.
pub fn relation_endpoint<'a>(source: &'a EntityId, target: &'a EntityId) -> &'a EntityId {
    if source.is(Issue) {
        source
    } else {
        target
    }
}

fn permission_listings() -> impl Iterator<Item = Target> {
    PERMISSION_READS
        .into_iter()
        .map(|read| Target::listing(Permission, read))
}

pub fn standard_graph() -> Result<InvalidationGraph, GraphError> {
    let builder = InvalidationGraph::builder();
    let builder = shapes(builder);
    let builder = content_rules(builder);
    let builder = work_rules(builder);
    let builder = structure_rules(builder);
    let builder = access_rules(builder);
    builder.build()
}

fn shapes(builder: GraphBuilder) -> GraphBuilder {
    let builder = builder
        .shape(Attachment, GetAllBelongsTo, ReadScope::Association)
        .shape(Comment, GetAllBelongsTo, ReadScope::Association)
        .shape(Document, GetAllBelongsTo, ReadScope::Association)
        .shape(Document, GetByCreator, ReadScope::Association)
        .shape(Issue, GetAllForProject, ReadScope::Association)
        .shape(Issue, GetAllForIssue, ReadScope::Association)
        .shape(Issue, GetWatchers, ReadScope::Entity)
        .shape(Issue, GetRelations, ReadScope::Entity)
        .shape(Label, GetAll, ReadScope::Query)
        .shape(Namespace, GetAll, ReadScope::Association)
        .shape(Organization, GetAll, ReadScope::Query)
        .shape(Organization, GetMembers, ReadScope::Entity)
        .shape(Project, GetByKey, ReadScope::Query)
        .shape(Project, GetAll, ReadScope::Association)
        .shape(Role, GetAllBelongsTo, ReadScope::Association)
        .shape(Todo, GetByOwner, ReadScope::Association)
        .shape(User, GetByEmail, ReadScope::Query)
        .shape(User, GetAll, ReadScope::Query)
        .shape(Assignment, GetByUser, ReadScope::Association)
        .shape(Assignment, GetByResource, ReadScope::Association);

    PERMISSION_READS
        .into_iter()
        .fold(builder, |b, read| b.shape(Permission, read, ReadScope::Association))
}

/// Documents and what hangs off them or off issues
fn content_rules(builder: GraphBuilder) -> GraphBuilder {
    let builder = [Attachment, Comment].into_iter().fold(builder, |b, kind| {
        b.rule(
            kind,
            Operation::Create,
            [
                Target::scoped(kind, GetAllBelongsTo, Slot::Parent),
                Target::blanket_of(Slot::Parent, HOLDS_CHILDREN),
            ],
        )
        .refresh(kind, [Target::listing(kind, GetAllBelongsTo)])
        .rule(
            kind,
            Operation::Delete,
            [
                Target::key(kind),
                Target::listing(kind, GetAllBelongsTo),
                Target::blanket(Document),
                Target::blanket(Issue),
            ],
        )
    });

    builder
        .rule(
            Document,
            Operation::Create,
            [
                Target::scoped(Document, GetAllBelongsTo, Slot::Parent),
                Target::listing(Document, GetByCreator),
                Target::blanket_of(Slot::Parent, HOLDS_DOCUMENTS),
            ],
        )
        .refresh(
            Document,
            [
                Target::listing(Document, GetAllBelongsTo),
                Target::listing(Document, GetByCreator),
            ],
        )
        .rule(
            Document,
            Operation::Delete,
            [
                Target::key(Document),
                Target::listing(Document, GetAllBelongsTo),
                Target::listing(Document, GetByCreator),
                Target::scoped(Comment, GetAllBelongsTo, Slot::Subject),
                Target::scoped(Attachment, GetAllBelongsTo, Slot::Subject),
                Target::blanket(Namespace),
                Target::blanket(Project),
            ],
        )
        .rule(
            Label,
            Operation::Create,
            [Target::listing(Label, GetAll)],
        )
        .refresh(
            Label,
            [
                Target::listing(Label, GetAll),
                Target::blanket(Document),
                Target::blanket(Issue),
            ],
        )
        .rule(
            Label,
            Operation::Delete,
            [
                Target::key(Label),
                Target::listing(Label, GetAll),
                Target::blanket(Document),
                Target::blanket(Issue),
            ],
        )
        .rule(
            Label,
            Operation::AttachTo,
            [
                Target::key_of(Slot::Related, LABELLED),
                Target::listings_of(Slot::Related, LABELLED),
            ],
        )
        .rule(
            Label,
            Operation::DetachFrom,
            [
                Target::key_of(Slot::Related, LABELLED),
                Target::listings_of(Slot::Related, LABELLED),
            ],
        )
}

/// Issues, todos and assignments
fn work_rules(builder: GraphBuilder) -> GraphBuilder {
    let issue_member_targets = |read: ReadOp| {
        [
            Target::key(Issue),
            Target::scoped(Issue, read, Slot::Subject),
            Target::listing(Issue, GetAllForIssue),
            Target::listing(Issue, GetAllForProject),
        ]
    };

    builder
        .rule(
            Issue,
            Operation::Create,
            [
                Target::scoped(Issue, GetAllForProject, Slot::Parent),
                Target::scoped(Issue, GetAllForIssue, Slot::RelatedIfAny),
                Target::blanket(Project),
            ],
        )
        .refresh(
            Issue,
            [
                Target::scoped(Issue, GetAllForIssue, Slot::ParentIfAny),
                Target::blanket(Project),
            ],
        )
        .rule(
            Issue,
            Operation::Delete,
            [
                Target::key(Issue),
                Target::scoped(Issue, GetWatchers, Slot::Subject),
                Target::scoped(Issue, GetRelations, Slot::Subject),
                Target::listing(Issue, GetAllForIssue),
                Target::listing(Issue, GetAllForProject),
                Target::scoped(Comment, GetAllBelongsTo, Slot::Subject),
                Target::scoped(Attachment, GetAllBelongsTo, Slot::Subject),
                Target::blanket(Project),
            ],
        )
        .rule(Issue, Operation::AddWatcher, issue_member_targets(GetWatchers))
        .rule(Issue, Operation::RemoveWatcher, issue_member_targets(GetWatchers))
        .rule(Issue, Operation::AddRelation, issue_member_targets(GetRelations))
        .rule(Issue, Operation::RemoveRelation, issue_member_targets(GetRelations))
        .rule(
            Todo,
            Operation::Create,
            [Target::scoped(Todo, GetByOwner, Slot::Parent)],
        )
        .refresh(Todo, [Target::listing(Todo, GetByOwner)])
        .rule(
            Todo,
            Operation::Delete,
            [Target::key(Todo), Target::listing(Todo, GetByOwner)],
        )
        .rule(
            Assignment,
            Operation::Create,
            [
                Target::scoped(Assignment, GetByUser, Slot::Related),
                Target::scoped(Assignment, GetByResource, Slot::Parent),
                Target::blanket_of(Slot::Parent, HOLDS_CHILDREN),
            ],
        )
        .rule(
            Assignment,
            Operation::Delete,
            [
                Target::key(Assignment),
                Target::listing(Assignment, GetByUser),
                Target::listing(Assignment, GetByResource),
                Target::blanket(Document),
                Target::blanket(Issue),
            ],
        )
}

/// Organizations, namespaces and projects
fn structure_rules(builder: GraphBuilder) -> GraphBuilder {
    let membership = [
        Target::key(Organization),
        Target::scoped(Organization, GetMembers, Slot::Subject),
        Target::listing(Organization, GetAll),
    ];

    builder
        .rule(
            Organization,
            Operation::Create,
            [Target::listing(Organization, GetAll)],
        )
        .refresh(Organization, [Target::listing(Organization, GetAll)])
        .rule(
            Organization,
            Operation::Delete,
            [
                Target::key(Organization),
                Target::scoped(Organization, GetMembers, Slot::Subject),
                Target::listing(Organization, GetAll),
                Target::scoped(Namespace, GetAll, Slot::Subject),
                Target::scoped(Role, GetAllBelongsTo, Slot::Subject),
            ],
        )
        .rule(Organization, Operation::AddMember, membership.clone())
        .rule(Organization, Operation::RemoveMember, membership)
        .rule(
            Namespace,
            Operation::Create,
            [
                Target::scoped(Namespace, GetAll, Slot::Parent),
                Target::blanket(Organization),
            ],
        )
        .refresh(Namespace, [Target::listing(Namespace, GetAll)])
        .rule(
            Namespace,
            Operation::Delete,
            [
                Target::key(Namespace),
                Target::listing(Namespace, GetAll),
                Target::blanket(Organization),
                Target::blanket(Project),
                Target::blanket(Document),
            ],
        )
        .rule(
            Project,
            Operation::Create,
            [
                Target::scoped(Project, GetAll, Slot::Parent),
                Target::blanket(Namespace),
            ],
        )
        .refresh(
            Project,
            [
                Target::listing(Project, GetByKey),
                Target::listing(Project, GetAll),
            ],
        )
        .rule(
            Project,
            Operation::Delete,
            [
                Target::key(Project),
                Target::listing(Project, GetByKey),
                Target::listing(Project, GetAll),
                Target::scoped(Issue, GetAllForProject, Slot::Subject),
                Target::blanket(Namespace),
            ],
        )
}

/// Users, roles and permissions
fn access_rules(builder: GraphBuilder) -> GraphBuilder {
    let role_members = [
        Target::key(Role),
        Target::listing(Role, GetAllBelongsTo),
        Target::blanket(Permission),
    ];

    builder
        .rule(
            User,
            Operation::Create,
            [Target::listing(User, GetAll)],
        )
        .refresh(
            User,
            [
                Target::listing(User, GetByEmail),
                Target::listing(User, GetAll),
                Target::listing(Organization, GetMembers),
                Target::listing(Issue, GetWatchers),
            ],
        )
        .rule(
            User,
            Operation::Delete,
            [
                Target::key(User),
                Target::listing(User, GetByEmail),
                Target::listing(User, GetAll),
                Target::listing(Organization, GetMembers),
                Target::listing(Issue, GetWatchers),
                Target::scoped(Todo, GetByOwner, Slot::Subject),
                Target::scoped(Assignment, GetByUser, Slot::Subject),
                Target::blanket(Role),
                Target::blanket(Permission),
            ],
        )
        .rule(
            Role,
            Operation::Create,
            [
                Target::scoped(Role, GetAllBelongsTo, Slot::Parent),
                Target::blanket(Permission),
            ],
        )
        .refresh(Role, [Target::listing(Role, GetAllBelongsTo)])
        .rule(
            Role,
            Operation::Delete,
            [
                Target::key(Role),
                Target::listing(Role, GetAllBelongsTo),
                Target::blanket(Permission),
            ],
        )
        .rule(Role, Operation::AddMember, role_members.clone())
        .rule(Role, Operation::RemoveMember, role_members)
        .rule(Permission, Operation::Create, permission_listings())
        .refresh(Permission, permission_listings())
        .rule(
            Permission,
            Operation::Delete,
            std::iter::once(Target::key(Permission)).chain(permission_listings()),
        )
}
