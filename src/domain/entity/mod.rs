//! Entity identity shared by every domain module

mod id;
mod kind;
mod patch;

pub use id::{EntityId, EntityIdError};
pub use kind::EntityKind;
pub use patch::Patch;
