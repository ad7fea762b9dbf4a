//! Index administration and document writes.
//!
//! [`lifecycle::IndexLifecycleManager`] is the single owner of process-wide
//! index state; [`documents::DocumentStore`] borrows it through an `Arc`.

pub mod analysis;
pub mod catalog;
pub mod documents;
pub mod lifecycle;
pub mod mapping;

pub use catalog::IndexCatalog;
pub use documents::DocumentStore;
pub use lifecycle::{IndexLifecycleManager, IndexPhase};
pub use mapping::{FieldMapping, IndexMapping};
