//! archmodel core - in-memory C4 architecture model and views
//!
//! This crate provides the data structures and operations for describing a
//! software architecture and projecting it into diagrams:
//! - People, software systems, containers and components, plus deployment
//!   nodes, infrastructure nodes and instances
//! - Relationships with de-duplication and pluggable implied relationships
//! - Canonical names that identify elements across model versions
//! - System landscape, context, container, component, dynamic and deployment
//!   views with per-kind admission rules
//! - Layout merging from a previous version of a workspace
//! - JSON snapshots with change-detection digests

pub mod errors;
pub mod ids;
pub mod implied;
pub mod layout_merge;
pub mod logging_facility;
pub mod model;
pub mod naming;
pub mod ops;
pub mod rules;
pub mod snapshot;
pub mod traversal;
pub mod views;
pub mod workspace;

// Used by the logging macros
pub use archmodel_core_types;

// Re-export commonly used types
pub use errors::{ArchModelError, ExError, ExErrorKind, Result};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use implied::{
    CreateImpliedRelationshipsUnlessAnyRelationshipExists,
    CreateImpliedRelationshipsUnlessSameRelationshipExists, DefaultImpliedRelationshipsStrategy,
    ImpliedRelationshipsStrategy,
};
pub use layout_merge::{copy_layout, merge_workspaces, LayoutMergeReport};
pub use model::{Element, ElementKind, Relationship};
pub use naming::{canonical_key, canonical_name, same_element, CanonicalKey};
pub use ops::Model;
pub use views::{View, ViewKind, ViewSet};
pub use workspace::Workspace;
