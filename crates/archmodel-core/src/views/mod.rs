//! Views: named projections of the model
//!
//! [`View`] holds element and relationship ids plus layout data. Population
//! lives in [`projection`], [`deployment`], [`dynamic`] and [`animation`];
//! the admission policy in [`crate::rules::admission`].

pub mod animation;
pub mod deployment;
pub mod dynamic;
pub mod presentation;
pub mod projection;
pub mod sequence;
pub mod view;
pub mod view_set;

pub use presentation::{
    AutomaticLayout, Dimensions, Orientation, PaperSize, RankDirection, Routing, Shape, Vertex,
};
pub use sequence::SequenceNumber;
pub use view::{AnimationStep, ElementView, RelationshipView, View, ViewKind};
pub use view_set::{view_name, ViewSet};
