pub mod element;
pub mod health_check;
pub mod relationship;
pub mod tags;

pub use element::{
    Element, ElementDetails, ElementKind, InstanceDetails, Location,
    DEFAULT_DEPLOYMENT_ENVIRONMENT,
};
pub use health_check::HttpHealthCheck;
pub use relationship::{InteractionStyle, Relationship};
