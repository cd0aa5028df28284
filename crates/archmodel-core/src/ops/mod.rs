pub mod element_ops;
pub mod relationship_ops;
pub mod store;

pub use store::Model;
