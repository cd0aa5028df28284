//! Core types shared across the archmodel crates
//!
//! This crate carries the small vocabulary used by both the error facility
//! and the logging facility of `archmodel-core`:
//!
//! - **Sensitive data**: Sensitive<T> marker for redaction of secrets such as
//!   health-check headers
//! - **Schema constants**: canonical field keys and event names

pub mod schema;
pub mod sensitive;

pub use sensitive::Sensitive;
