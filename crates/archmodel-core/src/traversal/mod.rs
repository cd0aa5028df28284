pub mod ancestors;

pub use ancestors::{ancestor_chain, ancestors, is_ancestor_of, software_system_of};
