pub mod admission;
pub mod validation;
