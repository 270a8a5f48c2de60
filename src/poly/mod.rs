pub mod module;
pub mod monomial;
