pub mod ty;
pub mod registry;
