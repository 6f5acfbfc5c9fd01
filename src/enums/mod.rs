pub mod common;
pub mod queries;
