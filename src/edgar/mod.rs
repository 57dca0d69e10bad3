pub mod batch;
pub mod parsing;
