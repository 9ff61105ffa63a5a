//! Analysis phases, run in order by [`crate::pipeline`].

pub mod discovery;
pub mod imports;
pub mod parsing;
pub mod resolution;
pub mod structure;
