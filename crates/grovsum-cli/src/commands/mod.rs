//! CLI command implementations.

pub mod common;
pub mod count;
pub mod inspect;
pub mod search;
