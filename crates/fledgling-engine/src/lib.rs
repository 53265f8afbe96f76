pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("cohort requires at least one contender")]
pub struct EmptyRosterError;
