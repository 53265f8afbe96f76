//! Policy evaluation on top of the simulation engine: feed-forward
//! decision networks and the round harness that turns cohort outcomes
//! into per-genome fitness.

pub use self::{generation::*, network::*};

mod generation;
mod network;
