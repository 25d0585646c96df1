//! Timeline algorithms

pub mod overlap;
