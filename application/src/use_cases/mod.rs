//! Application use cases

pub mod get_consensus;
