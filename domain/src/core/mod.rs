//! Core domain primitives

pub mod provider;

pub use provider::ProviderRole;
