//! Ports (interfaces) for external dependencies

pub mod chat_model;
