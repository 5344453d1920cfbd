//! Provider adapters
//!
//! Both configured backends (BytePlus Ark and Groq by default) speak the
//! OpenAI chat-completions dialect, so a single adapter covers them; they
//! differ only in settings.

pub mod openai_compat;
mod wire;

pub use openai_compat::{OpenAiCompatModel, ProviderSettings};
