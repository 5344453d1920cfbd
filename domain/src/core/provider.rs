//! Provider roles
//!
//! The engine talks to exactly two chat-completion providers. They are not
//! interchangeable: the primary is favored in confidence ties and is the
//! authoritative source when the two answers cannot be reconciled.

use serde::{Deserialize, Serialize};

/// Which of the two configured providers produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderRole {
    /// The trusted provider: wins ties, survives disagreement, and its
    /// failure fails the whole request.
    Primary,
    /// The corroborating provider: its failure degrades to a fallback.
    Secondary,
}

impl ProviderRole {
    /// Check whether this is the primary provider
    pub fn is_primary(&self) -> bool {
        matches!(self, ProviderRole::Primary)
    }
}

impl std::fmt::Display for ProviderRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderRole::Primary => write!(f, "primary"),
            ProviderRole::Secondary => write!(f, "secondary"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_check() {
        assert!(ProviderRole::Primary.is_primary());
        assert!(!ProviderRole::Secondary.is_primary());
    }

    #[test]
    fn display() {
        assert_eq!(ProviderRole::Primary.to_string(), "primary");
        assert_eq!(ProviderRole::Secondary.to_string(), "secondary");
    }
}
