//! One-time claim codes.

use serde::{Deserialize, Serialize};

/// Number of alphanumeric characters in a generated code (~143 bits).
const CLAIM_CODE_LEN: usize = 24;

/// One-time secret permitting redemption of a specific credit payment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimCode(String);

impl ClaimCode {
    /// Generates a fresh, unpredictable code from the process CSPRNG.
    pub fn generate() -> Self {
        use rand::Rng;
        use rand::distr::Alphanumeric;

        let code: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(CLAIM_CODE_LEN)
            .map(char::from)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClaimCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClaimCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ClaimCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_shape() {
        let code = ClaimCode::generate();

        assert_eq!(code.as_str().len(), CLAIM_CODE_LEN);
        assert!(code.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_codes_differ() {
        assert_ne!(ClaimCode::generate(), ClaimCode::generate());
    }
}
