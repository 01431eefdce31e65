//! Relying party verification options.

use crate::{
    challenge::{Challenge, DEFAULT_CHALLENGE_LENGTH, MIN_CHALLENGE_LENGTH, generate_challenge},
    error::{ChallengeError, OptionsError},
};
use serde::{Deserialize, Serialize};

/// How a relying party checks assertions beyond the signature itself.
///
/// Loaded from JSON with camelCase keys; every field has a default:
///
/// ```json
/// {
///   "rpId": "exams.example.com",
///   "allowedOrigins": ["https://exams.example.com"],
///   "requireUserVerification": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationOptions {
    /// Relying party identifier whose hash must lead the authenticator data.
    /// Unchecked when `None`.
    pub rp_id: Option<String>,
    /// Origins accepted in `clientDataJSON`. Any origin is accepted when empty.
    pub allowed_origins: Vec<String>,
    /// Reject assertions without the UV flag.
    pub require_user_verification: bool,
    /// Accept ceremonies run inside cross-origin iframes.
    pub allow_cross_origin: bool,
    /// Length in bytes of challenges issued for this relying party.
    pub challenge_length: usize,
}

impl Default for VerificationOptions {
    fn default() -> Self {
        Self {
            rp_id: None,
            allowed_origins: Vec::new(),
            require_user_verification: false,
            allow_cross_origin: false,
            challenge_length: DEFAULT_CHALLENGE_LENGTH,
        }
    }
}

impl VerificationOptions {
    /// Parse and validate options from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the options are invalid.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check option invariants.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError::ChallengeLength`] if `challenge_length` is
    /// below 16 bytes.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.challenge_length < MIN_CHALLENGE_LENGTH {
            return Err(OptionsError::ChallengeLength(self.challenge_length));
        }
        Ok(())
    }

    /// Set the relying party identifier.
    #[must_use]
    pub fn with_rp_id(mut self, rp_id: impl Into<String>) -> Self {
        self.rp_id = Some(rp_id.into());
        self
    }

    /// Add an accepted origin.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.allowed_origins.push(origin.into());
        self
    }

    /// Require the UV flag.
    #[must_use]
    pub fn with_user_verification(mut self, required: bool) -> Self {
        self.require_user_verification = required;
        self
    }

    /// Accept cross-origin ceremonies.
    #[must_use]
    pub fn with_cross_origin(mut self, allowed: bool) -> Self {
        self.allow_cross_origin = allowed;
        self
    }

    /// Issue a fresh challenge of `challenge_length` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ChallengeError::TooShort`] if `challenge_length` was set
    /// below the minimum without going through [`Self::validate`], and
    /// [`ChallengeError::Rng`] if the random source fails.
    pub fn issue_challenge(&self) -> Result<Challenge, ChallengeError> {
        generate_challenge(self.challenge_length)
    }

    /// Set the length in bytes of issued challenges.
    #[must_use]
    pub fn with_challenge_length(mut self, length: usize) -> Self {
        self.challenge_length = length;
        self
    }

    /// Whether `origin` is accepted.
    #[must_use]
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_loads_from_json_with_defaults() {
        let options = VerificationOptions::from_json(
            r#"{"rpId":"example.com","allowedOrigins":["https://example.com"]}"#,
        )
        .unwrap();

        assert_eq!(
            options,
            VerificationOptions::default()
                .with_rp_id("example.com")
                .with_origin("https://example.com")
        );
        assert_eq!(options.challenge_length, 32);
    }

    #[test]
    fn it_rejects_short_challenge_lengths() {
        assert!(matches!(
            VerificationOptions::from_json(r#"{"challengeLength":8}"#),
            Err(OptionsError::ChallengeLength(8))
        ));
    }

    #[test]
    fn it_rejects_malformed_json() {
        assert!(matches!(
            VerificationOptions::from_json("{"),
            Err(OptionsError::Parse(_))
        ));
    }

    #[test]
    fn it_issues_challenges_of_the_configured_length() {
        let options = VerificationOptions::from_json(r#"{"challengeLength":64}"#).unwrap();
        assert_eq!(options.issue_challenge().unwrap().as_bytes().len(), 64);

        let default = VerificationOptions::default().issue_challenge().unwrap();
        assert_eq!(default.as_bytes().len(), DEFAULT_CHALLENGE_LENGTH);
    }

    #[test]
    fn issuing_refuses_an_unvalidated_short_length() {
        let options = VerificationOptions::default().with_challenge_length(8);
        assert!(matches!(
            options.issue_challenge(),
            Err(ChallengeError::TooShort {
                requested: 8,
                minimum: MIN_CHALLENGE_LENGTH
            })
        ));
    }

    #[test]
    fn empty_origin_list_allows_any_origin() {
        let open = VerificationOptions::default();
        assert!(open.allows_origin("https://anything.example"));

        let closed = open.with_origin("https://example.com");
        assert!(closed.allows_origin("https://example.com"));
        assert!(!closed.allows_origin("https://evil.example"));
    }
}
