//! Server-issued challenges.
//!
//! Challenges are drawn from the operating system CSPRNG. Freshness and expiry
//! are the session layer's concern.

use crate::{encoding::encode_base64url, error::ChallengeError};
use subtle::ConstantTimeEq;

/// Default challenge length in bytes.
pub const DEFAULT_CHALLENGE_LENGTH: usize = 32;

/// Shortest challenge accepted, in bytes.
pub const MIN_CHALLENGE_LENGTH: usize = 16;

/// Random challenge bytes handed to the client for one ceremony.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Challenge(Vec<u8>);

impl Challenge {
    /// Generate a challenge of [`DEFAULT_CHALLENGE_LENGTH`] bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the random source fails.
    pub fn generate() -> Result<Self, ChallengeError> {
        generate_challenge(DEFAULT_CHALLENGE_LENGTH)
    }

    /// The raw challenge bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Unpadded base64url, as it appears in `clientDataJSON.challenge`.
    #[must_use]
    pub fn to_base64url(&self) -> String {
        encode_base64url(&self.0)
    }

    /// Constant-time comparison against challenge bytes echoed by a client.
    #[must_use]
    pub fn matches(&self, echoed: &[u8]) -> bool {
        self.0.ct_eq(echoed).into()
    }
}

impl From<Vec<u8>> for Challenge {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<Challenge> for Vec<u8> {
    fn from(challenge: Challenge) -> Self {
        challenge.0
    }
}

impl AsRef<[u8]> for Challenge {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Challenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Challenge").field(&self.0.len()).finish()
    }
}

/// Generate `length` random bytes for a new ceremony.
///
/// # Errors
///
/// Returns [`ChallengeError::TooShort`] for lengths below
/// [`MIN_CHALLENGE_LENGTH`] and [`ChallengeError::Rng`] if the random source
/// fails.
pub fn generate_challenge(length: usize) -> Result<Challenge, ChallengeError> {
    if length < MIN_CHALLENGE_LENGTH {
        return Err(ChallengeError::TooShort {
            requested: length,
            minimum: MIN_CHALLENGE_LENGTH,
        });
    }

    let mut bytes = vec![0u8; length];
    getrandom::getrandom(&mut bytes)?;
    Ok(Challenge(bytes))
}
