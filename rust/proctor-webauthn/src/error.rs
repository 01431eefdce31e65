//! Error types for assertion verification.

use thiserror::Error;

/// Errors raised while verifying a WebAuthn assertion.
///
/// None of these cross the public verification entry points; they are folded
/// into [`crate::VerificationResult::error_message`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionError {
    /// The authenticator data is shorter than the 37-byte fixed header.
    #[error("authenticator data too short: expected at least 37 bytes, got {length}")]
    Structural {
        /// Length of the buffer that was supplied.
        length: usize,
    },

    /// The user-present (UP) flag is not set.
    #[error("user presence flag not set")]
    MissingUserPresence,

    /// `clientDataJSON` is not valid JSON or lacks `type`/`challenge`/`origin`.
    #[error("malformed clientDataJSON: {0}")]
    MalformedClientData(String),

    /// The public key is not a valid SPKI/DER P-256 key.
    #[error("invalid public key: {0}")]
    KeyImport(String),

    /// The signature is malformed or does not verify.
    #[error("invalid signature: {0}")]
    SignatureInvalid(String),

    /// The sign counter did not advance past the stored value.
    #[error("sign counter regression: got {counter}, stored {stored}")]
    ReplayDetected {
        /// Counter reported by the authenticator.
        counter: u32,
        /// Counter last persisted for the credential.
        stored: u32,
    },

    /// A required request field was empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A request field is not valid base64.
    #[error("{field} is not valid base64: {reason}")]
    InvalidEncoding {
        /// The request field that failed to decode.
        field: &'static str,
        /// The decoder's description of the failure.
        reason: String,
    },

    /// The RP ID hash in the authenticator data does not match the relying party.
    #[error("rpIdHash does not match the relying party")]
    RpIdMismatch,

    /// `clientDataJSON.type` is not `webauthn.get`.
    #[error("unexpected client data type: {0}")]
    UnexpectedType(String),

    /// `clientDataJSON.challenge` does not match the issued challenge.
    #[error("challenge mismatch")]
    ChallengeMismatch,

    /// `clientDataJSON.origin` is not allowed.
    #[error("origin '{0}' is not allowed")]
    OriginMismatch(String),

    /// `clientDataJSON.crossOrigin` is set but the relying party does not
    /// accept cross-origin ceremonies.
    #[error("cross-origin ceremony from '{0}' is not allowed")]
    CrossOrigin(String),

    /// User verification was required but the UV flag is not set.
    #[error("user verification required but not performed")]
    UserNotVerified,

    /// A [`crate::SignatureVerifier`] backend failure that fits no other
    /// variant, wrapped with its message. The built-in ES256 backend never
    /// produces it.
    #[error("{0}")]
    Unknown(String),
}

/// Errors from challenge generation.
#[derive(Debug, Clone, Error)]
pub enum ChallengeError {
    /// The requested length is below the accepted minimum.
    #[error("challenge length {requested} is below the minimum of {minimum} bytes")]
    TooShort {
        /// Requested length in bytes.
        requested: usize,
        /// Minimum accepted length in bytes.
        minimum: usize,
    },

    /// The operating system random source failed.
    #[error("RNG error: {0}")]
    Rng(getrandom::Error),
}

impl From<getrandom::Error> for ChallengeError {
    fn from(e: getrandom::Error) -> Self {
        Self::Rng(e)
    }
}

/// Errors from loading or validating [`crate::VerificationOptions`].
#[derive(Debug, Error)]
pub enum OptionsError {
    /// The options document could not be parsed.
    #[error("invalid options: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured challenge length is too short.
    #[error("challenge length {0} is below the minimum of 16 bytes")]
    ChallengeLength(usize),
}

/// Errors from [`crate::authenticate`].
#[derive(Debug, Error)]
pub enum StoreError<E: std::error::Error + 'static> {
    /// No credential is stored under the given id.
    #[error("credential not found")]
    CredentialNotFound,

    /// The credential store itself failed.
    #[error("credential store error: {0}")]
    Store(#[source] E),
}
