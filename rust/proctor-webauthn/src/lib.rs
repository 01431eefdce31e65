#![warn(missing_docs)]

//! WebAuthn assertion verification for platform-authenticator logins.
//!
//! Given a credential's SPKI/DER public key, an ES256 signature, the
//! authenticator data and the `clientDataJSON` produced during a
//! `navigator.credentials.get()` ceremony, this crate decides whether the
//! assertion is genuine, extracts the authenticator flags and sign counter,
//! and derives a bounded confidence score.
//!
//! The entry point is [`verify_webauthn_signature`], which never fails: every
//! error is folded into the returned [`VerificationResult`]. Callers that also
//! check the relying party, challenge, origin and sign counter use
//! [`AssertionVerifier::verify_ceremony`], and [`authenticate`] wires that into
//! a [`CredentialStore`] owned by the caller.
//!
//! The crate holds no state between calls. The stored sign counter belongs to
//! the caller, who must read, verify and write it back as one atomic unit
//! (row lock or compare-and-swap) so that two concurrent replays of the same
//! assertion cannot both pass.

pub mod assertion;
pub mod authenticator_data;
pub mod ceremony;
pub mod challenge;
pub mod client_data;
pub mod confidence;
pub mod encoding;
mod error;
pub mod options;
pub mod replay;
pub mod store;
pub mod verifier;

pub use assertion::{
    AssertionVerifier, Expectations, VerificationRequest, VerificationResult,
    verify_webauthn_signature,
};
pub use authenticator_data::{AuthenticatorData, AuthenticatorFlags};
pub use ceremony::describe_ceremony_error;
pub use challenge::{Challenge, generate_challenge};
pub use client_data::ClientData;
pub use confidence::{calculate_confidence, inline_confidence};
pub use error::{AssertionError, ChallengeError, OptionsError, StoreError};
pub use options::VerificationOptions;
pub use replay::validate_counter;
pub use store::{CredentialStore, StoredCredential, authenticate};
pub use verifier::{Es256PublicKey, Es256Verifier, SignatureVerifier};
