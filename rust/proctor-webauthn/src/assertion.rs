//! Assertion verification.
//!
//! [`AssertionVerifier`] turns a [`VerificationRequest`] into a
//! [`VerificationResult`] and never fails: decoding, parsing and signature
//! errors all end up in [`VerificationResult::error_message`] with
//! `verified == false` and a confidence of 0.
//!
//! The flow is:
//! 1. base64-decode the four request fields (standard or URL-safe alphabet)
//! 2. parse the authenticator data header for flags and counter
//! 3. decode `clientDataJSON`
//! 4. verify the signature over `authenticatorData || SHA-256(clientDataJSON)`
//! 5. require user presence and score the result

use crate::{
    authenticator_data::{AuthenticatorData, AuthenticatorFlags, check_rp_id_hash},
    challenge::Challenge,
    client_data::ClientData,
    confidence::inline_confidence,
    encoding::decode_base64,
    error::AssertionError,
    options::VerificationOptions,
    replay::check_counter,
    verifier::{Es256Verifier, SignatureVerifier, signed_payload},
};
use serde::{Deserialize, Serialize};

/// The four base64 fields of an assertion, as submitted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// SPKI/DER public key of the credential.
    pub public_key: String,
    /// DER-encoded ECDSA signature.
    pub signature: String,
    /// Authenticator data.
    pub authenticator_data: String,
    /// `clientDataJSON`.
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
}

impl VerificationRequest {
    /// Build a request from its four base64 fields.
    pub fn new(
        public_key: impl Into<String>,
        signature: impl Into<String>,
        authenticator_data: impl Into<String>,
        client_data_json: impl Into<String>,
    ) -> Self {
        Self {
            public_key: public_key.into(),
            signature: signature.into(),
            authenticator_data: authenticator_data.into(),
            client_data_json: client_data_json.into(),
        }
    }
}

/// Outcome of verifying an assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Whether the assertion is genuine and every check passed.
    pub verified: bool,
    /// Confidence score in `0..=100`; 0 whenever `verified` is false.
    pub confidence: u8,
    /// Authenticator flags, all false if the authenticator data could not be parsed.
    pub flags: AuthenticatorFlags,
    /// Sign counter reported by the authenticator, for the caller to persist.
    pub counter: u32,
    /// Why verification failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl VerificationResult {
    /// A failure before the authenticator data could be read.
    #[must_use]
    pub fn failure(error: &AssertionError) -> Self {
        Self::rejected(AuthenticatorFlags::default(), 0, error)
    }

    pub(crate) fn rejected(flags: AuthenticatorFlags, counter: u32, error: &AssertionError) -> Self {
        tracing::warn!(%error, counter, "assertion rejected");
        Self {
            verified: false,
            confidence: 0,
            flags,
            counter,
            error_message: Some(error.to_string()),
        }
    }

    fn accepted(flags: AuthenticatorFlags, counter: u32) -> Self {
        tracing::debug!(
            counter,
            user_verified = flags.user_verified,
            backup_state = flags.backup_state,
            "assertion verified"
        );
        Self {
            verified: true,
            confidence: inline_confidence(true, &flags),
            flags,
            counter,
            error_message: None,
        }
    }
}

/// What a relying party expects of an assertion beyond a valid signature.
#[derive(Debug, Clone, Copy)]
pub struct Expectations<'a> {
    /// Relying party options.
    pub options: &'a VerificationOptions,
    /// The challenge issued for this ceremony.
    pub challenge: &'a Challenge,
    /// The counter last persisted for the credential.
    pub stored_counter: u32,
}

impl<'a> Expectations<'a> {
    /// Expect `challenge` under `options`, with no prior counter.
    #[must_use]
    pub const fn new(options: &'a VerificationOptions, challenge: &'a Challenge) -> Self {
        Self {
            options,
            challenge,
            stored_counter: 0,
        }
    }

    /// Set the counter last persisted for the credential.
    #[must_use]
    pub const fn with_stored_counter(mut self, stored_counter: u32) -> Self {
        self.stored_counter = stored_counter;
        self
    }
}

/// A decoded and parsed request, ready for signature verification.
struct Assertion {
    public_key: Vec<u8>,
    signature: Vec<u8>,
    authenticator_data: Vec<u8>,
    client_data_json: Vec<u8>,
    header: AuthenticatorData,
    client_data: ClientData,
}

impl Assertion {
    fn decode(request: &VerificationRequest) -> Result<Self, AssertionError> {
        let public_key = required("publicKey", &request.public_key)?;
        let signature = required("signature", &request.signature)?;
        let authenticator_data = required("authenticatorData", &request.authenticator_data)?;
        let client_data_json = required("clientDataJSON", &request.client_data_json)?;

        let header = AuthenticatorData::parse(&authenticator_data)?;
        let client_data = ClientData::decode(&client_data_json)?;

        Ok(Self {
            public_key,
            signature,
            authenticator_data,
            client_data_json,
            header,
            client_data,
        })
    }

    fn verify_signature<V: SignatureVerifier>(&self, verifier: &V) -> Result<(), AssertionError> {
        let payload = signed_payload(&self.authenticator_data, &self.client_data_json);
        verifier.verify(&self.public_key, &self.signature, &payload)?;
        tracing::debug!(counter = self.header.counter, "assertion signature valid");
        Ok(())
    }

    fn require_user_presence(&self) -> Result<(), AssertionError> {
        if self.header.flags.user_present {
            tracing::debug!(
                user_verified = self.header.flags.user_verified,
                "user presence confirmed"
            );
            Ok(())
        } else {
            Err(AssertionError::MissingUserPresence)
        }
    }

    fn check_client_data(&self, expectations: &Expectations<'_>) -> Result<(), AssertionError> {
        let client_data = &self.client_data;
        if !client_data.is_assertion() {
            return Err(AssertionError::UnexpectedType(client_data.ty.clone()));
        }
        if !expectations.challenge.matches(&client_data.challenge_bytes()?) {
            return Err(AssertionError::ChallengeMismatch);
        }
        let options = expectations.options;
        if !options.allows_origin(&client_data.origin) {
            return Err(AssertionError::OriginMismatch(client_data.origin.clone()));
        }
        if client_data.cross_origin == Some(true) && !options.allow_cross_origin {
            return Err(AssertionError::CrossOrigin(client_data.origin.clone()));
        }
        if let Some(rp_id) = &options.rp_id {
            check_rp_id_hash(&self.authenticator_data, rp_id)?;
        }
        tracing::debug!(
            origin = %client_data.origin,
            cross_origin = client_data.cross_origin.unwrap_or(false),
            "client data matches expectations"
        );
        Ok(())
    }

    fn conclude(&self, outcome: Result<(), AssertionError>) -> VerificationResult {
        let AuthenticatorData { flags, counter, .. } = self.header;
        match outcome {
            Ok(()) => VerificationResult::accepted(flags, counter),
            Err(error) => VerificationResult::rejected(flags, counter, &error),
        }
    }
}

fn required(field: &'static str, value: &str) -> Result<Vec<u8>, AssertionError> {
    if value.trim().is_empty() {
        return Err(AssertionError::MissingField(field));
    }
    let bytes = decode_base64(field, value)?;
    if bytes.is_empty() {
        return Err(AssertionError::MissingField(field));
    }
    Ok(bytes)
}

/// Verifies assertions with a pluggable [`SignatureVerifier`].
#[derive(Debug, Default, Clone)]
pub struct AssertionVerifier<V = Es256Verifier> {
    verifier: V,
}

impl<V: SignatureVerifier> AssertionVerifier<V> {
    /// Use `verifier` for signature checks.
    pub const fn new(verifier: V) -> Self {
        Self { verifier }
    }

    /// Verify the signature and user presence of an assertion.
    ///
    /// `verified` is true iff the signature is valid and the UP flag is set.
    pub fn verify(&self, request: &VerificationRequest) -> VerificationResult {
        match Assertion::decode(request) {
            Ok(assertion) => {
                let outcome = assertion
                    .verify_signature(&self.verifier)
                    .and_then(|()| assertion.require_user_presence());
                assertion.conclude(outcome)
            }
            Err(error) => VerificationResult::failure(&error),
        }
    }

    /// Like [`Self::verify`], additionally rejecting a sign counter that did
    /// not advance past `stored_counter`.
    pub fn verify_with_counter(
        &self,
        request: &VerificationRequest,
        stored_counter: u32,
    ) -> VerificationResult {
        let result = self.verify(request);
        if !result.verified {
            return result;
        }
        match check_counter(result.counter, stored_counter) {
            Ok(()) => result,
            Err(error) => VerificationResult::rejected(result.flags, result.counter, &error),
        }
    }

    /// Verify a complete assertion ceremony.
    ///
    /// On top of [`Self::verify`] this checks the client data type, the
    /// challenge, the origin, the RP ID hash, user verification when
    /// required, and the sign counter.
    pub fn verify_ceremony(
        &self,
        request: &VerificationRequest,
        expectations: &Expectations<'_>,
    ) -> VerificationResult {
        let assertion = match Assertion::decode(request) {
            Ok(assertion) => assertion,
            Err(error) => return VerificationResult::failure(&error),
        };

        let outcome = assertion
            .check_client_data(expectations)
            .and_then(|()| assertion.verify_signature(&self.verifier))
            .and_then(|()| assertion.require_user_presence())
            .and_then(|()| {
                if expectations.options.require_user_verification
                    && !assertion.header.flags.user_verified
                {
                    Err(AssertionError::UserNotVerified)
                } else {
                    Ok(())
                }
            })
            .and_then(|()| check_counter(assertion.header.counter, expectations.stored_counter));

        assertion.conclude(outcome)
    }
}

/// Verify an assertion's signature and user presence with ES256.
///
/// Never fails; see [`VerificationResult::error_message`] for why an
/// assertion was rejected.
pub fn verify_webauthn_signature(request: &VerificationRequest) -> VerificationResult {
    AssertionVerifier::<Es256Verifier>::default().verify(request)
}
