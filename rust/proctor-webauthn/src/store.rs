//! The credential store seam.
//!
//! The store owns each credential's public key and last-seen sign counter.
//! [`authenticate`] reads the credential, verifies the assertion against the
//! stored key and counter, and advances the counter with a compare-and-swap so
//! that two concurrent submissions of the same assertion cannot both succeed.

use crate::{
    assertion::{AssertionVerifier, Expectations, VerificationRequest, VerificationResult},
    encoding::encode_base64,
    error::{AssertionError, StoreError},
    verifier::SignatureVerifier,
};
use std::future::Future;

/// A credential as persisted by the relying party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    /// SPKI/DER public key registered for the credential.
    pub public_key: Vec<u8>,
    /// Last sign counter accepted for the credential.
    pub counter: u32,
}

/// Persistent storage for registered credentials.
pub trait CredentialStore {
    /// Error type for storage failures.
    type Error: std::error::Error + 'static;

    /// Load the credential registered under `credential_id`.
    fn load(
        &self,
        credential_id: &[u8],
    ) -> impl Future<Output = Result<Option<StoredCredential>, Self::Error>> + Send;

    /// Set the counter to `new` only if it still equals `expected`.
    ///
    /// Returns `false` when another writer changed the counter first.
    fn compare_and_swap_counter(
        &self,
        credential_id: &[u8],
        expected: u32,
        new: u32,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}

/// Verify an assertion for `credential_id` and persist its new sign counter.
///
/// The public key in `request` is ignored in favor of the stored one. A
/// counter of zero is never written back, since the authenticator does not
/// keep one. Losing the compare-and-swap race is reported as a replay.
///
/// # Errors
///
/// Returns [`StoreError::CredentialNotFound`] for unknown credentials and
/// [`StoreError::Store`] when the store fails. Rejected assertions are `Ok`
/// with `verified == false`.
pub async fn authenticate<S, V>(
    store: &S,
    verifier: &AssertionVerifier<V>,
    credential_id: &[u8],
    request: &VerificationRequest,
    expectations: Expectations<'_>,
) -> Result<VerificationResult, StoreError<S::Error>>
where
    S: CredentialStore,
    V: SignatureVerifier,
{
    let credential = store
        .load(credential_id)
        .await
        .map_err(StoreError::Store)?
        .ok_or(StoreError::<S::Error>::CredentialNotFound)?;

    let request = VerificationRequest {
        public_key: encode_base64(&credential.public_key),
        ..request.clone()
    };
    let result = verifier.verify_ceremony(
        &request,
        &expectations.with_stored_counter(credential.counter),
    );

    if !result.verified || result.counter == 0 {
        return Ok(result);
    }

    let swapped = store
        .compare_and_swap_counter(credential_id, credential.counter, result.counter)
        .await
        .map_err(StoreError::Store)?;

    if swapped {
        tracing::debug!(counter = result.counter, "sign counter advanced");
        Ok(result)
    } else {
        let error = AssertionError::ReplayDetected {
            counter: result.counter,
            stored: credential.counter,
        };
        Ok(VerificationResult::rejected(result.flags, result.counter, &error))
    }
}
