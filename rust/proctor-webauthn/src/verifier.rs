//! ES256 signature verification.
//!
//! The signed message for an assertion is
//! `authenticatorData || SHA-256(clientDataJSON)`, signed with ECDSA P-256
//! over SHA-256 and DER-encoded by the authenticator.
//!
//! [`SignatureVerifier`] is the seam the orchestrator depends on, so another
//! ECDSA backend can stand in for [`Es256Verifier`].

use crate::error::AssertionError;
use p256::{
    ecdsa::{DerSignature, VerifyingKey, signature::Verifier as _},
    pkcs8::DecodePublicKey,
};
use sha2::{Digest, Sha256};

/// Verifies an assertion signature against an encoded public key.
pub trait SignatureVerifier {
    /// Verify `signature` over `signed_payload` with `public_key`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::KeyImport`] if the key cannot be imported and
    /// [`AssertionError::SignatureInvalid`] if the signature is malformed or
    /// does not verify.
    fn verify(
        &self,
        public_key: &[u8],
        signature: &[u8],
        signed_payload: &[u8],
    ) -> Result<(), AssertionError>;
}

/// Build `authenticator_data || SHA-256(client_data_json)`.
#[must_use]
pub fn signed_payload(authenticator_data: &[u8], client_data_json: &[u8]) -> Vec<u8> {
    let client_data_hash = Sha256::digest(client_data_json);
    let mut payload = Vec::with_capacity(authenticator_data.len() + client_data_hash.len());
    payload.extend_from_slice(authenticator_data);
    payload.extend_from_slice(&client_data_hash);
    payload
}

/// An ECDSA P-256 public key.
#[derive(Debug, Clone)]
pub struct Es256PublicKey {
    key: VerifyingKey,
}

impl Es256PublicKey {
    /// Import a DER-encoded SubjectPublicKeyInfo.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::KeyImport`] if the bytes are not an SPKI
    /// P-256 key.
    pub fn from_spki_der(der: &[u8]) -> Result<Self, AssertionError> {
        let key = VerifyingKey::from_public_key_der(der)
            .map_err(|e| AssertionError::KeyImport(e.to_string()))?;
        Ok(Self { key })
    }

    /// Import a SEC1-encoded point (33 bytes compressed or 65 uncompressed).
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::KeyImport`] if the bytes are not a P-256 point.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, AssertionError> {
        let key = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| AssertionError::KeyImport(e.to_string()))?;
        Ok(Self { key })
    }

    /// The inner verifying key.
    #[must_use]
    pub const fn verifying_key(&self) -> &VerifyingKey {
        &self.key
    }

    /// Compressed SEC1 bytes (33 bytes).
    #[must_use]
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        self.key.to_encoded_point(true).as_bytes().to_vec()
    }

    /// Verify a DER-encoded ECDSA signature over `message`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::SignatureInvalid`] if the signature is not
    /// DER or does not verify.
    pub fn verify(&self, signature: &[u8], message: &[u8]) -> Result<(), AssertionError> {
        let signature = DerSignature::from_bytes(signature)
            .map_err(|e| AssertionError::SignatureInvalid(e.to_string()))?;
        self.key
            .verify(message, &signature)
            .map_err(|e| AssertionError::SignatureInvalid(e.to_string()))
    }
}

impl PartialEq for Es256PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_sec1_bytes() == other.to_sec1_bytes()
    }
}

impl Eq for Es256PublicKey {}

impl From<VerifyingKey> for Es256PublicKey {
    fn from(key: VerifyingKey) -> Self {
        Self { key }
    }
}

/// [`SignatureVerifier`] backed by the `p256` crate, taking SPKI/DER keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct Es256Verifier;

impl SignatureVerifier for Es256Verifier {
    fn verify(
        &self,
        public_key: &[u8],
        signature: &[u8],
        signed_payload: &[u8],
    ) -> Result<(), AssertionError> {
        Es256PublicKey::from_spki_der(public_key)?.verify(signature, signed_payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::{
        ecdsa::{SigningKey, signature::Signer as _},
        pkcs8::EncodePublicKey,
    };

    fn signing_key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32].into()).unwrap()
    }

    fn spki(sk: &SigningKey) -> Vec<u8> {
        sk.verifying_key().to_public_key_der().unwrap().as_bytes().to_vec()
    }

    fn authenticator_data() -> Vec<u8> {
        let mut buf = Sha256::digest(b"example.com").to_vec();
        buf.push(0x05);
        buf.extend_from_slice(&[0, 0, 0, 1]);
        buf
    }

    #[test]
    fn signed_payload_concatenates_the_client_data_hash() {
        let auth_data = authenticator_data();
        let payload = signed_payload(&auth_data, b"{}");

        assert_eq!(payload.len(), auth_data.len() + 32);
        assert_eq!(&payload[..37], auth_data.as_slice());
        assert_eq!(&payload[37..], Sha256::digest(b"{}").as_slice());
    }

    #[test]
    fn it_verifies_a_valid_signature() {
        let sk = signing_key(42);
        let payload = signed_payload(&authenticator_data(), b"client data");
        let signature: DerSignature = sk.sign(&payload);

        Es256Verifier
            .verify(&spki(&sk), signature.as_bytes(), &payload)
            .unwrap();
    }

    #[test]
    fn it_rejects_a_signature_from_another_key() {
        let payload = signed_payload(&authenticator_data(), b"client data");
        let signature: DerSignature = signing_key(1).sign(&payload);

        let result = Es256Verifier.verify(&spki(&signing_key(2)), signature.as_bytes(), &payload);
        assert!(matches!(result, Err(AssertionError::SignatureInvalid(_))));
    }

    #[test]
    fn it_rejects_a_non_der_signature() {
        let sk = signing_key(42);
        let result = Es256Verifier.verify(&spki(&sk), &[0u8; 64], b"payload");
        assert!(matches!(result, Err(AssertionError::SignatureInvalid(_))));
    }

    #[test]
    fn it_rejects_a_malformed_key() {
        let result = Es256Verifier.verify(b"not a key", &[0x30, 0x00], b"payload");
        assert!(matches!(result, Err(AssertionError::KeyImport(_))));
    }

    #[test]
    fn sec1_and_spki_imports_agree() {
        let sk = signing_key(7);
        let from_spki = Es256PublicKey::from_spki_der(&spki(&sk)).unwrap();
        let from_sec1 = Es256PublicKey::from_sec1_bytes(&from_spki.to_sec1_bytes()).unwrap();

        assert_eq!(from_spki, from_sec1);
        assert_eq!(from_spki.to_sec1_bytes().len(), 33);
    }
}
