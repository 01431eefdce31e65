//! Authenticator data parsing.
//!
//! Only the fixed 37-byte header is decoded:
//!
//! ```text
//! bytes[0..32]   rpIdHash   SHA-256(RP ID)
//! byte[32]       flags      bit0 UP, bit2 UV, bit3 BE, bit4 BS, bit6 AT, bit7 ED
//! bytes[33..37]  signCount  u32, big-endian
//! ```
//!
//! Attested credential data and extensions that follow are left untouched.

use crate::error::AssertionError;
use serde::Serialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Length of the fixed authenticator data header.
pub const MIN_LENGTH: usize = 37;

const RP_ID_HASH_LENGTH: usize = 32;
const FLAGS_OFFSET: usize = 32;
const COUNTER_OFFSET: usize = 33;

const USER_PRESENT: u8 = 1 << 0;
const USER_VERIFIED: u8 = 1 << 2;
const BACKUP_ELIGIBLE: u8 = 1 << 3;
const BACKUP_STATE: u8 = 1 << 4;
const ATTESTED_CREDENTIAL_INCLUDED: u8 = 1 << 6;
const EXTENSION_DATA_INCLUDED: u8 = 1 << 7;

/// Flags decoded from the authenticator data flags byte.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorFlags {
    /// UP: the user touched or otherwise interacted with the authenticator.
    pub user_present: bool,
    /// UV: the authenticator verified the user (biometric or PIN).
    pub user_verified: bool,
    /// BE: the credential may be backed up.
    pub backup_eligible: bool,
    /// BS: the credential is currently backed up.
    pub backup_state: bool,
    /// AT: attested credential data follows the header.
    pub attested_credential_included: bool,
    /// ED: extension data follows the header.
    pub extension_data_included: bool,
}

impl From<u8> for AuthenticatorFlags {
    fn from(byte: u8) -> Self {
        Self {
            user_present: byte & USER_PRESENT != 0,
            user_verified: byte & USER_VERIFIED != 0,
            backup_eligible: byte & BACKUP_ELIGIBLE != 0,
            backup_state: byte & BACKUP_STATE != 0,
            attested_credential_included: byte & ATTESTED_CREDENTIAL_INCLUDED != 0,
            extension_data_included: byte & EXTENSION_DATA_INCLUDED != 0,
        }
    }
}

/// The fixed header of a WebAuthn authenticator data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatorData {
    /// SHA-256 of the RP ID the authenticator scoped the credential to.
    pub rp_id_hash: [u8; 32],
    /// Decoded flags byte.
    pub flags: AuthenticatorFlags,
    /// Signature counter.
    pub counter: u32,
}

impl AuthenticatorData {
    /// Parse the fixed header from `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::Structural`] if `buf` is shorter than 37 bytes.
    pub fn parse(buf: &[u8]) -> Result<Self, AssertionError> {
        let header = header(buf)?;
        let mut rp_id_hash = [0u8; RP_ID_HASH_LENGTH];
        rp_id_hash.copy_from_slice(&header[..RP_ID_HASH_LENGTH]);

        Ok(Self {
            rp_id_hash,
            flags: parse_flags(buf)?,
            counter: extract_counter(buf)?,
        })
    }
}

fn header(buf: &[u8]) -> Result<&[u8; MIN_LENGTH], AssertionError> {
    buf.get(..MIN_LENGTH)
        .and_then(|head| head.try_into().ok())
        .ok_or(AssertionError::Structural { length: buf.len() })
}

/// Decode the flags byte at offset 32.
///
/// # Errors
///
/// Returns [`AssertionError::Structural`] if `buf` is shorter than 37 bytes.
pub fn parse_flags(buf: &[u8]) -> Result<AuthenticatorFlags, AssertionError> {
    Ok(AuthenticatorFlags::from(header(buf)?[FLAGS_OFFSET]))
}

/// Read the big-endian sign counter from bytes 33..37.
///
/// # Errors
///
/// Returns [`AssertionError::Structural`] if `buf` is shorter than 37 bytes.
pub fn extract_counter(buf: &[u8]) -> Result<u32, AssertionError> {
    let head = header(buf)?;
    let mut counter = [0u8; 4];
    counter.copy_from_slice(&head[COUNTER_OFFSET..MIN_LENGTH]);
    Ok(u32::from_be_bytes(counter))
}

/// Whether the first 32 bytes of `buf` equal `SHA-256(expected_rp_id)`.
///
/// Any length or content mismatch yields `false`. The comparison runs in
/// constant time.
#[must_use]
pub fn verify_rp_id_hash(buf: &[u8], expected_rp_id: &str) -> bool {
    let Some(rp_id_hash) = buf.get(..RP_ID_HASH_LENGTH) else {
        return false;
    };
    let expected = Sha256::digest(expected_rp_id.as_bytes());
    rp_id_hash.ct_eq(&expected[..]).into()
}

/// Like [`verify_rp_id_hash`], as a `Result`.
///
/// # Errors
///
/// Returns [`AssertionError::RpIdMismatch`] when the hash does not match.
pub fn check_rp_id_hash(buf: &[u8], expected_rp_id: &str) -> Result<(), AssertionError> {
    if verify_rp_id_hash(buf, expected_rp_id) {
        Ok(())
    } else {
        Err(AssertionError::RpIdMismatch)
    }
}

/// Check that `buf` is long enough and has the user-present flag set.
///
/// # Errors
///
/// Returns [`AssertionError::Structural`] for short buffers and
/// [`AssertionError::MissingUserPresence`] when UP is clear.
pub fn validate_structure(buf: &[u8]) -> Result<(), AssertionError> {
    if parse_flags(buf)?.user_present {
        Ok(())
    } else {
        Err(AssertionError::MissingUserPresence)
    }
}
