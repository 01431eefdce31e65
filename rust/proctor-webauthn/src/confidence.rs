//! Confidence scoring.
//!
//! Two scorers exist with different weights. [`inline_confidence`] is what the
//! orchestrator reports; [`calculate_confidence`] scores an already assembled
//! result. They are kept separate and are not interchangeable.

use crate::{assertion::VerificationResult, authenticator_data::AuthenticatorFlags};

/// Upper bound of every confidence score.
pub const MAX_CONFIDENCE: u8 = 100;

/// Score computed while verifying.
///
/// Starts at 50, adds 30 for a valid signature and 20 for user verification.
/// Without user presence the score is 0.
#[must_use]
pub fn inline_confidence(signature_valid: bool, flags: &AuthenticatorFlags) -> u8 {
    if !flags.user_present {
        return 0;
    }

    let mut score: u32 = 50;
    if signature_valid {
        score += 30;
    }
    if flags.user_verified {
        score += 20;
    }
    clamp(score)
}

/// Score for a finished [`VerificationResult`].
///
/// Unverified results score 0. Otherwise starts at 60, adds 30 for user
/// verification and 10 for user presence.
#[must_use]
pub fn calculate_confidence(result: &VerificationResult) -> u8 {
    if !result.verified {
        return 0;
    }

    let mut score: u32 = 60;
    if result.flags.user_verified {
        score += 30;
    }
    if result.flags.user_present {
        score += 10;
    }
    clamp(score)
}

fn clamp(score: u32) -> u8 {
    u8::try_from(score.min(u32::from(MAX_CONFIDENCE))).unwrap_or(MAX_CONFIDENCE)
}
