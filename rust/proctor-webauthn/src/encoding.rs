//! Base64 handling at the request boundary.
//!
//! Browsers hand back `ArrayBuffer`s that callers encode either with the
//! standard alphabet or the URL-safe one, with or without padding. Decoding
//! maps `-` to `+` and `_` to `/` and then decodes with the standard alphabet,
//! accepting both padded and unpadded input.

use crate::error::AssertionError;
use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose},
};

const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a base64 string that may use either the standard or URL-safe alphabet.
///
/// # Errors
///
/// Returns [`AssertionError::InvalidEncoding`] naming `field` when the input is
/// not base64.
pub fn decode_base64(field: &'static str, input: &str) -> Result<Vec<u8>, AssertionError> {
    let normalized: String = input
        .trim()
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    LENIENT_STANDARD
        .decode(normalized.as_bytes())
        .map_err(|e| AssertionError::InvalidEncoding {
            field,
            reason: e.to_string(),
        })
}

/// Encode bytes as unpadded base64url, the form WebAuthn uses for challenges.
#[must_use]
pub fn encode_base64url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Encode bytes with the padded standard alphabet.
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn it_decodes_url_safe_characters() {
        // 0xfb 0xff encodes to "+/8=" standard, "-_8" url-safe.
        assert_eq!(decode_base64("x", "-_8").unwrap(), vec![0xfb, 0xff]);
        assert_eq!(decode_base64("x", "+/8=").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn it_reports_the_failing_field() {
        let error = decode_base64("signature", "not base64!").unwrap_err();
        assert!(matches!(
            error,
            AssertionError::InvalidEncoding {
                field: "signature",
                ..
            }
        ));
    }

    proptest! {
        #[test]
        fn standard_encoding_round_trips(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(decode_base64("x", &encode_base64(&bytes)).unwrap(), bytes);
        }

        #[test]
        fn url_safe_encoding_round_trips(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(decode_base64("x", &encode_base64url(&bytes)).unwrap(), bytes);
        }
    }
}
