//! `clientDataJSON` decoding.

use crate::{encoding::decode_base64, error::AssertionError};
use serde::{Deserialize, Serialize};

/// The `type` value browsers emit for assertion ceremonies.
pub const ASSERTION_TYPE: &str = "webauthn.get";

/// The client data envelope collected by the browser during a ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientData {
    /// Ceremony type, `webauthn.get` for assertions.
    #[serde(rename = "type")]
    pub ty: String,
    /// Base64url-encoded challenge the relying party issued.
    pub challenge: String,
    /// Origin of the page that ran the ceremony.
    pub origin: String,
    /// Whether the ceremony ran in a cross-origin iframe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_origin: Option<bool>,
}

impl ClientData {
    /// Decode `clientDataJSON` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::MalformedClientData`] if the bytes are not
    /// UTF-8 JSON or lack `type`, `challenge` or `origin`.
    pub fn decode(json: &[u8]) -> Result<Self, AssertionError> {
        serde_json::from_slice(json).map_err(|e| AssertionError::MalformedClientData(e.to_string()))
    }

    /// Whether this is an assertion (`webauthn.get`) ceremony.
    #[must_use]
    pub fn is_assertion(&self) -> bool {
        self.ty == ASSERTION_TYPE
    }

    /// The raw challenge bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::MalformedClientData`] if the challenge is not base64.
    pub fn challenge_bytes(&self) -> Result<Vec<u8>, AssertionError> {
        decode_base64("challenge", &self.challenge)
            .map_err(|e| AssertionError::MalformedClientData(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_decodes_client_data() {
        let json = br#"{"type":"webauthn.get","challenge":"AQID","origin":"https://example.com","crossOrigin":false,"other":1}"#;
        let client_data = ClientData::decode(json).unwrap();

        assert!(client_data.is_assertion());
        assert_eq!(client_data.origin, "https://example.com");
        assert_eq!(client_data.cross_origin, Some(false));
        assert_eq!(client_data.challenge_bytes().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn cross_origin_is_optional() {
        let json = br#"{"type":"webauthn.get","challenge":"AQID","origin":"https://example.com"}"#;
        assert_eq!(ClientData::decode(json).unwrap().cross_origin, None);
    }

    #[test]
    fn it_rejects_missing_fields() {
        for json in [
            &br#"{"challenge":"AQID","origin":"https://example.com"}"#[..],
            br#"{"type":"webauthn.get","origin":"https://example.com"}"#,
            br#"{"type":"webauthn.get","challenge":"AQID"}"#,
        ] {
            assert!(matches!(
                ClientData::decode(json),
                Err(AssertionError::MalformedClientData(_))
            ));
        }
    }

    #[test]
    fn it_rejects_invalid_json() {
        assert!(matches!(
            ClientData::decode(b"not json"),
            Err(AssertionError::MalformedClientData(_))
        ));
        assert!(matches!(
            ClientData::decode(&[0xff, 0xfe, 0x7b]),
            Err(AssertionError::MalformedClientData(_))
        ));
    }
}
