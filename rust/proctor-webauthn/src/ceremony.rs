//! Human-readable messages for failed browser ceremonies.
//!
//! Maps the `DOMException` name a client reports when
//! `navigator.credentials.get()` or `create()` rejects to a message suitable
//! for display. Unrelated to server-side verification errors.

/// Shown when neither the name nor the message is recognized.
pub const GENERIC_MESSAGE: &str = "Biometric authentication failed. Please try again.";

const NOT_ALLOWED: &str =
    "Authentication was cancelled or timed out. Please try again and confirm on your device.";
const INVALID_STATE: &str = "This device is already registered for biometric login.";
const NOT_SUPPORTED: &str = "This device or browser does not support biometric authentication.";
const SECURITY: &str = "Biometric authentication requires a secure (HTTPS) connection.";
const ABORTED: &str = "Authentication was aborted.";
const CONSTRAINT: &str = "Your device does not meet the security requirements for biometric login.";
const TIMED_OUT: &str = "Authentication timed out. Please try again.";

/// Message for a ceremony failure reported as `name` with detail `message`.
///
/// The exception name is matched first; an unknown name falls back to
/// substrings of the message, then to [`GENERIC_MESSAGE`].
#[must_use]
pub fn describe_ceremony_error(name: &str, message: &str) -> &'static str {
    match name {
        "NotAllowedError" => NOT_ALLOWED,
        "InvalidStateError" => INVALID_STATE,
        "NotSupportedError" => NOT_SUPPORTED,
        "SecurityError" => SECURITY,
        "AbortError" => ABORTED,
        "ConstraintError" => CONSTRAINT,
        _ => describe_by_message(message),
    }
}

fn describe_by_message(message: &str) -> &'static str {
    let message = message.to_ascii_lowercase();
    if message.contains("timed out") || message.contains("timeout") {
        TIMED_OUT
    } else if message.contains("not allowed") || message.contains("cancel") {
        NOT_ALLOWED
    } else if message.contains("already registered") {
        INVALID_STATE
    } else if message.contains("not supported") {
        NOT_SUPPORTED
    } else if message.contains("secure context") || message.contains("insecure") {
        SECURITY
    } else {
        GENERIC_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_exception_names() {
        assert_eq!(describe_ceremony_error("NotAllowedError", ""), NOT_ALLOWED);
        assert_eq!(describe_ceremony_error("InvalidStateError", ""), INVALID_STATE);
        assert_eq!(describe_ceremony_error("NotSupportedError", ""), NOT_SUPPORTED);
        assert_eq!(describe_ceremony_error("SecurityError", ""), SECURITY);
        assert_eq!(describe_ceremony_error("AbortError", ""), ABORTED);
    }

    #[test]
    fn the_name_wins_over_the_message() {
        assert_eq!(
            describe_ceremony_error("SecurityError", "The operation timed out"),
            SECURITY
        );
    }

    #[test]
    fn it_falls_back_to_the_message() {
        assert_eq!(
            describe_ceremony_error("Error", "The operation either Timed Out or was not allowed"),
            TIMED_OUT
        );
        assert_eq!(
            describe_ceremony_error("Error", "The request is not allowed by the user agent"),
            NOT_ALLOWED
        );
        assert_eq!(
            describe_ceremony_error("TypeError", "WebAuthn is not supported in this context"),
            NOT_SUPPORTED
        );
        assert_eq!(
            describe_ceremony_error("", "called from an insecure origin"),
            SECURITY
        );
    }

    #[test]
    fn it_defaults_to_a_generic_message() {
        assert_eq!(describe_ceremony_error("WeirdError", "???"), GENERIC_MESSAGE);
        assert_eq!(describe_ceremony_error("", ""), GENERIC_MESSAGE);
    }
}
