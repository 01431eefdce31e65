//! Sign counter monotonicity.
//!
//! Authenticators that support counters increment them on every assertion. A
//! counter that fails to advance past the stored value indicates a cloned
//! authenticator or a replayed assertion. A reported counter of zero means the
//! authenticator does not keep a counter and is always accepted.

use crate::error::AssertionError;

/// Whether `counter` is acceptable given the last persisted `stored` value.
#[must_use]
pub const fn validate_counter(counter: u32, stored: u32) -> bool {
    counter == 0 || counter > stored
}

/// Like [`validate_counter`], as a `Result`.
///
/// # Errors
///
/// Returns [`AssertionError::ReplayDetected`] when the counter regressed.
pub fn check_counter(counter: u32, stored: u32) -> Result<(), AssertionError> {
    if validate_counter(counter, stored) {
        Ok(())
    } else {
        Err(AssertionError::ReplayDetected { counter, stored })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_means_counters_are_unsupported() {
        assert!(validate_counter(0, 100));
        assert!(validate_counter(0, 0));
    }

    #[test]
    fn counters_must_strictly_increase() {
        assert!(!validate_counter(100, 100));
        assert!(!validate_counter(99, 100));
        assert!(validate_counter(101, 100));
        assert!(validate_counter(1, 0));
    }

    #[test]
    fn regression_is_a_replay() {
        assert_eq!(
            check_counter(5, 7),
            Err(AssertionError::ReplayDetected {
                counter: 5,
                stored: 7
            })
        );
        assert_eq!(check_counter(8, 7), Ok(()));
    }
}
