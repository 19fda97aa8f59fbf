//! Validation functions for addresses.

use crate::parser::AddressError;
use crate::types::Step;

/// Maximum allowed address string length, in bytes.
pub const MAX_ADDRESS_LENGTH: usize = 1024;

/// Maximum allowed address depth.
pub const MAX_STEPS: usize = 256;

/// Validate the raw text of an address before parsing.
///
/// # Example
///
/// ```
/// use tree_edit_address::validate_address;
///
/// validate_address("").unwrap();
/// validate_address("a.b[0]").unwrap();
/// validate_address(&"a".repeat(2000)).unwrap_err();
/// ```
pub fn validate_address(address: &str) -> Result<(), AddressError> {
    if address.len() > MAX_ADDRESS_LENGTH {
        return Err(AddressError::AddressTooLong);
    }
    Ok(())
}

/// Validate a parsed step list.
pub fn validate_steps(steps: &[Step]) -> Result<(), AddressError> {
    if steps.len() > MAX_STEPS {
        return Err(AddressError::TooManySteps);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_address() {
        assert!(validate_address("").is_ok());
    }

    #[test]
    fn test_validate_long_address() {
        let long = "a".repeat(MAX_ADDRESS_LENGTH + 1);
        assert_eq!(validate_address(&long), Err(AddressError::AddressTooLong));
        assert!(validate_address(&"a".repeat(MAX_ADDRESS_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_step_count() {
        let steps: Vec<Step> = (0..MAX_STEPS as isize).map(Step::Index).collect();
        assert!(validate_steps(&steps).is_ok());

        let steps: Vec<Step> = (0..300).map(Step::Index).collect();
        assert_eq!(validate_steps(&steps), Err(AddressError::TooManySteps));
    }
}
