//! PIN value object
//!
//! The PIN only gates recording locally and is echoed to the endpoint with
//! every dispatch. It is not a verified credential.

use std::fmt;

use super::error::PinError;

/// Number of digits that authorize a session
pub const PIN_LENGTH: usize = 6;

/// A partially or fully entered PIN.
/// Holds at most [`PIN_LENGTH`] ASCII digits.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Pin {
    digits: String,
}

impl Pin {
    /// Create an empty PIN
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `input` would be accepted as PIN field contents
    pub fn validate(input: &str) -> Result<(), PinError> {
        if !input.chars().all(|c| c.is_ascii_digit()) {
            return Err(PinError::NonDigit);
        }
        if input.len() > PIN_LENGTH {
            return Err(PinError::TooLong);
        }
        Ok(())
    }

    /// Replace the PIN with `input`, leaving it untouched on rejection
    pub fn replace(&mut self, input: &str) -> Result<(), PinError> {
        Self::validate(input)?;
        self.digits.clear();
        self.digits.push_str(input);
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// A PIN authorizes recording once all digits are entered
    pub fn is_authorized(&self) -> bool {
        self.digits.len() == PIN_LENGTH
    }
}

// Never print the digits themselves.
impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pin({}/{})", self.digits.len(), PIN_LENGTH)
    }
}
