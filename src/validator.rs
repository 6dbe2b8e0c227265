//! Input validation against a definition's input alphabet.

use crate::types::{Definition, InputError};

/// Checks that every character of `input` belongs to the definition's input alphabet.
///
/// The empty input is always valid. On failure the first offending character and its
/// position are reported.
pub fn validate_input(definition: &Definition, input: &str) -> Result<(), InputError> {
    match input
        .chars()
        .enumerate()
        .find(|(_, c)| !definition.input_alphabet.contains(c))
    {
        Some((position, symbol)) => Err(InputError::IllegalSymbol { symbol, position }),
        None => Ok(()),
    }
}
