use uncover_core::errors::UncoverError;

/// Restartable finite sequence of choices.
///
/// Implemented by the leaf enumerators so that several of them can be driven
/// together as the digits of an odometer.
pub trait ChoiceEnumerator {
    /// Returns whether the sequence is exhausted.
    fn ended(&self) -> Result<bool, UncoverError>;
    /// Moves to the next choice; no-op once ended.
    fn advance(&mut self) -> Result<(), UncoverError>;
    /// Restarts the sequence at its first choice.
    fn reset(&mut self) -> Result<(), UncoverError>;
}

/// Advances a product of enumerators, digit 0 being the least significant.
///
/// An exhausted digit is restarted and the carry moves to the next one.
/// Returns `false` once the whole product is exhausted, in which case every
/// digit has been restarted. A product of zero digits has exactly one element.
pub fn advance_odometer<E: ChoiceEnumerator>(digits: &mut [E]) -> Result<bool, UncoverError> {
    for digit in digits.iter_mut() {
        digit.advance()?;
        if !digit.ended()? {
            return Ok(true);
        }
        digit.reset()?;
    }
    Ok(false)
}

/// Returns whether every digit currently holds a choice, that is whether the
/// product is non-empty.
pub fn all_live<E: ChoiceEnumerator>(digits: &[E]) -> Result<bool, UncoverError> {
    for digit in digits {
        if digit.ended()? {
            return Ok(false);
        }
    }
    Ok(true)
}
