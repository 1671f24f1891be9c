//! Validation of string-encoded enum arguments
use crate::{OboError, OboResult};

/// A closed set of values that can be selected by name
pub(crate) trait Choice: Sized + Copy + 'static {
    /// The parameter name, used in error messages
    const PARAMETER: &'static str;
    /// The accepted names, in the same order as `VARIANTS`
    const NAMES: &'static [&'static str];
    const VARIANTS: &'static [Self];
}

/// Returns the variant named `value`
///
/// # Errors
///
/// [`OboError::InvalidEnumArgument`] if `value` is not one of `T::NAMES`
pub(crate) fn parse_choice<T: Choice>(value: &str) -> OboResult<T> {
    T::NAMES
        .iter()
        .position(|name| *name == value)
        .and_then(|idx| T::VARIANTS.get(idx).copied())
        .ok_or_else(|| OboError::InvalidEnumArgument {
            parameter: T::PARAMETER,
            value: value.to_string(),
            allowed: T::NAMES,
        })
}
