//! Chilean RUT (Rol Único Tributario) validation.
//!
//! A RUT is a body of up to nine digits followed by a check digit
//! (`0`-`9` or `K`) computed with the modulo 11 algorithm.  Payroll
//! submissions identify workers by RUT, so a batch run refuses entries
//! whose RUT does not check out.

use crate::error::InvalidInputError;
use crate::validation::ValidationResult;

/// Validates `rut` and returns it normalized as `NNNNNNNN-D` (no dots,
/// uppercase `K`).
///
/// Dots and spaces are ignored; the hyphen before the check digit is
/// optional.
pub fn validate_rut(rut: &str) -> ValidationResult<String> {
    let cleaned: String = rut
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let invalid = |reason: &'static str| InvalidInputError::InvalidRut {
        rut: rut.to_string(),
        reason,
    };

    if !cleaned.is_ascii() {
        return Err(invalid("must contain only digits and a check digit"));
    }
    if cleaned.len() < 2 {
        return Err(invalid("too short"));
    }
    let (body, check) = cleaned.split_at(cleaned.len() - 1);
    if body.len() > 9 || !body.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("body must be up to nine digits"));
    }
    let check = check.chars().next().ok_or_else(|| invalid("missing check digit"))?;
    if check_digit(body) != check {
        return Err(invalid("check digit mismatch"));
    }

    Ok(format!("{body}-{check}"))
}

/// Modulo 11 check digit for a string of ASCII digits.
fn check_digit(body: &str) -> char {
    let sum: u32 = body
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .zip([2, 3, 4, 5, 6, 7].into_iter().cycle())
        .map(|(digit, factor)| digit * factor)
        .sum();
    match 11 - sum % 11 {
        11 => '0',
        10 => 'K',
        n => char::from_digit(n, 10).unwrap_or('0'),
    }
}
